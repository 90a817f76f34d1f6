use std::path::{Path, PathBuf};

use tokio::io::AsyncWriteExt;
use uuid::Uuid;

use crate::error::{CoverError, Result};

/// Sibling temp path for `dest`, unique per call so concurrent writers never
/// share one.
pub fn temp_path_for(dest: &Path) -> PathBuf {
    let name = dest
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "cover".to_string());
    dest.with_file_name(format!(".{name}.tmp-{}", Uuid::new_v4().simple()))
}

/// Moves a finished temp file over `dest`. The temp file is removed if the
/// rename fails.
pub async fn persist(tmp: &Path, dest: &Path) -> Result<()> {
    if let Err(err) = tokio::fs::rename(tmp, dest).await {
        let _ = tokio::fs::remove_file(tmp).await;
        return Err(CoverError::Internal(format!(
            "failed to move {:?} -> {:?}: {err}",
            tmp, dest
        )));
    }
    Ok(())
}

/// Best-effort atomic write (tmp + rename) that replaces any existing file.
pub async fn write_atomic(dest: &Path, bytes: &[u8]) -> Result<()> {
    let tmp = temp_path_for(dest);

    let written = async {
        let mut file = tokio::fs::File::create(&tmp).await?;
        file.write_all(bytes).await?;
        file.flush().await?;
        file.sync_all().await?;
        Ok::<_, std::io::Error>(())
    }
    .await;

    if let Err(err) = written {
        let _ = tokio::fs::remove_file(&tmp).await;
        return Err(CoverError::Io(err));
    }

    persist(&tmp, dest).await
}
