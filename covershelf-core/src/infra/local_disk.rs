use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::debug;

use crate::{
    error::Result,
    ports::{CoverFileInfo, CoverFileInfos, DiskProvider},
};

/// [`DiskProvider`] over the local filesystem.
#[derive(Debug, Clone, Default)]
pub struct LocalDiskProvider;

impl LocalDiskProvider {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl DiskProvider for LocalDiskProvider {
    async fn file_exists(&self, path: &Path) -> bool {
        tokio::fs::metadata(path)
            .await
            .map(|meta| meta.is_file())
            .unwrap_or(false)
    }

    async fn folder_exists(&self, path: &Path) -> bool {
        tokio::fs::metadata(path)
            .await
            .map(|meta| meta.is_dir())
            .unwrap_or(false)
    }

    async fn file_size(&self, path: &Path) -> Result<u64> {
        Ok(tokio::fs::metadata(path).await?.len())
    }

    async fn last_write_time(&self, path: &Path) -> Result<DateTime<Utc>> {
        let modified = tokio::fs::metadata(path).await?.modified()?;
        Ok(DateTime::<Utc>::from(modified))
    }

    async fn create_folder(&self, path: &Path) -> Result<()> {
        tokio::fs::create_dir_all(path).await?;
        Ok(())
    }

    async fn delete_folder(&self, path: &Path) -> Result<()> {
        tokio::fs::remove_dir_all(path).await?;
        Ok(())
    }

    async fn delete_file(&self, path: &Path) -> Result<()> {
        tokio::fs::remove_file(path).await?;
        Ok(())
    }

    async fn file_infos(&self, root: &Path) -> Result<CoverFileInfos> {
        let mut infos = CoverFileInfos::new();
        if !self.folder_exists(root).await {
            debug!(root = %root.display(), "cover root absent, empty snapshot");
            return Ok(infos);
        }

        let mut pending: Vec<PathBuf> = vec![root.to_path_buf()];
        while let Some(dir) = pending.pop() {
            let mut entries = tokio::fs::read_dir(&dir).await?;
            while let Some(entry) = entries.next_entry().await? {
                let meta = entry.metadata().await?;
                if meta.is_dir() {
                    pending.push(entry.path());
                } else if meta.is_file() {
                    infos.insert(
                        entry.path(),
                        CoverFileInfo {
                            size: meta.len(),
                            last_write: DateTime::<Utc>::from(
                                meta.modified()?,
                            ),
                        },
                    );
                }
            }
        }

        Ok(infos)
    }
}
