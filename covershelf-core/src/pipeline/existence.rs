use std::{fmt, path::Path, sync::Arc};

use tracing::{debug, warn};

use crate::{
    error::Result,
    ports::{DiskProvider, HttpClient},
};

/// Decides whether a cached full-size cover still matches its remote source
/// without downloading it.
#[derive(Clone)]
pub struct CoverExistenceCheck {
    disk: Arc<dyn DiskProvider>,
    http: Arc<dyn HttpClient>,
}

impl fmt::Debug for CoverExistenceCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CoverExistenceCheck")
            .field("disk", &"dyn DiskProvider")
            .field("http", &"dyn HttpClient")
            .finish()
    }
}

impl CoverExistenceCheck {
    pub fn new(disk: Arc<dyn DiskProvider>, http: Arc<dyn HttpClient>) -> Self {
        Self { disk, http }
    }

    /// `true` when `local_path` exists and its size equals the remote
    /// Content-Length.
    ///
    /// Network failures answer `true`: a degraded provider must not trigger a
    /// re-download on every refresh. Only a failure to stat the local file
    /// is returned as an error.
    pub async fn already_exists(
        &self,
        remote_url: &str,
        local_path: &Path,
    ) -> Result<bool> {
        if !self.disk.file_exists(local_path).await {
            return Ok(false);
        }

        let head = match self.http.head(remote_url).await {
            Ok(head) => head,
            Err(err) => {
                warn!(
                    url = remote_url,
                    error = %err,
                    "HEAD check failed, keeping cached cover"
                );
                return Ok(true);
            }
        };

        let Some(remote_len) = head.content_length else {
            debug!(url = remote_url, "no content-length, treating as stale");
            return Ok(false);
        };

        let local_len = self.disk.file_size(local_path).await?;
        Ok(local_len == remote_len)
    }
}
