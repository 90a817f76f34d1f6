use std::path::Path;

use async_trait::async_trait;
use bytes::Bytes;

use crate::error::Result;

/// The parts of a HEAD response the pipeline cares about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HeadResponse {
    pub content_length: Option<u64>,
}

/// Outbound HTTP used to probe and fetch remote artwork.
///
/// Implementations report non-2xx responses as
/// [`CoverError::HttpStatus`](crate::error::CoverError::HttpStatus).
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn head(&self, url: &str) -> Result<HeadResponse>;

    async fn get_bytes(&self, url: &str) -> Result<Bytes>;

    /// Writes the response body to `path`. On failure no partial file is
    /// left at `path`.
    async fn download_file(&self, url: &str, path: &Path) -> Result<()>;
}
