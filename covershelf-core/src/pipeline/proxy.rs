use std::{fmt, sync::Arc, time::Duration};

use bytes::Bytes;
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::{
    error::{CoverError, Result},
    infra::TtlCache,
    pipeline::paths::MEDIA_COVER_PROXY_URL_PREFIX,
    ports::HttpClient,
};

/// Lifetime of a registered proxy reference.
pub const DEFAULT_PROXY_TTL: Duration = Duration::from_secs(24 * 60 * 60);

const FALLBACK_FILE_NAME: &str = "cover";

/// Content-addressed, time-bounded references to remote images for items
/// that are not persisted yet.
pub struct CoverProxy {
    http: Arc<dyn HttpClient>,
    urls: TtlCache<String>,
}

impl fmt::Debug for CoverProxy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CoverProxy")
            .field("http", &"dyn HttpClient")
            .field("urls", &self.urls)
            .finish()
    }
}

impl CoverProxy {
    pub fn new(http: Arc<dyn HttpClient>) -> Self {
        Self::with_ttl(http, DEFAULT_PROXY_TTL)
    }

    pub fn with_ttl(http: Arc<dyn HttpClient>, ttl: Duration) -> Self {
        Self {
            http,
            urls: TtlCache::new(ttl),
        }
    }

    /// Registers `remote_url` and returns
    /// `/MediaCoverProxy/{sha256-hex}/{file name}`.
    ///
    /// The same URL always yields the same digest; re-registering restarts
    /// its lifetime.
    pub fn register_url(&self, remote_url: &str) -> String {
        let evicted = self.urls.clear_expired();
        if evicted > 0 {
            debug!(evicted, "dropped expired proxy references");
        }

        let digest = url_digest(remote_url);
        self.urls.insert(digest.clone(), remote_url.to_string());

        format!(
            "{MEDIA_COVER_PROXY_URL_PREFIX}/{digest}/{}",
            filename_from_url(remote_url)
        )
    }

    /// Remote URL for `digest`, or `NotFoundInCache` once it expired.
    pub fn get_url(&self, digest: &str) -> Result<String> {
        self.urls
            .get(digest)
            .ok_or_else(|| CoverError::NotFoundInCache(digest.to_string()))
    }

    /// Fetches the bytes behind `digest`.
    pub async fn get_image(&self, digest: &str) -> Result<Bytes> {
        let url = self.get_url(digest)?;
        self.http.get_bytes(&url).await
    }
}

/// Lowercase hex SHA-256 of the URL text.
pub fn url_digest(remote_url: &str) -> String {
    hex::encode(Sha256::digest(remote_url.as_bytes()))
}

/// Last non-empty path segment of `remote_url`, ignoring query and fragment.
pub fn filename_from_url(remote_url: &str) -> String {
    url::Url::parse(remote_url)
        .ok()
        .and_then(|parsed| {
            parsed
                .path_segments()
                .and_then(|mut segments| {
                    segments.rfind(|segment| !segment.is_empty())
                })
                .map(str::to_string)
        })
        .unwrap_or_else(|| FALLBACK_FILE_NAME.to_string())
}
