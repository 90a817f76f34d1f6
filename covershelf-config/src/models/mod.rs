use std::{path::PathBuf, time::Duration};

use covershelf_core::pipeline::{
    ResizeLimiter, resizer::DEFAULT_JPEG_QUALITY,
};
use serde::{Deserialize, Serialize};

use crate::loader::error::ConfigLoadError;

fn default_cover_root() -> PathBuf {
    PathBuf::from("./data/MediaCover")
}

fn default_user_agent() -> String {
    format!("covershelf/{}", env!("CARGO_PKG_VERSION"))
}

/// Cover pipeline settings. Every field has a default so partial files are
/// accepted.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct CoverConfig {
    /// Folder that holds `{item_id}/{cover files}`. Relative paths resolve
    /// against the working directory at startup.
    pub cover_root: PathBuf,
    /// Concurrent resize passes across the whole process. Unset means half
    /// the logical CPUs, rounded up.
    pub resize_concurrency: Option<usize>,
    /// Lifetime of proxy references handed out for unsaved items.
    pub proxy_ttl_secs: u64,
    /// Per-request timeout for HEAD and GET against image hosts.
    pub http_timeout_secs: u64,
    /// Quality used when re-encoding JPEG variants (1-100).
    pub jpeg_quality: u8,
    pub user_agent: String,
}

impl Default for CoverConfig {
    fn default() -> Self {
        Self {
            cover_root: default_cover_root(),
            resize_concurrency: None,
            proxy_ttl_secs: 24 * 60 * 60,
            http_timeout_secs: 30,
            jpeg_quality: DEFAULT_JPEG_QUALITY,
            user_agent: default_user_agent(),
        }
    }
}

impl CoverConfig {
    pub fn validate(&self) -> Result<(), ConfigLoadError> {
        if !(1..=100).contains(&self.jpeg_quality) {
            return Err(ConfigLoadError::Invalid(format!(
                "jpeg_quality must be within 1..=100, got {}",
                self.jpeg_quality
            )));
        }
        if self.resize_concurrency == Some(0) {
            return Err(ConfigLoadError::Invalid(
                "resize_concurrency must be at least 1 when set".into(),
            ));
        }
        if self.proxy_ttl_secs == 0 {
            return Err(ConfigLoadError::Invalid(
                "proxy_ttl_secs must be greater than zero".into(),
            ));
        }
        if self.http_timeout_secs == 0 {
            return Err(ConfigLoadError::Invalid(
                "http_timeout_secs must be greater than zero".into(),
            ));
        }
        if self.cover_root.as_os_str().is_empty() {
            return Err(ConfigLoadError::Invalid(
                "cover_root must not be empty".into(),
            ));
        }
        Ok(())
    }

    /// The one limiter the process should share.
    pub fn resize_limiter(&self) -> ResizeLimiter {
        match self.resize_concurrency {
            Some(permits) => ResizeLimiter::new(permits),
            None => ResizeLimiter::for_host(),
        }
    }

    pub fn proxy_ttl(&self) -> Duration {
        Duration::from_secs(self.proxy_ttl_secs)
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = CoverConfig::default();
        config.validate().expect("defaults validate");
        assert_eq!(config.jpeg_quality, 92);
        assert_eq!(config.proxy_ttl(), Duration::from_secs(86_400));
        assert!(config.resize_limiter().capacity() >= 1);
    }

    #[test]
    fn explicit_concurrency_wins() {
        let config = CoverConfig {
            resize_concurrency: Some(3),
            ..CoverConfig::default()
        };
        assert_eq!(config.resize_limiter().capacity(), 3);
    }

    #[test]
    fn rejects_out_of_range_values() {
        for bad in [
            CoverConfig {
                jpeg_quality: 0,
                ..CoverConfig::default()
            },
            CoverConfig {
                jpeg_quality: 101,
                ..CoverConfig::default()
            },
            CoverConfig {
                resize_concurrency: Some(0),
                ..CoverConfig::default()
            },
            CoverConfig {
                proxy_ttl_secs: 0,
                ..CoverConfig::default()
            },
        ] {
            assert!(
                matches!(bad.validate(), Err(ConfigLoadError::Invalid(_))),
                "{bad:?}"
            );
        }
    }
}
