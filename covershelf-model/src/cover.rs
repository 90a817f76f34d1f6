use std::hash::{Hash, Hasher};
use std::str::FromStr;

use crate::{CoverType, ModelError};

/// One piece of artwork for a media item.
///
/// Identity is `(cover_type, remote_url)`. `url` is derived by the cover
/// pipeline and deliberately excluded from equality and hashing.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Cover {
    pub cover_type: CoverType,
    pub remote_url: String,
    /// Servable URL, filled in by the pipeline.
    #[cfg_attr(feature = "serde", serde(default))]
    pub url: Option<String>,
}

impl Cover {
    pub fn new(cover_type: CoverType, remote_url: impl Into<String>) -> Self {
        Self {
            cover_type,
            remote_url: remote_url.into(),
            url: None,
        }
    }
}

impl PartialEq for Cover {
    fn eq(&self, other: &Self) -> bool {
        self.cover_type == other.cover_type
            && self.remote_url == other.remote_url
    }
}

impl Eq for Cover {}

impl Hash for Cover {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.cover_type.hash(state);
        self.remote_url.hash(state);
    }
}

/// Parses `type=remote-url`, e.g. `poster=https://img.example/p.jpg`.
impl FromStr for Cover {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (kind, remote) = s.split_once('=').ok_or_else(|| {
            ModelError::InvalidCoverSpec(format!(
                "expected <type>=<url>, got {s:?}"
            ))
        })?;
        let remote = remote.trim();
        if remote.is_empty() {
            return Err(ModelError::InvalidCoverSpec(format!(
                "missing remote url in {s:?}"
            )));
        }
        Ok(Cover::new(kind.parse()?, remote))
    }
}
