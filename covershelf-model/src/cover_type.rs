use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use crate::error::ModelError;

/// Kind of artwork attached to a media item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum CoverType {
    #[default]
    Unknown,
    Poster,
    Banner,
    Fanart,
    Screenshot,
    Headshot,
    Clearlogo,
}

/// Static per-type attributes. Everything that differs between cover types
/// lives in [`COVER_TYPE_SPECS`] so call sites never switch on the type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoverTypeSpec {
    pub cover_type: CoverType,
    /// Lowercase name used in on-disk file names and URLs.
    pub name: &'static str,
    /// File extension including the leading dot.
    pub extension: &'static str,
    /// Preset heights for resized variants, largest first.
    pub resize_heights: &'static [u32],
}

/// Indexed by `CoverType as usize`.
const COVER_TYPE_SPECS: [CoverTypeSpec; 7] = [
    CoverTypeSpec {
        cover_type: CoverType::Unknown,
        name: "unknown",
        extension: ".jpg",
        resize_heights: &[],
    },
    CoverTypeSpec {
        cover_type: CoverType::Poster,
        name: "poster",
        extension: ".jpg",
        resize_heights: &[500, 250],
    },
    CoverTypeSpec {
        cover_type: CoverType::Banner,
        name: "banner",
        extension: ".jpg",
        resize_heights: &[70, 35],
    },
    CoverTypeSpec {
        cover_type: CoverType::Fanart,
        name: "fanart",
        extension: ".jpg",
        resize_heights: &[360, 180],
    },
    CoverTypeSpec {
        cover_type: CoverType::Screenshot,
        name: "screenshot",
        extension: ".jpg",
        resize_heights: &[360, 180],
    },
    CoverTypeSpec {
        cover_type: CoverType::Headshot,
        name: "headshot",
        extension: ".jpg",
        resize_heights: &[500, 250],
    },
    CoverTypeSpec {
        cover_type: CoverType::Clearlogo,
        name: "clearlogo",
        extension: ".png",
        resize_heights: &[],
    },
];

impl CoverType {
    pub const ALL: [CoverType; 7] = [
        Self::Unknown,
        Self::Poster,
        Self::Banner,
        Self::Fanart,
        Self::Screenshot,
        Self::Headshot,
        Self::Clearlogo,
    ];

    pub fn spec(self) -> &'static CoverTypeSpec {
        &COVER_TYPE_SPECS[self as usize]
    }

    pub fn as_str(self) -> &'static str {
        self.spec().name
    }

    pub fn extension(self) -> &'static str {
        self.spec().extension
    }

    pub fn resize_heights(self) -> &'static [u32] {
        self.spec().resize_heights
    }

    pub fn is_unknown(self) -> bool {
        self == CoverType::Unknown
    }
}

impl Display for CoverType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CoverType {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        COVER_TYPE_SPECS
            .iter()
            .find(|spec| spec.name.eq_ignore_ascii_case(needle))
            .map(|spec| spec.cover_type)
            .ok_or_else(|| ModelError::InvalidCoverType(s.to_string()))
    }
}
