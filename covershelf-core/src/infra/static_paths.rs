use std::path::PathBuf;

use crate::ports::AppPaths;

/// [`AppPaths`] backed by a folder fixed at startup.
#[derive(Debug, Clone)]
pub struct StaticAppPaths {
    cover_root: PathBuf,
}

impl StaticAppPaths {
    pub fn new(cover_root: impl Into<PathBuf>) -> Self {
        let cover_root = cover_root.into();
        // Keep the root absolute so produced paths stay stable if the
        // working directory changes.
        let cover_root = if cover_root.is_absolute() {
            cover_root
        } else {
            std::env::current_dir()
                .unwrap_or_else(|_| PathBuf::from("."))
                .join(cover_root)
        };
        Self { cover_root }
    }
}

impl AppPaths for StaticAppPaths {
    fn cover_root(&self) -> PathBuf {
        self.cover_root.clone()
    }
}
