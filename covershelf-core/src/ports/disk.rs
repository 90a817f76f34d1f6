use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::Result;

/// Size and modification time of one file under the cover root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoverFileInfo {
    pub size: u64,
    pub last_write: DateTime<Utc>,
}

/// Snapshot of every file below a folder, keyed by full path.
pub type CoverFileInfos = HashMap<PathBuf, CoverFileInfo>;

/// Filesystem access used by the cover pipeline.
#[async_trait]
pub trait DiskProvider: Send + Sync {
    async fn file_exists(&self, path: &Path) -> bool;

    async fn folder_exists(&self, path: &Path) -> bool;

    async fn file_size(&self, path: &Path) -> Result<u64>;

    async fn last_write_time(&self, path: &Path) -> Result<DateTime<Utc>>;

    /// Creates `path` and any missing parents.
    async fn create_folder(&self, path: &Path) -> Result<()>;

    /// Removes `path` and everything below it.
    async fn delete_folder(&self, path: &Path) -> Result<()>;

    async fn delete_file(&self, path: &Path) -> Result<()>;

    /// Recursive listing of `root`. An absent root yields an empty map.
    async fn file_infos(&self, root: &Path) -> Result<CoverFileInfos>;
}
