use std::path::PathBuf;

/// Application folder layout.
pub trait AppPaths: Send + Sync {
    /// Folder holding `{item_id}/{cover files}`.
    fn cover_root(&self) -> PathBuf;
}
