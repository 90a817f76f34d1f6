use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use covershelf_model::{CoverType, ItemId};

/// URL namespace for covers of persisted items.
pub const MEDIA_COVER_URL_PREFIX: &str = "/MediaCover";

/// URL namespace for proxied covers of ephemeral items.
pub const MEDIA_COVER_PROXY_URL_PREFIX: &str = "/MediaCoverProxy";

/// Ticks (100ns) between 0001-01-01T00:00:00Z and the unix epoch.
const UNIX_EPOCH_TICKS: i64 = 621_355_968_000_000_000;
const TICKS_PER_SECOND: i64 = 10_000_000;

/// Folder holding every cover file of `item_id`.
pub fn cover_folder(root: &Path, item_id: ItemId) -> PathBuf {
    root.join(item_id.to_string())
}

/// `{root}/{item_id}/{type}[-{height}]{ext}`.
///
/// The height-less path is the full-size source; every variant is derived
/// from it.
pub fn cover_path(
    root: &Path,
    item_id: ItemId,
    cover_type: CoverType,
    height: Option<u32>,
) -> PathBuf {
    cover_folder(root, item_id).join(cover_file_name(cover_type, height))
}

pub fn cover_file_name(cover_type: CoverType, height: Option<u32>) -> String {
    let spec = cover_type.spec();
    match height {
        Some(height) => format!("{}-{}{}", spec.name, height, spec.extension),
        None => format!("{}{}", spec.name, spec.extension),
    }
}

/// `/MediaCover/{item_id}/{type}{ext}` without cache-busting query.
pub fn local_cover_url(item_id: ItemId, cover_type: CoverType) -> String {
    format!(
        "{MEDIA_COVER_URL_PREFIX}/{item_id}/{}",
        cover_file_name(cover_type, None)
    )
}

/// 100-nanosecond intervals since 0001-01-01T00:00:00Z.
pub fn to_ticks(instant: DateTime<Utc>) -> i64 {
    UNIX_EPOCH_TICKS
        + instant.timestamp() * TICKS_PER_SECOND
        + i64::from(instant.timestamp_subsec_nanos() / 100)
}
