use crate::ItemId;

/// Emitted once per cover refresh of an item, whether or not anything was
/// downloaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CoversUpdatedEvent {
    pub item_id: ItemId,
    /// At least one full-size cover was (re)downloaded during the refresh.
    pub updated: bool,
}
