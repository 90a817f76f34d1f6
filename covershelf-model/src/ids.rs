use std::fmt;

/// Catalogue identity of a media item (movie, book, album, ...).
///
/// `0` is reserved for items that have not been persisted yet, e.g. search
/// results being previewed before import.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct ItemId(pub i32);

impl ItemId {
    pub const EPHEMERAL: ItemId = ItemId(0);

    pub const fn new(id: i32) -> Self {
        Self(id)
    }

    pub const fn is_ephemeral(self) -> bool {
        self.0 == Self::EPHEMERAL.0
    }

    pub const fn get(self) -> i32 {
        self.0
    }
}

impl From<i32> for ItemId {
    fn from(id: i32) -> Self {
        Self(id)
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::ItemId;

    #[test]
    fn zero_is_the_only_ephemeral_id() {
        assert!(ItemId::EPHEMERAL.is_ephemeral());
        assert!(ItemId::default().is_ephemeral());
        assert!(!ItemId(42).is_ephemeral());
        assert!(!ItemId(-1).is_ephemeral());
    }

    #[test]
    fn display_is_the_bare_number() {
        assert_eq!(ItemId(42).to_string(), "42");
    }
}
