//! Core data model definitions shared across covershelf crates.
#![allow(missing_docs)]

pub mod cover;
pub mod cover_events;
pub mod cover_type;
pub mod error;
pub mod ids;

// Intentionally curated re-exports for downstream consumers.
pub use cover::Cover;
pub use cover_events::CoversUpdatedEvent;
pub use cover_type::{CoverType, CoverTypeSpec};
pub use error::{ModelError, Result as ModelResult};
pub use ids::ItemId;
