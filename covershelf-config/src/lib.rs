//! Shared configuration library for covershelf.
//!
//! This crate centralizes config loading and validation, tracing setup and
//! the wiring of a
//! [`MediaCoverService`](covershelf_core::pipeline::MediaCoverService) from
//! a [`CoverConfig`]. The `covershelf` binary is a thin CLI over it.
#![allow(missing_docs)]

pub mod bootstrap;
pub mod loader;
pub mod models;
pub mod telemetry;

pub use bootstrap::build_cover_service;
pub use loader::{
    ConfigLoad, CoverConfigLoader, CoverConfigSource, error::ConfigLoadError,
};
pub use models::CoverConfig;
