//! # covershelf core
//!
//! Cover-art acquisition, caching and resizing for personal media libraries.
//!
//! Metadata providers hand us remote artwork URLs; this crate turns them into
//! locally cached, multi-resolution, stably addressed images:
//!
//! - [`pipeline::MediaCoverService`]: ensures on-disk artifacts exist,
//!   computes servable URLs and deletes an item's covers
//! - [`pipeline::CoverExistenceCheck`]: decides whether a cached full-size
//!   file still matches its remote source without downloading it
//! - [`pipeline::ImageResizer`]: writes one downscaled variant of a full-size
//!   file
//! - [`pipeline::CoverProxy`]: content-addressed, time-bounded references for
//!   items that have no persisted identity yet
//! - [`pipeline::ResizeLimiter`]: process-wide bound on CPU-bound resize work
//!
//! Disk, HTTP and application paths are reached through the traits in
//! [`ports`]; production adapters live in [`infra`].
//!
//! ## Examples
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use covershelf_core::{
//!     infra::{LocalDiskProvider, ReqwestHttpClient, StaticAppPaths},
//!     pipeline::{
//!         CoverProxy, ImageCrateResizer, MediaCoverService, ResizeLimiter,
//!     },
//! };
//! use covershelf_model::{Cover, CoverType, ItemId};
//!
//! async fn refresh() -> covershelf_core::error::Result<()> {
//!     let http = Arc::new(ReqwestHttpClient::new(
//!         std::time::Duration::from_secs(30),
//!         "covershelf/0.1",
//!     )?);
//!     let service = MediaCoverService::new(
//!         Arc::new(LocalDiskProvider::new()),
//!         http.clone(),
//!         Arc::new(StaticAppPaths::new("/var/lib/covershelf/MediaCover")),
//!         Arc::new(ImageCrateResizer::default()),
//!         Arc::new(CoverProxy::new(http)),
//!         ResizeLimiter::for_host(),
//!     );
//!
//!     let mut covers =
//!         vec![Cover::new(CoverType::Poster, "https://img.example/p.jpg")];
//!     service.ensure_covers(ItemId(42), &covers).await;
//!     service.convert_to_local_urls(ItemId(42), &mut covers, None).await;
//!     println!("{:?}", covers[0].url);
//!     Ok(())
//! }
//! ```

#![allow(missing_docs)]
#![cfg_attr(docsrs, feature(doc_cfg))]

/// Error taxonomy for the cover pipeline
pub mod error;
/// Production adapters for the capability ports
pub mod infra;
/// Cover pipeline components and the orchestrating service
pub mod pipeline;
/// Capability traits consumed by the pipeline
pub mod ports;

#[cfg(test)]
pub(crate) mod testing;

pub use error::{CoverError, Result};
