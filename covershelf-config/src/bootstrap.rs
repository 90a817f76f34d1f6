use std::sync::Arc;

use covershelf_core::{
    CoverError,
    infra::{LocalDiskProvider, ReqwestHttpClient, StaticAppPaths},
    pipeline::{CoverProxy, ImageCrateResizer, MediaCoverService},
};
use tracing::info;

use crate::models::CoverConfig;

/// Wires the production adapters behind a [`MediaCoverService`].
///
/// The returned service owns a fresh resize limiter; clone the service
/// rather than calling this twice if the permits must be shared.
pub fn build_cover_service(
    config: &CoverConfig,
) -> Result<MediaCoverService, CoverError> {
    let http = Arc::new(ReqwestHttpClient::new(
        config.http_timeout(),
        &config.user_agent,
    )?);
    let paths = Arc::new(StaticAppPaths::new(config.cover_root.clone()));
    let proxy =
        Arc::new(CoverProxy::with_ttl(http.clone(), config.proxy_ttl()));
    let limiter = config.resize_limiter();

    info!(
        cover_root = %config.cover_root.display(),
        resize_permits = limiter.capacity(),
        proxy_ttl_secs = config.proxy_ttl_secs,
        "cover service ready"
    );

    Ok(MediaCoverService::new(
        Arc::new(LocalDiskProvider::new()),
        http,
        paths,
        Arc::new(ImageCrateResizer::new(config.jpeg_quality)),
        proxy,
        limiter,
    ))
}
