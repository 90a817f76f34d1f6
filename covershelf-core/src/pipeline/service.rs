use std::{
    fmt,
    path::{Path, PathBuf},
    sync::Arc,
};

use covershelf_model::{Cover, CoverType, CoversUpdatedEvent, ItemId};
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use crate::{
    error::Result,
    pipeline::{
        existence::CoverExistenceCheck,
        limiter::ResizeLimiter,
        paths::{cover_folder, cover_path, local_cover_url, to_ticks},
        proxy::CoverProxy,
        resizer::ImageResizer,
    },
    ports::{AppPaths, CoverFileInfos, DiskProvider, HttpClient},
};

const COVER_EVENT_CAPACITY: usize = 1024;

/// Where one cover stands after the download pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DownloadOutcome {
    /// Cached file matches the remote (or the remote could not be asked).
    ConfirmedFresh,
    /// Full-size file was written during this call.
    Downloaded,
    /// Fetch failed; no resize this pass.
    DownloadFailed,
}

/// Orchestrates cover acquisition, resizing, URL rewriting and deletion.
#[derive(Clone)]
pub struct MediaCoverService {
    disk: Arc<dyn DiskProvider>,
    http: Arc<dyn HttpClient>,
    paths: Arc<dyn AppPaths>,
    existence: CoverExistenceCheck,
    resizer: Arc<dyn ImageResizer>,
    proxy: Arc<CoverProxy>,
    limiter: ResizeLimiter,
    cover_events: broadcast::Sender<CoversUpdatedEvent>,
}

impl fmt::Debug for MediaCoverService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MediaCoverService")
            .field("cover_root", &self.paths.cover_root())
            .field("proxy", &self.proxy)
            .field("limiter", &self.limiter)
            .field("event_subscribers", &self.cover_events.receiver_count())
            .finish()
    }
}

impl MediaCoverService {
    pub fn new(
        disk: Arc<dyn DiskProvider>,
        http: Arc<dyn HttpClient>,
        paths: Arc<dyn AppPaths>,
        resizer: Arc<dyn ImageResizer>,
        proxy: Arc<CoverProxy>,
        limiter: ResizeLimiter,
    ) -> Self {
        let existence =
            CoverExistenceCheck::new(Arc::clone(&disk), Arc::clone(&http));
        let (cover_events, _) =
            broadcast::channel::<CoversUpdatedEvent>(COVER_EVENT_CAPACITY);

        Self {
            disk,
            http,
            paths,
            existence,
            resizer,
            proxy,
            limiter,
            cover_events,
        }
    }

    pub fn subscribe_cover_events(
        &self,
    ) -> broadcast::Receiver<CoversUpdatedEvent> {
        self.cover_events.subscribe()
    }

    pub fn proxy(&self) -> &Arc<CoverProxy> {
        &self.proxy
    }

    pub fn limiter(&self) -> &ResizeLimiter {
        &self.limiter
    }

    /// `{root}/{item_id}/{type}[-{height}]{ext}`.
    pub fn get_cover_path(
        &self,
        item_id: ItemId,
        cover_type: CoverType,
        height: Option<u32>,
    ) -> PathBuf {
        cover_path(&self.paths.cover_root(), item_id, cover_type, height)
    }

    /// One recursive snapshot of the cover root; empty if the root is absent.
    pub async fn get_cover_file_infos(&self) -> Result<CoverFileInfos> {
        self.disk.file_infos(&self.paths.cover_root()).await
    }

    /// Fills `url` on every known-type cover. No network I/O, no writes.
    ///
    /// Ephemeral items get proxy URLs. Persisted items get
    /// `/MediaCover/{id}/{type}{ext}`, with `?lastWrite={ticks}` when the
    /// full-size file's modification time can be resolved from `snapshot`
    /// (if given) or a live stat.
    pub async fn convert_to_local_urls(
        &self,
        item_id: ItemId,
        covers: &mut [Cover],
        snapshot: Option<&CoverFileInfos>,
    ) {
        let known = covers.iter_mut().filter(|c| !c.cover_type.is_unknown());
        for cover in known {
            if item_id.is_ephemeral() {
                cover.url = Some(self.proxy.register_url(&cover.remote_url));
                continue;
            }

            let file_path =
                self.get_cover_path(item_id, cover.cover_type, None);
            let mut url = local_cover_url(item_id, cover.cover_type);

            let last_write = match snapshot {
                Some(infos) => infos.get(&file_path).map(|i| i.last_write),
                None => self.disk.last_write_time(&file_path).await.ok(),
            };
            if let Some(last_write) = last_write {
                url.push_str("?lastWrite=");
                url.push_str(&to_ticks(last_write).to_string());
            }

            cover.url = Some(url);
        }
    }

    /// Makes sure every known-type cover of `item_id` has a current full-size
    /// file and its preset variants on disk.
    ///
    /// Failures are isolated per cover and per height; they are logged and
    /// never abort sibling work. Returns `true` iff at least one cover was
    /// downloaded during this call. Concurrent calls for the same item must
    /// be serialised by the caller.
    pub async fn ensure_covers(
        &self,
        item_id: ItemId,
        covers: &[Cover],
    ) -> bool {
        let mut outcomes = Vec::with_capacity(covers.len());
        for cover in covers.iter().filter(|c| !c.cover_type.is_unknown()) {
            let outcome = self.ensure_full_size(item_id, cover).await;
            outcomes.push((cover.cover_type, outcome));
        }

        let updated = outcomes
            .iter()
            .any(|(_, outcome)| *outcome == DownloadOutcome::Downloaded);

        self.resize_pass(item_id, &outcomes).await;

        // Fire-and-forget; no subscribers is fine.
        let _ = self
            .cover_events
            .send(CoversUpdatedEvent { item_id, updated });

        updated
    }

    /// Removes the item's cover folder. Absent folder is a no-op.
    pub async fn delete_covers(&self, item_id: ItemId) -> Result<()> {
        let folder = cover_folder(&self.paths.cover_root(), item_id);
        if !self.disk.folder_exists(&folder).await {
            debug!(%item_id, "no cover folder to delete");
            return Ok(());
        }

        self.disk.delete_folder(&folder).await?;
        info!(%item_id, folder = %folder.display(), "deleted covers");
        Ok(())
    }

    async fn ensure_full_size(
        &self,
        item_id: ItemId,
        cover: &Cover,
    ) -> DownloadOutcome {
        let file_path = self.get_cover_path(item_id, cover.cover_type, None);

        let confirmed = match self
            .existence
            .already_exists(&cover.remote_url, &file_path)
            .await
        {
            Ok(exists) => exists,
            Err(err) => {
                warn!(
                    %item_id,
                    cover_type = %cover.cover_type,
                    url = %cover.remote_url,
                    error = %err,
                    "could not verify cached cover"
                );
                false
            }
        };

        if confirmed {
            debug!(
                %item_id,
                cover_type = %cover.cover_type,
                "cover up to date"
            );
            return DownloadOutcome::ConfirmedFresh;
        }

        match self.download_cover(&cover.remote_url, &file_path).await {
            Ok(()) => {
                info!(
                    %item_id,
                    cover_type = %cover.cover_type,
                    url = %cover.remote_url,
                    "downloaded cover"
                );
                DownloadOutcome::Downloaded
            }
            Err(err) => {
                warn!(
                    %item_id,
                    cover_type = %cover.cover_type,
                    url = %cover.remote_url,
                    error = %err,
                    "failed to download cover"
                );
                DownloadOutcome::DownloadFailed
            }
        }
    }

    async fn download_cover(
        &self,
        remote_url: &str,
        path: &Path,
    ) -> Result<()> {
        if let Some(parent) = path.parent()
            && !self.disk.folder_exists(parent).await
        {
            self.disk.create_folder(parent).await?;
        }
        self.http.download_file(remote_url, path).await
    }

    async fn resize_pass(
        &self,
        item_id: ItemId,
        outcomes: &[(CoverType, DownloadOutcome)],
    ) {
        let needs_resize = outcomes.iter().any(|(cover_type, outcome)| {
            *outcome != DownloadOutcome::DownloadFailed
                && !cover_type.resize_heights().is_empty()
        });
        if !needs_resize {
            return;
        }

        // Released when `_permit` drops, including on early return or panic.
        let _permit = match self.limiter.acquire().await {
            Ok(permit) => permit,
            Err(err) => {
                warn!(%item_id, error = %err, "resize pass skipped");
                return;
            }
        };

        for (cover_type, outcome) in outcomes {
            if *outcome == DownloadOutcome::DownloadFailed {
                continue;
            }
            let forced = *outcome == DownloadOutcome::Downloaded;
            let source = self.get_cover_path(item_id, *cover_type, None);

            for &height in cover_type.resize_heights() {
                let dest =
                    self.get_cover_path(item_id, *cover_type, Some(height));
                if !forced && self.variant_is_valid(&dest).await {
                    continue;
                }

                debug!(%item_id, %cover_type, height, "resizing cover");
                if let Err(err) =
                    self.resizer.resize(&source, &dest, height).await
                {
                    warn!(
                        %item_id,
                        %cover_type,
                        height,
                        error = %err,
                        "failed to resize cover"
                    );
                    self.discard_variant(&dest).await;
                }
            }
        }
    }

    /// A failed resize leaves no variant behind, whatever the resizer wrote.
    async fn discard_variant(&self, dest: &Path) {
        if !self.disk.file_exists(dest).await {
            return;
        }
        if let Err(err) = self.disk.delete_file(dest).await {
            warn!(
                path = %dest.display(),
                error = %err,
                "could not remove failed variant"
            );
        }
    }

    /// Present and non-empty.
    async fn variant_is_valid(&self, path: &Path) -> bool {
        if !self.disk.file_exists(path).await {
            return false;
        }
        matches!(self.disk.file_size(path).await, Ok(size) if size > 0)
    }
}
