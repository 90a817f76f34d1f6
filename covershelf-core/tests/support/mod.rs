#![allow(dead_code)]

use std::{
    collections::HashMap,
    io::Cursor,
    path::{Path, PathBuf},
    sync::{
        Arc, Mutex,
        atomic::{AtomicBool, AtomicUsize, Ordering},
    },
    time::Duration,
};

use async_trait::async_trait;
use bytes::Bytes;
use covershelf_core::{
    error::{CoverError, Result},
    infra::{LocalDiskProvider, StaticAppPaths, atomic_file},
    pipeline::{
        CoverProxy, ImageCrateResizer, ImageResizer, MediaCoverService,
        ResizeLimiter,
    },
    ports::{HeadResponse, HttpClient},
};
use tempfile::TempDir;

/// In-memory remote image host.
#[derive(Debug, Default)]
pub struct FakeImageHost {
    bodies: Mutex<HashMap<String, Bytes>>,
    pub outage: AtomicBool,
    pub head_calls: AtomicUsize,
    pub get_calls: AtomicUsize,
    pub download_calls: AtomicUsize,
}

impl FakeImageHost {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn serve(&self, url: &str, body: impl Into<Bytes>) {
        self.bodies
            .lock()
            .unwrap()
            .insert(url.to_string(), body.into());
    }

    pub fn set_outage(&self, down: bool) {
        self.outage.store(down, Ordering::SeqCst);
    }

    pub fn downloads(&self) -> usize {
        self.download_calls.load(Ordering::SeqCst)
    }

    pub fn heads(&self) -> usize {
        self.head_calls.load(Ordering::SeqCst)
    }

    fn body(&self, url: &str) -> Result<Bytes> {
        if self.outage.load(Ordering::SeqCst) {
            return Err(CoverError::Internal("connection refused".into()));
        }
        self.bodies
            .lock()
            .unwrap()
            .get(url)
            .cloned()
            .ok_or_else(|| CoverError::HttpStatus {
                status: reqwest::StatusCode::NOT_FOUND,
                url: url.to_string(),
            })
    }
}

#[async_trait]
impl HttpClient for FakeImageHost {
    async fn head(&self, url: &str) -> Result<HeadResponse> {
        self.head_calls.fetch_add(1, Ordering::SeqCst);
        let body = self.body(url)?;
        Ok(HeadResponse {
            content_length: Some(body.len() as u64),
        })
    }

    async fn get_bytes(&self, url: &str) -> Result<Bytes> {
        self.get_calls.fetch_add(1, Ordering::SeqCst);
        self.body(url)
    }

    async fn download_file(&self, url: &str, path: &Path) -> Result<()> {
        self.download_calls.fetch_add(1, Ordering::SeqCst);
        let body = self.body(url)?;
        atomic_file::write_atomic(path, &body).await
    }
}

pub struct Harness {
    pub dir: TempDir,
    pub host: Arc<FakeImageHost>,
    pub service: MediaCoverService,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_resizer(
            Arc::new(ImageCrateResizer::default()),
            ResizeLimiter::new(2),
        )
    }

    pub fn with_resizer(
        resizer: Arc<dyn ImageResizer>,
        limiter: ResizeLimiter,
    ) -> Self {
        let dir = tempfile::tempdir().expect("tempdir");
        let host = FakeImageHost::new();
        let service = MediaCoverService::new(
            Arc::new(LocalDiskProvider::new()),
            host.clone(),
            Arc::new(StaticAppPaths::new(dir.path().join("MediaCover"))),
            resizer,
            Arc::new(CoverProxy::new(host.clone())),
            limiter,
        );
        Self { dir, host, service }
    }

    pub fn cover_root(&self) -> PathBuf {
        self.dir.path().join("MediaCover")
    }
}

/// Resizer that sleeps while "working" and records how many calls overlap.
#[derive(Debug, Default)]
pub struct CountingResizer {
    hold: Duration,
    in_flight: AtomicUsize,
    pub peak: AtomicUsize,
    pub calls: AtomicUsize,
}

impl CountingResizer {
    pub fn new(hold: Duration) -> Arc<Self> {
        Arc::new(Self {
            hold,
            ..Self::default()
        })
    }

    pub fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ImageResizer for CountingResizer {
    async fn resize(
        &self,
        _source: &Path,
        dest: &Path,
        _height: u32,
    ) -> Result<()> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        self.calls.fetch_add(1, Ordering::SeqCst);

        tokio::time::sleep(self.hold).await;
        let written = atomic_file::write_atomic(dest, b"variant").await;

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        written
    }
}

/// Resizer that leaves a truncated file at `dest` and then fails.
#[derive(Debug, Default)]
pub struct TruncatingResizer;

#[async_trait]
impl ImageResizer for TruncatingResizer {
    async fn resize(
        &self,
        _source: &Path,
        dest: &Path,
        _height: u32,
    ) -> Result<()> {
        tokio::fs::write(dest, b"\xFF\xD8 partial").await?;
        Err(CoverError::InvalidImage("encoder gave up".into()))
    }
}

pub fn jpeg_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = image::RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x % 256) as u8, (y % 256) as u8, ((x * y) % 256) as u8])
    });
    let mut out = Cursor::new(Vec::new());
    image::DynamicImage::ImageRgb8(img)
        .write_to(&mut out, image::ImageFormat::Jpeg)
        .expect("encode test jpeg");
    out.into_inner()
}

pub fn image_height(path: &Path) -> u32 {
    image::open(path).expect("decode variant").height()
}
