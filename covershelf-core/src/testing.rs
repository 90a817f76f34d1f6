//! In-memory doubles shared by unit tests.

use std::{
    collections::HashMap,
    io::Cursor,
    path::Path,
    sync::{
        Mutex,
        atomic::{AtomicBool, AtomicUsize, Ordering},
    },
};

use async_trait::async_trait;
use bytes::Bytes;

use crate::{
    error::{CoverError, Result},
    infra::atomic_file,
    ports::{HeadResponse, HttpClient},
};

/// Serves registered bodies; unknown URLs answer 404.
#[derive(Debug, Default)]
pub struct FakeHttpClient {
    bodies: Mutex<HashMap<String, Bytes>>,
    pub fail_head: AtomicBool,
    pub hide_content_length: AtomicBool,
    pub head_calls: AtomicUsize,
    pub get_calls: AtomicUsize,
    pub download_calls: AtomicUsize,
}

impl FakeHttpClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn serve(&self, url: &str, body: impl Into<Bytes>) {
        self.bodies
            .lock()
            .unwrap()
            .insert(url.to_string(), body.into());
    }

    fn body(&self, url: &str) -> Result<Bytes> {
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
impl HttpClient for FakeHttpClient {
    async fn head(&self, url: &str) -> Result<HeadResponse> {
        self.head_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_head.load(Ordering::SeqCst) {
            return Err(CoverError::Internal("simulated outage".into()));
        }
        let body = self.body(url)?;
        let content_length = if self.hide_content_length.load(Ordering::SeqCst)
        {
            None
        } else {
            Some(body.len() as u64)
        };
        Ok(HeadResponse { content_length })
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

pub fn jpeg_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = image::RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8])
    });
    let mut out = Cursor::new(Vec::new());
    image::DynamicImage::ImageRgb8(img)
        .write_to(&mut out, image::ImageFormat::Jpeg)
        .expect("encode test jpeg");
    out.into_inner()
}

pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = image::RgbaImage::from_fn(width, height, |x, y| {
        image::Rgba([(x % 256) as u8, (y % 256) as u8, 0, 128])
    });
    let mut out = Cursor::new(Vec::new());
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut out, image::ImageFormat::Png)
        .expect("encode test png");
    out.into_inner()
}
