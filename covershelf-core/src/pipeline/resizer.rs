use std::{io::Cursor, path::Path};

use async_trait::async_trait;
use image::{
    DynamicImage, ExtendedColorType, GenericImageView, ImageFormat,
    ImageReader, codecs::jpeg::JpegEncoder, imageops::FilterType,
};
use tracing::debug;

use crate::{
    error::{CoverError, Result},
    infra::atomic_file,
};

/// JPEG quality used for photographic covers.
pub const DEFAULT_JPEG_QUALITY: u8 = 92;

/// Writes one downscaled variant of a full-size cover.
#[async_trait]
pub trait ImageResizer: Send + Sync {
    /// Scales `source` so the result is exactly `height` pixels tall, width
    /// following the aspect ratio, and writes it to `dest` re-encoded per
    /// the destination extension. On failure `dest` does not exist.
    async fn resize(
        &self,
        source: &Path,
        dest: &Path,
        height: u32,
    ) -> Result<()>;
}

/// [`ImageResizer`] built on the `image` crate.
///
/// Owns its file I/O: output goes through a temp file and rename, and a
/// failed resize removes the destination itself.
#[derive(Debug, Clone, Copy)]
pub struct ImageCrateResizer {
    jpeg_quality: u8,
}

impl Default for ImageCrateResizer {
    fn default() -> Self {
        Self::new(DEFAULT_JPEG_QUALITY)
    }
}

impl ImageCrateResizer {
    pub fn new(jpeg_quality: u8) -> Self {
        Self {
            jpeg_quality: jpeg_quality.clamp(1, 100),
        }
    }

    pub fn jpeg_quality(&self) -> u8 {
        self.jpeg_quality
    }
}

#[async_trait]
impl ImageResizer for ImageCrateResizer {
    async fn resize(
        &self,
        source: &Path,
        dest: &Path,
        height: u32,
    ) -> Result<()> {
        let source_owned = source.to_path_buf();
        let dest_owned = dest.to_path_buf();
        let quality = self.jpeg_quality;

        let encoded = tokio::task::spawn_blocking(move || {
            scale_and_encode(&source_owned, &dest_owned, height, quality)
        })
        .await
        .map_err(|e| CoverError::Internal(format!("resize task failed: {e}")));

        let written = match encoded {
            Ok(Ok(bytes)) => atomic_file::write_atomic(dest, &bytes).await,
            Ok(Err(err)) | Err(err) => Err(err),
        };

        if let Err(err) = written {
            remove_stale_destination(dest).await;
            return Err(err);
        }

        debug!(
            source = %source.display(),
            dest = %dest.display(),
            height,
            "resized cover"
        );
        Ok(())
    }
}

async fn remove_stale_destination(dest: &Path) {
    match tokio::fs::remove_file(dest).await {
        Ok(()) => {}
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
        Err(err) => {
            debug!(
                dest = %dest.display(),
                error = %err,
                "could not remove failed resize output"
            );
        }
    }
}

/// Width that keeps `src_w:src_h` at `target_h`, never below one pixel.
pub fn scaled_width(src_w: u32, src_h: u32, target_h: u32) -> u32 {
    let width = (f64::from(src_w) * f64::from(target_h) / f64::from(src_h))
        .round() as u32;
    width.max(1)
}

fn scale_and_encode(
    source: &Path,
    dest: &Path,
    height: u32,
    jpeg_quality: u8,
) -> Result<Vec<u8>> {
    if height == 0 {
        return Err(CoverError::InvalidImage(
            "resize target height must be non-zero".into(),
        ));
    }

    let format = ImageFormat::from_path(dest).map_err(|_| {
        CoverError::InvalidImage(format!(
            "no encoder for destination {:?}",
            dest
        ))
    })?;

    // Remote hosts do not always serve what the extension promises, so sniff
    // the actual format.
    let img = ImageReader::open(source)?.with_guessed_format()?.decode()?;
    let (src_w, src_h) = img.dimensions();
    if src_w == 0 || src_h == 0 {
        return Err(CoverError::InvalidImage(format!(
            "source image {:?} has no pixels",
            source
        )));
    }

    let width = scaled_width(src_w, src_h, height);
    let resized = img.resize_exact(width, height, FilterType::Lanczos3);

    encode(&resized, format, jpeg_quality)
}

fn encode(
    img: &DynamicImage,
    format: ImageFormat,
    jpeg_quality: u8,
) -> Result<Vec<u8>> {
    let mut out = Cursor::new(Vec::new());
    match format {
        ImageFormat::Jpeg => {
            let rgb = img.to_rgb8();
            let mut encoder =
                JpegEncoder::new_with_quality(&mut out, jpeg_quality);
            encoder.encode(
                rgb.as_raw(),
                rgb.width(),
                rgb.height(),
                ExtendedColorType::Rgb8,
            )?;
        }
        other => img.write_to(&mut out, other)?,
    }
    Ok(out.into_inner())
}
