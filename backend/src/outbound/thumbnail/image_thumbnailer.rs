//! `image` crate implementation of the [`ThumbnailGenerator`] port.
//!
//! Decoding, rotation and resampling are CPU bound, so each derivation runs on
//! tokio's blocking pool.

use std::io::Cursor;

use async_trait::async_trait;
use bytes::Bytes;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, ImageDecoder, ImageReader};
use tracing::debug;

use crate::domain::ports::{ThumbnailError, ThumbnailGenerator};

/// Output geometry and quality.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThumbnailConfig {
    /// Edge length of the square thumbnail in pixels.
    pub size: u32,
    /// JPEG quality, 1 to 100.
    pub quality: u8,
}

impl Default for ThumbnailConfig {
    fn default() -> Self {
        Self {
            size: 400,
            quality: 80,
        }
    }
}

/// Square JPEG thumbnailer.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageThumbnailer {
    config: ThumbnailConfig,
}

impl ImageThumbnailer {
    pub fn new(config: ThumbnailConfig) -> Self {
        Self { config }
    }
}

fn decode_oriented(original: &[u8]) -> Result<DynamicImage, ThumbnailError> {
    let decode = |err: image::ImageError| ThumbnailError::decode(err.to_string());
    let reader = ImageReader::new(Cursor::new(original))
        .with_guessed_format()
        .map_err(|err| ThumbnailError::decode(err.to_string()))?;
    let mut decoder = reader.into_decoder().map_err(decode)?;
    let orientation = decoder.orientation().map_err(decode)?;
    let mut image = DynamicImage::from_decoder(decoder).map_err(decode)?;
    image.apply_orientation(orientation);
    Ok(image)
}

fn render(original: &[u8], config: ThumbnailConfig) -> Result<Bytes, ThumbnailError> {
    let image = decode_oriented(original)?;
    let (width, height) = (image.width(), image.height());
    let size = config.size.max(1);
    // JPEG has no alpha channel.
    let square = DynamicImage::ImageRgb8(
        image
            .resize_to_fill(size, size, FilterType::Lanczos3)
            .to_rgb8(),
    );

    let mut encoded = Vec::new();
    let encoder = JpegEncoder::new_with_quality(&mut encoded, config.quality.clamp(1, 100));
    square
        .write_with_encoder(encoder)
        .map_err(|err| ThumbnailError::encode(err.to_string()))?;
    debug!(width, height, size, bytes = encoded.len(), "thumbnail rendered");
    Ok(Bytes::from(encoded))
}

#[async_trait]
impl ThumbnailGenerator for ImageThumbnailer {
    async fn derive(&self, original: Bytes) -> Result<Bytes, ThumbnailError> {
        let config = self.config;
        tokio::task::spawn_blocking(move || render(&original, config))
            .await
            .map_err(|err| ThumbnailError::worker(err.to_string()))?
    }
}
