//! Thumbnail derivation
//!
//! Decodes an original upload (JPEG, PNG, WebP or GIF), fits it into a bounding box
//! with Lanczos3 resampling and re-encodes it as JPEG. Derivation is CPU-bound and
//! holds no shared state, so [`ThumbnailGenerator::derive_blocking`] moves it onto
//! the blocking thread pool.

use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView, ImageFormat, ImageReader};
use imagehub_core::AppError;
use std::io::Cursor;
use thiserror::Error;

pub const DEFAULT_THUMBNAIL_WIDTH: u32 = 150;
pub const DEFAULT_THUMBNAIL_HEIGHT: u32 = 150;

#[derive(Debug, Error)]
pub enum ThumbnailError {
    #[error("Unable to decode image: {0}")]
    Decode(String),

    #[error("Unable to encode thumbnail: {0}")]
    Encode(String),

    #[error("Thumbnail task failed: {0}")]
    TaskFailed(String),
}

impl From<ThumbnailError> for AppError {
    fn from(err: ThumbnailError) -> Self {
        match err {
            ThumbnailError::Decode(msg) => AppError::ImageDecode(msg),
            ThumbnailError::Encode(msg) => AppError::ImageEncode(msg),
            ThumbnailError::TaskFailed(msg) => AppError::Internal(msg),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ThumbnailGenerator {
    max_width: u32,
    max_height: u32,
}

impl Default for ThumbnailGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_THUMBNAIL_WIDTH, DEFAULT_THUMBNAIL_HEIGHT)
    }
}

impl ThumbnailGenerator {
    pub fn new(max_width: u32, max_height: u32) -> Self {
        Self {
            max_width: max_width.max(1),
            max_height: max_height.max(1),
        }
    }

    pub fn bounds(&self) -> (u32, u32) {
        (self.max_width, self.max_height)
    }

    /// Derive JPEG thumbnail bytes from original image bytes.
    ///
    /// Images already inside the bounding box keep their size; larger ones are
    /// scaled down preserving aspect ratio.
    pub fn derive(&self, original: &[u8]) -> Result<Vec<u8>, ThumbnailError> {
        let img = ImageReader::new(Cursor::new(original))
            .with_guessed_format()
            .map_err(|e| ThumbnailError::Decode(e.to_string()))?
            .decode()
            .map_err(|e| ThumbnailError::Decode(e.to_string()))?;

        let (width, height) = img.dimensions();
        let resized = if width <= self.max_width && height <= self.max_height {
            img
        } else {
            img.resize(self.max_width, self.max_height, FilterType::Lanczos3)
        };

        // JPEG has no alpha channel
        let rgb = DynamicImage::ImageRgb8(resized.to_rgb8());

        let mut buffer = Vec::new();
        rgb.write_to(&mut Cursor::new(&mut buffer), ImageFormat::Jpeg)
            .map_err(|e| ThumbnailError::Encode(e.to_string()))?;

        tracing::debug!(
            source_width = width,
            source_height = height,
            thumbnail_width = rgb.width(),
            thumbnail_height = rgb.height(),
            size_bytes = buffer.len(),
            "Thumbnail derived"
        );

        Ok(buffer)
    }

    /// Run [`derive`](Self::derive) on tokio's blocking pool.
    pub async fn derive_blocking(&self, original: Vec<u8>) -> Result<Vec<u8>, ThumbnailError> {
        let generator = *self;
        tokio::task::spawn_blocking(move || generator.derive(&original))
            .await
            .map_err(|e| ThumbnailError::TaskFailed(e.to_string()))?
    }
}
