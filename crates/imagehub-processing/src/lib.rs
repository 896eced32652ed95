//! ImageHub image processing
//!
//! Thumbnail derivation for uploaded images.

pub mod thumbnail;

pub use thumbnail::{
    ThumbnailError, ThumbnailGenerator, DEFAULT_THUMBNAIL_HEIGHT, DEFAULT_THUMBNAIL_WIDTH,
};
