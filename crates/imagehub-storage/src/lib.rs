//! ImageHub Storage Library
//!
//! Blob placement for original images and their thumbnails.
//!
//! # Storage key format
//!
//! Keys are owner-scoped relative paths:
//!
//! - **Original**: `{owner_id}/{file_name}`
//! - **Thumbnail**: `{owner_id}/thumbnails/{file_name}`
//!
//! Keys must not contain `..` or a leading `/`. Key generation is centralized in the
//! `keys` module so every caller agrees on the layout.

pub mod factory;
pub mod keys;
pub mod local;
pub mod traits;

pub use factory::create_storage;
pub use local::LocalStorage;
pub use traits::{Storage, StorageError, StorageResult};
