//! Storage abstraction trait
//!
//! This module defines the Storage trait that all asset stores must implement.

use async_trait::async_trait;
use imagehub_core::AppError;
use std::pin::Pin;
use thiserror::Error;
use tokio::io::AsyncRead;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Download failed: {0}")]
    DownloadFailed(String),

    #[error("Delete failed: {0}")]
    DeleteFailed(String),

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::InvalidKey(msg) => AppError::InvalidInput(msg),
            StorageError::NotFound(key) => AppError::NotFound(format!("File not found: {}", key)),
            other => AppError::Storage(other.to_string()),
        }
    }
}

/// Storage abstraction trait
///
/// **Key format:** `{owner_id}/{file_name}` for originals and
/// `{owner_id}/thumbnails/{file_name}` for thumbnails. See the crate root documentation.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Create the per-owner namespace if it does not exist yet
    async fn ensure_namespace(&self, owner_id: i64) -> StorageResult<()>;

    /// Persist a stream verbatim under `storage_key`, replacing any existing file.
    /// Returns the number of bytes written.
    async fn write_stream(
        &self,
        storage_key: &str,
        reader: Pin<Box<dyn AsyncRead + Send + Unpin>>,
    ) -> StorageResult<u64>;

    /// Persist a buffer under `storage_key`, replacing any existing file
    async fn write(&self, storage_key: &str, data: Vec<u8>) -> StorageResult<()>;

    /// Read a whole file
    async fn read(&self, storage_key: &str) -> StorageResult<Vec<u8>>;

    /// Remove a file. Removing a file that does not exist succeeds.
    async fn delete(&self, storage_key: &str) -> StorageResult<()>;

    /// Check if a file exists
    async fn exists(&self, storage_key: &str) -> StorageResult<bool>;
}
