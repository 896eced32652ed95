//! Fixtures shared by the engine tests

use async_trait::async_trait;
use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use imagehub_storage::{LocalStorage, Storage, StorageError, StorageResult};
use std::collections::HashSet;
use std::io::Cursor;
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tempfile::TempDir;
use tokio::io::AsyncRead;

use crate::upload::UploadStream;

pub fn image_bytes(width: u32, height: u32, format: ImageFormat) -> Vec<u8> {
    let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(
        width,
        height,
        Rgba([20, 120, 40, 255]),
    ));
    let img = if format == ImageFormat::Jpeg {
        DynamicImage::ImageRgb8(img.to_rgb8())
    } else {
        img
    };
    let mut buffer = Vec::new();
    img.write_to(&mut Cursor::new(&mut buffer), format).unwrap();
    buffer
}

pub fn stream_of(data: Vec<u8>) -> UploadStream {
    Box::pin(Cursor::new(data))
}

pub async fn local_storage() -> (TempDir, Arc<LocalStorage>) {
    let dir = tempfile::tempdir().unwrap();
    let storage = LocalStorage::new(dir.path()).await.unwrap();
    (dir, Arc::new(storage))
}

/// Local storage whose deletes fail for selected keys and are counted.
pub struct FlakyStorage {
    pub inner: LocalStorage,
    failing_keys: HashSet<String>,
    deletes: AtomicUsize,
}

impl FlakyStorage {
    pub fn new(inner: LocalStorage, failing_keys: &[&str]) -> Self {
        Self {
            inner,
            failing_keys: failing_keys.iter().map(|k| k.to_string()).collect(),
            deletes: AtomicUsize::new(0),
        }
    }

    pub fn delete_calls(&self) -> usize {
        self.deletes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Storage for FlakyStorage {
    async fn ensure_namespace(&self, owner_id: i64) -> StorageResult<()> {
        self.inner.ensure_namespace(owner_id).await
    }

    async fn write_stream(
        &self,
        storage_key: &str,
        reader: Pin<Box<dyn AsyncRead + Send + Unpin>>,
    ) -> StorageResult<u64> {
        self.inner.write_stream(storage_key, reader).await
    }

    async fn write(&self, storage_key: &str, data: Vec<u8>) -> StorageResult<()> {
        self.inner.write(storage_key, data).await
    }

    async fn read(&self, storage_key: &str) -> StorageResult<Vec<u8>> {
        self.inner.read(storage_key).await
    }

    async fn delete(&self, storage_key: &str) -> StorageResult<()> {
        self.deletes.fetch_add(1, Ordering::SeqCst);
        if self.failing_keys.contains(storage_key) {
            return Err(StorageError::DeleteFailed(format!(
                "permission denied: {}",
                storage_key
            )));
        }
        self.inner.delete(storage_key).await
    }

    async fn exists(&self, storage_key: &str) -> StorageResult<bool> {
        self.inner.exists(storage_key).await
    }
}
