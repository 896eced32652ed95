use crate::keys;
use crate::traits::{Storage, StorageError, StorageResult};
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use tokio::fs;
use tokio::io::{AsyncRead, AsyncWriteExt};

/// Local filesystem storage implementation
#[derive(Clone)]
pub struct LocalStorage {
    base_path: PathBuf,
}

impl LocalStorage {
    /// Create a new LocalStorage instance rooted at `base_path` (e.g. "./uploads")
    pub async fn new(base_path: impl Into<PathBuf>) -> StorageResult<Self> {
        let base_path = base_path.into();

        fs::create_dir_all(&base_path).await.map_err(|e| {
            StorageError::ConfigError(format!(
                "Failed to create storage directory {}: {}",
                base_path.display(),
                e
            ))
        })?;

        Ok(LocalStorage { base_path })
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Convert storage key to filesystem path, rejecting keys that could escape
    /// the base storage directory.
    pub fn key_to_path(&self, storage_key: &str) -> StorageResult<PathBuf> {
        if storage_key.is_empty()
            || storage_key.contains("..")
            || storage_key.starts_with('/')
            || storage_key.contains('\\')
        {
            return Err(StorageError::InvalidKey(format!(
                "Storage key '{}' contains invalid characters",
                storage_key
            )));
        }

        Ok(self.base_path.join(storage_key))
    }

    async fn ensure_parent_dir(&self, path: &Path) -> StorageResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl Storage for LocalStorage {
    async fn ensure_namespace(&self, owner_id: i64) -> StorageResult<()> {
        let path = self.key_to_path(&keys::owner_namespace(owner_id))?;
        fs::create_dir_all(&path).await.map_err(|e| {
            StorageError::UploadFailed(format!(
                "Failed to create directory {}: {}",
                path.display(),
                e
            ))
        })?;
        tracing::debug!(path = %path.display(), owner_id, "Owner namespace ready");
        Ok(())
    }

    async fn write_stream(
        &self,
        storage_key: &str,
        mut reader: Pin<Box<dyn AsyncRead + Send + Unpin>>,
    ) -> StorageResult<u64> {
        let path = self.key_to_path(storage_key)?;
        let start = std::time::Instant::now();

        self.ensure_parent_dir(&path).await?;

        let mut file = fs::File::create(&path).await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to create file {}: {}", path.display(), e))
        })?;

        let bytes_copied = tokio::io::copy(&mut reader, &mut file).await.map_err(|e| {
            StorageError::UploadFailed(format!(
                "Failed to write stream to file {}: {}",
                path.display(),
                e
            ))
        })?;

        file.sync_all().await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to sync file {}: {}", path.display(), e))
        })?;

        tracing::info!(
            path = %path.display(),
            key = %storage_key,
            size_bytes = bytes_copied,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local storage stream write successful"
        );

        Ok(bytes_copied)
    }

    async fn write(&self, storage_key: &str, data: Vec<u8>) -> StorageResult<()> {
        let path = self.key_to_path(storage_key)?;
        let size = data.len();
        let start = std::time::Instant::now();

        self.ensure_parent_dir(&path).await?;

        let mut file = fs::File::create(&path).await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to create file {}: {}", path.display(), e))
        })?;

        file.write_all(&data).await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to write file {}: {}", path.display(), e))
        })?;

        file.sync_all().await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to sync file {}: {}", path.display(), e))
        })?;

        tracing::info!(
            path = %path.display(),
            key = %storage_key,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local storage write successful"
        );

        Ok(())
    }

    async fn read(&self, storage_key: &str) -> StorageResult<Vec<u8>> {
        let path = self.key_to_path(storage_key)?;

        match fs::read(&path).await {
            Ok(data) => Ok(data),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                Err(StorageError::NotFound(storage_key.to_string()))
            }
            Err(e) => Err(StorageError::DownloadFailed(format!(
                "Failed to read file {}: {}",
                path.display(),
                e
            ))),
        }
    }

    async fn delete(&self, storage_key: &str) -> StorageResult<()> {
        let path = self.key_to_path(storage_key)?;

        match fs::remove_file(&path).await {
            Ok(()) => {
                tracing::info!(
                    path = %path.display(),
                    key = %storage_key,
                    "Local storage delete successful"
                );
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!(key = %storage_key, "File already absent, nothing to delete");
                Ok(())
            }
            Err(e) => Err(StorageError::DeleteFailed(format!(
                "Failed to delete file {}: {}",
                path.display(),
                e
            ))),
        }
    }

    async fn exists(&self, storage_key: &str) -> StorageResult<bool> {
        let path = self.key_to_path(storage_key)?;
        Ok(fs::try_exists(&path).await.unwrap_or(false))
    }
}
