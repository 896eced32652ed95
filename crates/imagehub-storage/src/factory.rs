use crate::{LocalStorage, Storage, StorageResult};
use imagehub_core::Config;
use std::sync::Arc;

/// Create the asset store configured by `UPLOAD_DIR`
pub async fn create_storage(config: &Config) -> StorageResult<Arc<dyn Storage>> {
    let storage = LocalStorage::new(config.upload_dir().clone()).await?;
    Ok(Arc::new(storage))
}
