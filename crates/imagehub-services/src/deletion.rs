//! Image deletion
//!
//! Both single and bulk deletion remove the image rows first and only then remove
//! the original and thumbnail files, so a row never points at a file that is gone.
//! File removal is idempotent: a file that is already absent counts as removed.
//! Bulk cleanup runs one task per image and waits for all of them; every failure
//! is collected into a single `AppError::FileCleanup`.

use imagehub_core::models::{Actor, Image};
use imagehub_core::AppError;
use imagehub_db::ImageRepository;
use imagehub_storage::Storage;
use std::sync::Arc;
use tokio::task::JoinSet;

use crate::ownership;

#[derive(Clone)]
pub struct ImageDeletionService {
    images: Arc<dyn ImageRepository>,
    storage: Arc<dyn Storage>,
}

impl ImageDeletionService {
    pub fn new(images: Arc<dyn ImageRepository>, storage: Arc<dyn Storage>) -> Self {
        Self { images, storage }
    }

    /// Delete one image row and its files.
    #[tracing::instrument(skip(self, actor), fields(actor_id = actor.id, operation = "delete_image"))]
    pub async fn delete_one(&self, actor: &Actor, image_id: i64) -> Result<(), AppError> {
        let image = ownership::load_owned_image(self.images.as_ref(), actor, image_id).await?;

        let removed = self
            .images
            .delete_by_id(image.id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Image {} not found", image_id)))?;

        let failures = remove_image_files(Arc::clone(&self.storage), removed).await;
        if !failures.is_empty() {
            return Err(AppError::FileCleanup(failures));
        }

        tracing::info!(image_id, "Image deleted");
        Ok(())
    }

    /// Delete every image of `owner_id`, then clean up their files concurrently.
    ///
    /// If the row deletion fails no file is touched. Returns the number of images deleted.
    #[tracing::instrument(skip(self, actor), fields(actor_id = actor.id, operation = "delete_all_images"))]
    pub async fn delete_all_for_owner(&self, actor: &Actor, owner_id: i64) -> Result<usize, AppError> {
        ownership::validate_id("owner", owner_id)?;
        ownership::ensure_owner(actor, owner_id)?;

        let deleted = self.images.delete_by_owner(owner_id).await.map_err(|e| {
            tracing::error!(error = %e, owner_id, "Failed to delete image rows, skipping file cleanup");
            e
        })?;

        let count = deleted.len();
        let mut tasks = JoinSet::new();
        for image in deleted {
            tasks.spawn(remove_image_files(Arc::clone(&self.storage), image));
        }

        let mut failures = Vec::new();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(task_failures) => failures.extend(task_failures),
                Err(e) => {
                    tracing::error!(error = %e, owner_id, "File cleanup task aborted");
                    failures.push(format!("cleanup task aborted: {}", e));
                }
            }
        }

        if !failures.is_empty() {
            failures.sort();
            tracing::error!(
                owner_id,
                images_deleted = count,
                failed_files = failures.len(),
                "Images deleted but some files could not be removed"
            );
            return Err(AppError::FileCleanup(failures));
        }

        tracing::info!(owner_id, images_deleted = count, "All owner images deleted");
        Ok(count)
    }
}

/// Remove the original and the thumbnail of one image, returning a message per failure.
async fn remove_image_files(storage: Arc<dyn Storage>, image: Image) -> Vec<String> {
    let mut failures = Vec::new();

    for key in [&image.file_path, &image.thumbnail_path] {
        if key.is_empty() {
            continue;
        }
        if let Err(e) = storage.delete(key).await {
            tracing::error!(
                error = %e,
                image_id = image.id,
                storage_key = %key,
                "Failed to remove image file"
            );
            failures.push(format!("image {} ({}): {}", image.id, key, e));
        }
    }

    failures
}
