//! Upload pipeline
//!
//! Places the original file, derives its thumbnail, writes the image row and
//! associates the requested categories, in that order. Any failing step aborts
//! the upload. Files written before a failure are left in place, and a failure
//! while associating categories leaves the already written image row behind.

use chrono::Utc;
use imagehub_core::models::{Actor, Category, Image, NewImage};
use imagehub_core::AppError;
use imagehub_db::{CategoryRepository, ImageCategoryRepository, ImageRepository};
use imagehub_processing::ThumbnailGenerator;
use imagehub_storage::{keys, Storage};
use std::collections::BTreeSet;
use std::pin::Pin;
use std::sync::Arc;
use tokio::io::AsyncRead;

use crate::ownership;

/// Decoded upload body handed over by the boundary layer
pub type UploadStream = Pin<Box<dyn AsyncRead + Send + Unpin>>;

#[derive(Debug, Clone, Default)]
pub struct UploadRequest {
    pub file_name: String,
    pub description: String,
    /// Names of categories to tag the image with; unknown names are ignored
    pub category_names: Vec<String>,
}

#[derive(Clone)]
pub struct ImageUploadService {
    images: Arc<dyn ImageRepository>,
    categories: Arc<dyn CategoryRepository>,
    associations: Arc<dyn ImageCategoryRepository>,
    storage: Arc<dyn Storage>,
    thumbnails: ThumbnailGenerator,
}

impl ImageUploadService {
    pub fn new(
        images: Arc<dyn ImageRepository>,
        categories: Arc<dyn CategoryRepository>,
        associations: Arc<dyn ImageCategoryRepository>,
        storage: Arc<dyn Storage>,
        thumbnails: ThumbnailGenerator,
    ) -> Self {
        Self {
            images,
            categories,
            associations,
            storage,
            thumbnails,
        }
    }

    /// Upload an image for `owner_id` on behalf of `actor`.
    ///
    /// # Errors
    /// - `AppError::Forbidden` - a regular actor uploading for another owner
    /// - `AppError::InvalidInput` - file name would escape the owner namespace
    /// - `AppError::ImageDecode` / `AppError::ImageEncode` - thumbnail derivation failed
    /// - `AppError::Storage` / `AppError::Database` - a store failed; earlier steps are not undone
    #[tracing::instrument(
        skip(self, actor, request, stream),
        fields(
            actor_id = actor.id,
            file_name = %request.file_name,
            operation = "upload_image"
        )
    )]
    pub async fn upload(
        &self,
        actor: &Actor,
        owner_id: i64,
        request: UploadRequest,
        stream: UploadStream,
    ) -> Result<Image, AppError> {
        // Validation and permission: no side effects yet
        ownership::validate_id("owner", owner_id)?;
        ownership::ensure_owner(actor, owner_id)?;
        keys::validate_file_name(&request.file_name)?;

        // 1. Ensure the owner namespace exists
        self.storage
            .ensure_namespace(owner_id)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, owner_id, "Failed to prepare owner namespace");
                AppError::from(e)
            })?;

        // 2. Persist the stream verbatim; same file name overwrites
        let file_key = keys::original_key(owner_id, &request.file_name);
        let size = self
            .storage
            .write_stream(&file_key, stream)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, storage_key = %file_key, "Failed to store original file");
                AppError::from(e)
            })?;

        tracing::info!(storage_key = %file_key, size_bytes = size, "Processing upload");

        // 3. Derive the thumbnail from the persisted bytes
        let original = self.storage.read(&file_key).await?;
        let thumbnail = self
            .thumbnails
            .derive_blocking(original)
            .await
            .map_err(|e| {
                tracing::warn!(
                    error = %e,
                    storage_key = %file_key,
                    "Thumbnail derivation failed, original file left in place"
                );
                AppError::from(e)
            })?;

        let thumbnail_key = keys::thumbnail_key(owner_id, &request.file_name);
        self.storage
            .write(&thumbnail_key, thumbnail)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, storage_key = %thumbnail_key, "Failed to store thumbnail");
                AppError::from(e)
            })?;

        // 4. Resolve category names; unknown names are dropped
        let categories = self.resolve_categories(&request.category_names).await?;

        // 5. Write the image row
        let image = self
            .images
            .create(NewImage {
                file_name: request.file_name,
                file_path: file_key,
                thumbnail_path: thumbnail_key,
                description: request.description,
                upload_date: Utc::now(),
                owner_id,
            })
            .await?;

        // 6. Associate categories; the row from step 5 stays on failure
        for category in &categories {
            if let Err(e) = self.associations.add(image.id, category.id).await {
                tracing::warn!(
                    error = %e,
                    image_id = image.id,
                    category_id = category.id,
                    "Category association failed after image row was written"
                );
                return Err(e);
            }
        }

        tracing::info!(
            image_id = image.id,
            categories = categories.len(),
            "Upload completed"
        );

        Ok(image)
    }

    async fn resolve_categories(&self, names: &[String]) -> Result<Vec<Category>, AppError> {
        let requested: BTreeSet<String> = names
            .iter()
            .map(|name| name.trim())
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .collect();

        if requested.is_empty() {
            return Ok(Vec::new());
        }

        let requested: Vec<String> = requested.into_iter().collect();
        let categories = self.categories.find_by_names(&requested).await?;

        if categories.len() < requested.len() {
            let unknown: Vec<&String> = requested
                .iter()
                .filter(|name| !categories.iter().any(|c| &c.name == *name))
                .collect();
            tracing::debug!(?unknown, "Ignoring unknown category names");
        }

        Ok(categories)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{image_bytes, local_storage, stream_of};
    use image::ImageFormat;
    use imagehub_core::ErrorKind;
    use imagehub_db::test_helpers::MockDatabase;

    fn service(db: &MockDatabase, storage: Arc<dyn Storage>) -> ImageUploadService {
        ImageUploadService::new(
            Arc::new(db.clone()),
            Arc::new(db.clone()),
            Arc::new(db.clone()),
            storage,
            ThumbnailGenerator::default(),
        )
    }

    fn request(file_name: &str, categories: &[&str]) -> UploadRequest {
        UploadRequest {
            file_name: file_name.to_string(),
            description: "holiday".to_string(),
            category_names: categories.iter().map(|c| c.to_string()).collect(),
        }
    }

    #[tokio::test]
    async fn test_upload_small_photo_with_category() {
        let db = MockDatabase::with_default_categories();
        let (dir, storage) = local_storage().await;
        let uploads = service(&db, storage.clone());

        let image = uploads
            .upload(
                &Actor::user(7),
                7,
                request("photo.jpg", &["Nature"]),
                stream_of(image_bytes(120, 90, ImageFormat::Jpeg)),
            )
            .await
            .unwrap();

        assert_eq!(image.owner_id, 7);
        assert_eq!(image.file_path, "7/photo.jpg");
        assert_eq!(image.thumbnail_path, "7/thumbnails/photo.jpg");
        assert_eq!(image.description, "holiday");
        assert!(dir.path().join("7/photo.jpg").is_file());
        assert!(dir.path().join("7/thumbnails/photo.jpg").is_file());

        let categories = CategoryRepository::list_for_image(&db, image.id)
            .await
            .unwrap();
        assert_eq!(categories.len(), 1);
        assert_eq!(categories[0].id, 3);
        assert_eq!(categories[0].name, "Nature");
    }

    #[tokio::test]
    async fn test_unknown_category_names_silently_dropped() {
        let db = MockDatabase::with_default_categories();
        let (_dir, storage) = local_storage().await;
        let uploads = service(&db, storage);

        let image = uploads
            .upload(
                &Actor::user(7),
                7,
                request("cat.png", &["Animals", "Nature", "Spaceships", " ", "Animals"]),
                stream_of(image_bytes(400, 300, ImageFormat::Png)),
            )
            .await
            .unwrap();

        let mut names: Vec<String> = CategoryRepository::list_for_image(&db, image.id)
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();
        names.sort();
        assert_eq!(names, vec!["Animals".to_string(), "Nature".to_string()]);
    }

    #[tokio::test]
    async fn test_reupload_same_name_overwrites_file() {
        let db = MockDatabase::with_default_categories();
        let (_dir, storage) = local_storage().await;
        let uploads = service(&db, storage.clone());

        let second = image_bytes(64, 64, ImageFormat::Png);
        uploads
            .upload(
                &Actor::user(7),
                7,
                request("a.png", &[]),
                stream_of(image_bytes(32, 32, ImageFormat::Png)),
            )
            .await
            .unwrap();
        uploads
            .upload(
                &Actor::user(7),
                7,
                request("a.png", &[]),
                stream_of(second.clone()),
            )
            .await
            .unwrap();

        assert_eq!(storage.read("7/a.png").await.unwrap(), second);
    }

    #[tokio::test]
    async fn test_thumb_prefixed_name_keeps_files_of_other_image() {
        let db = MockDatabase::with_default_categories();
        let (dir, storage) = local_storage().await;
        let uploads = service(&db, storage.clone());
        let deletion =
            crate::deletion::ImageDeletionService::new(Arc::new(db.clone()), storage.clone());

        let first = uploads
            .upload(
                &Actor::user(7),
                7,
                request("a.png", &[]),
                stream_of(image_bytes(400, 400, ImageFormat::Png)),
            )
            .await
            .unwrap();
        let second = uploads
            .upload(
                &Actor::user(7),
                7,
                request("thumb_a.png", &[]),
                stream_of(image_bytes(300, 300, ImageFormat::Png)),
            )
            .await
            .unwrap();

        assert_ne!(first.thumbnail_path, second.file_path);
        let thumbnail_bytes = storage.read(&first.thumbnail_path).await.unwrap();
        let thumbnail = image::load_from_memory(&thumbnail_bytes).unwrap();
        assert_eq!((thumbnail.width(), thumbnail.height()), (150, 150));

        deletion.delete_one(&Actor::user(7), first.id).await.unwrap();

        assert!(dir.path().join(&second.file_path).is_file());
        assert!(dir.path().join(&second.thumbnail_path).is_file());
    }

    #[tokio::test]
    async fn test_reserved_thumbnail_dir_name_rejected() {
        let db = MockDatabase::with_default_categories();
        let (_dir, storage) = local_storage().await;
        let uploads = service(&db, storage);

        let err = uploads
            .upload(
                &Actor::user(7),
                7,
                request("thumbnails", &[]),
                stream_of(image_bytes(10, 10, ImageFormat::Png)),
            )
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(db.image_count(), 0);
    }

    #[tokio::test]
    async fn test_regular_actor_cannot_upload_for_someone_else() {
        let db = MockDatabase::with_default_categories();
        let (dir, storage) = local_storage().await;
        let uploads = service(&db, storage);

        let err = uploads
            .upload(
                &Actor::user(7),
                9,
                request("photo.jpg", &[]),
                stream_of(image_bytes(10, 10, ImageFormat::Png)),
            )
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Permission);
        assert_eq!(db.image_count(), 0);
        assert!(!dir.path().join("9").exists());
    }

    #[tokio::test]
    async fn test_privileged_actor_uploads_for_target_owner() {
        let db = MockDatabase::with_default_categories();
        let (_dir, storage) = local_storage().await;
        let uploads = service(&db, storage);

        let image = uploads
            .upload(
                &Actor::admin(1),
                9,
                request("photo.jpg", &[]),
                stream_of(image_bytes(10, 10, ImageFormat::Png)),
            )
            .await
            .unwrap();

        assert_eq!(image.owner_id, 9);
    }

    #[tokio::test]
    async fn test_invalid_file_name_rejected_before_side_effects() {
        let db = MockDatabase::with_default_categories();
        let (dir, storage) = local_storage().await;
        let uploads = service(&db, storage);

        let err = uploads
            .upload(
                &Actor::user(7),
                7,
                request("../escape.png", &[]),
                stream_of(image_bytes(10, 10, ImageFormat::Png)),
            )
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Validation);
        assert!(!dir.path().join("7").exists());
    }

    #[tokio::test]
    async fn test_undecodable_upload_keeps_original_but_writes_no_row() {
        let db = MockDatabase::with_default_categories();
        let (dir, storage) = local_storage().await;
        let uploads = service(&db, storage);

        let err = uploads
            .upload(
                &Actor::user(7),
                7,
                request("notes.jpg", &["Nature"]),
                stream_of(b"plain text, not an image".to_vec()),
            )
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Decode);
        assert_eq!(db.image_count(), 0);
        assert!(dir.path().join("7/notes.jpg").is_file());
        assert!(!dir.path().join("7/thumbnails/notes.jpg").exists());
    }

    #[tokio::test]
    async fn test_association_failure_leaves_image_row() {
        let db = MockDatabase::with_default_categories();
        db.set_fail_association_inserts(true);
        let (_dir, storage) = local_storage().await;
        let uploads = service(&db, storage);

        let err = uploads
            .upload(
                &Actor::user(7),
                7,
                request("photo.jpg", &["Nature"]),
                stream_of(image_bytes(10, 10, ImageFormat::Png)),
            )
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Dependency);
        assert_eq!(db.image_count(), 1);
        assert_eq!(db.association_count(), 0);
    }

    #[tokio::test]
    async fn test_missing_owner_account_is_not_found() {
        let db = MockDatabase::with_default_categories();
        db.add_account("someone@example.com", imagehub_core::models::Role::User);
        let (_dir, storage) = local_storage().await;
        let uploads = service(&db, storage);

        let err = uploads
            .upload(
                &Actor::admin(1),
                404,
                request("photo.jpg", &[]),
                stream_of(image_bytes(10, 10, ImageFormat::Png)),
            )
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::NotFound);
    }
}
