//! Image queries

use imagehub_core::models::{Actor, Image};
use imagehub_core::AppError;
use imagehub_db::ImageRepository;
use imagehub_storage::Storage;
use std::sync::Arc;

use crate::ownership;

/// JPEG thumbnail bytes with the key they were read from
#[derive(Debug, Clone)]
pub struct Thumbnail {
    pub storage_key: String,
    pub data: Vec<u8>,
}

#[derive(Clone)]
pub struct ImageQueryService {
    images: Arc<dyn ImageRepository>,
    storage: Arc<dyn Storage>,
}

impl ImageQueryService {
    pub fn new(images: Arc<dyn ImageRepository>, storage: Arc<dyn Storage>) -> Self {
        Self { images, storage }
    }

    #[tracing::instrument(skip(self, actor), fields(actor_id = actor.id, operation = "get_image"))]
    pub async fn get_image(&self, actor: &Actor, image_id: i64) -> Result<Image, AppError> {
        ownership::load_owned_image(self.images.as_ref(), actor, image_id).await
    }

    #[tracing::instrument(skip(self, actor), fields(actor_id = actor.id, operation = "get_thumbnail"))]
    pub async fn get_thumbnail(&self, actor: &Actor, image_id: i64) -> Result<Thumbnail, AppError> {
        let image = ownership::load_owned_image(self.images.as_ref(), actor, image_id).await?;
        let data = self.storage.read(&image.thumbnail_path).await?;

        Ok(Thumbnail {
            storage_key: image.thumbnail_path,
            data,
        })
    }

    #[tracing::instrument(skip(self, actor), fields(actor_id = actor.id, operation = "list_owner_images"))]
    pub async fn list_for_owner(&self, actor: &Actor, owner_id: i64) -> Result<Vec<Image>, AppError> {
        ownership::validate_id("owner", owner_id)?;
        ownership::ensure_owner(actor, owner_id)?;
        self.images.list_by_owner(owner_id).await
    }

    /// Every image in the system; privileged actors only.
    #[tracing::instrument(skip(self, actor), fields(actor_id = actor.id, operation = "list_all_images"))]
    pub async fn list_all(&self, actor: &Actor) -> Result<Vec<Image>, AppError> {
        if !actor.is_privileged() {
            return Err(AppError::Forbidden(
                "Listing every image requires the admin role".to_string(),
            ));
        }
        self.images.list_all().await
    }
}
