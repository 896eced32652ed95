//! Category association manager
//!
//! Tags images with categories from the seeded reference set. An image holds a
//! category at most once.

use imagehub_core::models::{Actor, Category, Image};
use imagehub_core::AppError;
use imagehub_db::{CategoryRepository, ImageCategoryRepository, ImageRepository};
use std::sync::Arc;

use crate::ownership;

#[derive(Clone)]
pub struct CategoryAssociationService {
    images: Arc<dyn ImageRepository>,
    categories: Arc<dyn CategoryRepository>,
    associations: Arc<dyn ImageCategoryRepository>,
}

impl CategoryAssociationService {
    pub fn new(
        images: Arc<dyn ImageRepository>,
        categories: Arc<dyn CategoryRepository>,
        associations: Arc<dyn ImageCategoryRepository>,
    ) -> Self {
        Self {
            images,
            categories,
            associations,
        }
    }

    async fn existing_category(&self, category_id: i64) -> Result<Category, AppError> {
        ownership::validate_id("category", category_id)?;
        self.categories
            .get_by_id(category_id)
            .await?
            .ok_or(AppError::InvalidCategory(category_id))
    }

    /// Tag an image with a category.
    ///
    /// Fails with `DuplicateCategory` when the image already carries it. A pair
    /// inserted concurrently between the check and the insert is absorbed by the
    /// store's upsert.
    #[tracing::instrument(skip(self, actor), fields(actor_id = actor.id, operation = "add_category"))]
    pub async fn add_category(
        &self,
        actor: &Actor,
        image_id: i64,
        category_id: i64,
    ) -> Result<Category, AppError> {
        let image = ownership::load_owned_image(self.images.as_ref(), actor, image_id).await?;
        let category = self.existing_category(category_id).await?;

        let current = self.associations.list_by_image(image.id).await?;
        if current.iter().any(|a| a.category_id == category.id) {
            return Err(AppError::DuplicateCategory {
                image_id: image.id,
                category_id: category.id,
            });
        }

        let inserted = self.associations.add(image.id, category.id).await?;
        if !inserted {
            tracing::debug!(
                image_id = image.id,
                category_id = category.id,
                "Association created concurrently, nothing inserted"
            );
        }

        Ok(category)
    }

    /// Remove a category from an image; `AssociationNotFound` when it is not tagged.
    #[tracing::instrument(skip(self, actor), fields(actor_id = actor.id, operation = "remove_category"))]
    pub async fn remove_category(
        &self,
        actor: &Actor,
        image_id: i64,
        category_id: i64,
    ) -> Result<(), AppError> {
        let image = ownership::load_owned_image(self.images.as_ref(), actor, image_id).await?;
        let category = self.existing_category(category_id).await?;

        if !self.associations.remove(image.id, category.id).await? {
            return Err(AppError::AssociationNotFound {
                image_id: image.id,
                category_id: category.id,
            });
        }

        Ok(())
    }

    #[tracing::instrument(skip(self, actor), fields(actor_id = actor.id, operation = "list_image_categories"))]
    pub async fn list_categories_for_image(
        &self,
        actor: &Actor,
        image_id: i64,
    ) -> Result<Vec<Category>, AppError> {
        let image = ownership::load_owned_image(self.images.as_ref(), actor, image_id).await?;
        self.categories.list_for_image(image.id).await
    }

    /// Images tagged with a category: the actor's own images, or every image for
    /// a privileged actor.
    #[tracing::instrument(skip(self, actor), fields(actor_id = actor.id, operation = "list_category_images"))]
    pub async fn list_images_for_category(
        &self,
        actor: &Actor,
        category_id: i64,
    ) -> Result<Vec<Image>, AppError> {
        ownership::validate_id("category", category_id)?;
        if self.categories.get_by_id(category_id).await?.is_none() {
            return Err(AppError::NotFound(format!(
                "Category {} not found",
                category_id
            )));
        }

        let owner_scope = if actor.is_privileged() {
            None
        } else {
            Some(actor.id)
        };
        self.categories.list_images(category_id, owner_scope).await
    }
}
