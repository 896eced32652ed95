//! Repository trait abstractions
//!
//! The asset engine depends only on these traits, so services can be exercised
//! against in-memory doubles without a database.

use async_trait::async_trait;
use imagehub_core::models::{Account, Category, Image, ImageCategory, NewImage, Role};
use imagehub_core::AppError;

/// Image metadata store
#[async_trait]
pub trait ImageRepository: Send + Sync {
    /// Insert a new image row and return it with its generated id
    async fn create(&self, image: NewImage) -> Result<Image, AppError>;

    async fn get_by_id(&self, id: i64) -> Result<Option<Image>, AppError>;

    async fn list_by_owner(&self, owner_id: i64) -> Result<Vec<Image>, AppError>;

    async fn list_all(&self) -> Result<Vec<Image>, AppError>;

    /// Delete one image row, returning it if it existed
    async fn delete_by_id(&self, id: i64) -> Result<Option<Image>, AppError>;

    /// Delete every image row of an owner in one statement, returning the removed rows
    async fn delete_by_owner(&self, owner_id: i64) -> Result<Vec<Image>, AppError>;
}

/// Category store (read-only reference data)
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    async fn get_by_id(&self, id: i64) -> Result<Option<Category>, AppError>;

    /// Resolve names to categories. Unknown names are absent from the result.
    async fn find_by_names(&self, names: &[String]) -> Result<Vec<Category>, AppError>;

    /// Categories currently tagging an image
    async fn list_for_image(&self, image_id: i64) -> Result<Vec<Category>, AppError>;

    /// Images carrying a category, optionally restricted to one owner
    async fn list_images(
        &self,
        category_id: i64,
        owner_id: Option<i64>,
    ) -> Result<Vec<Image>, AppError>;
}

/// Image to category association store
#[async_trait]
pub trait ImageCategoryRepository: Send + Sync {
    /// Insert the pair. Returns `false` when it was already present (no-op).
    async fn add(&self, image_id: i64, category_id: i64) -> Result<bool, AppError>;

    /// Delete the pair. Returns `false` when it did not exist.
    async fn remove(&self, image_id: i64, category_id: i64) -> Result<bool, AppError>;

    async fn list_by_image(&self, image_id: i64) -> Result<Vec<ImageCategory>, AppError>;
}

/// Account store
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Insert an account; a taken email yields `AppError::Conflict`
    async fn create(
        &self,
        email: &str,
        password_hash: &str,
        role: Role,
    ) -> Result<Account, AppError>;

    async fn get_by_id(&self, id: i64) -> Result<Option<Account>, AppError>;

    async fn get_by_email(&self, email: &str) -> Result<Option<Account>, AppError>;
}
