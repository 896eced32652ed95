//! Application state shared by every handler.

use crate::auth::jwt::JwtService;
use imagehub_core::Config;
use imagehub_db::{
    AccountRepository, CategoryRepository, ImageCategoryRepository, ImageRepository,
    PostgresAccountRepository, PostgresCategoryRepository, PostgresImageCategoryRepository,
    PostgresImageRepository,
};
use imagehub_processing::ThumbnailGenerator;
use imagehub_services::{
    CategoryAssociationService, ImageDeletionService, ImageQueryService, ImageUploadService,
};
use imagehub_storage::Storage;
use sqlx::PgPool;
use std::sync::Arc;

/// The four stores behind the engine
#[derive(Clone)]
pub struct Repositories {
    pub images: Arc<dyn ImageRepository>,
    pub categories: Arc<dyn CategoryRepository>,
    pub associations: Arc<dyn ImageCategoryRepository>,
    pub accounts: Arc<dyn AccountRepository>,
}

impl Repositories {
    pub fn postgres(pool: PgPool) -> Self {
        Self {
            images: Arc::new(PostgresImageRepository::new(pool.clone())),
            categories: Arc::new(PostgresCategoryRepository::new(pool.clone())),
            associations: Arc::new(PostgresImageCategoryRepository::new(pool.clone())),
            accounts: Arc::new(PostgresAccountRepository::new(pool)),
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub accounts: Arc<dyn AccountRepository>,
    pub uploads: ImageUploadService,
    pub queries: ImageQueryService,
    pub deletion: ImageDeletionService,
    pub categories: CategoryAssociationService,
    pub jwt: Arc<JwtService>,
    pub max_file_size_bytes: usize,
}

impl AppState {
    pub fn new(config: &Config, repos: Repositories, storage: Arc<dyn Storage>) -> Self {
        let thumbnails =
            ThumbnailGenerator::new(config.thumbnail_max_width(), config.thumbnail_max_height());

        Self {
            uploads: ImageUploadService::new(
                repos.images.clone(),
                repos.categories.clone(),
                repos.associations.clone(),
                storage.clone(),
                thumbnails,
            ),
            queries: ImageQueryService::new(repos.images.clone(), storage.clone()),
            deletion: ImageDeletionService::new(repos.images.clone(), storage),
            categories: CategoryAssociationService::new(
                repos.images,
                repos.categories,
                repos.associations,
            ),
            accounts: repos.accounts,
            jwt: Arc::new(JwtService::new(
                config.jwt_secret(),
                config.jwt_expiry_hours(),
            )),
            max_file_size_bytes: config.max_file_size_bytes(),
        }
    }
}
