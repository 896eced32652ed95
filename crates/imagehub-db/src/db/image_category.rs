use async_trait::async_trait;
use chrono::Utc;
use imagehub_core::models::ImageCategory;
use imagehub_core::AppError;
use sqlx::{PgPool, Postgres};

use crate::repository::ImageCategoryRepository;

#[derive(Clone)]
pub struct PostgresImageCategoryRepository {
    pool: PgPool,
}

impl PostgresImageCategoryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ImageCategoryRepository for PostgresImageCategoryRepository {
    /// Upsert: a concurrent insert of the same pair is a no-op rather than a key violation.
    #[tracing::instrument(skip(self), fields(db.table = "image_categories", db.operation = "insert"))]
    async fn add(&self, image_id: i64, category_id: i64) -> Result<bool, AppError> {
        let now = Utc::now();
        let result = sqlx::query(
            "INSERT INTO image_categories (image_id, category_id, created_at, updated_at)
             VALUES ($1, $2, $3, $3)
             ON CONFLICT (image_id, category_id) DO NOTHING",
        )
        .bind(image_id)
        .bind(category_id)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    #[tracing::instrument(skip(self), fields(db.table = "image_categories", db.operation = "delete"))]
    async fn remove(&self, image_id: i64, category_id: i64) -> Result<bool, AppError> {
        let result =
            sqlx::query("DELETE FROM image_categories WHERE image_id = $1 AND category_id = $2")
                .bind(image_id)
                .bind(category_id)
                .execute(&self.pool)
                .await?;

        Ok(result.rows_affected() > 0)
    }

    #[tracing::instrument(skip(self), fields(db.table = "image_categories", db.operation = "select"))]
    async fn list_by_image(&self, image_id: i64) -> Result<Vec<ImageCategory>, AppError> {
        let associations = sqlx::query_as::<Postgres, ImageCategory>(
            "SELECT image_id, category_id, created_at, updated_at
             FROM image_categories
             WHERE image_id = $1
             ORDER BY category_id",
        )
        .bind(image_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(associations)
    }
}
