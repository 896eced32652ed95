use async_trait::async_trait;
use imagehub_core::models::{Image, NewImage};
use imagehub_core::AppError;
use sqlx::{PgPool, Postgres};

use crate::repository::ImageRepository;

const IMAGE_COLUMNS: &str =
    "id, file_name, file_path, thumbnail_path, description, upload_date, owner_id";

#[derive(Clone)]
pub struct PostgresImageRepository {
    pool: PgPool,
}

impl PostgresImageRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ImageRepository for PostgresImageRepository {
    #[tracing::instrument(skip(self, image), fields(db.table = "images", db.operation = "insert", owner_id = image.owner_id))]
    async fn create(&self, image: NewImage) -> Result<Image, AppError> {
        let owner_id = image.owner_id;
        let result = sqlx::query_as::<Postgres, Image>(&format!(
            "INSERT INTO images (file_name, file_path, thumbnail_path, description, upload_date, owner_id)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {}",
            IMAGE_COLUMNS
        ))
        .bind(image.file_name)
        .bind(image.file_path)
        .bind(image.thumbnail_path)
        .bind(image.description)
        .bind(image.upload_date)
        .bind(owner_id)
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(image) => Ok(image),
            Err(sqlx::Error::Database(db_err)) if db_err.is_foreign_key_violation() => Err(
                AppError::NotFound(format!("Owner account {} not found", owner_id)),
            ),
            Err(e) => Err(e.into()),
        }
    }

    #[tracing::instrument(skip(self), fields(db.table = "images", db.operation = "select", db.record_id = id))]
    async fn get_by_id(&self, id: i64) -> Result<Option<Image>, AppError> {
        let image = sqlx::query_as::<Postgres, Image>(&format!(
            "SELECT {} FROM images WHERE id = $1",
            IMAGE_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(image)
    }

    #[tracing::instrument(skip(self), fields(db.table = "images", db.operation = "select"))]
    async fn list_by_owner(&self, owner_id: i64) -> Result<Vec<Image>, AppError> {
        let images = sqlx::query_as::<Postgres, Image>(&format!(
            "SELECT {} FROM images WHERE owner_id = $1 ORDER BY upload_date DESC, id DESC",
            IMAGE_COLUMNS
        ))
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(images)
    }

    #[tracing::instrument(skip(self), fields(db.table = "images", db.operation = "select"))]
    async fn list_all(&self) -> Result<Vec<Image>, AppError> {
        let images = sqlx::query_as::<Postgres, Image>(&format!(
            "SELECT {} FROM images ORDER BY upload_date DESC, id DESC",
            IMAGE_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(images)
    }

    #[tracing::instrument(skip(self), fields(db.table = "images", db.operation = "delete", db.record_id = id))]
    async fn delete_by_id(&self, id: i64) -> Result<Option<Image>, AppError> {
        let image = sqlx::query_as::<Postgres, Image>(&format!(
            "DELETE FROM images WHERE id = $1 RETURNING {}",
            IMAGE_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(image)
    }

    #[tracing::instrument(skip(self), fields(db.table = "images", db.operation = "delete"))]
    async fn delete_by_owner(&self, owner_id: i64) -> Result<Vec<Image>, AppError> {
        let images = sqlx::query_as::<Postgres, Image>(&format!(
            "DELETE FROM images WHERE owner_id = $1 RETURNING {}",
            IMAGE_COLUMNS
        ))
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;

        tracing::debug!(owner_id, deleted = images.len(), "Deleted owner image rows");

        Ok(images)
    }
}
