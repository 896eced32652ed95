use async_trait::async_trait;
use imagehub_core::models::{Category, Image};
use imagehub_core::AppError;
use sqlx::{PgPool, Postgres};

use crate::repository::CategoryRepository;

#[derive(Clone)]
pub struct PostgresCategoryRepository {
    pool: PgPool,
}

impl PostgresCategoryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CategoryRepository for PostgresCategoryRepository {
    #[tracing::instrument(skip(self), fields(db.table = "categories", db.operation = "select", db.record_id = id))]
    async fn get_by_id(&self, id: i64) -> Result<Option<Category>, AppError> {
        let category =
            sqlx::query_as::<Postgres, Category>("SELECT id, name FROM categories WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(category)
    }

    #[tracing::instrument(skip(self), fields(db.table = "categories", db.operation = "select"))]
    async fn find_by_names(&self, names: &[String]) -> Result<Vec<Category>, AppError> {
        if names.is_empty() {
            return Ok(Vec::new());
        }

        let categories = sqlx::query_as::<Postgres, Category>(
            "SELECT id, name FROM categories WHERE name = ANY($1) ORDER BY id",
        )
        .bind(names)
        .fetch_all(&self.pool)
        .await?;

        Ok(categories)
    }

    #[tracing::instrument(skip(self), fields(db.table = "categories", db.operation = "select"))]
    async fn list_for_image(&self, image_id: i64) -> Result<Vec<Category>, AppError> {
        let categories = sqlx::query_as::<Postgres, Category>(
            "SELECT c.id, c.name
             FROM categories c
             JOIN image_categories ic ON ic.category_id = c.id
             WHERE ic.image_id = $1
             ORDER BY c.id",
        )
        .bind(image_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(categories)
    }

    #[tracing::instrument(skip(self), fields(db.table = "image_categories", db.operation = "select"))]
    async fn list_images(
        &self,
        category_id: i64,
        owner_id: Option<i64>,
    ) -> Result<Vec<Image>, AppError> {
        let images = sqlx::query_as::<Postgres, Image>(
            "SELECT i.id, i.file_name, i.file_path, i.thumbnail_path, i.description, i.upload_date, i.owner_id
             FROM images i
             JOIN image_categories ic ON ic.image_id = i.id
             WHERE ic.category_id = $1
               AND ($2::BIGINT IS NULL OR i.owner_id = $2)
             ORDER BY i.upload_date DESC, i.id DESC",
        )
        .bind(category_id)
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(images)
    }
}
