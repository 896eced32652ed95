use async_trait::async_trait;
use imagehub_core::models::{Account, Role};
use imagehub_core::AppError;
use sqlx::{PgPool, Postgres};

use crate::repository::AccountRepository;

#[derive(Clone)]
pub struct PostgresAccountRepository {
    pool: PgPool,
}

impl PostgresAccountRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AccountRepository for PostgresAccountRepository {
    #[tracing::instrument(skip(self, password_hash), fields(db.table = "accounts", db.operation = "insert"))]
    async fn create(
        &self,
        email: &str,
        password_hash: &str,
        role: Role,
    ) -> Result<Account, AppError> {
        let result = sqlx::query_as::<Postgres, Account>(
            "INSERT INTO accounts (email, password_hash, role)
             VALUES ($1, $2, $3)
             RETURNING id, email, password_hash, role, created_at",
        )
        .bind(email)
        .bind(password_hash)
        .bind(role)
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(account) => Ok(account),
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => Err(
                AppError::Conflict(format!("An account with email {} already exists", email)),
            ),
            Err(e) => Err(e.into()),
        }
    }

    #[tracing::instrument(skip(self), fields(db.table = "accounts", db.operation = "select", db.record_id = id))]
    async fn get_by_id(&self, id: i64) -> Result<Option<Account>, AppError> {
        let account = sqlx::query_as::<Postgres, Account>(
            "SELECT id, email, password_hash, role, created_at FROM accounts WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(account)
    }

    #[tracing::instrument(skip(self), fields(db.table = "accounts", db.operation = "select"))]
    async fn get_by_email(&self, email: &str) -> Result<Option<Account>, AppError> {
        let account = sqlx::query_as::<Postgres, Account>(
            "SELECT id, email, password_hash, role, created_at FROM accounts WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(account)
    }
}
