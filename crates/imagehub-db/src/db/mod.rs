//! PostgreSQL repositories
//!
//! One repository per table. Each holds a cloned `PgPool` and implements the
//! matching trait from [`crate::repository`].

mod account;
mod category;
mod image;
mod image_category;

pub use account::PostgresAccountRepository;
pub use category::PostgresCategoryRepository;
pub use image::PostgresImageRepository;
pub use image_category::PostgresImageCategoryRepository;
