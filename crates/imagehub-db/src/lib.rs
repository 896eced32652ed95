//! ImageHub Database Layer
//!
//! Repository traits for the image metadata, category, association and account
//! stores, with PostgreSQL implementations.

pub mod db;
pub mod repository;
#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers;

pub use db::{
    PostgresAccountRepository, PostgresCategoryRepository, PostgresImageCategoryRepository,
    PostgresImageRepository,
};
pub use repository::{
    AccountRepository, CategoryRepository, ImageCategoryRepository, ImageRepository,
};
