//! Test helpers for crates that depend on the repository traits

pub mod mock_repositories;

pub use mock_repositories::MockDatabase;
