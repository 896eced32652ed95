//! ImageHub Core Library
//!
//! Domain models, error types and configuration shared by every ImageHub crate.

pub mod config;
pub mod error;
pub mod models;

pub use config::Config;
pub use error::{AppError, ErrorKind, ErrorMetadata, LogLevel};
