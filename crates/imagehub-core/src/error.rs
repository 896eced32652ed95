//! Error types module
//!
//! All failures in ImageHub are unified under the `AppError` enum. Each variant
//! belongs to exactly one [`ErrorKind`], and describes how it should be presented
//! to clients through [`ErrorMetadata`].
//!
//! The `Database` variant and `From<sqlx::Error>` are gated behind the `sqlx` feature.

use std::io;

#[cfg(feature = "sqlx")]
use sqlx::Error as SqlxError;

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like validation failures
    Debug,
    /// Warning level - for partial failures and bad input files
    Warn,
    /// Error level - for unexpected failures
    Error,
}

/// Coarse failure classes exposed by the asset engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed or missing identifiers, files or fields
    Validation,
    /// Resource absent
    NotFound,
    /// Ownership or role check failed
    Permission,
    /// Caller could not be authenticated
    Authentication,
    /// Resource already exists (category already associated, email taken)
    Duplicate,
    /// Underlying store or filesystem failure
    Dependency,
    /// Thumbnail source could not be decoded
    Decode,
    /// Thumbnail could not be encoded
    Encode,
    /// Unexpected failure inside the service
    Internal,
}

/// Metadata for error responses - defines how an error should be presented
pub trait ErrorMetadata {
    /// HTTP status code to return
    fn http_status_code(&self) -> u16;

    /// Machine-readable error code (e.g., "DATABASE_ERROR")
    fn error_code(&self) -> &'static str;

    /// Whether this error is recoverable (can be retried)
    fn is_recoverable(&self) -> bool;

    /// Suggested action for the client
    fn suggested_action(&self) -> Option<&'static str>;

    /// Client-facing message (may differ from internal error message)
    fn client_message(&self) -> String;

    /// Whether details should be hidden in production
    fn is_sensitive(&self) -> bool;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[cfg(feature = "sqlx")]
    #[error("Database error: {0}")]
    Database(#[source] SqlxError),

    #[cfg(not(feature = "sqlx"))]
    #[error("Database error: {0}")]
    Database(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("File cleanup failed for {} file(s): {}", .0.len(), .0.join("; "))]
    FileCleanup(Vec<String>),

    #[error("Image decode error: {0}")]
    ImageDecode(String),

    #[error("Image encode error: {0}")]
    ImageEncode(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid category: {0}")]
    InvalidCategory(i64),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Category {category_id} is not associated with image {image_id}")]
    AssociationNotFound { image_id: i64, category_id: i64 },

    #[error("Category {category_id} is already associated with image {image_id}")]
    DuplicateCategory { image_id: i64, category_id: i64 },

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("File too large: {0}")]
    PayloadTooLarge(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Internal error with source")]
    InternalWithSource {
        message: String,
        #[source]
        source: anyhow::Error,
    },
}

#[cfg(feature = "sqlx")]
impl From<SqlxError> for AppError {
    fn from(err: SqlxError) -> Self {
        AppError::Database(err)
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::InternalWithSource {
            message: err.to_string(),
            source: err,
        }
    }
}

impl From<io::Error> for AppError {
    fn from(err: io::Error) -> Self {
        AppError::Storage(format!("IO error: {}", err))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::InvalidInput(format!("JSON parsing error: {}", err))
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::InvalidInput(format!("Validation error: {}", err))
    }
}

/// Static metadata for each variant: (http_status, error_code, recoverable, suggested_action, sensitive, log_level).
fn app_error_static_metadata(
    err: &AppError,
) -> (
    u16,
    &'static str,
    bool,
    Option<&'static str>,
    bool,
    LogLevel,
) {
    match err {
        AppError::Database(_) => (
            500,
            "DATABASE_ERROR",
            true,
            Some("Retry after a short delay"),
            true,
            LogLevel::Error,
        ),
        AppError::Storage(_) => (
            500,
            "STORAGE_ERROR",
            true,
            Some("Retry after a short delay"),
            true,
            LogLevel::Error,
        ),
        AppError::FileCleanup(_) => (
            500,
            "FILE_CLEANUP_ERROR",
            true,
            Some("Metadata was removed; retry or ask an operator to clean up files"),
            true,
            LogLevel::Error,
        ),
        AppError::ImageDecode(_) => (
            400,
            "IMAGE_DECODE_ERROR",
            false,
            Some("Upload a JPEG, PNG, WebP or GIF image"),
            false,
            LogLevel::Warn,
        ),
        AppError::ImageEncode(_) => (
            500,
            "IMAGE_ENCODE_ERROR",
            true,
            Some("Retry after a short delay"),
            true,
            LogLevel::Error,
        ),
        AppError::InvalidInput(_) => (
            400,
            "INVALID_INPUT",
            false,
            Some("Check request parameters and try again"),
            false,
            LogLevel::Debug,
        ),
        AppError::InvalidCategory(_) => (
            400,
            "INVALID_CATEGORY",
            false,
            Some("Use the ID of an existing category"),
            false,
            LogLevel::Debug,
        ),
        AppError::NotFound(_) => (
            404,
            "NOT_FOUND",
            false,
            Some("Verify the resource ID exists"),
            false,
            LogLevel::Debug,
        ),
        AppError::AssociationNotFound { .. } => (
            404,
            "ASSOCIATION_NOT_FOUND",
            false,
            Some("List the image categories before removing one"),
            false,
            LogLevel::Debug,
        ),
        AppError::DuplicateCategory { .. } => (
            409,
            "DUPLICATE_CATEGORY",
            false,
            None,
            false,
            LogLevel::Debug,
        ),
        AppError::Conflict(_) => (409, "CONFLICT", false, None, false, LogLevel::Debug),
        AppError::Forbidden(_) => (
            403,
            "FORBIDDEN",
            false,
            Some("Only the owner of a resource may access it"),
            false,
            LogLevel::Debug,
        ),
        AppError::Unauthorized(_) => (
            401,
            "UNAUTHORIZED",
            false,
            Some("Check authentication token"),
            false,
            LogLevel::Debug,
        ),
        AppError::PayloadTooLarge(_) => (
            413,
            "PAYLOAD_TOO_LARGE",
            false,
            Some("Reduce file size"),
            false,
            LogLevel::Debug,
        ),
        AppError::Internal(_) | AppError::InternalWithSource { .. } => (
            500,
            "INTERNAL_ERROR",
            true,
            Some("Retry after a short delay"),
            true,
            LogLevel::Error,
        ),
    }
}

impl AppError {
    /// Failure class of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::InvalidInput(_) | AppError::InvalidCategory(_) => ErrorKind::Validation,
            AppError::PayloadTooLarge(_) => ErrorKind::Validation,
            AppError::NotFound(_) | AppError::AssociationNotFound { .. } => ErrorKind::NotFound,
            AppError::Forbidden(_) => ErrorKind::Permission,
            AppError::Unauthorized(_) => ErrorKind::Authentication,
            AppError::DuplicateCategory { .. } | AppError::Conflict(_) => ErrorKind::Duplicate,
            AppError::Database(_) | AppError::Storage(_) | AppError::FileCleanup(_) => {
                ErrorKind::Dependency
            }
            AppError::ImageDecode(_) => ErrorKind::Decode,
            AppError::ImageEncode(_) => ErrorKind::Encode,
            AppError::Internal(_) | AppError::InternalWithSource { .. } => ErrorKind::Internal,
        }
    }

    /// Get the error type name for detailed error responses
    pub fn error_type(&self) -> &str {
        match self {
            AppError::Database(_) => "Database",
            AppError::Storage(_) => "Storage",
            AppError::FileCleanup(_) => "FileCleanup",
            AppError::ImageDecode(_) => "ImageDecode",
            AppError::ImageEncode(_) => "ImageEncode",
            AppError::InvalidInput(_) => "InvalidInput",
            AppError::InvalidCategory(_) => "InvalidCategory",
            AppError::NotFound(_) => "NotFound",
            AppError::AssociationNotFound { .. } => "AssociationNotFound",
            AppError::DuplicateCategory { .. } => "DuplicateCategory",
            AppError::Conflict(_) => "Conflict",
            AppError::Forbidden(_) => "Forbidden",
            AppError::Unauthorized(_) => "Unauthorized",
            AppError::PayloadTooLarge(_) => "PayloadTooLarge",
            AppError::Internal(_) => "Internal",
            AppError::InternalWithSource { .. } => "Internal",
        }
    }

    /// Get detailed error information including error chain
    pub fn detailed_message(&self) -> String {
        use std::error::Error;

        let mut details = self.to_string();

        let mut source = self.source();
        let mut depth = 0;
        while let Some(err) = source {
            depth += 1;
            if depth > 5 {
                details.push_str("\n  ... (truncated)");
                break;
            }
            details.push_str(&format!("\n  Caused by: {}", err));
            source = err.source();
        }

        details
    }
}

impl ErrorMetadata for AppError {
    fn http_status_code(&self) -> u16 {
        app_error_static_metadata(self).0
    }

    fn error_code(&self) -> &'static str {
        app_error_static_metadata(self).1
    }

    fn is_recoverable(&self) -> bool {
        app_error_static_metadata(self).2
    }

    fn suggested_action(&self) -> Option<&'static str> {
        app_error_static_metadata(self).3
    }

    fn is_sensitive(&self) -> bool {
        app_error_static_metadata(self).4
    }

    fn log_level(&self) -> LogLevel {
        app_error_static_metadata(self).5
    }

    fn client_message(&self) -> String {
        match self {
            AppError::Database(_) => "Failed to access database".to_string(),
            AppError::Storage(_) => "Failed to access storage".to_string(),
            AppError::FileCleanup(failures) => format!(
                "Images were deleted but {} file(s) could not be removed",
                failures.len()
            ),
            AppError::ImageDecode(ref msg) => msg.clone(),
            AppError::ImageEncode(_) => "Failed to encode thumbnail".to_string(),
            AppError::InvalidInput(ref msg) => msg.clone(),
            AppError::InvalidCategory(id) => format!("Category {} does not exist", id),
            AppError::NotFound(ref msg) => msg.clone(),
            AppError::AssociationNotFound { .. }
            | AppError::DuplicateCategory { .. } => self.to_string(),
            AppError::Conflict(ref msg) => msg.clone(),
            AppError::Forbidden(ref msg) => msg.clone(),
            AppError::Unauthorized(ref msg) => msg.clone(),
            AppError::PayloadTooLarge(ref msg) => msg.clone(),
            AppError::Internal(_) => "Internal server error".to_string(),
            AppError::InternalWithSource { .. } => "Internal server error".to_string(),
        }
    }
}
