//! ImageHub asset engine
//!
//! Ownership-scoped operations over images, their thumbnails and their category
//! associations. Every operation takes the acting identity explicitly as an
//! [`Actor`](imagehub_core::models::Actor); nothing is read from ambient request state.
//!
//! Writes span two stores (PostgreSQL rows and files) and are not atomic:
//!
//! - Upload persists files, then the image row, then associations. A failure after
//!   the row is written leaves the row without some associations; a failure before
//!   it leaves files without a row.
//! - Deletion removes rows first, then files. A file cleanup failure leaves orphan
//!   files and is reported as `AppError::FileCleanup` listing every failed file.

pub mod categories;
pub mod deletion;
pub mod images;
pub mod ownership;
pub mod upload;

#[cfg(test)]
pub(crate) mod test_support;

pub use categories::CategoryAssociationService;
pub use deletion::ImageDeletionService;
pub use images::{ImageQueryService, Thumbnail};
pub use ownership::{authorize, ensure_owner, Access};
pub use upload::{ImageUploadService, UploadRequest, UploadStream};
