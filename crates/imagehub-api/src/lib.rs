//! ImageHub HTTP boundary
//!
//! Authenticates requests, resolves the acting identity and hands typed inputs to the
//! engine in `imagehub-services`. Exposed as a library so integration tests can build
//! the router over in-memory repositories.

pub mod api_doc;
pub mod auth;
pub mod error;
pub mod handlers;
pub mod setup;
pub mod state;
pub mod telemetry;
