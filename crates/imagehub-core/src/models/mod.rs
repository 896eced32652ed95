//! Data models for the application
//!
//! Accounts and actors, owned images, and the category reference set with its
//! image associations.

mod account;
mod category;
mod image;

pub use account::*;
pub use category::*;
pub use image::*;
