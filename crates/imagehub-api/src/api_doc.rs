//! OpenAPI documentation served at `/api/openapi.json`.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::auth::models;
use crate::error;
use crate::handlers;
use imagehub_core::models::{Category, Image, Role};

struct BearerSecurity;

impl Modify for BearerSecurity {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_token",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "ImageHub API",
        version = "0.1.0",
        description = "Image hosting with automatic thumbnails and category tagging. Regular accounts manage their own images under /api/user; admin accounts act on any account under /api/admin."
    ),
    paths(
        handlers::health::health_check,
        handlers::auth::signup,
        handlers::auth::login,
        handlers::images::upload_own_image,
        handlers::images::list_own_images,
        handlers::images::delete_own_images,
        handlers::images::get_image,
        handlers::images::get_thumbnail,
        handlers::images::delete_image,
        handlers::images::list_all_images,
        handlers::images::upload_user_image,
        handlers::images::list_user_images,
        handlers::images::delete_user_images,
        handlers::categories::list_image_categories,
        handlers::categories::add_image_category,
        handlers::categories::remove_image_category,
        handlers::categories::list_category_images,
    ),
    components(schemas(
        Image,
        Category,
        Role,
        error::ErrorResponse,
        models::SignupRequest,
        models::SignupResponse,
        models::LoginRequest,
        models::TokenResponse,
        handlers::images::DeleteAllResponse,
        handlers::health::HealthResponse,
    )),
    modifiers(&BearerSecurity),
    tags(
        (name = "health", description = "Liveness"),
        (name = "auth", description = "Signup and login"),
        (name = "images", description = "The caller's own images"),
        (name = "categories", description = "Category tagging"),
        (name = "admin", description = "Operations on any account's images")
    )
)]
pub struct ApiDoc;
