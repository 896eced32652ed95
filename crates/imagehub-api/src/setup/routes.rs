//! Route configuration and setup

use crate::api_doc::ApiDoc;
use crate::auth::middleware::{auth_middleware, require_admin, require_user};
use crate::handlers::{auth, categories, health, images};
use crate::state::AppState;
use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
    middleware,
    routing::{get, post},
    Json, Router,
};
use imagehub_core::Config;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;

/// Room for the non-file multipart fields and boundaries on top of the file itself.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

/// Setup all application routes
pub fn setup_routes(config: &Config, state: Arc<AppState>) -> Result<Router<()>, anyhow::Error> {
    let cors = setup_cors(config)?;

    let protected = Router::new()
        .nest("/api/user", user_routes())
        .nest("/api/admin", admin_routes())
        .layer(middleware::from_fn_with_state(
            state.jwt.clone(),
            auth_middleware,
        ));

    let app = public_routes()
        .merge(protected)
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(
            config.max_file_size_bytes() + MULTIPART_OVERHEAD_BYTES,
        ))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    Ok(app)
}

/// Setup CORS configuration
fn setup_cors(config: &Config) -> Result<CorsLayer, anyhow::Error> {
    let methods = [Method::GET, Method::POST, Method::DELETE, Method::OPTIONS];

    let cors = if config.cors_origins().iter().any(|o| o == "*") {
        if config.is_production() {
            tracing::warn!("CORS configured to allow all origins - not recommended for production");
        }
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(methods)
            .allow_headers(Any)
    } else {
        let origins = config
            .cors_origins()
            .iter()
            .map(|o| o.parse::<HeaderValue>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| anyhow::anyhow!("Invalid CORS origin: {}", e))?;

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(methods)
            .allow_headers(Any)
    };
    Ok(cors)
}

/// Public routes (no authentication required)
fn public_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/api/openapi.json", get(|| async { Json(ApiDoc::openapi()) }))
        .route("/auth/signup", post(auth::signup))
        .route("/auth/login", post(auth::login))
}

/// Per-image and category routes, identical in both scopes.
fn image_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/images/{image_id}",
            get(images::get_image).delete(images::delete_image),
        )
        .route("/images/{image_id}/thumbnail", get(images::get_thumbnail))
        .route(
            "/images/{image_id}/categories",
            get(categories::list_image_categories),
        )
        .route(
            "/images/{image_id}/categories/{category_id}",
            post(categories::add_image_category).delete(categories::remove_image_category),
        )
        .route(
            "/categories/{category_id}/images",
            get(categories::list_category_images),
        )
}

/// `/api/user`: the caller's own images.
fn user_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/images",
            post(images::upload_own_image)
                .get(images::list_own_images)
                .delete(images::delete_own_images),
        )
        .merge(image_routes())
        .route_layer(middleware::from_fn(require_user))
}

/// `/api/admin`: any account's images, target owner named in the path.
fn admin_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/images", get(images::list_all_images))
        .route(
            "/users/{user_id}/images",
            post(images::upload_user_image)
                .get(images::list_user_images)
                .delete(images::delete_user_images),
        )
        .merge(image_routes())
        .route_layer(middleware::from_fn(require_admin))
}
