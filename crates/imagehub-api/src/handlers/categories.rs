use crate::auth::models::CurrentActor;
use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use imagehub_core::models::{Category, Image};
use std::sync::Arc;

#[utoipa::path(
    get,
    path = "/api/user/images/{image_id}/categories",
    tag = "categories",
    params(("image_id" = i64, Path, description = "Image ID")),
    responses(
        (status = 200, description = "Categories of the image", body = Vec<Category>),
        (status = 403, description = "Image belongs to another account", body = ErrorResponse),
        (status = 404, description = "Image not found", body = ErrorResponse)
    ),
    security(("bearer_token" = []))
)]
#[tracing::instrument(skip(state), fields(actor_id = actor.id, operation = "list_image_categories"))]
pub async fn list_image_categories(
    Path(image_id): Path<i64>,
    State(state): State<Arc<AppState>>,
    CurrentActor(actor): CurrentActor,
) -> Result<impl IntoResponse, HttpAppError> {
    let categories = state
        .categories
        .list_categories_for_image(&actor, image_id)
        .await?;
    Ok(Json(categories))
}

#[utoipa::path(
    post,
    path = "/api/user/images/{image_id}/categories/{category_id}",
    tag = "categories",
    params(
        ("image_id" = i64, Path, description = "Image ID"),
        ("category_id" = i64, Path, description = "Category ID")
    ),
    responses(
        (status = 201, description = "Category added", body = Category),
        (status = 400, description = "Unknown category", body = ErrorResponse),
        (status = 403, description = "Image belongs to another account", body = ErrorResponse),
        (status = 409, description = "Image already has the category", body = ErrorResponse)
    ),
    security(("bearer_token" = []))
)]
#[tracing::instrument(skip(state), fields(actor_id = actor.id, operation = "add_image_category"))]
pub async fn add_image_category(
    Path((image_id, category_id)): Path<(i64, i64)>,
    State(state): State<Arc<AppState>>,
    CurrentActor(actor): CurrentActor,
) -> Result<impl IntoResponse, HttpAppError> {
    let category = state
        .categories
        .add_category(&actor, image_id, category_id)
        .await?;
    Ok((StatusCode::CREATED, Json(category)))
}

#[utoipa::path(
    delete,
    path = "/api/user/images/{image_id}/categories/{category_id}",
    tag = "categories",
    params(
        ("image_id" = i64, Path, description = "Image ID"),
        ("category_id" = i64, Path, description = "Category ID")
    ),
    responses(
        (status = 204, description = "Category removed"),
        (status = 403, description = "Image belongs to another account", body = ErrorResponse),
        (status = 404, description = "Image does not have the category", body = ErrorResponse)
    ),
    security(("bearer_token" = []))
)]
#[tracing::instrument(skip(state), fields(actor_id = actor.id, operation = "remove_image_category"))]
pub async fn remove_image_category(
    Path((image_id, category_id)): Path<(i64, i64)>,
    State(state): State<Arc<AppState>>,
    CurrentActor(actor): CurrentActor,
) -> Result<impl IntoResponse, HttpAppError> {
    state
        .categories
        .remove_category(&actor, image_id, category_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Images tagged with a category. Regular accounts only see their own images.
#[utoipa::path(
    get,
    path = "/api/user/categories/{category_id}/images",
    tag = "categories",
    params(("category_id" = i64, Path, description = "Category ID")),
    responses(
        (status = 200, description = "Tagged images", body = Vec<Image>),
        (status = 404, description = "Category not found", body = ErrorResponse)
    ),
    security(("bearer_token" = []))
)]
#[tracing::instrument(skip(state), fields(actor_id = actor.id, operation = "list_category_images"))]
pub async fn list_category_images(
    Path(category_id): Path<i64>,
    State(state): State<Arc<AppState>>,
    CurrentActor(actor): CurrentActor,
) -> Result<impl IntoResponse, HttpAppError> {
    let images = state
        .categories
        .list_images_for_category(&actor, category_id)
        .await?;
    Ok(Json(images))
}
