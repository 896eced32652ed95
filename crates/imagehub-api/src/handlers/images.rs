//! Image upload, retrieval and deletion.
//!
//! Routes under `/api/user` act on the caller's own images; routes under
//! `/api/admin/users/{user_id}` name the target owner explicitly. Per-image routes are
//! shared by both scopes: the engine's ownership guard makes the difference.

use crate::auth::models::CurrentActor;
use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use axum::{
    body::Bytes,
    extract::{Multipart, Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use imagehub_core::models::{Actor, Image};
use imagehub_core::AppError;
use imagehub_services::UploadRequest;
use serde::{Deserialize, Serialize};
use std::io::Cursor;
use std::sync::Arc;
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DeleteAllResponse {
    pub owner_id: i64,
    pub deleted: usize,
}

/// Pull the `image` file, `description` and repeated `categories` fields out of the form.
async fn read_upload_form(
    mut multipart: Multipart,
    max_file_size_bytes: usize,
) -> Result<(UploadRequest, Bytes), HttpAppError> {
    let mut request = UploadRequest::default();
    let mut file: Option<Bytes> = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "image" => {
                request.file_name = field.file_name().unwrap_or_default().to_string();
                let data = field.bytes().await?;
                if data.len() > max_file_size_bytes {
                    return Err(AppError::PayloadTooLarge(format!(
                        "{} bytes exceeds max {} bytes",
                        data.len(),
                        max_file_size_bytes
                    ))
                    .into());
                }
                file = Some(data);
            }
            "description" => request.description = field.text().await?,
            "categories" => {
                let value = field.text().await?;
                request.category_names.extend(
                    value
                        .split(',')
                        .map(str::trim)
                        .filter(|name| !name.is_empty())
                        .map(String::from),
                );
            }
            other => {
                tracing::debug!(field = other, "Ignoring unknown multipart field");
            }
        }
    }

    let data = file.ok_or_else(|| AppError::InvalidInput("Missing image file".to_string()))?;
    if data.is_empty() {
        return Err(AppError::InvalidInput("Image file is empty".to_string()).into());
    }

    Ok((request, data))
}

async fn upload_for(
    state: &AppState,
    actor: &Actor,
    owner_id: i64,
    multipart: Multipart,
) -> Result<Image, HttpAppError> {
    let (request, data) = read_upload_form(multipart, state.max_file_size_bytes).await?;
    let image = state
        .uploads
        .upload(actor, owner_id, request, Box::pin(Cursor::new(data)))
        .await?;
    Ok(image)
}

#[utoipa::path(
    post,
    path = "/api/user/images",
    tag = "images",
    request_body(content = inline(Object), content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Image uploaded", body = Image),
        (status = 400, description = "Missing file, bad file name or undecodable image", body = ErrorResponse),
        (status = 413, description = "File too large", body = ErrorResponse)
    ),
    security(("bearer_token" = []))
)]
#[tracing::instrument(skip(state, multipart), fields(actor_id = actor.id, operation = "upload_image"))]
pub async fn upload_own_image(
    State(state): State<Arc<AppState>>,
    CurrentActor(actor): CurrentActor,
    multipart: Multipart,
) -> Result<impl IntoResponse, HttpAppError> {
    let image = upload_for(&state, &actor, actor.id, multipart).await?;
    Ok((StatusCode::CREATED, Json(image)))
}

#[utoipa::path(
    post,
    path = "/api/admin/users/{user_id}/images",
    tag = "admin",
    params(("user_id" = i64, Path, description = "Owner account ID")),
    request_body(content = inline(Object), content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Image uploaded for the owner", body = Image),
        (status = 404, description = "Owner account not found", body = ErrorResponse)
    ),
    security(("bearer_token" = []))
)]
#[tracing::instrument(skip(state, multipart), fields(actor_id = actor.id, operation = "upload_user_image"))]
pub async fn upload_user_image(
    Path(user_id): Path<i64>,
    State(state): State<Arc<AppState>>,
    CurrentActor(actor): CurrentActor,
    multipart: Multipart,
) -> Result<impl IntoResponse, HttpAppError> {
    let image = upload_for(&state, &actor, user_id, multipart).await?;
    Ok((StatusCode::CREATED, Json(image)))
}

#[utoipa::path(
    get,
    path = "/api/user/images",
    tag = "images",
    responses((status = 200, description = "The caller's images", body = Vec<Image>)),
    security(("bearer_token" = []))
)]
#[tracing::instrument(skip(state), fields(actor_id = actor.id, operation = "list_own_images"))]
pub async fn list_own_images(
    State(state): State<Arc<AppState>>,
    CurrentActor(actor): CurrentActor,
) -> Result<impl IntoResponse, HttpAppError> {
    let images = state.queries.list_for_owner(&actor, actor.id).await?;
    Ok(Json(images))
}

#[utoipa::path(
    get,
    path = "/api/admin/users/{user_id}/images",
    tag = "admin",
    params(("user_id" = i64, Path, description = "Owner account ID")),
    responses((status = 200, description = "The owner's images", body = Vec<Image>)),
    security(("bearer_token" = []))
)]
#[tracing::instrument(skip(state), fields(actor_id = actor.id, operation = "list_user_images"))]
pub async fn list_user_images(
    Path(user_id): Path<i64>,
    State(state): State<Arc<AppState>>,
    CurrentActor(actor): CurrentActor,
) -> Result<impl IntoResponse, HttpAppError> {
    let images = state.queries.list_for_owner(&actor, user_id).await?;
    Ok(Json(images))
}

#[utoipa::path(
    get,
    path = "/api/admin/images",
    tag = "admin",
    responses(
        (status = 200, description = "Every image", body = Vec<Image>),
        (status = 403, description = "Not an admin", body = ErrorResponse)
    ),
    security(("bearer_token" = []))
)]
#[tracing::instrument(skip(state), fields(actor_id = actor.id, operation = "list_all_images"))]
pub async fn list_all_images(
    State(state): State<Arc<AppState>>,
    CurrentActor(actor): CurrentActor,
) -> Result<impl IntoResponse, HttpAppError> {
    let images = state.queries.list_all(&actor).await?;
    Ok(Json(images))
}

#[utoipa::path(
    get,
    path = "/api/user/images/{image_id}",
    tag = "images",
    params(("image_id" = i64, Path, description = "Image ID")),
    responses(
        (status = 200, description = "Image found", body = Image),
        (status = 403, description = "Image belongs to another account", body = ErrorResponse),
        (status = 404, description = "Image not found", body = ErrorResponse)
    ),
    security(("bearer_token" = []))
)]
#[tracing::instrument(skip(state), fields(actor_id = actor.id, operation = "get_image"))]
pub async fn get_image(
    Path(image_id): Path<i64>,
    State(state): State<Arc<AppState>>,
    CurrentActor(actor): CurrentActor,
) -> Result<impl IntoResponse, HttpAppError> {
    let image = state.queries.get_image(&actor, image_id).await?;
    Ok(Json(image))
}

#[utoipa::path(
    get,
    path = "/api/user/images/{image_id}/thumbnail",
    tag = "images",
    params(("image_id" = i64, Path, description = "Image ID")),
    responses(
        (status = 200, description = "JPEG thumbnail bytes (image/jpeg)"),
        (status = 404, description = "Image or thumbnail not found", body = ErrorResponse)
    ),
    security(("bearer_token" = []))
)]
#[tracing::instrument(skip(state), fields(actor_id = actor.id, operation = "get_thumbnail"))]
pub async fn get_thumbnail(
    Path(image_id): Path<i64>,
    State(state): State<Arc<AppState>>,
    CurrentActor(actor): CurrentActor,
) -> Result<impl IntoResponse, HttpAppError> {
    let thumbnail = state.queries.get_thumbnail(&actor, image_id).await?;
    Ok((
        [
            (header::CONTENT_TYPE, "image/jpeg"),
            (header::CACHE_CONTROL, "private, max-age=3600"),
        ],
        thumbnail.data,
    ))
}

#[utoipa::path(
    delete,
    path = "/api/user/images/{image_id}",
    tag = "images",
    params(("image_id" = i64, Path, description = "Image ID")),
    responses(
        (status = 204, description = "Image and files removed"),
        (status = 403, description = "Image belongs to another account", body = ErrorResponse),
        (status = 404, description = "Image not found", body = ErrorResponse),
        (status = 500, description = "Row removed but some files remain", body = ErrorResponse)
    ),
    security(("bearer_token" = []))
)]
#[tracing::instrument(skip(state), fields(actor_id = actor.id, operation = "delete_image"))]
pub async fn delete_image(
    Path(image_id): Path<i64>,
    State(state): State<Arc<AppState>>,
    CurrentActor(actor): CurrentActor,
) -> Result<impl IntoResponse, HttpAppError> {
    state.deletion.delete_one(&actor, image_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    delete,
    path = "/api/user/images",
    tag = "images",
    responses(
        (status = 200, description = "Every image of the caller removed", body = DeleteAllResponse),
        (status = 500, description = "Rows removed but some files remain", body = ErrorResponse)
    ),
    security(("bearer_token" = []))
)]
#[tracing::instrument(skip(state), fields(actor_id = actor.id, operation = "delete_own_images"))]
pub async fn delete_own_images(
    State(state): State<Arc<AppState>>,
    CurrentActor(actor): CurrentActor,
) -> Result<impl IntoResponse, HttpAppError> {
    let deleted = state.deletion.delete_all_for_owner(&actor, actor.id).await?;
    Ok(Json(DeleteAllResponse {
        owner_id: actor.id,
        deleted,
    }))
}

#[utoipa::path(
    delete,
    path = "/api/admin/users/{user_id}/images",
    tag = "admin",
    params(("user_id" = i64, Path, description = "Owner account ID")),
    responses(
        (status = 200, description = "Every image of the owner removed", body = DeleteAllResponse),
        (status = 500, description = "Rows removed but some files remain", body = ErrorResponse)
    ),
    security(("bearer_token" = []))
)]
#[tracing::instrument(skip(state), fields(actor_id = actor.id, operation = "delete_user_images"))]
pub async fn delete_user_images(
    Path(user_id): Path<i64>,
    State(state): State<Arc<AppState>>,
    CurrentActor(actor): CurrentActor,
) -> Result<impl IntoResponse, HttpAppError> {
    let deleted = state.deletion.delete_all_for_owner(&actor, user_id).await?;
    Ok(Json(DeleteAllResponse {
        owner_id: user_id,
        deleted,
    }))
}
