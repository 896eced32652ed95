use crate::auth::models::{LoginRequest, SignupRequest, SignupResponse, TokenResponse};
use crate::auth::password::{hash_password, verify_password};
use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use crate::state::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use imagehub_core::models::Role;
use imagehub_core::AppError;
use std::sync::Arc;
use validator::Validate;

#[utoipa::path(
    post,
    path = "/auth/signup",
    tag = "auth",
    request_body = SignupRequest,
    responses(
        (status = 201, description = "Account created", body = SignupResponse),
        (status = 400, description = "Invalid email or password", body = ErrorResponse),
        (status = 409, description = "Email already registered", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, request), fields(email = %request.email, operation = "signup"))]
pub async fn signup(
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<SignupRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    request.validate().map_err(AppError::from)?;

    let email = request.email.trim().to_lowercase();
    let password_hash = hash_password(&request.password)?;
    let account = state
        .accounts
        .create(&email, &password_hash, Role::User)
        .await?;

    tracing::info!(account_id = account.id, "Account created");

    Ok((
        StatusCode::CREATED,
        Json(SignupResponse {
            id: account.id,
            email: account.email,
            role: account.role,
        }),
    ))
}

#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Authenticated", body = TokenResponse),
        (status = 401, description = "Wrong email or password", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, request), fields(email = %request.email, operation = "login"))]
pub async fn login(
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<LoginRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    request.validate().map_err(AppError::from)?;

    let invalid = || AppError::Unauthorized("Invalid email or password".to_string());

    let account = state
        .accounts
        .get_by_email(&request.email.trim().to_lowercase())
        .await?
        .ok_or_else(invalid)?;

    if !verify_password(&request.password, &account.password_hash)? {
        return Err(invalid().into());
    }

    let token = state.jwt.issue(&account)?;

    Ok(Json(TokenResponse {
        token,
        token_type: "Bearer".to_string(),
        expires_in: state.jwt.expires_in(),
    }))
}
