use crate::error::HttpAppError;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use imagehub_core::models::{Actor, Role};
use imagehub_core::AppError;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// JWT claims structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtClaims {
    /// Account id, carried as a string as registered claims require
    pub sub: String,
    pub role: Role,
    pub iat: i64,
    pub exp: i64,
}

impl JwtClaims {
    pub fn new(account_id: i64, role: Role, iat: i64, exp: i64) -> Self {
        Self {
            sub: account_id.to_string(),
            role,
            iat,
            exp,
        }
    }

    pub fn actor(&self) -> Result<Actor, AppError> {
        let id = self
            .sub
            .parse::<i64>()
            .map_err(|_| AppError::Unauthorized("Invalid token subject".to_string()))?;
        Ok(Actor::new(id, self.role))
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SignupRequest {
    #[validate(email)]
    #[schema(example = "jane@example.com")]
    pub email: String,
    #[validate(length(min = 8, max = 128))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SignupResponse {
    pub id: i64,
    pub email: String,
    pub role: Role,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TokenResponse {
    pub token: String,
    pub token_type: String,
    pub expires_in: i64,
}

/// Authenticated identity resolved by `auth_middleware` and stored in request extensions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrentActor(pub Actor);

// Extract directly from request parts so the actor can precede Multipart.
impl<S> FromRequestParts<S> for CurrentActor
where
    S: Send + Sync,
{
    type Rejection = HttpAppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentActor>()
            .copied()
            .ok_or_else(|| {
                HttpAppError(AppError::Unauthorized(
                    "Missing authenticated identity".to_string(),
                ))
            })
    }
}
