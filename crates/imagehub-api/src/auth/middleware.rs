use crate::auth::jwt::JwtService;
use crate::auth::models::CurrentActor;
use crate::error::HttpAppError;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use imagehub_core::models::Role;
use imagehub_core::AppError;
use std::sync::Arc;

/// Verify the bearer token and store the resolved `CurrentActor` in request extensions.
pub async fn auth_middleware(
    State(jwt): State<Arc<JwtService>>,
    mut request: Request,
    next: Next,
) -> Response {
    let auth_header = match request
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
    {
        Some(h) => h,
        None => {
            return HttpAppError(AppError::Unauthorized(
                "Missing authorization header".to_string(),
            ))
            .into_response();
        }
    };

    let Some(token) = auth_header.strip_prefix("Bearer ") else {
        return HttpAppError(AppError::Unauthorized(
            "Invalid authorization header format".to_string(),
        ))
        .into_response();
    };

    match jwt.verify(token.trim()).and_then(|claims| claims.actor()) {
        Ok(actor) => {
            tracing::debug!(actor_id = actor.id, role = %actor.role, "Request authenticated");
            request.extensions_mut().insert(CurrentActor(actor));
            next.run(request).await
        }
        Err(e) => HttpAppError(e).into_response(),
    }
}

fn require_role(actor: CurrentActor, role: Role, scope: &str) -> Result<(), HttpAppError> {
    if actor.0.role != role {
        return Err(HttpAppError(AppError::Forbidden(format!(
            "{} routes require the {} role",
            scope, role
        ))));
    }
    Ok(())
}

/// Gate for `/api/user/*`: regular accounts only.
pub async fn require_user(
    actor: CurrentActor,
    request: Request,
    next: Next,
) -> Result<Response, HttpAppError> {
    require_role(actor, Role::User, "User")?;
    Ok(next.run(request).await)
}

/// Gate for `/api/admin/*`: privileged accounts only.
pub async fn require_admin(
    actor: CurrentActor,
    request: Request,
    next: Next,
) -> Result<Response, HttpAppError> {
    require_role(actor, Role::Admin, "Admin")?;
    Ok(next.run(request).await)
}
