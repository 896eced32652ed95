//! Ownership guard
//!
//! A single predicate gates every operation on an owned resource: privileged
//! actors are always allowed, regular actors only on their own resources.

use imagehub_core::models::{Actor, Image, Role};
use imagehub_core::AppError;
use imagehub_db::ImageRepository;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Allow,
    Deny,
}

/// Decide whether `actor_id` acting with `actor_role` may touch a resource owned by
/// `resource_owner_id`. Pure; no side effects.
pub fn authorize(actor_id: i64, actor_role: Role, resource_owner_id: i64) -> Access {
    if actor_role.is_privileged() || actor_id == resource_owner_id {
        Access::Allow
    } else {
        Access::Deny
    }
}

/// [`authorize`] as a `Result`, failing with `AppError::Forbidden` on deny.
pub fn ensure_owner(actor: &Actor, resource_owner_id: i64) -> Result<(), AppError> {
    match authorize(actor.id, actor.role, resource_owner_id) {
        Access::Allow => Ok(()),
        Access::Deny => {
            tracing::debug!(
                actor_id = actor.id,
                resource_owner_id,
                "Ownership check denied"
            );
            Err(AppError::Forbidden(
                "You are not permitted to access this resource".to_string(),
            ))
        }
    }
}

pub(crate) fn validate_id(kind: &str, id: i64) -> Result<(), AppError> {
    if id <= 0 {
        return Err(AppError::InvalidInput(format!("Invalid {} id: {}", kind, id)));
    }
    Ok(())
}

/// Fetch an image and run the guard against its owner.
pub(crate) async fn load_owned_image(
    images: &dyn ImageRepository,
    actor: &Actor,
    image_id: i64,
) -> Result<Image, AppError> {
    validate_id("image", image_id)?;

    let image = images
        .get_by_id(image_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Image {} not found", image_id)))?;

    ensure_owner(actor, image.owner_id)?;
    Ok(image)
}
