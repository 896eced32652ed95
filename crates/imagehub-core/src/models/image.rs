use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Owned image asset. `owner_id` never changes after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Image {
    pub id: i64,
    pub file_name: String,
    /// Storage key of the original file
    pub file_path: String,
    /// Storage key of the derived JPEG thumbnail
    pub thumbnail_path: String,
    pub description: String,
    pub upload_date: DateTime<Utc>,
    pub owner_id: i64,
}

/// Image row to insert; the identifier is generated by the store.
#[derive(Debug, Clone)]
pub struct NewImage {
    pub file_name: String,
    pub file_path: String,
    pub thumbnail_path: String,
    pub description: String,
    pub upload_date: DateTime<Utc>,
    pub owner_id: i64,
}
