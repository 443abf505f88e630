use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::upload::Upload;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct MyFilesQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    pub category: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResponse {
    pub id: Uuid,
    pub original_name: String,
    /// Web path the file is served under, not the filesystem location.
    pub url: String,
    pub size_bytes: i64,
    pub mime_type: String,
    pub category: String,
    pub description: Option<String>,
    pub uploaded_at: DateTime<Utc>,
}

impl From<Upload> for UploadResponse {
    fn from(value: Upload) -> Self {
        Self {
            id: value.id,
            original_name: value.original_name,
            url: format!("/uploads/{}", value.filename),
            size_bytes: value.size_bytes,
            mime_type: value.mime_type,
            category: value.category,
            description: value.description,
            uploaded_at: value.uploaded_at,
        }
    }
}
