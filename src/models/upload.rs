use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

pub const CATEGORIES: &[&str] = &["general", "profile-picture", "company-logo"];

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Upload {
    pub id: Uuid,
    pub user_id: Uuid,
    pub filename: String,
    pub original_name: String,
    pub path: String,
    pub size_bytes: i64,
    pub mime_type: String,
    pub category: String,
    pub description: Option<String>,
    pub uploaded_at: DateTime<Utc>,
}
