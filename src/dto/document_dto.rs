use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::dto::one_of;
use crate::models::document::{Document, VERIFICATION_OUTCOMES};

fn verification_outcome(v: &str) -> Result<(), ValidationError> {
    one_of(v, VERIFICATION_OUTCOMES, "status")
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateDocumentPayload {
    #[validate(length(max = 300))]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct VerifyDocumentPayload {
    #[validate(custom(function = "verification_outcome"))]
    pub status: String,
    #[validate(length(max = 500))]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub original_name: String,
    pub size_bytes: i64,
    pub mime_type: String,
    pub document_type: String,
    pub description: Option<String>,
    pub status: String,
    pub verification_notes: Option<String>,
    pub verified_at: Option<DateTime<Utc>>,
    pub uploaded_at: DateTime<Utc>,
}

impl From<Document> for DocumentResponse {
    fn from(value: Document) -> Self {
        Self {
            id: value.id,
            user_id: value.user_id,
            original_name: value.original_name,
            size_bytes: value.size_bytes,
            mime_type: value.mime_type,
            document_type: value.document_type,
            description: value.description,
            status: value.status,
            verification_notes: value.verification_notes,
            verified_at: value.verified_at,
            uploaded_at: value.uploaded_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DocumentStatusCount {
    pub status: String,
    pub count: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DocumentTypeCount {
    pub document_type: String,
    pub count: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentStatsResponse {
    pub total: i64,
    pub by_status: Vec<DocumentStatusCount>,
    pub by_type: Vec<DocumentTypeCount>,
    pub recent_uploads: Vec<DocumentResponse>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pending_is_not_a_verification_outcome() {
        let p = VerifyDocumentPayload {
            status: "pending".into(),
            notes: None,
        };
        assert!(p.validate().is_err());
    }
}
