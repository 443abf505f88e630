use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

pub const DOCUMENT_TYPES: &[&str] = &["identity", "pan", "certification", "address", "other"];
pub const DOCUMENT_STATUSES: &[&str] = &["pending", "verified", "rejected"];
/// Terminal verification outcomes an admin may set.
pub const VERIFICATION_OUTCOMES: &[&str] = &["verified", "rejected"];

/// Worker column that mirrors the verification verdict for a KYC document
/// type. Non-KYC uploads have no mirrored flag.
pub fn kyc_flag_column(document_type: &str) -> Option<&'static str> {
    match document_type {
        "identity" => Some("aadhaar_verified"),
        "pan" => Some("pan_verified"),
        _ => None,
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Document {
    pub id: Uuid,
    pub user_id: Uuid,
    pub filename: String,
    pub original_name: String,
    pub path: String,
    pub size_bytes: i64,
    pub mime_type: String,
    pub document_type: String,
    pub description: Option<String>,
    pub status: String,
    pub verification_notes: Option<String>,
    pub verified_by: Option<Uuid>,
    pub verified_at: Option<DateTime<Utc>>,
    pub uploaded_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kyc_types_map_to_worker_flags() {
        assert_eq!(kyc_flag_column("identity"), Some("aadhaar_verified"));
        assert_eq!(kyc_flag_column("pan"), Some("pan_verified"));
    }

    #[test]
    fn non_kyc_types_have_no_flag() {
        assert_eq!(kyc_flag_column("certification"), None);
        assert_eq!(kyc_flag_column("address"), None);
        assert_eq!(kyc_flag_column("other"), None);
    }

    #[test]
    fn every_kyc_flag_type_is_uploadable() {
        for ty in ["identity", "pan"] {
            assert!(DOCUMENT_TYPES.contains(&ty));
        }
    }
}
