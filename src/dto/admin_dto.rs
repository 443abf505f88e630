use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::{Validate, ValidationError};

use crate::dto::one_of;
use crate::models::user::USER_STATUSES;

fn user_status(v: &str) -> Result<(), ValidationError> {
    one_of(v, USER_STATUSES, "status")
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UserStatusPayload {
    #[validate(custom(function = "user_status"))]
    pub status: String,
    #[validate(length(max = 500))]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AdminUserQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    pub role: Option<String>,
    pub status: Option<String>,
    /// Matched against the phone column.
    pub search: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AdminWorkerQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    pub city: Option<String>,
    pub status: Option<String>,
    pub verified: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AdminEmployerQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    pub industry: Option<String>,
    pub verified: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AdminJobQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    pub status: Option<String>,
    pub category: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PlatformCounts {
    pub total_users: i64,
    pub total_workers: i64,
    pub total_employers: i64,
    pub total_jobs: i64,
    pub active_jobs: i64,
    pub total_applications: i64,
    pub pending_applications: i64,
    pub hired_applications: i64,
    pub pending_documents: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OverviewResponse {
    pub counts: PlatformCounts,
    pub recent_users: Vec<crate::dto::auth_dto::UserResponse>,
    pub recent_jobs: Vec<crate::dto::job_dto::JobResponse>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_user_status_rejected() {
        let p = UserStatusPayload {
            status: "frozen".into(),
            reason: None,
        };
        assert!(p.validate().is_err());

        let p = UserStatusPayload {
            status: "suspended".into(),
            reason: Some("Repeated fake postings.".into()),
        };
        assert!(p.validate().is_ok());
    }
}
