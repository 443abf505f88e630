use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::dto::one_of;
use crate::models::application::{Application, EMPLOYER_SETTABLE_STATUSES};

fn employer_settable_status(v: &str) -> Result<(), ValidationError> {
    one_of(v, EMPLOYER_SETTABLE_STATUSES, "status")
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ApplyPayload {
    pub job_id: Uuid,
    #[validate(length(max = 500))]
    pub cover_letter: Option<String>,
    #[validate(range(min = 200, max = 10_000))]
    pub expected_wage: Option<i32>,
    #[validate(length(min = 1))]
    pub availability: Option<String>,
    pub start_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateStatusPayload {
    #[validate(custom(function = "employer_settable_status"))]
    pub status: String,
    #[validate(length(max = 500))]
    pub notes: Option<String>,
    pub interview_date: Option<DateTime<Utc>>,
    #[validate(length(max = 200))]
    pub interview_location: Option<String>,
    #[validate(length(max = 500))]
    pub rejection_reason: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ApplicationListQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    pub status: Option<String>,
    pub job_id: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationResponse {
    pub id: Uuid,
    pub job_id: Uuid,
    pub worker_id: Uuid,
    pub employer_id: Uuid,
    pub status: String,
    pub cover_letter: Option<String>,
    pub expected_wage: Option<i32>,
    pub availability: String,
    pub start_date: Option<NaiveDate>,
    pub shortlist_date: Option<DateTime<Utc>>,
    pub shortlist_notes: Option<String>,
    pub interview_date: Option<DateTime<Utc>>,
    pub interview_location: Option<String>,
    pub interview_notes: Option<String>,
    pub hire_date: Option<DateTime<Utc>>,
    pub hire_notes: Option<String>,
    pub rejection_reason: Option<String>,
    pub response_time_hours: Option<i32>,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Application> for ApplicationResponse {
    fn from(value: Application) -> Self {
        Self {
            id: value.id,
            job_id: value.job_id,
            worker_id: value.worker_id,
            employer_id: value.employer_id,
            status: value.status,
            cover_letter: value.cover_letter,
            expected_wage: value.expected_wage,
            availability: value.availability,
            start_date: value.start_date,
            shortlist_date: value.shortlist_date,
            shortlist_notes: value.shortlist_notes,
            interview_date: value.interview_date,
            interview_location: value.interview_location,
            interview_notes: value.interview_notes,
            hire_date: value.hire_date,
            hire_notes: value.hire_notes,
            rejection_reason: value.rejection_reason,
            response_time_hours: value.response_time_hours,
            expires_at: value.expires_at,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ApplicationStatusCount {
    pub status: String,
    pub count: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationStatsResponse {
    pub total: i64,
    pub by_status: Vec<ApplicationStatusCount>,
    pub average_response_time_hours: Option<f64>,
    pub recent_applications: Vec<ApplicationResponse>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn withdrawn_is_not_employer_settable() {
        let p = UpdateStatusPayload {
            status: "withdrawn".into(),
            notes: None,
            interview_date: None,
            interview_location: None,
            rejection_reason: None,
        };
        assert!(p.validate().is_err());
    }

    #[test]
    fn shortlist_with_notes_passes() {
        let p = UpdateStatusPayload {
            status: "shortlisted".into(),
            notes: Some("Call after 6pm.".into()),
            interview_date: None,
            interview_location: None,
            rejection_reason: None,
        };
        assert!(p.validate().is_ok());
    }
}
