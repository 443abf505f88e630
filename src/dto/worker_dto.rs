use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::dto::one_of;
use crate::models::worker::{Worker, AVAILABILITIES, EDUCATION_LEVELS, GENDERS, WORKER_STATUSES};
use crate::utils::validation::{validate_aadhaar, validate_pincode};

fn validate_gender(v: &str) -> Result<(), ValidationError> {
    one_of(v, GENDERS, "gender")
}

fn validate_education(v: &str) -> Result<(), ValidationError> {
    one_of(v, EDUCATION_LEVELS, "education")
}

fn validate_availability(v: &str) -> Result<(), ValidationError> {
    one_of(v, AVAILABILITIES, "availability")
}

fn validate_worker_status(v: &str) -> Result<(), ValidationError> {
    one_of(v, WORKER_STATUSES, "status")
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpsertWorkerPayload {
    #[validate(length(min = 1, max = 50))]
    pub first_name: String,
    #[validate(length(max = 50))]
    pub last_name: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    #[validate(custom(function = "validate_gender"))]
    pub gender: Option<String>,
    #[validate(length(min = 1))]
    pub city: String,
    #[validate(length(min = 1))]
    pub state: String,
    #[validate(custom(function = "validate_pincode"))]
    pub pincode: Option<String>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub languages: Vec<String>,
    #[validate(range(min = 0, max = 50))]
    pub total_experience: i32,
    #[validate(custom(function = "validate_education"))]
    pub education: Option<String>,
    #[validate(range(min = 200, max = 5000))]
    pub min_wage_per_day: Option<i32>,
    #[validate(range(min = 200, max = 10000))]
    pub max_wage_per_day: Option<i32>,
    #[validate(custom(function = "validate_availability"))]
    pub availability: Option<String>,
    #[serde(default)]
    pub preferred_cities: Vec<String>,
    #[validate(range(min = 5, max = 100))]
    pub work_radius_km: Option<i32>,
    #[validate(custom(function = "validate_aadhaar"))]
    pub aadhaar_number: Option<String>,
    pub pan_number: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateWorkerPayload {
    #[validate(length(min = 1, max = 50))]
    pub first_name: Option<String>,
    #[validate(length(max = 50))]
    pub last_name: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    #[validate(custom(function = "validate_gender"))]
    pub gender: Option<String>,
    #[validate(length(min = 1))]
    pub city: Option<String>,
    #[validate(length(min = 1))]
    pub state: Option<String>,
    #[validate(custom(function = "validate_pincode"))]
    pub pincode: Option<String>,
    pub skills: Option<Vec<String>>,
    pub languages: Option<Vec<String>>,
    #[validate(range(min = 0, max = 50))]
    pub total_experience: Option<i32>,
    #[validate(custom(function = "validate_education"))]
    pub education: Option<String>,
    #[validate(range(min = 200, max = 5000))]
    pub min_wage_per_day: Option<i32>,
    #[validate(range(min = 200, max = 10000))]
    pub max_wage_per_day: Option<i32>,
    #[validate(custom(function = "validate_availability"))]
    pub availability: Option<String>,
    pub preferred_cities: Option<Vec<String>>,
    #[validate(range(min = 5, max = 100))]
    pub work_radius_km: Option<i32>,
    #[validate(custom(function = "validate_aadhaar"))]
    pub aadhaar_number: Option<String>,
    pub pan_number: Option<String>,
    #[validate(custom(function = "validate_worker_status"))]
    pub status: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AvailabilityPayload {
    #[validate(custom(function = "validate_availability"))]
    pub availability: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct WorkerListQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    pub skill: Option<String>,
    pub city: Option<String>,
    pub min_experience: Option<i32>,
    pub availability: Option<String>,
    pub verified: Option<bool>,
}

/// Public view of a worker. KYC numbers never leave the server; only the
/// verification flags do.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerResponse {
    pub id: uuid::Uuid,
    pub user_id: uuid::Uuid,
    pub first_name: String,
    pub last_name: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<String>,
    pub profile_picture: Option<String>,
    pub city: String,
    pub state: String,
    pub pincode: Option<String>,
    pub skills: Vec<String>,
    pub languages: Vec<String>,
    pub total_experience: i32,
    pub education: String,
    pub min_wage_per_day: Option<i32>,
    pub max_wage_per_day: Option<i32>,
    pub availability: String,
    pub preferred_cities: Vec<String>,
    pub work_radius_km: i32,
    pub aadhaar_verified: bool,
    pub pan_verified: bool,
    pub average_rating: f64,
    pub total_ratings: i64,
    pub status: String,
    pub profile_completion: i32,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl From<Worker> for WorkerResponse {
    fn from(value: Worker) -> Self {
        Self {
            id: value.id,
            user_id: value.user_id,
            first_name: value.first_name,
            last_name: value.last_name,
            date_of_birth: value.date_of_birth,
            gender: value.gender,
            profile_picture: value.profile_picture,
            city: value.city,
            state: value.state,
            pincode: value.pincode,
            skills: value.skills,
            languages: value.languages,
            total_experience: value.total_experience,
            education: value.education,
            min_wage_per_day: value.min_wage_per_day,
            max_wage_per_day: value.max_wage_per_day,
            availability: value.availability,
            preferred_cities: value.preferred_cities,
            work_radius_km: value.work_radius_km,
            aadhaar_verified: value.aadhaar_verified,
            pan_verified: value.pan_verified,
            average_rating: value.average_rating,
            total_ratings: value.total_ratings,
            status: value.status,
            profile_completion: value.profile_completion,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

/// One past engagement in a worker's history, derived from hired
/// applications.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct JobHistoryItem {
    pub job_id: uuid::Uuid,
    pub title: String,
    pub company_name: String,
    pub wage_per_day: i32,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub hire_date: Option<chrono::DateTime<chrono::Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_payload() -> UpsertWorkerPayload {
        UpsertWorkerPayload {
            first_name: "Ramesh".into(),
            last_name: Some("Kumar".into()),
            date_of_birth: None,
            gender: Some("male".into()),
            city: "Nagpur".into(),
            state: "Maharashtra".into(),
            pincode: Some("440001".into()),
            skills: vec!["plumbing".into()],
            languages: vec!["hindi".into()],
            total_experience: 4,
            education: Some("secondary".into()),
            min_wage_per_day: Some(500),
            max_wage_per_day: Some(900),
            availability: Some("immediate".into()),
            preferred_cities: vec![],
            work_radius_km: Some(25),
            aadhaar_number: None,
            pan_number: None,
        }
    }

    #[test]
    fn valid_payload_passes() {
        assert!(sample_payload().validate().is_ok());
    }

    #[test]
    fn unknown_gender_rejected() {
        let mut p = sample_payload();
        p.gender = Some("unknown".into());
        assert!(p.validate().is_err());
    }

    #[test]
    fn unknown_education_rejected() {
        let mut p = sample_payload();
        p.education = Some("phd_in_everything".into());
        assert!(p.validate().is_err());
    }

    #[test]
    fn availability_payload_checks_value() {
        let p = AvailabilityPayload {
            availability: "immediate".into(),
        };
        assert!(p.validate().is_ok());
        let p = AvailabilityPayload {
            availability: "someday".into(),
        };
        assert!(p.validate().is_err());
    }

    #[test]
    fn update_rejects_unknown_status() {
        let p = UpdateWorkerPayload {
            first_name: None,
            last_name: None,
            date_of_birth: None,
            gender: None,
            city: None,
            state: None,
            pincode: None,
            skills: None,
            languages: None,
            total_experience: None,
            education: None,
            min_wage_per_day: None,
            max_wage_per_day: None,
            availability: None,
            preferred_cities: None,
            work_radius_km: None,
            aadhaar_number: None,
            pan_number: None,
            status: Some("vanished".into()),
        };
        assert!(p.validate().is_err());
    }
}
