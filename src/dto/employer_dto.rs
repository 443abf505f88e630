use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::dto::one_of;
use crate::models::employer::{Employer, COMPANY_SIZES, COMPANY_TYPES};
use crate::utils::validation::{validate_indian_mobile, validate_pincode};

fn validate_company_type(v: &str) -> Result<(), ValidationError> {
    one_of(v, COMPANY_TYPES, "company_type")
}

fn validate_company_size(v: &str) -> Result<(), ValidationError> {
    one_of(v, COMPANY_SIZES, "company_size")
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpsertEmployerPayload {
    #[validate(length(min = 1, max = 100))]
    pub company_name: String,
    #[validate(custom(function = "validate_company_type"))]
    pub company_type: String,
    #[validate(custom(function = "validate_company_size"))]
    pub company_size: Option<String>,
    #[validate(length(min = 1))]
    pub industry: String,
    #[validate(length(max = 500))]
    pub description: Option<String>,
    #[validate(url)]
    pub website: Option<String>,
    #[validate(length(min = 1))]
    pub contact_name: Option<String>,
    #[validate(length(min = 1))]
    pub contact_designation: Option<String>,
    #[validate(custom(function = "validate_indian_mobile"))]
    pub contact_phone: Option<String>,
    #[validate(email)]
    pub contact_email: Option<String>,
    #[validate(length(min = 1))]
    pub city: String,
    #[validate(length(min = 1))]
    pub state: String,
    #[validate(custom(function = "validate_pincode"))]
    pub pincode: Option<String>,
    pub gst_number: Option<String>,
    pub pan_number: Option<String>,
    #[validate(range(min = 1900, max = 2100))]
    pub year_established: Option<i32>,
    #[validate(range(min = 1))]
    pub employee_count: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateEmployerPayload {
    #[validate(length(min = 1, max = 100))]
    pub company_name: Option<String>,
    #[validate(custom(function = "validate_company_type"))]
    pub company_type: Option<String>,
    #[validate(custom(function = "validate_company_size"))]
    pub company_size: Option<String>,
    #[validate(length(min = 1))]
    pub industry: Option<String>,
    #[validate(length(max = 500))]
    pub description: Option<String>,
    #[validate(url)]
    pub website: Option<String>,
    #[validate(length(min = 1))]
    pub contact_name: Option<String>,
    #[validate(length(min = 1))]
    pub contact_designation: Option<String>,
    #[validate(custom(function = "validate_indian_mobile"))]
    pub contact_phone: Option<String>,
    #[validate(email)]
    pub contact_email: Option<String>,
    #[validate(length(min = 1))]
    pub city: Option<String>,
    #[validate(length(min = 1))]
    pub state: Option<String>,
    #[validate(custom(function = "validate_pincode"))]
    pub pincode: Option<String>,
    pub gst_number: Option<String>,
    pub pan_number: Option<String>,
    #[validate(range(min = 1900, max = 2100))]
    pub year_established: Option<i32>,
    #[validate(range(min = 1))]
    pub employee_count: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct EmployerListQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    pub industry: Option<String>,
    pub city: Option<String>,
    pub verified: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmployerResponse {
    pub id: uuid::Uuid,
    pub user_id: uuid::Uuid,
    pub company_name: String,
    pub company_type: String,
    pub company_size: String,
    pub industry: String,
    pub description: Option<String>,
    pub logo: Option<String>,
    pub website: Option<String>,
    pub contact_name: Option<String>,
    pub contact_designation: Option<String>,
    pub contact_phone: Option<String>,
    pub contact_email: Option<String>,
    pub city: String,
    pub state: String,
    pub pincode: Option<String>,
    pub year_established: Option<i32>,
    pub employee_count: Option<i32>,
    pub average_rating: f64,
    pub total_ratings: i64,
    pub is_verified: bool,
    pub subscription_plan: String,
    pub profile_completion: i32,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl From<Employer> for EmployerResponse {
    fn from(value: Employer) -> Self {
        Self {
            id: value.id,
            user_id: value.user_id,
            company_name: value.company_name,
            company_type: value.company_type,
            company_size: value.company_size,
            industry: value.industry,
            description: value.description,
            logo: value.logo,
            website: value.website,
            contact_name: value.contact_name,
            contact_designation: value.contact_designation,
            contact_phone: value.contact_phone,
            contact_email: value.contact_email,
            city: value.city,
            state: value.state,
            pincode: value.pincode,
            year_established: value.year_established,
            employee_count: value.employee_count,
            average_rating: value.average_rating,
            total_ratings: value.total_ratings,
            is_verified: value.is_verified,
            subscription_plan: value.subscription_plan,
            profile_completion: value.profile_completion,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_payload() -> UpsertEmployerPayload {
        UpsertEmployerPayload {
            company_name: "Shree Constructions".into(),
            company_type: "construction".into(),
            company_size: Some("medium".into()),
            industry: "construction".into(),
            description: None,
            website: None,
            contact_name: Some("Suresh Patil".into()),
            contact_designation: None,
            contact_phone: Some("9876543210".into()),
            contact_email: None,
            city: "Pune".into(),
            state: "Maharashtra".into(),
            pincode: Some("411045".into()),
            gst_number: None,
            pan_number: None,
            year_established: Some(2015),
            employee_count: Some(40),
        }
    }

    #[test]
    fn valid_payload_passes() {
        assert!(sample_payload().validate().is_ok());
    }

    #[test]
    fn unknown_company_type_rejected() {
        let mut p = sample_payload();
        p.company_type = "crypto".into();
        assert!(p.validate().is_err());
    }

    #[test]
    fn unknown_company_size_rejected() {
        let mut p = sample_payload();
        p.company_size = Some("gigantic".into());
        assert!(p.validate().is_err());
    }

    #[test]
    fn contact_phone_must_be_indian_mobile() {
        let mut p = sample_payload();
        p.contact_phone = Some("12345".into());
        assert!(p.validate().is_err());
    }
}
