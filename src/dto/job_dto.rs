use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::dto::one_of;
use crate::models::job::{
    Job, BENEFIT_LEVELS, CATEGORIES, EMPLOYER_SETTABLE_STATUSES, PAYMENT_FREQUENCIES, PRIORITIES,
    WORKER_TYPES, WORK_DAYS,
};
use crate::utils::validation::validate_shift_time;

fn validate_category(v: &str) -> Result<(), ValidationError> {
    one_of(v, CATEGORIES, "category")
}

fn validate_worker_type(v: &str) -> Result<(), ValidationError> {
    one_of(v, WORKER_TYPES, "worker_type")
}

fn validate_payment_frequency(v: &str) -> Result<(), ValidationError> {
    one_of(v, PAYMENT_FREQUENCIES, "payment_frequency")
}

fn validate_benefit_level(v: &str) -> Result<(), ValidationError> {
    one_of(v, BENEFIT_LEVELS, "benefit_level")
}

fn validate_priority(v: &str) -> Result<(), ValidationError> {
    one_of(v, PRIORITIES, "priority")
}

fn validate_employer_settable_status(v: &str) -> Result<(), ValidationError> {
    one_of(v, EMPLOYER_SETTABLE_STATUSES, "status")
}

fn validate_work_days(days: &[String]) -> Result<(), ValidationError> {
    if days.is_empty() {
        return Err(ValidationError::new("work_days"));
    }
    for day in days {
        one_of(day, WORK_DAYS, "work_days")?;
    }
    Ok(())
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateJobPayload {
    #[validate(length(min = 5, max = 100))]
    pub title: String,
    #[validate(length(min = 20, max = 1000))]
    pub description: String,
    #[validate(custom(function = "validate_category"))]
    pub category: String,
    #[validate(length(min = 1, max = 15))]
    pub skills: Vec<String>,
    #[validate(custom(function = "validate_worker_type"))]
    pub worker_type: String,
    #[validate(range(min = 0, max = 50))]
    pub min_experience: Option<i32>,
    pub education: Option<String>,
    #[validate(range(min = 18, max = 70))]
    pub age_min: Option<i32>,
    #[validate(range(min = 18, max = 70))]
    pub age_max: Option<i32>,
    #[validate(length(min = 1))]
    pub city: String,
    #[validate(length(min = 1))]
    pub state: String,
    #[validate(length(min = 1))]
    pub work_site: String,
    #[validate(range(min = 200, max = 10_000))]
    pub wage_per_day: i32,
    #[validate(range(min = 0.0))]
    pub overtime_rate: Option<f64>,
    #[validate(custom(function = "validate_payment_frequency"))]
    pub payment_frequency: Option<String>,
    #[validate(range(min = 1, max = 1000))]
    pub headcount: i32,
    #[validate(custom(function = "validate_shift_time"))]
    pub shift_start: String,
    #[validate(custom(function = "validate_shift_time"))]
    pub shift_end: String,
    #[validate(custom(function = "validate_work_days"))]
    pub work_days: Vec<String>,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub is_urgent: Option<bool>,
    #[validate(custom(function = "validate_benefit_level"))]
    pub accommodation: Option<String>,
    #[validate(custom(function = "validate_benefit_level"))]
    pub food: Option<String>,
    #[validate(custom(function = "validate_benefit_level"))]
    pub transport: Option<String>,
    #[validate(custom(function = "validate_priority"))]
    pub priority: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateJobPayload {
    #[validate(length(min = 5, max = 100))]
    pub title: Option<String>,
    #[validate(length(min = 20, max = 1000))]
    pub description: Option<String>,
    #[validate(length(min = 1, max = 15))]
    pub skills: Option<Vec<String>>,
    #[validate(range(min = 0, max = 50))]
    pub min_experience: Option<i32>,
    #[validate(range(min = 200, max = 10_000))]
    pub wage_per_day: Option<i32>,
    #[validate(range(min = 1, max = 1000))]
    pub headcount: Option<i32>,
    #[validate(custom(function = "validate_shift_time"))]
    pub shift_start: Option<String>,
    #[validate(custom(function = "validate_shift_time"))]
    pub shift_end: Option<String>,
    #[validate(custom(function = "validate_work_days"))]
    pub work_days: Option<Vec<String>>,
    pub end_date: Option<NaiveDate>,
    pub is_urgent: Option<bool>,
    #[validate(custom(function = "validate_priority"))]
    pub priority: Option<String>,
    #[validate(custom(function = "validate_employer_settable_status"))]
    pub status: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct JobListQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub category: Option<String>,
    /// Comma separated skill list, any match.
    pub skills: Option<String>,
    pub min_wage: Option<i32>,
    pub max_wage: Option<i32>,
    pub worker_type: Option<String>,
    pub search: Option<String>,
    pub sort_by: Option<String>,
    pub order: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct MyJobsQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    pub status: Option<String>,
}

/// Slice of the posting company shown alongside public jobs.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CompanySummary {
    pub id: Uuid,
    pub company_name: String,
    pub company_type: String,
    pub industry: String,
    pub city: String,
    pub is_verified: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobResponse {
    pub id: Uuid,
    pub employer_id: Uuid,
    pub title: String,
    pub description: String,
    pub category: String,
    pub skills: Vec<String>,
    pub worker_type: String,
    pub min_experience: i32,
    pub education: String,
    pub age_min: i32,
    pub age_max: i32,
    pub city: String,
    pub state: String,
    pub work_site: String,
    pub wage_per_day: i32,
    pub overtime_rate: f64,
    pub payment_frequency: String,
    pub headcount: i32,
    pub shift_start: String,
    pub shift_end: String,
    pub shift_duration_hours: i32,
    pub work_days: Vec<String>,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub is_urgent: bool,
    pub accommodation: String,
    pub food: String,
    pub transport: String,
    pub status: String,
    pub priority: String,
    pub views: i64,
    pub applications_total: i64,
    pub applications_shortlisted: i64,
    pub applications_hired: i64,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<CompanySummary>,
}

impl JobResponse {
    pub fn with_company(job: Job, company: Option<CompanySummary>) -> Self {
        let mut response: Self = job.into();
        response.company = company;
        response
    }
}

impl From<Job> for JobResponse {
    fn from(value: Job) -> Self {
        Self {
            id: value.id,
            employer_id: value.employer_id,
            title: value.title,
            description: value.description,
            category: value.category,
            skills: value.skills,
            worker_type: value.worker_type,
            min_experience: value.min_experience,
            education: value.education,
            age_min: value.age_min,
            age_max: value.age_max,
            city: value.city,
            state: value.state,
            work_site: value.work_site,
            wage_per_day: value.wage_per_day,
            overtime_rate: value.overtime_rate,
            payment_frequency: value.payment_frequency,
            headcount: value.headcount,
            shift_start: value.shift_start,
            shift_end: value.shift_end,
            shift_duration_hours: value.shift_duration_hours,
            work_days: value.work_days,
            start_date: value.start_date,
            end_date: value.end_date,
            is_urgent: value.is_urgent,
            accommodation: value.accommodation,
            food: value.food,
            transport: value.transport,
            status: value.status,
            priority: value.priority,
            views: value.views,
            applications_total: value.applications_total,
            applications_shortlisted: value.applications_shortlisted,
            applications_hired: value.applications_hired,
            expires_at: value.expires_at,
            created_at: value.created_at,
            updated_at: value.updated_at,
            company: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct StatusCount {
    pub status: String,
    pub count: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobStatsResponse {
    pub total_jobs: i64,
    pub by_status: Vec<StatusCount>,
    pub total_views: i64,
    pub total_applications: i64,
    pub total_hired: i64,
    pub recent_jobs: Vec<JobResponse>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_payload() -> CreateJobPayload {
        CreateJobPayload {
            title: "Masons for residential site".into(),
            description: "Need experienced masons for a six month residential project.".into(),
            category: "construction".into(),
            skills: vec!["masonry".into()],
            worker_type: "skilled".into(),
            min_experience: Some(2),
            education: None,
            age_min: None,
            age_max: None,
            city: "Pune".into(),
            state: "Maharashtra".into(),
            work_site: "Baner".into(),
            wage_per_day: 800,
            overtime_rate: None,
            payment_frequency: Some("weekly".into()),
            headcount: 12,
            shift_start: "08:00".into(),
            shift_end: "17:00".into(),
            work_days: vec!["monday".into(), "tuesday".into()],
            start_date: NaiveDate::from_ymd_opt(2026, 9, 15).unwrap(),
            end_date: None,
            is_urgent: None,
            accommodation: Some("provided".into()),
            food: None,
            transport: None,
            priority: None,
            expires_at: None,
        }
    }

    #[test]
    fn valid_payload_passes() {
        assert!(sample_payload().validate().is_ok());
    }

    #[test]
    fn wage_outside_band_rejected() {
        let mut p = sample_payload();
        p.wage_per_day = 150;
        assert!(p.validate().is_err());
        p.wage_per_day = 12_000;
        assert!(p.validate().is_err());
    }

    #[test]
    fn unknown_work_day_rejected() {
        let mut p = sample_payload();
        p.work_days = vec!["funday".into()];
        assert!(p.validate().is_err());
    }

    #[test]
    fn update_cannot_set_platform_status() {
        let p = UpdateJobPayload {
            title: None,
            description: None,
            skills: None,
            min_experience: None,
            wage_per_day: None,
            headcount: None,
            shift_start: None,
            shift_end: None,
            work_days: None,
            end_date: None,
            is_urgent: None,
            priority: None,
            status: Some("expired".into()),
            expires_at: None,
        };
        assert!(p.validate().is_err());
    }
}
