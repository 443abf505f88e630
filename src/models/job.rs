use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

pub const CATEGORIES: &[&str] = &[
    "construction",
    "manufacturing",
    "logistics",
    "agriculture",
    "retail",
    "hospitality",
    "other",
];
pub const WORKER_TYPES: &[&str] = &["skilled", "semi-skilled", "unskilled", "supervisor", "foreman"];
pub const JOB_STATUSES: &[&str] = &["active", "paused", "closed", "expired", "under_review"];
/// Statuses an employer may set directly; `expired`/`under_review` are
/// platform-driven.
pub const EMPLOYER_SETTABLE_STATUSES: &[&str] = &["active", "paused", "closed"];
pub const PRIORITIES: &[&str] = &["low", "normal", "high", "urgent"];
pub const PAYMENT_FREQUENCIES: &[&str] = &["daily", "weekly", "monthly"];
pub const BENEFIT_LEVELS: &[&str] = &["none", "provided", "subsidy"];
pub const WORK_DAYS: &[&str] = &[
    "monday",
    "tuesday",
    "wednesday",
    "thursday",
    "friday",
    "saturday",
    "sunday",
];
pub const SORTABLE_FIELDS: &[&str] = &["created_at", "wage_per_day", "start_date", "priority"];

pub const MIN_WAGE_PER_DAY: i32 = 200;
pub const MAX_WAGE_PER_DAY: i32 = 10_000;
/// Default listing lifetime when the employer gives no expiry: 30 days past
/// the start date.
pub const DEFAULT_EXPIRY_DAYS: i64 = 30;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Job {
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
    pub is_public: bool,
    pub priority: String,
    pub views: i64,
    pub applications_total: i64,
    pub applications_shortlisted: i64,
    pub applications_hired: i64,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Job {
    pub fn is_expired(&self) -> bool {
        self.expires_at < Utc::now()
    }

    /// Whether the posting shows up in the public marketplace. Expired rows
    /// stay in storage and are filtered out here and in listing queries.
    pub fn is_publicly_visible(&self) -> bool {
        self.status == "active" && self.is_public && !self.is_expired()
    }
}
