use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

pub const ROLE_WORKER: &str = "worker";
pub const ROLE_EMPLOYER: &str = "employer";
pub const ROLE_ADMIN: &str = "admin";

/// Roles that can be taken at registration. Admin accounts are provisioned
/// out of band.
pub const REGISTRABLE_ROLES: &[&str] = &[ROLE_WORKER, ROLE_EMPLOYER];

pub const USER_STATUSES: &[&str] = &["active", "suspended", "banned"];

pub const MAX_LOGIN_ATTEMPTS: i32 = 5;
pub const LOCK_HOURS: i64 = 2;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub phone: String,
    #[serde(skip_serializing)]
    pub password_hash: Option<String>,
    pub role: String,
    pub is_phone_verified: bool,
    pub status: String,
    pub profile_completed: bool,
    pub last_login: Option<DateTime<Utc>>,
    pub login_attempts: i32,
    pub lock_until: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn is_active(&self) -> bool {
        self.status == "active"
    }

    pub fn is_locked(&self) -> bool {
        self.lock_until.map(|t| t > Utc::now()).unwrap_or(false)
    }
}
