use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

pub const APPLICATION_STATUSES: &[&str] = &[
    "applied",
    "viewed",
    "shortlisted",
    "interviewed",
    "hired",
    "rejected",
    "withdrawn",
];

/// Statuses an employer may move an application to. Withdrawal belongs to the
/// worker's own endpoint.
pub const EMPLOYER_SETTABLE_STATUSES: &[&str] =
    &["viewed", "shortlisted", "interviewed", "hired", "rejected"];

/// A worker can withdraw while the employer has not decided yet.
pub const WITHDRAWABLE_FROM: &[&str] = &["applied", "viewed", "shortlisted"];

/// Application rows expire seven days after creation unless decided sooner.
pub const EXPIRY_DAYS: i64 = 7;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Application {
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
    pub view_count: i64,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Application {
    pub fn is_expired(&self) -> bool {
        self.expires_at < Utc::now()
    }

    /// Age of the application in whole hours, rounded up.
    pub fn age_hours(&self) -> i64 {
        let secs = (Utc::now() - self.created_at).num_seconds().max(0);
        (secs + 3599) / 3600
    }
}

/// Forward-only status machine. The hiring funnel can skip stages (an
/// employer may shortlist without marking viewed, or reject at any point)
/// but never runs backwards, and the three terminal states stay terminal.
pub fn can_transition(from: &str, to: &str) -> bool {
    matches!(
        (from, to),
        ("applied", "viewed")
            | ("applied", "shortlisted")
            | ("applied", "rejected")
            | ("applied", "withdrawn")
            | ("viewed", "shortlisted")
            | ("viewed", "rejected")
            | ("viewed", "withdrawn")
            | ("shortlisted", "interviewed")
            | ("shortlisted", "hired")
            | ("shortlisted", "rejected")
            | ("shortlisted", "withdrawn")
            | ("interviewed", "hired")
            | ("interviewed", "rejected")
            | ("interviewed", "withdrawn")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn funnel_moves_forward() {
        assert!(can_transition("applied", "viewed"));
        assert!(can_transition("applied", "shortlisted"));
        assert!(can_transition("viewed", "shortlisted"));
        assert!(can_transition("shortlisted", "interviewed"));
        assert!(can_transition("shortlisted", "hired"));
        assert!(can_transition("interviewed", "hired"));
        assert!(can_transition("interviewed", "rejected"));
    }

    #[test]
    fn funnel_never_runs_backwards() {
        assert!(!can_transition("viewed", "applied"));
        assert!(!can_transition("shortlisted", "viewed"));
        assert!(!can_transition("hired", "shortlisted"));
        assert!(!can_transition("rejected", "shortlisted"));
        assert!(!can_transition("rejected", "hired"));
    }

    #[test]
    fn terminal_states_are_terminal() {
        for terminal in ["hired", "rejected", "withdrawn"] {
            for to in APPLICATION_STATUSES {
                assert!(!can_transition(terminal, to), "{} -> {}", terminal, to);
            }
        }
    }

    #[test]
    fn cannot_interview_before_shortlist() {
        assert!(!can_transition("applied", "interviewed"));
        assert!(!can_transition("viewed", "interviewed"));
        assert!(!can_transition("applied", "hired"));
        assert!(!can_transition("viewed", "hired"));
    }
}
