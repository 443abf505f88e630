use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

pub const COMPANY_TYPES: &[&str] = &[
    "construction",
    "manufacturing",
    "logistics",
    "agriculture",
    "retail",
    "hospitality",
    "other",
];
pub const COMPANY_SIZES: &[&str] = &["small", "medium", "large", "enterprise"];
pub const SUBSCRIPTION_PLANS: &[&str] = &["free", "basic", "premium"];

/// Completion an employer must reach before posting jobs.
pub const MIN_COMPLETION_TO_POST: i32 = 80;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Employer {
    pub id: Uuid,
    pub user_id: Uuid,
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
    pub gst_number: Option<String>,
    pub pan_number: Option<String>,
    pub year_established: Option<i32>,
    pub employee_count: Option<i32>,
    pub average_rating: f64,
    pub total_ratings: i64,
    pub is_verified: bool,
    pub subscription_plan: String,
    pub profile_completion: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Employer {
    /// Percentage over ten declared fields, 10 points each.
    pub fn completion(&self) -> i32 {
        let some_filled = |v: &Option<String>| v.as_deref().map(|s| !s.trim().is_empty()) == Some(true);
        let filled = [
            !self.company_name.trim().is_empty(),
            !self.company_type.trim().is_empty(),
            !self.industry.trim().is_empty(),
            some_filled(&self.contact_name),
            some_filled(&self.contact_designation),
            some_filled(&self.contact_phone),
            some_filled(&self.contact_email),
            !self.city.trim().is_empty(),
            !self.state.trim().is_empty(),
            some_filled(&self.pincode),
        ]
        .iter()
        .filter(|&&f| f)
        .count() as i32;

        (filled * 10).min(100)
    }

    pub fn can_post_jobs(&self) -> bool {
        self.profile_completion >= MIN_COMPLETION_TO_POST
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn employer_with_basics() -> Employer {
        Employer {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            company_name: "Sharma Constructions".into(),
            company_type: "construction".into(),
            company_size: "small".into(),
            industry: "Civil works".into(),
            description: None,
            logo: None,
            website: None,
            contact_name: None,
            contact_designation: None,
            contact_phone: None,
            contact_email: None,
            city: "Nagpur".into(),
            state: "Maharashtra".into(),
            pincode: None,
            gst_number: None,
            pan_number: None,
            year_established: None,
            employee_count: None,
            average_rating: 0.0,
            total_ratings: 0,
            is_verified: false,
            subscription_plan: "free".into(),
            profile_completion: 0,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn incomplete_profile_cannot_post() {
        let mut e = employer_with_basics();
        assert_eq!(e.completion(), 50);
        e.profile_completion = e.completion();
        assert!(!e.can_post_jobs());
    }

    #[test]
    fn contact_details_unlock_posting() {
        let mut e = employer_with_basics();
        e.contact_name = Some("S. Sharma".into());
        e.contact_designation = Some("Owner".into());
        e.contact_phone = Some("9812345670".into());
        e.contact_email = Some("owner@sharma.example".into());
        assert_eq!(e.completion(), 90);
        e.profile_completion = e.completion();
        assert!(e.can_post_jobs());
    }
}
