use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

pub const GENDERS: &[&str] = &["male", "female", "other"];
pub const EDUCATION_LEVELS: &[&str] = &[
    "illiterate",
    "primary",
    "secondary",
    "higher_secondary",
    "diploma",
    "degree",
];
pub const AVAILABILITIES: &[&str] = &["immediate", "next_week", "next_month", "flexible"];
pub const WORKER_STATUSES: &[&str] = &["available", "busy", "unavailable", "suspended"];

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Worker {
    pub id: Uuid,
    pub user_id: Uuid,
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
    pub aadhaar_number: Option<String>,
    pub aadhaar_verified: bool,
    pub pan_number: Option<String>,
    pub pan_verified: bool,
    pub average_rating: f64,
    pub total_ratings: i64,
    pub status: String,
    pub profile_completion: i32,
    pub last_active: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Worker {
    /// Percentage over eight declared fields, 12.5 points each. Empty strings
    /// and zero values count as missing, matching what the profile form treats
    /// as unfilled.
    pub fn completion(&self) -> i32 {
        let filled = [
            !self.first_name.trim().is_empty(),
            self.last_name.as_deref().map(|s| !s.trim().is_empty()) == Some(true),
            self.date_of_birth.is_some(),
            !self.city.trim().is_empty(),
            !self.state.trim().is_empty(),
            self.pincode.as_deref().map(|s| !s.trim().is_empty()) == Some(true),
            self.total_experience > 0,
            self.min_wage_per_day.map(|w| w > 0) == Some(true),
        ]
        .iter()
        .filter(|&&f| f)
        .count() as f64;

        (filled * 12.5).min(100.0) as i32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blank_worker() -> Worker {
        Worker {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            first_name: String::new(),
            last_name: None,
            date_of_birth: None,
            gender: None,
            profile_picture: None,
            city: String::new(),
            state: String::new(),
            pincode: None,
            skills: vec![],
            languages: vec![],
            total_experience: 0,
            education: "secondary".into(),
            min_wage_per_day: None,
            max_wage_per_day: None,
            availability: "immediate".into(),
            preferred_cities: vec![],
            work_radius_km: 25,
            aadhaar_number: None,
            aadhaar_verified: false,
            pan_number: None,
            pan_verified: false,
            average_rating: 0.0,
            total_ratings: 0,
            status: "available".into(),
            profile_completion: 0,
            last_active: Utc::now(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn completion_is_zero_for_blank_profile() {
        assert_eq!(blank_worker().completion(), 0);
    }

    #[test]
    fn completion_is_deterministic_over_declared_fields() {
        let mut w = blank_worker();
        w.first_name = "Ravi".into();
        w.city = "Pune".into();
        w.state = "Maharashtra".into();
        w.total_experience = 4;
        assert_eq!(w.completion(), 50);

        w.last_name = Some("Kumar".into());
        w.date_of_birth = Some(NaiveDate::from_ymd_opt(1990, 5, 1).unwrap());
        w.pincode = Some("411001".into());
        w.min_wage_per_day = Some(600);
        assert_eq!(w.completion(), 100);
    }

    #[test]
    fn whitespace_fields_do_not_count() {
        let mut w = blank_worker();
        w.first_name = "  ".into();
        w.pincode = Some("".into());
        assert_eq!(w.completion(), 0);
    }
}
