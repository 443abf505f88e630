use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::dto::one_of;
use crate::models::user::{User, REGISTRABLE_ROLES};
use crate::utils::validation::validate_indian_mobile;

fn registrable_role(role: &str) -> Result<(), ValidationError> {
    one_of(role, REGISTRABLE_ROLES, "role")
}

fn six_digit_otp(otp: &str) -> Result<(), ValidationError> {
    if otp.len() == 6 && otp.chars().all(|c| c.is_ascii_digit()) {
        Ok(())
    } else {
        Err(ValidationError::new("otp"))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SendOtpPayload {
    #[validate(custom(function = "validate_indian_mobile"))]
    pub phone: String,
    #[validate(custom(function = "registrable_role"))]
    pub role: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct VerifyOtpPayload {
    #[validate(custom(function = "validate_indian_mobile"))]
    pub phone: String,
    #[validate(custom(function = "six_digit_otp"))]
    pub otp: String,
    #[validate(custom(function = "registrable_role"))]
    pub role: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginPayload {
    #[validate(custom(function = "validate_indian_mobile"))]
    pub phone: String,
    #[validate(length(min = 6))]
    pub password: String,
    #[validate(custom(function = "registrable_role"))]
    pub role: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SetPasswordPayload {
    #[validate(length(min = 6))]
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ChangePasswordPayload {
    #[validate(length(min = 1))]
    pub current_password: String,
    #[validate(length(min = 6))]
    pub new_password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RefreshTokenPayload {
    #[validate(length(min = 1))]
    pub refresh_token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: uuid::Uuid,
    pub phone: String,
    pub role: String,
    pub is_phone_verified: bool,
    pub status: String,
    pub profile_completed: bool,
    pub last_login: Option<chrono::DateTime<chrono::Utc>>,
}

impl From<User> for UserResponse {
    fn from(value: User) -> Self {
        Self {
            id: value.id,
            phone: value.phone,
            role: value.role,
            is_phone_verified: value.is_phone_verified,
            status: value.status,
            profile_completed: value.profile_completed,
            last_login: value.last_login,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendOtpResponse {
    pub message: String,
    pub phone: String,
    pub role: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub message: String,
    pub token: String,
    pub refresh_token: String,
    pub user: UserResponse,
    pub is_new_user: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshResponse {
    pub token: String,
    pub user: UserResponse,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeResponse {
    pub user: UserResponse,
    /// Role-matched Worker or Employer profile, absent until one is created.
    pub profile: Option<serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn otp_payload_rejects_bad_phone_and_role() {
        let bad_phone = SendOtpPayload {
            phone: "12345".into(),
            role: "worker".into(),
        };
        assert!(bad_phone.validate().is_err());

        let bad_role = SendOtpPayload {
            phone: "9876543210".into(),
            role: "admin".into(),
        };
        assert!(bad_role.validate().is_err());

        let ok = SendOtpPayload {
            phone: "9876543210".into(),
            role: "employer".into(),
        };
        assert!(ok.validate().is_ok());
    }

    #[test]
    fn otp_code_must_be_six_digits() {
        let payload = VerifyOtpPayload {
            phone: "9876543210".into(),
            otp: "12345".into(),
            role: "worker".into(),
        };
        assert!(payload.validate().is_err());

        let payload = VerifyOtpPayload {
            phone: "9876543210".into(),
            otp: "123456".into(),
            role: "worker".into(),
        };
        assert!(payload.validate().is_ok());
    }
}
