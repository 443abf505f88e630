use chrono::{DateTime, Duration, Utc};
use sqlx::PgPool;

use crate::error::{Error, Result};
use crate::utils::otp::{codes_match, generate_code};

/// One-time codes live in their own table, keyed by phone, so every server
/// instance sees the same pending code.
#[derive(Clone)]
pub struct OtpService {
    pool: PgPool,
}

const MAX_ATTEMPTS: i32 = 3;

#[derive(Debug, sqlx::FromRow)]
struct OtpRow {
    code: String,
    role: String,
    attempts: i32,
    expires_at: DateTime<Utc>,
}

/// What a submitted code does to the pending row.
#[derive(Debug, PartialEq, Eq)]
enum Outcome {
    Accept,
    Expired,
    RoleMismatch,
    Retry(i32),
    Exhausted,
}

fn evaluate(row: &OtpRow, submitted: &str, role: &str, now: DateTime<Utc>) -> Outcome {
    if row.expires_at < now {
        return Outcome::Expired;
    }
    if row.role != role {
        return Outcome::RoleMismatch;
    }
    if !codes_match(&row.code, submitted) {
        let attempts = row.attempts + 1;
        if attempts >= MAX_ATTEMPTS {
            return Outcome::Exhausted;
        }
        return Outcome::Retry(attempts);
    }
    Outcome::Accept
}

impl OtpService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Issues a fresh code for the phone, replacing any pending one.
    pub async fn issue(&self, phone: &str, role: &str) -> Result<String> {
        let config = crate::config::get_config();
        let code = generate_code();
        let expires_at = Utc::now() + Duration::minutes(config.otp_ttl_minutes);

        sqlx::query(
            r#"
            INSERT INTO otp_codes (phone, code, role, attempts, expires_at)
            VALUES ($1, $2, $3, 0, $4)
            ON CONFLICT (phone)
            DO UPDATE SET code = $2, role = $3, attempts = 0, expires_at = $4
            "#,
        )
        .bind(phone)
        .bind(&code)
        .bind(role)
        .bind(expires_at)
        .execute(&self.pool)
        .await?;

        Ok(code)
    }

    /// Checks a submitted code. The pending row is removed on success, on
    /// expiry and once the attempt cap is reached, so a code can never be
    /// brute-forced or replayed.
    pub async fn verify(&self, phone: &str, code: &str, role: &str) -> Result<()> {
        let row = sqlx::query_as::<_, OtpRow>(
            "SELECT code, role, attempts, expires_at FROM otp_codes WHERE phone = $1",
        )
        .bind(phone)
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Err(Error::BadRequest("OTP expired or not found".to_string()));
        };

        match evaluate(&row, code, role, Utc::now()) {
            Outcome::Accept => {
                self.discard(phone).await?;
                Ok(())
            }
            Outcome::Expired => {
                self.discard(phone).await?;
                Err(Error::BadRequest("OTP expired".to_string()))
            }
            Outcome::RoleMismatch => Err(Error::BadRequest("Role mismatch".to_string())),
            Outcome::Exhausted => {
                self.discard(phone).await?;
                Err(Error::BadRequest(
                    "Too many failed attempts. Please request new OTP.".to_string(),
                ))
            }
            Outcome::Retry(attempts) => {
                sqlx::query("UPDATE otp_codes SET attempts = $2 WHERE phone = $1")
                    .bind(phone)
                    .bind(attempts)
                    .execute(&self.pool)
                    .await?;
                Err(Error::BadRequest("Invalid OTP".to_string()))
            }
        }
    }

    async fn discard(&self, phone: &str) -> Result<()> {
        sqlx::query("DELETE FROM otp_codes WHERE phone = $1")
            .bind(phone)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pending(code: &str, role: &str, attempts: i32, ttl_minutes: i64) -> OtpRow {
        OtpRow {
            code: code.to_string(),
            role: role.to_string(),
            attempts,
            expires_at: Utc::now() + Duration::minutes(ttl_minutes),
        }
    }

    #[test]
    fn correct_code_is_accepted() {
        let row = pending("482913", "worker", 0, 10);
        assert_eq!(
            evaluate(&row, "482913", "worker", Utc::now()),
            Outcome::Accept
        );
    }

    #[test]
    fn expired_code_is_rejected_even_when_correct() {
        let row = pending("482913", "worker", 0, -1);
        assert_eq!(
            evaluate(&row, "482913", "worker", Utc::now()),
            Outcome::Expired
        );
    }

    #[test]
    fn role_must_match_the_issued_code() {
        let row = pending("482913", "worker", 0, 10);
        assert_eq!(
            evaluate(&row, "482913", "employer", Utc::now()),
            Outcome::RoleMismatch
        );
    }

    #[test]
    fn wrong_code_counts_attempts_then_exhausts() {
        let now = Utc::now();
        let row = pending("482913", "worker", 0, 10);
        assert_eq!(evaluate(&row, "000000", "worker", now), Outcome::Retry(1));

        let row = pending("482913", "worker", 1, 10);
        assert_eq!(evaluate(&row, "000000", "worker", now), Outcome::Retry(2));

        let row = pending("482913", "worker", 2, 10);
        assert_eq!(evaluate(&row, "000000", "worker", now), Outcome::Exhausted);
    }

    #[test]
    fn correct_code_still_works_after_failed_attempts() {
        let row = pending("482913", "worker", 2, 10);
        assert_eq!(
            evaluate(&row, "482913", "worker", Utc::now()),
            Outcome::Accept
        );
    }
}
