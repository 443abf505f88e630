use sqlx::PgPool;
use uuid::Uuid;

use crate::error::Result;
use crate::models::user::{User, LOCK_HOURS, MAX_LOGIN_ATTEMPTS};

#[derive(Clone)]
pub struct UserService {
    pool: PgPool,
}

impl UserService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    /// Phones are unique across roles, so this resolves the one account a
    /// number can have.
    pub async fn find_by_phone(&self, phone: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE phone = $1")
            .bind(phone)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    /// Creates a phone-verified account. Called after a first-time OTP
    /// verification succeeds.
    pub async fn create_verified(&self, phone: &str, role: &str) -> Result<User> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (phone, role, is_phone_verified, last_login)
            VALUES ($1, $2, TRUE, NOW())
            RETURNING *
            "#,
        )
        .bind(phone)
        .bind(role)
        .fetch_one(&self.pool)
        .await?;
        Ok(user)
    }

    /// Stamps a successful login and clears any accumulated failures.
    pub async fn mark_login(&self, id: Uuid) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE users
            SET last_login = NOW(), login_attempts = 0, lock_until = NULL, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Bumps the failure counter; the account locks once the counter hits the
    /// cap. Returns the updated row so the caller can report remaining tries.
    pub async fn record_failed_login(&self, id: Uuid) -> Result<User> {
        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET login_attempts = login_attempts + 1,
                lock_until = CASE
                    WHEN login_attempts + 1 >= $2
                    THEN NOW() + make_interval(hours => $3)
                    ELSE lock_until
                END,
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(MAX_LOGIN_ATTEMPTS)
        .bind(LOCK_HOURS as i32)
        .fetch_one(&self.pool)
        .await?;
        Ok(user)
    }

    pub async fn set_password(&self, id: Uuid, password_hash: &str) -> Result<()> {
        sqlx::query("UPDATE users SET password_hash = $2, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .bind(password_hash)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    pub async fn set_profile_completed(&self, id: Uuid, completed: bool) -> Result<()> {
        sqlx::query("UPDATE users SET profile_completed = $2, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .bind(completed)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
