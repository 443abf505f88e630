use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Error, Result};

pub const ACCESS_TOKEN_DAYS: i64 = 7;
pub const REFRESH_TOKEN_DAYS: i64 = 30;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub exp: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_type: Option<String>,
}

impl Claims {
    pub fn is_refresh(&self) -> bool {
        self.token_type.as_deref() == Some("refresh")
    }
}

pub fn issue_access_token(user_id: Uuid, role: &str, secret: &str) -> Result<String> {
    let exp = (Utc::now() + Duration::days(ACCESS_TOKEN_DAYS)).timestamp() as usize;
    let claims = Claims {
        sub: user_id,
        exp,
        role: Some(role.to_string()),
        token_type: None,
    };
    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| Error::Internal(format!("Failed to sign token: {}", e)))
}

pub fn issue_refresh_token(user_id: Uuid, secret: &str) -> Result<String> {
    let exp = (Utc::now() + Duration::days(REFRESH_TOKEN_DAYS)).timestamp() as usize;
    let claims = Claims {
        sub: user_id,
        exp,
        role: None,
        token_type: Some("refresh".to_string()),
    };
    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| Error::Internal(format!("Failed to sign token: {}", e)))
}

pub fn decode_token(token: &str, secret: &str) -> Result<Claims> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
            Error::Unauthorized("Token expired.".to_string())
        }
        _ => Error::Unauthorized("Invalid token.".to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test_secret_key";

    #[test]
    fn access_token_carries_role() {
        let id = Uuid::new_v4();
        let token = issue_access_token(id, "worker", SECRET).expect("issue");
        let claims = decode_token(&token, SECRET).expect("decode");
        assert_eq!(claims.sub, id);
        assert_eq!(claims.role.as_deref(), Some("worker"));
        assert!(!claims.is_refresh());
    }

    #[test]
    fn refresh_token_is_typed() {
        let id = Uuid::new_v4();
        let token = issue_refresh_token(id, SECRET).expect("issue");
        let claims = decode_token(&token, SECRET).expect("decode");
        assert!(claims.is_refresh());
        assert!(claims.role.is_none());
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let token = issue_access_token(Uuid::new_v4(), "employer", SECRET).expect("issue");
        assert!(decode_token(&token, "other_secret").is_err());
    }
}
