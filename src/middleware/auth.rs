use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::{request::Parts, HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Json, Response},
};
use serde_json::json;
use uuid::Uuid;

use crate::error::Error;
use crate::utils::token::decode_token;
use crate::AppState;

/// Authenticated caller, inserted as a request extension by [`auth`].
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub role: String,
    pub phone: String,
}

impl AuthUser {
    pub fn require_role(&self, allowed: &[&str]) -> crate::error::Result<()> {
        if allowed.iter().any(|r| r.eq_ignore_ascii_case(&self.role)) {
            Ok(())
        } else {
            Err(Error::Forbidden(
                "You do not have permission to perform this action.".to_string(),
            ))
        }
    }
}

fn unauthorized(message: &str) -> Response {
    (StatusCode::UNAUTHORIZED, Json(json!({ "error": message }))).into_response()
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(axum::http::header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

async fn resolve_user(state: &AppState, token: &str) -> Result<AuthUser, Response> {
    let config = crate::config::get_config();
    let claims = match decode_token(token, &config.jwt_secret) {
        Ok(claims) => claims,
        Err(Error::Unauthorized(message)) => return Err(unauthorized(&message)),
        Err(_) => return Err(unauthorized("Invalid token.")),
    };
    if claims.is_refresh() {
        return Err(unauthorized("Invalid token."));
    }

    let user = match state.users.find_by_id(claims.sub).await {
        Ok(Some(user)) => user,
        Ok(None) => return Err(unauthorized("Invalid token. User not found.")),
        Err(err) => return Err(err.into_response()),
    };
    if !user.is_active() {
        return Err(unauthorized("Account is not active."));
    }

    Ok(AuthUser {
        user_id: user.id,
        role: user.role,
        phone: user.phone,
    })
}

pub async fn auth(State(state): State<AppState>, mut req: Request, next: Next) -> Response {
    let Some(token) = bearer_token(req.headers()) else {
        return unauthorized("Access denied. No token provided.");
    };
    let token = token.to_string();

    match resolve_user(&state, &token).await {
        Ok(auth_user) => {
            req.extensions_mut().insert(auth_user);
            next.run(req).await
        }
        Err(response) => response,
    }
}

/// Extractor form for routers that mix public and protected methods on one
/// path. Reuses the extension when the [`auth`] layer already ran. Wrap in
/// `Option<AuthUser>` for endpoints that only personalize for signed-in
/// callers.
#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Response> {
        if let Some(user) = parts.extensions.get::<AuthUser>() {
            return Ok(user.clone());
        }
        let token = bearer_token(&parts.headers)
            .map(str::to_string)
            .ok_or_else(|| unauthorized("Access denied. No token provided."))?;
        resolve_user(state, &token).await
    }
}
