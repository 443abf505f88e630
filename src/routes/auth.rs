use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    Extension,
};
use serde_json::json;
use validator::Validate;

use crate::{
    dto::auth_dto::{
        AuthResponse, ChangePasswordPayload, LoginPayload, MeResponse, RefreshResponse,
        RefreshTokenPayload, SendOtpPayload, SendOtpResponse, SetPasswordPayload, UserResponse,
        VerifyOtpPayload,
    },
    error::{Error, Result},
    middleware::auth::AuthUser,
    models::user::{ROLE_EMPLOYER, ROLE_WORKER},
    utils::crypto::{hash_password, verify_password},
    utils::token::{decode_token, issue_access_token, issue_refresh_token},
    AppState,
};

#[axum::debug_handler]
pub async fn send_otp(
    State(state): State<AppState>,
    Json(payload): Json<SendOtpPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;

    if let Some(existing) = state.users.find_by_phone(&payload.phone).await? {
        if existing.role != payload.role {
            return Err(Error::BadRequest(format!(
                "This number is already registered as {}",
                existing.role
            )));
        }
    }

    let code = state.otp.issue(&payload.phone, &payload.role).await?;
    state.sms.send_otp(&payload.phone, &code).await?;

    Ok(Json(SendOtpResponse {
        message: "OTP sent successfully".to_string(),
        phone: payload.phone,
        role: payload.role,
    }))
}

#[axum::debug_handler]
pub async fn verify_otp(
    State(state): State<AppState>,
    Json(payload): Json<VerifyOtpPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;

    state
        .otp
        .verify(&payload.phone, &payload.otp, &payload.role)
        .await?;

    let (user, is_new_user) = match state.users.find_by_phone(&payload.phone).await? {
        Some(user) => {
            if user.role != payload.role {
                return Err(Error::BadRequest("Role mismatch".to_string()));
            }
            if !user.is_active() {
                return Err(Error::BadRequest("Account is not active".to_string()));
            }
            state.users.mark_login(user.id).await?;
            (user, false)
        }
        None => {
            let user = state
                .users
                .create_verified(&payload.phone, &payload.role)
                .await?;
            (user, true)
        }
    };

    let config = crate::config::get_config();
    let token = issue_access_token(user.id, &user.role, &config.jwt_secret)?;
    let refresh_token = issue_refresh_token(user.id, &config.jwt_secret)?;

    Ok(Json(AuthResponse {
        message: if is_new_user {
            "Registration successful".to_string()
        } else {
            "Login successful".to_string()
        },
        token,
        refresh_token,
        user: user.into(),
        is_new_user,
    }))
}

#[axum::debug_handler]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;

    let user = state
        .users
        .find_by_phone(&payload.phone)
        .await?
        .filter(|u| u.role == payload.role)
        .ok_or_else(|| Error::BadRequest("Invalid credentials".to_string()))?;

    if !user.is_active() {
        return Err(Error::BadRequest("Account is not active".to_string()));
    }
    if user.is_locked() {
        return Err(Error::BadRequest(
            "Account is temporarily locked. Try again later.".to_string(),
        ));
    }

    let Some(password_hash) = user.password_hash.as_deref() else {
        return Err(Error::BadRequest(
            "Password login is not set up for this account. Use OTP login.".to_string(),
        ));
    };

    if !verify_password(&payload.password, password_hash)? {
        state.users.record_failed_login(user.id).await?;
        return Err(Error::BadRequest("Invalid credentials".to_string()));
    }

    state.users.mark_login(user.id).await?;

    let config = crate::config::get_config();
    let token = issue_access_token(user.id, &user.role, &config.jwt_secret)?;
    let refresh_token = issue_refresh_token(user.id, &config.jwt_secret)?;

    Ok(Json(AuthResponse {
        message: "Login successful".to_string(),
        token,
        refresh_token,
        user: user.into(),
        is_new_user: false,
    }))
}

#[axum::debug_handler]
pub async fn set_password(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Json(payload): Json<SetPasswordPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let hash = hash_password(&payload.password)?;
    state.users.set_password(auth.user_id, &hash).await?;
    Ok(Json(json!({ "message": "Password set successfully" })))
}

#[axum::debug_handler]
pub async fn change_password(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Json(payload): Json<ChangePasswordPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;

    let user = state
        .users
        .find_by_id(auth.user_id)
        .await?
        .ok_or_else(|| Error::NotFound("User not found".to_string()))?;
    let Some(password_hash) = user.password_hash.as_deref() else {
        return Err(Error::BadRequest("No password is set yet".to_string()));
    };
    if !verify_password(&payload.current_password, password_hash)? {
        return Err(Error::BadRequest(
            "Current password is incorrect".to_string(),
        ));
    }

    let hash = hash_password(&payload.new_password)?;
    state.users.set_password(auth.user_id, &hash).await?;
    Ok(Json(json!({ "message": "Password changed successfully" })))
}

#[axum::debug_handler]
pub async fn refresh_token(
    State(state): State<AppState>,
    Json(payload): Json<RefreshTokenPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;

    let config = crate::config::get_config();
    let claims = decode_token(&payload.refresh_token, &config.jwt_secret)?;
    if !claims.is_refresh() {
        return Err(Error::Unauthorized("Invalid token.".to_string()));
    }

    let user = state
        .users
        .find_by_id(claims.sub)
        .await?
        .ok_or_else(|| Error::Unauthorized("Invalid token. User not found.".to_string()))?;
    if !user.is_active() {
        return Err(Error::Unauthorized("Account is not active.".to_string()));
    }

    let token = issue_access_token(user.id, &user.role, &config.jwt_secret)?;
    Ok(Json(RefreshResponse {
        token,
        user: user.into(),
    }))
}

#[axum::debug_handler]
pub async fn me(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> Result<impl IntoResponse> {
    let user = state
        .users
        .find_by_id(auth.user_id)
        .await?
        .ok_or_else(|| Error::NotFound("User not found".to_string()))?;

    let profile = match user.role.as_str() {
        ROLE_WORKER => state
            .workers
            .find_by_user(user.id)
            .await?
            .map(|w| serde_json::to_value(crate::dto::worker_dto::WorkerResponse::from(w)))
            .transpose()?,
        ROLE_EMPLOYER => state
            .employers
            .find_by_user(user.id)
            .await?
            .map(|e| serde_json::to_value(crate::dto::employer_dto::EmployerResponse::from(e)))
            .transpose()?,
        _ => None,
    };

    Ok(Json(MeResponse {
        user: UserResponse::from(user),
        profile,
    }))
}

#[axum::debug_handler]
pub async fn logout() -> Result<impl IntoResponse> {
    // Tokens are stateless; the client drops its copy.
    Ok((
        StatusCode::OK,
        Json(json!({ "message": "Logged out successfully" })),
    ))
}
