use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Json},
    Extension,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::admin_dto::{
        AdminEmployerQuery, AdminJobQuery, AdminUserQuery, AdminWorkerQuery, UserStatusPayload,
    },
    dto::auth_dto::UserResponse,
    dto::employer_dto::EmployerResponse,
    dto::job_dto::JobResponse,
    dto::worker_dto::WorkerResponse,
    error::Result,
    middleware::auth::AuthUser,
    models::user::ROLE_ADMIN,
    AppState,
};

#[axum::debug_handler]
pub async fn overview(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> Result<impl IntoResponse> {
    auth.require_role(&[ROLE_ADMIN])?;
    let overview = state.admin.overview().await?;
    Ok(Json(overview))
}

#[axum::debug_handler]
pub async fn list_users(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Query(query): Query<AdminUserQuery>,
) -> Result<impl IntoResponse> {
    auth.require_role(&[ROLE_ADMIN])?;
    let list = state.admin.list_users(query).await?;
    Ok(Json(list.map(UserResponse::from)))
}

#[axum::debug_handler]
pub async fn get_user(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    auth.require_role(&[ROLE_ADMIN])?;
    let user = state.admin.get_user(id).await?;
    Ok(Json(UserResponse::from(user)))
}

#[axum::debug_handler]
pub async fn set_user_status(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UserStatusPayload>,
) -> Result<impl IntoResponse> {
    auth.require_role(&[ROLE_ADMIN])?;
    payload.validate()?;

    let user = state.admin.set_user_status(id, &payload.status).await?;
    tracing::info!(user_id = %id, status = %payload.status, reason = ?payload.reason, "user status changed");
    Ok(Json(UserResponse::from(user)))
}

#[axum::debug_handler]
pub async fn list_workers(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Query(query): Query<AdminWorkerQuery>,
) -> Result<impl IntoResponse> {
    auth.require_role(&[ROLE_ADMIN])?;
    let list = state.admin.list_workers(query).await?;
    Ok(Json(list.map(WorkerResponse::from)))
}

#[axum::debug_handler]
pub async fn list_employers(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Query(query): Query<AdminEmployerQuery>,
) -> Result<impl IntoResponse> {
    auth.require_role(&[ROLE_ADMIN])?;
    let list = state.admin.list_employers(query).await?;
    Ok(Json(list.map(EmployerResponse::from)))
}

#[axum::debug_handler]
pub async fn list_jobs(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Query(query): Query<AdminJobQuery>,
) -> Result<impl IntoResponse> {
    auth.require_role(&[ROLE_ADMIN])?;
    let list = state.admin.list_jobs(query).await?;
    Ok(Json(list.map(JobResponse::from)))
}
