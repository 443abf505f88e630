use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::employer_dto::{
        EmployerListQuery, EmployerResponse, UpdateEmployerPayload, UpsertEmployerPayload,
    },
    dto::job_dto::JobResponse,
    error::{Error, Result},
    middleware::auth::AuthUser,
    models::user::ROLE_EMPLOYER,
    AppState,
};

#[axum::debug_handler]
pub async fn list_employers(
    State(state): State<AppState>,
    Query(query): Query<EmployerListQuery>,
) -> Result<impl IntoResponse> {
    let list = state.employers.list(query).await?;
    Ok(Json(list.map(EmployerResponse::from)))
}

#[axum::debug_handler]
pub async fn get_employer(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let employer = state.employers.get(id).await?;
    Ok(Json(EmployerResponse::from(employer)))
}

#[axum::debug_handler]
pub async fn upsert_employer(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<UpsertEmployerPayload>,
) -> Result<impl IntoResponse> {
    auth.require_role(&[ROLE_EMPLOYER])?;
    payload.validate()?;

    let existed = state.employers.find_by_user(auth.user_id).await?.is_some();
    let employer = state.employers.upsert(auth.user_id, payload).await?;

    let status = if existed {
        StatusCode::OK
    } else {
        StatusCode::CREATED
    };
    Ok((status, Json(EmployerResponse::from(employer))))
}

#[axum::debug_handler]
pub async fn update_employer(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateEmployerPayload>,
) -> Result<impl IntoResponse> {
    auth.require_role(&[ROLE_EMPLOYER])?;
    payload.validate()?;

    let employer = state.employers.get(id).await?;
    if employer.user_id != auth.user_id {
        return Err(Error::Forbidden(
            "You can only modify your own company profile.".to_string(),
        ));
    }

    let employer = state.employers.update(id, payload).await?;
    Ok(Json(EmployerResponse::from(employer)))
}

#[axum::debug_handler]
pub async fn delete_employer(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    auth.require_role(&[ROLE_EMPLOYER])?;

    let employer = state.employers.get(id).await?;
    if employer.user_id != auth.user_id {
        return Err(Error::Forbidden(
            "You can only delete your own company profile.".to_string(),
        ));
    }

    state.employers.delete(id).await?;
    state.users.set_profile_completed(auth.user_id, false).await?;
    Ok(Json(json!({ "message": "Profile deleted" })))
}

#[axum::debug_handler]
pub async fn employer_jobs(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    state.employers.get(id).await?;
    let jobs = state.jobs.list_employer_jobs(id).await?;
    let items: Vec<JobResponse> = jobs.into_iter().map(Into::into).collect();
    Ok(Json(json!({ "items": items })))
}
