use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    Extension,
};
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::application_dto::{
        ApplicationListQuery, ApplicationResponse, ApplyPayload, UpdateStatusPayload,
    },
    error::{Error, Result},
    middleware::auth::AuthUser,
    models::user::{ROLE_EMPLOYER, ROLE_WORKER},
    AppState,
};

#[axum::debug_handler]
pub async fn list_applications(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Query(query): Query<ApplicationListQuery>,
) -> Result<impl IntoResponse> {
    let list = match auth.role.as_str() {
        ROLE_WORKER => {
            let worker = state
                .workers
                .find_by_user(auth.user_id)
                .await?
                .ok_or_else(|| Error::BadRequest("Create a worker profile first".to_string()))?;
            state.applications.list_for_worker(worker.id, query).await?
        }
        ROLE_EMPLOYER => {
            let employer = state
                .employers
                .find_by_user(auth.user_id)
                .await?
                .ok_or_else(|| Error::BadRequest("Create a company profile first".to_string()))?;
            state
                .applications
                .list_for_employer(employer.id, query)
                .await?
        }
        _ => {
            return Err(Error::Forbidden(
                "You do not have permission to perform this action.".to_string(),
            ))
        }
    };
    Ok(Json(list.map(ApplicationResponse::from)))
}

#[axum::debug_handler]
pub async fn get_application(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let application = state.applications.get(id).await?;

    let allowed = match auth.role.as_str() {
        ROLE_WORKER => {
            let worker = state.workers.find_by_user(auth.user_id).await?;
            worker.is_some_and(|w| w.id == application.worker_id)
        }
        ROLE_EMPLOYER => {
            let employer = state.employers.find_by_user(auth.user_id).await?;
            employer.is_some_and(|e| e.id == application.employer_id)
        }
        _ => false,
    };
    if !allowed {
        return Err(Error::Forbidden(
            "You do not have permission to view this application.".to_string(),
        ));
    }

    Ok(Json(ApplicationResponse::from(application)))
}

#[axum::debug_handler]
pub async fn apply(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Json(payload): Json<ApplyPayload>,
) -> Result<impl IntoResponse> {
    auth.require_role(&[ROLE_WORKER])?;
    payload.validate()?;

    let worker = state
        .workers
        .find_by_user(auth.user_id)
        .await?
        .ok_or_else(|| Error::BadRequest("Create a worker profile first".to_string()))?;

    let application = state.applications.apply(worker.id, payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApplicationResponse::from(application)),
    ))
}

#[axum::debug_handler]
pub async fn update_status(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateStatusPayload>,
) -> Result<impl IntoResponse> {
    auth.require_role(&[ROLE_EMPLOYER])?;
    payload.validate()?;

    let employer = state
        .employers
        .find_by_user(auth.user_id)
        .await?
        .ok_or_else(|| Error::BadRequest("Create a company profile first".to_string()))?;

    let application = state
        .applications
        .update_status(id, employer.id, payload)
        .await?;
    Ok(Json(ApplicationResponse::from(application)))
}

#[axum::debug_handler]
pub async fn withdraw(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    auth.require_role(&[ROLE_WORKER])?;

    let worker = state
        .workers
        .find_by_user(auth.user_id)
        .await?
        .ok_or_else(|| Error::BadRequest("Create a worker profile first".to_string()))?;

    let application = state.applications.withdraw(id, worker.id).await?;
    Ok(Json(ApplicationResponse::from(application)))
}

#[axum::debug_handler]
pub async fn delete_application(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    auth.require_role(&[ROLE_WORKER])?;

    let worker = state
        .workers
        .find_by_user(auth.user_id)
        .await?
        .ok_or_else(|| Error::BadRequest("Create a worker profile first".to_string()))?;

    state.applications.delete(id, worker.id).await?;
    Ok(Json(json!({ "message": "Application deleted" })))
}

#[axum::debug_handler]
pub async fn application_stats(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> Result<impl IntoResponse> {
    auth.require_role(&[ROLE_EMPLOYER])?;

    let employer = state
        .employers
        .find_by_user(auth.user_id)
        .await?
        .ok_or_else(|| Error::BadRequest("Create a company profile first".to_string()))?;

    let stats = state.applications.stats(employer.id).await?;
    Ok(Json(stats))
}
