use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::worker_dto::{
        AvailabilityPayload, UpdateWorkerPayload, UpsertWorkerPayload, WorkerListQuery,
        WorkerResponse,
    },
    error::{Error, Result},
    middleware::auth::AuthUser,
    models::user::ROLE_WORKER,
    AppState,
};

#[axum::debug_handler]
pub async fn list_workers(
    State(state): State<AppState>,
    Query(query): Query<WorkerListQuery>,
) -> Result<impl IntoResponse> {
    let list = state.workers.list(query).await?;
    Ok(Json(list.map(WorkerResponse::from)))
}

#[axum::debug_handler]
pub async fn get_worker(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let worker = state.workers.get(id).await?;
    Ok(Json(WorkerResponse::from(worker)))
}

#[axum::debug_handler]
pub async fn upsert_worker(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<UpsertWorkerPayload>,
) -> Result<impl IntoResponse> {
    auth.require_role(&[ROLE_WORKER])?;
    payload.validate()?;

    let existed = state.workers.find_by_user(auth.user_id).await?.is_some();
    let worker = state.workers.upsert(auth.user_id, payload).await?;

    let status = if existed {
        StatusCode::OK
    } else {
        StatusCode::CREATED
    };
    Ok((status, Json(WorkerResponse::from(worker))))
}

#[axum::debug_handler]
pub async fn update_worker(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateWorkerPayload>,
) -> Result<impl IntoResponse> {
    auth.require_role(&[ROLE_WORKER])?;
    payload.validate()?;

    let worker = state.workers.get(id).await?;
    if worker.user_id != auth.user_id {
        return Err(Error::Forbidden(
            "You can only modify your own profile.".to_string(),
        ));
    }

    let worker = state.workers.update(id, payload).await?;
    Ok(Json(WorkerResponse::from(worker)))
}

#[axum::debug_handler]
pub async fn delete_worker(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    auth.require_role(&[ROLE_WORKER])?;

    let worker = state.workers.get(id).await?;
    if worker.user_id != auth.user_id {
        return Err(Error::Forbidden(
            "You can only delete your own profile.".to_string(),
        ));
    }

    state.workers.delete(id).await?;
    state.users.set_profile_completed(auth.user_id, false).await?;
    Ok(Json(json!({ "message": "Profile deleted" })))
}

#[axum::debug_handler]
pub async fn set_availability(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<AvailabilityPayload>,
) -> Result<impl IntoResponse> {
    auth.require_role(&[ROLE_WORKER])?;
    payload.validate()?;

    let worker = state.workers.get(id).await?;
    if worker.user_id != auth.user_id {
        return Err(Error::Forbidden(
            "You can only modify your own profile.".to_string(),
        ));
    }

    let worker = state.workers.set_availability(id, &payload.availability).await?;
    Ok(Json(WorkerResponse::from(worker)))
}

#[axum::debug_handler]
pub async fn job_history(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    state.workers.get(id).await?;
    let history = state.workers.job_history(id).await?;
    Ok(Json(json!({ "items": history })))
}
