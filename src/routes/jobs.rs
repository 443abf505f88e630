use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::job_dto::{CreateJobPayload, JobListQuery, JobResponse, MyJobsQuery, UpdateJobPayload},
    dto::ListResponse,
    error::{Error, Result},
    middleware::auth::AuthUser,
    models::job::Job,
    models::user::ROLE_EMPLOYER,
    AppState,
};

async fn with_companies(state: &AppState, jobs: Vec<Job>) -> Result<Vec<JobResponse>> {
    let mut employer_ids: Vec<Uuid> = jobs.iter().map(|j| j.employer_id).collect();
    employer_ids.sort_unstable();
    employer_ids.dedup();
    let companies = state.employers.summaries(&employer_ids).await?;
    Ok(jobs
        .into_iter()
        .map(|job| {
            let company = companies.get(&job.employer_id).cloned();
            JobResponse::with_company(job, company)
        })
        .collect())
}

#[utoipa::path(
    get,
    path = "/api/jobs",
    responses(
        (status = 200, description = "Active public job listings", body = Json<serde_json::Value>)
    )
)]
#[axum::debug_handler]
pub async fn list_jobs(
    State(state): State<AppState>,
    auth: Option<AuthUser>,
    Query(query): Query<JobListQuery>,
) -> Result<impl IntoResponse> {
    let list = state.jobs.list_public(query).await?;

    if auth.is_some() {
        let ids: Vec<Uuid> = list.items.iter().map(|j| j.id).collect();
        state.jobs.bump_views(&ids).await?;
    }

    let (total, page, per_page) = (list.total, list.page, list.per_page);
    let items = with_companies(&state, list.items).await?;
    Ok(Json(ListResponse::new(items, total, page, per_page)))
}

#[utoipa::path(
    get,
    path = "/api/jobs/{id}",
    params(
        ("id" = Uuid, Path, description = "Job ID")
    ),
    responses(
        (status = 200, description = "Job detail", body = Json<JobResponse>),
        (status = 404, description = "Job not found, private or expired")
    )
)]
#[axum::debug_handler]
pub async fn get_job(
    State(state): State<AppState>,
    auth: Option<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let job = state.jobs.get_public(id, auth.is_some()).await?;
    let mut items = with_companies(&state, vec![job]).await?;
    let response = items.remove(0);
    Ok(Json(response))
}

#[utoipa::path(
    post,
    path = "/api/jobs",
    request_body = CreateJobPayload,
    responses(
        (status = 201, description = "Job posted", body = Json<JobResponse>),
        (status = 400, description = "Invalid payload"),
        (status = 403, description = "Company profile incomplete")
    )
)]
#[axum::debug_handler]
pub async fn create_job(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<CreateJobPayload>,
) -> Result<impl IntoResponse> {
    auth.require_role(&[ROLE_EMPLOYER])?;
    payload.validate()?;

    let employer = state
        .employers
        .find_by_user(auth.user_id)
        .await?
        .ok_or_else(|| Error::BadRequest("Create a company profile first".to_string()))?;

    let job = state.jobs.create(&employer, payload).await?;
    Ok((StatusCode::CREATED, Json(JobResponse::from(job))))
}

#[utoipa::path(
    patch,
    path = "/api/jobs/{id}",
    params(
        ("id" = Uuid, Path, description = "Job ID")
    ),
    request_body = UpdateJobPayload,
    responses(
        (status = 200, description = "Job updated", body = Json<JobResponse>),
        (status = 403, description = "Not the posting employer"),
        (status = 404, description = "Job not found")
    )
)]
#[axum::debug_handler]
pub async fn update_job(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateJobPayload>,
) -> Result<impl IntoResponse> {
    auth.require_role(&[ROLE_EMPLOYER])?;
    payload.validate()?;

    let employer = state
        .employers
        .find_by_user(auth.user_id)
        .await?
        .ok_or_else(|| Error::BadRequest("Create a company profile first".to_string()))?;

    let job = state.jobs.update(id, employer.id, payload).await?;
    Ok(Json(JobResponse::from(job)))
}

#[utoipa::path(
    delete,
    path = "/api/jobs/{id}",
    params(
        ("id" = Uuid, Path, description = "Job ID")
    ),
    responses(
        (status = 200, description = "Job closed"),
        (status = 403, description = "Not the posting employer"),
        (status = 404, description = "Job not found")
    )
)]
#[axum::debug_handler]
pub async fn delete_job(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    auth.require_role(&[ROLE_EMPLOYER])?;

    let employer = state
        .employers
        .find_by_user(auth.user_id)
        .await?
        .ok_or_else(|| Error::BadRequest("Create a company profile first".to_string()))?;

    state.jobs.soft_close(id, employer.id).await?;
    Ok(Json(json!({ "message": "Job closed" })))
}

#[axum::debug_handler]
pub async fn my_jobs(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<MyJobsQuery>,
) -> Result<impl IntoResponse> {
    auth.require_role(&[ROLE_EMPLOYER])?;

    let employer = state
        .employers
        .find_by_user(auth.user_id)
        .await?
        .ok_or_else(|| Error::BadRequest("Create a company profile first".to_string()))?;

    let list = state.jobs.my_jobs(employer.id, query).await?;
    Ok(Json(list.map(JobResponse::from)))
}

#[axum::debug_handler]
pub async fn urgent_jobs(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let jobs = state.jobs.urgent().await?;
    let items = with_companies(&state, jobs).await?;
    Ok(Json(json!({ "items": items })))
}

#[axum::debug_handler]
pub async fn job_stats(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<impl IntoResponse> {
    auth.require_role(&[ROLE_EMPLOYER])?;

    let employer = state
        .employers
        .find_by_user(auth.user_id)
        .await?
        .ok_or_else(|| Error::BadRequest("Create a company profile first".to_string()))?;

    let stats = state.jobs.stats(employer.id).await?;
    Ok(Json(stats))
}
