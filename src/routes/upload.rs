use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    Extension,
};
use serde_json::json;
use uuid::Uuid;

use crate::{
    dto::upload_dto::{MyFilesQuery, UploadResponse},
    error::{Error, Result},
    middleware::auth::AuthUser,
    models::user::{ROLE_EMPLOYER, ROLE_WORKER},
    services::upload_service::save_to_disk,
    AppState,
};

const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;
const GENERAL_EXTS: &[&str] = &["jpg", "jpeg", "png", "pdf", "txt"];
const IMAGE_EXTS: &[&str] = &["jpg", "jpeg", "png"];

async fn read_file_field(multipart: &mut Multipart) -> Result<(String, bytes::Bytes, Option<String>)> {
    let mut file: Option<(String, bytes::Bytes)> = None;
    let mut description: Option<String> = None;

    while let Some(field) = multipart.next_field().await? {
        match field.name().unwrap_or("") {
            "file" => {
                let filename = field.file_name().unwrap_or("file").to_string();
                let data = field.bytes().await?;
                if !data.is_empty() {
                    file = Some((filename, data));
                }
            }
            "description" => {
                description = Some(field.text().await?);
            }
            _ => {}
        }
    }

    let (filename, data) = file.ok_or_else(|| Error::BadRequest("No file provided".to_string()))?;
    if data.len() > MAX_UPLOAD_BYTES {
        return Err(Error::BadRequest("File must be 10MB or smaller".to_string()));
    }
    Ok((filename, data, description))
}

#[axum::debug_handler]
pub async fn upload_single(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse> {
    let (filename, data, description) = read_file_field(&mut multipart).await?;

    let stored = save_to_disk(&filename, &data, GENERAL_EXTS).await?;
    let upload = state
        .uploads
        .create(
            auth.user_id,
            &filename,
            &stored,
            data.len() as i64,
            "general",
            description.as_deref(),
        )
        .await?;

    Ok((StatusCode::CREATED, Json(UploadResponse::from(upload))))
}

#[axum::debug_handler]
pub async fn upload_profile_picture(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse> {
    auth.require_role(&[ROLE_WORKER])?;
    let (filename, data, _) = read_file_field(&mut multipart).await?;

    let stored = save_to_disk(&filename, &data, IMAGE_EXTS).await?;
    let upload = state
        .uploads
        .create(
            auth.user_id,
            &filename,
            &stored,
            data.len() as i64,
            "profile-picture",
            None,
        )
        .await?;

    let response = UploadResponse::from(upload);
    state
        .workers
        .set_profile_picture(auth.user_id, &response.url)
        .await?;

    Ok((StatusCode::CREATED, Json(response)))
}

#[axum::debug_handler]
pub async fn upload_company_logo(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse> {
    auth.require_role(&[ROLE_EMPLOYER])?;
    let (filename, data, _) = read_file_field(&mut multipart).await?;

    let stored = save_to_disk(&filename, &data, IMAGE_EXTS).await?;
    let upload = state
        .uploads
        .create(
            auth.user_id,
            &filename,
            &stored,
            data.len() as i64,
            "company-logo",
            None,
        )
        .await?;

    let response = UploadResponse::from(upload);
    state.employers.set_logo(auth.user_id, &response.url).await?;

    Ok((StatusCode::CREATED, Json(response)))
}

#[axum::debug_handler]
pub async fn my_files(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Query(query): Query<MyFilesQuery>,
) -> Result<impl IntoResponse> {
    let list = state.uploads.list_for_user(auth.user_id, query).await?;
    Ok(Json(list.map(UploadResponse::from)))
}

#[axum::debug_handler]
pub async fn delete_file(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    state.uploads.delete(id, auth.user_id).await?;
    Ok(Json(json!({ "message": "File deleted" })))
}
