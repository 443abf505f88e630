use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    Extension,
};
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::document_dto::{DocumentResponse, UpdateDocumentPayload, VerifyDocumentPayload},
    error::{Error, Result},
    middleware::auth::AuthUser,
    models::document::DOCUMENT_TYPES,
    models::user::ROLE_ADMIN,
    services::upload_service::save_to_disk,
    AppState,
};

const MAX_DOCUMENT_BYTES: usize = 5 * 1024 * 1024;
const DOCUMENT_EXTS: &[&str] = &["jpg", "jpeg", "png", "pdf"];

#[axum::debug_handler]
pub async fn upload_document(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse> {
    let mut file: Option<(String, bytes::Bytes)> = None;
    let mut document_type: Option<String> = None;
    let mut description: Option<String> = None;

    while let Some(field) = multipart.next_field().await? {
        match field.name().unwrap_or("") {
            "document" => {
                let filename = field.file_name().unwrap_or("document").to_string();
                let data = field.bytes().await?;
                if !data.is_empty() {
                    file = Some((filename, data));
                }
            }
            "document_type" => {
                document_type = Some(field.text().await?);
            }
            "description" => {
                description = Some(field.text().await?);
            }
            _ => {}
        }
    }

    let (filename, data) =
        file.ok_or_else(|| Error::BadRequest("No document file provided".to_string()))?;
    if data.len() > MAX_DOCUMENT_BYTES {
        return Err(Error::BadRequest(
            "Document must be 5MB or smaller".to_string(),
        ));
    }
    let document_type = document_type
        .filter(|t| DOCUMENT_TYPES.contains(&t.as_str()))
        .ok_or_else(|| Error::BadRequest("Invalid document type".to_string()))?;

    let stored = save_to_disk(&filename, &data, DOCUMENT_EXTS).await?;
    let document = state
        .documents
        .create(
            auth.user_id,
            &filename,
            &stored,
            data.len() as i64,
            &document_type,
            description.as_deref(),
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(DocumentResponse::from(document)),
    ))
}

#[axum::debug_handler]
pub async fn my_documents(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> Result<impl IntoResponse> {
    let documents = state.documents.list_for_user(auth.user_id).await?;
    let items: Vec<DocumentResponse> = documents.into_iter().map(Into::into).collect();
    Ok(Json(json!({ "items": items })))
}

#[axum::debug_handler]
pub async fn get_document(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let document = state.documents.get(id).await?;
    if document.user_id != auth.user_id && auth.role != ROLE_ADMIN {
        return Err(Error::Forbidden(
            "You do not have permission to view this document.".to_string(),
        ));
    }
    Ok(Json(DocumentResponse::from(document)))
}

#[axum::debug_handler]
pub async fn update_document(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateDocumentPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let document = state
        .documents
        .update_description(id, auth.user_id, payload.description.as_deref())
        .await?;
    Ok(Json(DocumentResponse::from(document)))
}

#[axum::debug_handler]
pub async fn delete_document(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    state.documents.delete(id, auth.user_id).await?;
    Ok(Json(json!({ "message": "Document deleted" })))
}

#[axum::debug_handler]
pub async fn verify_document(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(payload): Json<VerifyDocumentPayload>,
) -> Result<impl IntoResponse> {
    auth.require_role(&[ROLE_ADMIN])?;
    payload.validate()?;

    let document = state
        .documents
        .verify(id, auth.user_id, &payload.status, payload.notes.as_deref())
        .await?;
    Ok(Json(DocumentResponse::from(document)))
}

#[axum::debug_handler]
pub async fn document_stats(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> Result<impl IntoResponse> {
    auth.require_role(&[ROLE_ADMIN])?;
    let stats = state.documents.stats().await?;
    Ok(Json(stats))
}
