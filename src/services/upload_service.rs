use sqlx::PgPool;
use std::path::Path as StdPath;
use tokio::fs;
use uuid::Uuid;

use crate::dto::upload_dto::MyFilesQuery;
use crate::dto::{ListResponse, PageParams};
use crate::error::{Error, Result};
use crate::models::upload::Upload;

/// A file written under UPLOADS_DIR, named by a generated UUID.
pub struct StoredFile {
    pub filename: String,
    pub path: String,
    pub mime_type: String,
}

/// Validates content against the claimed extension and writes it to disk.
/// The stored name is a UUID so client-supplied names never touch the
/// filesystem.
pub async fn save_to_disk(
    original_name: &str,
    data: &bytes::Bytes,
    allowed_exts: &[&str],
) -> Result<StoredFile> {
    let ext = StdPath::new(original_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_else(|| "bin".to_string());

    if !allowed_exts.contains(&ext.as_str()) {
        return Err(Error::BadRequest(format!(
            "File type .{} is not allowed",
            ext
        )));
    }

    if ext == "pdf" && !data.starts_with(b"%PDF") {
        return Err(Error::BadRequest("Invalid PDF file content".into()));
    }
    if (ext == "jpg" || ext == "jpeg") && !data.starts_with(&[0xFF, 0xD8]) {
        return Err(Error::BadRequest("Invalid JPEG file content".into()));
    }
    if ext == "png" && !data.starts_with(&[0x89, 0x50, 0x4E, 0x47]) {
        return Err(Error::BadRequest("Invalid PNG file content".into()));
    }

    let uploads_dir = &crate::config::get_config().uploads_dir;
    fs::create_dir_all(uploads_dir)
        .await
        .map_err(|e| Error::Internal(e.to_string()))?;

    let filename = format!("{}.{}", Uuid::new_v4(), ext);
    let path = format!("{}/{}", uploads_dir, filename);
    fs::write(&path, data).await.map_err(|e| {
        tracing::error!("Failed to write uploaded file: {}", e);
        Error::Internal(format!("Failed to save file: {}", e))
    })?;

    let mime_type = match ext.as_str() {
        "pdf" => "application/pdf",
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "txt" => "text/plain",
        _ => "application/octet-stream",
    }
    .to_string();

    Ok(StoredFile {
        filename,
        path,
        mime_type,
    })
}

pub async fn remove_from_disk(path: &str) {
    if let Err(e) = fs::remove_file(path).await {
        tracing::warn!(path = %path, "failed to remove stored file: {}", e);
    }
}

#[derive(Clone)]
pub struct UploadService {
    pool: PgPool,
}

impl UploadService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        user_id: Uuid,
        original_name: &str,
        stored: &StoredFile,
        size_bytes: i64,
        category: &str,
        description: Option<&str>,
    ) -> Result<Upload> {
        let upload = sqlx::query_as::<_, Upload>(
            r#"
            INSERT INTO uploads (
                user_id, filename, original_name, path, size_bytes,
                mime_type, category, description
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(&stored.filename)
        .bind(original_name)
        .bind(&stored.path)
        .bind(size_bytes)
        .bind(&stored.mime_type)
        .bind(category)
        .bind(description)
        .fetch_one(&self.pool)
        .await?;
        Ok(upload)
    }

    pub async fn list_for_user(
        &self,
        user_id: Uuid,
        query: MyFilesQuery,
    ) -> Result<ListResponse<Upload>> {
        let params = PageParams::clamp(query.page, query.per_page, 20);

        let (total, items) = match query.category.filter(|s| !s.is_empty()) {
            Some(category) => {
                let total: i64 = sqlx::query_scalar(
                    "SELECT COUNT(*) FROM uploads WHERE user_id = $1 AND category = $2",
                )
                .bind(user_id)
                .bind(&category)
                .fetch_one(&self.pool)
                .await?;
                let items = sqlx::query_as::<_, Upload>(
                    r#"
                    SELECT * FROM uploads
                    WHERE user_id = $1 AND category = $2
                    ORDER BY uploaded_at DESC
                    LIMIT $3 OFFSET $4
                    "#,
                )
                .bind(user_id)
                .bind(&category)
                .bind(params.per_page)
                .bind(params.offset())
                .fetch_all(&self.pool)
                .await?;
                (total, items)
            }
            None => {
                let total: i64 =
                    sqlx::query_scalar("SELECT COUNT(*) FROM uploads WHERE user_id = $1")
                        .bind(user_id)
                        .fetch_one(&self.pool)
                        .await?;
                let items = sqlx::query_as::<_, Upload>(
                    r#"
                    SELECT * FROM uploads
                    WHERE user_id = $1
                    ORDER BY uploaded_at DESC
                    LIMIT $2 OFFSET $3
                    "#,
                )
                .bind(user_id)
                .bind(params.per_page)
                .bind(params.offset())
                .fetch_all(&self.pool)
                .await?;
                (total, items)
            }
        };

        Ok(ListResponse::new(items, total, params.page, params.per_page))
    }

    /// Removes the row and the file. Only the owner may delete.
    pub async fn delete(&self, id: Uuid, user_id: Uuid) -> Result<()> {
        let upload = sqlx::query_as::<_, Upload>("SELECT * FROM uploads WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| Error::NotFound("File not found".to_string()))?;
        if upload.user_id != user_id {
            return Err(Error::Forbidden(
                "You can only delete your own files.".to_string(),
            ));
        }

        sqlx::query("DELETE FROM uploads WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        remove_from_disk(&upload.path).await;
        Ok(())
    }
}
