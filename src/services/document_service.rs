use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::document_dto::{DocumentStatsResponse, DocumentStatusCount, DocumentTypeCount};
use crate::error::{Error, Result};
use crate::models::document::{kyc_flag_column, Document};
use crate::services::upload_service::{remove_from_disk, StoredFile};

#[derive(Clone)]
pub struct DocumentService {
    pool: PgPool,
}

impl DocumentService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        user_id: Uuid,
        original_name: &str,
        stored: &StoredFile,
        size_bytes: i64,
        document_type: &str,
        description: Option<&str>,
    ) -> Result<Document> {
        let document = sqlx::query_as::<_, Document>(
            r#"
            INSERT INTO documents (
                user_id, filename, original_name, path, size_bytes,
                mime_type, document_type, description
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
        .bind(document_type)
        .bind(description)
        .fetch_one(&self.pool)
        .await?;
        Ok(document)
    }

    pub async fn get(&self, id: Uuid) -> Result<Document> {
        let document = sqlx::query_as::<_, Document>("SELECT * FROM documents WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| Error::NotFound("Document not found".to_string()))?;
        Ok(document)
    }

    pub async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Document>> {
        let documents = sqlx::query_as::<_, Document>(
            "SELECT * FROM documents WHERE user_id = $1 ORDER BY uploaded_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(documents)
    }

    pub async fn update_description(
        &self,
        id: Uuid,
        user_id: Uuid,
        description: Option<&str>,
    ) -> Result<Document> {
        let current = self.get(id).await?;
        if current.user_id != user_id {
            return Err(Error::Forbidden(
                "You can only modify your own documents.".to_string(),
            ));
        }
        let document = sqlx::query_as::<_, Document>(
            "UPDATE documents SET description = $2 WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(description)
        .fetch_one(&self.pool)
        .await?;
        Ok(document)
    }

    pub async fn delete(&self, id: Uuid, user_id: Uuid) -> Result<()> {
        let current = self.get(id).await?;
        if current.user_id != user_id {
            return Err(Error::Forbidden(
                "You can only delete your own documents.".to_string(),
            ));
        }
        sqlx::query("DELETE FROM documents WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        remove_from_disk(&current.path).await;
        Ok(())
    }

    /// Admin verdict on a pending document. KYC document types mirror the
    /// outcome onto the matching worker verification flag.
    pub async fn verify(
        &self,
        id: Uuid,
        admin_id: Uuid,
        status: &str,
        notes: Option<&str>,
    ) -> Result<Document> {
        let mut tx = self.pool.begin().await?;

        let current = sqlx::query_as::<_, Document>(
            "SELECT * FROM documents WHERE id = $1 FOR UPDATE",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| Error::NotFound("Document not found".to_string()))?;

        let document = sqlx::query_as::<_, Document>(
            r#"
            UPDATE documents
            SET status = $2, verification_notes = $3, verified_by = $4, verified_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(status)
        .bind(notes)
        .bind(admin_id)
        .fetch_one(&mut *tx)
        .await?;

        if let Some(column) = kyc_flag_column(&current.document_type) {
            let sql = format!(
                "UPDATE workers SET {} = $2, updated_at = NOW() WHERE user_id = $1",
                column
            );
            sqlx::query(&sql)
                .bind(current.user_id)
                .bind(status == "verified")
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        Ok(document)
    }

    pub async fn stats(&self) -> Result<DocumentStatsResponse> {
        let by_status = sqlx::query_as::<_, DocumentStatusCount>(
            "SELECT status, COUNT(*) AS count FROM documents GROUP BY status ORDER BY count DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        let by_type = sqlx::query_as::<_, DocumentTypeCount>(
            "SELECT document_type, COUNT(*) AS count FROM documents GROUP BY document_type ORDER BY count DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM documents")
            .fetch_one(&self.pool)
            .await?;

        let recent = sqlx::query_as::<_, Document>(
            "SELECT * FROM documents ORDER BY uploaded_at DESC LIMIT 5",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(DocumentStatsResponse {
            total,
            by_status,
            by_type,
            recent_uploads: recent.into_iter().map(Into::into).collect(),
        })
    }
}
