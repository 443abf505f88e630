use chrono::{Duration, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::application_dto::{
    ApplicationListQuery, ApplicationStatsResponse, ApplicationStatusCount, ApplyPayload,
    UpdateStatusPayload,
};
use crate::dto::{ListResponse, PageParams};
use crate::error::{Error, Result};
use crate::models::application::{can_transition, Application, EXPIRY_DAYS, WITHDRAWABLE_FROM};

#[derive(Clone)]
pub struct ApplicationService {
    pool: PgPool,
}

impl ApplicationService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn get(&self, id: Uuid) -> Result<Application> {
        let application = sqlx::query_as::<_, Application>("SELECT * FROM applications WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| Error::NotFound("Application not found".to_string()))?;
        Ok(application)
    }

    /// Files an application and bumps the job's counter in one transaction.
    pub async fn apply(&self, worker_id: Uuid, payload: ApplyPayload) -> Result<Application> {
        let mut tx = self.pool.begin().await?;

        let job: Option<(Uuid, String, bool, chrono::DateTime<Utc>)> = sqlx::query_as(
            "SELECT employer_id, status, is_public, expires_at FROM jobs WHERE id = $1 FOR UPDATE",
        )
        .bind(payload.job_id)
        .fetch_optional(&mut *tx)
        .await?;
        let Some((employer_id, status, is_public, job_expires_at)) = job else {
            return Err(Error::NotFound("Job not found".to_string()));
        };
        if status != "active" || !is_public || job_expires_at < Utc::now() {
            return Err(Error::BadRequest(
                "This job is no longer accepting applications".to_string(),
            ));
        }

        let duplicate: Option<Uuid> = sqlx::query_scalar(
            "SELECT id FROM applications WHERE job_id = $1 AND worker_id = $2",
        )
        .bind(payload.job_id)
        .bind(worker_id)
        .fetch_optional(&mut *tx)
        .await?;
        if duplicate.is_some() {
            return Err(Error::BadRequest(
                "You have already applied to this job".to_string(),
            ));
        }

        let expires_at = Utc::now() + Duration::days(EXPIRY_DAYS);
        let application = sqlx::query_as::<_, Application>(
            r#"
            INSERT INTO applications (
                job_id, worker_id, employer_id, cover_letter, expected_wage,
                availability, start_date, expires_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(payload.job_id)
        .bind(worker_id)
        .bind(employer_id)
        .bind(&payload.cover_letter)
        .bind(payload.expected_wage)
        .bind(payload.availability.as_deref().unwrap_or("immediate"))
        .bind(payload.start_date)
        .bind(expires_at)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query(
            "UPDATE jobs SET applications_total = applications_total + 1, updated_at = NOW() WHERE id = $1",
        )
        .bind(payload.job_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(application)
    }

    pub async fn list_for_worker(
        &self,
        worker_id: Uuid,
        query: ApplicationListQuery,
    ) -> Result<ListResponse<Application>> {
        self.list_by_column("worker_id", worker_id, query).await
    }

    pub async fn list_for_employer(
        &self,
        employer_id: Uuid,
        query: ApplicationListQuery,
    ) -> Result<ListResponse<Application>> {
        self.list_by_column("employer_id", employer_id, query).await
    }

    async fn list_by_column(
        &self,
        column: &str,
        owner: Uuid,
        query: ApplicationListQuery,
    ) -> Result<ListResponse<Application>> {
        let params = PageParams::clamp(query.page, query.per_page, 20);

        let mut conditions = vec![format!("{} = $1", column)];
        let mut next = 2;
        if query.status.as_deref().is_some_and(|s| !s.is_empty()) {
            conditions.push(format!("status = ${}", next));
            next += 1;
        }
        if query.job_id.is_some() {
            conditions.push(format!("job_id = ${}", next));
            next += 1;
        }
        let where_clause = format!("WHERE {}", conditions.join(" AND "));

        let count_sql = format!("SELECT COUNT(*) FROM applications {}", where_clause);
        let list_sql = format!(
            "SELECT * FROM applications {} ORDER BY created_at DESC LIMIT ${} OFFSET ${}",
            where_clause,
            next,
            next + 1,
        );

        let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql).bind(owner);
        let mut list_query = sqlx::query_as::<_, Application>(&list_sql).bind(owner);
        if let Some(status) = query.status.as_ref().filter(|s| !s.is_empty()) {
            count_query = count_query.bind(status.clone());
            list_query = list_query.bind(status.clone());
        }
        if let Some(job_id) = query.job_id {
            count_query = count_query.bind(job_id);
            list_query = list_query.bind(job_id);
        }

        let total = count_query.fetch_one(&self.pool).await?;
        let items = list_query
            .bind(params.per_page)
            .bind(params.offset())
            .fetch_all(&self.pool)
            .await?;

        Ok(ListResponse::new(items, total, params.page, params.per_page))
    }

    /// Moves an application through the hiring funnel. The transition check,
    /// the status side effects and the job counters all commit together.
    pub async fn update_status(
        &self,
        id: Uuid,
        employer_id: Uuid,
        payload: UpdateStatusPayload,
    ) -> Result<Application> {
        let mut tx = self.pool.begin().await?;

        let current = sqlx::query_as::<_, Application>(
            "SELECT * FROM applications WHERE id = $1 FOR UPDATE",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| Error::NotFound("Application not found".to_string()))?;

        if current.employer_id != employer_id {
            return Err(Error::Forbidden(
                "You can only manage applications to your own jobs.".to_string(),
            ));
        }
        if current.is_expired() {
            return Err(Error::BadRequest("Application has expired".to_string()));
        }
        if !can_transition(&current.status, &payload.status) {
            return Err(Error::BadRequest(format!(
                "Cannot move an application from '{}' to '{}'",
                current.status, payload.status
            )));
        }

        let response_time = current
            .response_time_hours
            .unwrap_or(current.age_hours() as i32);

        let application = match payload.status.as_str() {
            "shortlisted" => {
                sqlx::query_as::<_, Application>(
                    r#"
                    UPDATE applications
                    SET status = $2, shortlist_date = NOW(), shortlist_notes = $3,
                        response_time_hours = $4, updated_at = NOW()
                    WHERE id = $1
                    RETURNING *
                    "#,
                )
                .bind(id)
                .bind(&payload.status)
                .bind(&payload.notes)
                .bind(response_time)
                .fetch_one(&mut *tx)
                .await?
            }
            "interviewed" => {
                sqlx::query_as::<_, Application>(
                    r#"
                    UPDATE applications
                    SET status = $2, interview_date = COALESCE($3, NOW()), interview_location = $4,
                        interview_notes = $5, response_time_hours = $6, updated_at = NOW()
                    WHERE id = $1
                    RETURNING *
                    "#,
                )
                .bind(id)
                .bind(&payload.status)
                .bind(payload.interview_date)
                .bind(&payload.interview_location)
                .bind(&payload.notes)
                .bind(response_time)
                .fetch_one(&mut *tx)
                .await?
            }
            "hired" => {
                sqlx::query_as::<_, Application>(
                    r#"
                    UPDATE applications
                    SET status = $2, hire_date = NOW(), hire_notes = $3,
                        response_time_hours = $4, updated_at = NOW()
                    WHERE id = $1
                    RETURNING *
                    "#,
                )
                .bind(id)
                .bind(&payload.status)
                .bind(&payload.notes)
                .bind(response_time)
                .fetch_one(&mut *tx)
                .await?
            }
            "rejected" => {
                sqlx::query_as::<_, Application>(
                    r#"
                    UPDATE applications
                    SET status = $2, rejection_reason = $3,
                        response_time_hours = $4, updated_at = NOW()
                    WHERE id = $1
                    RETURNING *
                    "#,
                )
                .bind(id)
                .bind(&payload.status)
                .bind(&payload.rejection_reason)
                .bind(response_time)
                .fetch_one(&mut *tx)
                .await?
            }
            _ => {
                sqlx::query_as::<_, Application>(
                    r#"
                    UPDATE applications
                    SET status = $2, response_time_hours = $3, updated_at = NOW()
                    WHERE id = $1
                    RETURNING *
                    "#,
                )
                .bind(id)
                .bind(&payload.status)
                .bind(response_time)
                .fetch_one(&mut *tx)
                .await?
            }
        };

        match payload.status.as_str() {
            "shortlisted" => {
                sqlx::query(
                    "UPDATE jobs SET applications_shortlisted = applications_shortlisted + 1 WHERE id = $1",
                )
                .bind(current.job_id)
                .execute(&mut *tx)
                .await?;
            }
            "hired" => {
                sqlx::query(
                    "UPDATE jobs SET applications_hired = applications_hired + 1 WHERE id = $1",
                )
                .bind(current.job_id)
                .execute(&mut *tx)
                .await?;
            }
            _ => {}
        }

        tx.commit().await?;
        Ok(application)
    }

    pub async fn withdraw(&self, id: Uuid, worker_id: Uuid) -> Result<Application> {
        let current = self.get(id).await?;
        if current.worker_id != worker_id {
            return Err(Error::Forbidden(
                "You can only withdraw your own applications.".to_string(),
            ));
        }
        if !WITHDRAWABLE_FROM.contains(&current.status.as_str()) {
            return Err(Error::BadRequest(format!(
                "Cannot withdraw an application that is '{}'",
                current.status
            )));
        }

        let application = sqlx::query_as::<_, Application>(
            "UPDATE applications SET status = 'withdrawn', updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await?;
        Ok(application)
    }

    /// Hard delete, only while the employer has not looked at it yet.
    pub async fn delete(&self, id: Uuid, worker_id: Uuid) -> Result<()> {
        let current = self.get(id).await?;
        if current.worker_id != worker_id {
            return Err(Error::Forbidden(
                "You can only delete your own applications.".to_string(),
            ));
        }
        if current.status != "applied" {
            return Err(Error::BadRequest(
                "Only unreviewed applications can be deleted".to_string(),
            ));
        }

        let mut tx = self.pool.begin().await?;
        sqlx::query("DELETE FROM applications WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        sqlx::query(
            "UPDATE jobs SET applications_total = GREATEST(applications_total - 1, 0) WHERE id = $1",
        )
        .bind(current.job_id)
        .execute(&mut *tx)
        .await?;
        tx.commit().await?;
        Ok(())
    }

    pub async fn stats(&self, employer_id: Uuid) -> Result<ApplicationStatsResponse> {
        let by_status = sqlx::query_as::<_, ApplicationStatusCount>(
            r#"
            SELECT status, COUNT(*) AS count
            FROM applications
            WHERE employer_id = $1
            GROUP BY status
            ORDER BY count DESC
            "#,
        )
        .bind(employer_id)
        .fetch_all(&self.pool)
        .await?;

        let (total, average_response_time_hours): (i64, Option<f64>) = sqlx::query_as(
            "SELECT COUNT(*), AVG(response_time_hours)::float8 FROM applications WHERE employer_id = $1",
        )
        .bind(employer_id)
        .fetch_one(&self.pool)
        .await?;

        let recent = sqlx::query_as::<_, Application>(
            "SELECT * FROM applications WHERE employer_id = $1 ORDER BY created_at DESC LIMIT 5",
        )
        .bind(employer_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(ApplicationStatsResponse {
            total,
            by_status,
            average_response_time_hours,
            recent_applications: recent.into_iter().map(Into::into).collect(),
        })
    }
}
