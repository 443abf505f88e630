use chrono::{Duration, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::dto::job_dto::{CreateJobPayload, JobListQuery, JobStatsResponse, MyJobsQuery, StatusCount, UpdateJobPayload};
use crate::dto::{ListResponse, PageParams};
use crate::error::{Error, Result};
use crate::models::employer::Employer;
use crate::models::job::{Job, DEFAULT_EXPIRY_DAYS, SORTABLE_FIELDS};
use crate::utils::validation::shift_duration_hours;

#[derive(Clone)]
pub struct JobService {
    pool: PgPool,
}

/// Shared WHERE clause for the public listing, applied to both the count and
/// the page query. City and state widen each other when both are supplied, so
/// "Pune, Maharashtra" also surfaces postings elsewhere in the state.
fn push_public_filters(qb: &mut QueryBuilder<Postgres>, query: &JobListQuery, skills: &[String]) {
    qb.push(" FROM jobs WHERE status = 'active' AND is_public AND expires_at > NOW()");
    let city = query.city.as_deref().filter(|s| !s.is_empty());
    let state = query.state.as_deref().filter(|s| !s.is_empty());
    match (city, state) {
        (Some(city), Some(state)) => {
            qb.push(" AND (city ILIKE ")
                .push_bind(format!("%{}%", city))
                .push(" OR state ILIKE ")
                .push_bind(format!("%{}%", state))
                .push(")");
        }
        (Some(city), None) => {
            qb.push(" AND city ILIKE ").push_bind(format!("%{}%", city));
        }
        (None, Some(state)) => {
            qb.push(" AND state ILIKE ").push_bind(format!("%{}%", state));
        }
        (None, None) => {}
    }
    if let Some(category) = query.category.as_ref().filter(|s| !s.is_empty()) {
        qb.push(" AND category = ").push_bind(category.clone());
    }
    if !skills.is_empty() {
        qb.push(" AND skills && ").push_bind(skills.to_vec());
    }
    if let Some(min_wage) = query.min_wage {
        qb.push(" AND wage_per_day >= ").push_bind(min_wage);
    }
    if let Some(max_wage) = query.max_wage {
        qb.push(" AND wage_per_day <= ").push_bind(max_wage);
    }
    if let Some(worker_type) = query.worker_type.as_ref().filter(|s| !s.is_empty()) {
        qb.push(" AND worker_type = ").push_bind(worker_type.clone());
    }
    if let Some(search) = query.search.as_ref().filter(|s| !s.is_empty()) {
        let pattern = format!("%{}%", search);
        qb.push(" AND (title ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR description ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR work_site ILIKE ")
            .push_bind(pattern)
            .push(")");
    }
}

impl JobService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, employer: &Employer, payload: CreateJobPayload) -> Result<Job> {
        if !employer.can_post_jobs() {
            return Err(Error::Forbidden(
                "Complete your company profile before posting jobs.".to_string(),
            ));
        }
        let duration = shift_duration_hours(&payload.shift_start, &payload.shift_end)
            .ok_or_else(|| Error::BadRequest("Shift end must be after shift start".to_string()))?;
        let expires_at = payload.expires_at.unwrap_or_else(|| {
            let start = payload
                .start_date
                .and_hms_opt(0, 0, 0)
                .map(|dt| dt.and_utc())
                .unwrap_or_else(Utc::now);
            start + Duration::days(DEFAULT_EXPIRY_DAYS)
        });

        let job = sqlx::query_as::<_, Job>(
            r#"
            INSERT INTO jobs (
                employer_id, title, description, category, skills,
                worker_type, min_experience, education, age_min, age_max,
                city, state, work_site, wage_per_day, overtime_rate,
                payment_frequency, headcount, shift_start, shift_end, shift_duration_hours,
                work_days, start_date, end_date, is_urgent, accommodation,
                food, transport, priority, expires_at
            ) VALUES (
                $1, $2, $3, $4, $5,
                $6, $7, $8, $9, $10,
                $11, $12, $13, $14, $15,
                $16, $17, $18, $19, $20,
                $21, $22, $23, $24, $25,
                $26, $27, $28, $29
            )
            RETURNING *
            "#,
        )
        .bind(employer.id)
        .bind(&payload.title)
        .bind(&payload.description)
        .bind(&payload.category)
        .bind(&payload.skills)
        .bind(&payload.worker_type)
        .bind(payload.min_experience.unwrap_or(0))
        .bind(payload.education.as_deref().unwrap_or("any"))
        .bind(payload.age_min.unwrap_or(18))
        .bind(payload.age_max.unwrap_or(60))
        .bind(&payload.city)
        .bind(&payload.state)
        .bind(&payload.work_site)
        .bind(payload.wage_per_day)
        .bind(payload.overtime_rate.unwrap_or(0.0))
        .bind(payload.payment_frequency.as_deref().unwrap_or("daily"))
        .bind(payload.headcount)
        .bind(&payload.shift_start)
        .bind(&payload.shift_end)
        .bind(duration)
        .bind(&payload.work_days)
        .bind(payload.start_date)
        .bind(payload.end_date)
        .bind(payload.is_urgent.unwrap_or(false))
        .bind(payload.accommodation.as_deref().unwrap_or("none"))
        .bind(payload.food.as_deref().unwrap_or("none"))
        .bind(payload.transport.as_deref().unwrap_or("none"))
        .bind(payload.priority.as_deref().unwrap_or("normal"))
        .bind(expires_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(job)
    }

    /// Public marketplace listing. Expired postings stay in storage and are
    /// filtered out here at query time.
    pub async fn list_public(&self, query: JobListQuery) -> Result<ListResponse<Job>> {
        let params = PageParams::clamp(query.page, query.per_page, 20);

        let skills: Vec<String> = query
            .skills
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let mut count_builder: QueryBuilder<Postgres> = QueryBuilder::new("SELECT COUNT(*)");
        push_public_filters(&mut count_builder, &query, &skills);
        let total: i64 = count_builder
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await?;

        let sort_by = query
            .sort_by
            .as_deref()
            .filter(|s| SORTABLE_FIELDS.contains(s))
            .unwrap_or("created_at");
        let order = match query.order.as_deref() {
            Some("asc") => "ASC",
            _ => "DESC",
        };

        let mut list_builder: QueryBuilder<Postgres> = QueryBuilder::new("SELECT *");
        push_public_filters(&mut list_builder, &query, &skills);
        list_builder.push(format!(" ORDER BY {} {}", sort_by, order));
        list_builder.push(" LIMIT ").push_bind(params.per_page);
        list_builder.push(" OFFSET ").push_bind(params.offset());
        let items = list_builder
            .build_query_as::<Job>()
            .fetch_all(&self.pool)
            .await?;

        Ok(ListResponse::new(items, total, params.page, params.per_page))
    }

    /// Counts a signed-in browse as a view on every returned posting.
    pub async fn bump_views(&self, ids: &[Uuid]) -> Result<()> {
        if ids.is_empty() {
            return Ok(());
        }
        sqlx::query("UPDATE jobs SET views = views + 1 WHERE id = ANY($1)")
            .bind(ids)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    pub async fn get(&self, id: Uuid) -> Result<Job> {
        let job = sqlx::query_as::<_, Job>("SELECT * FROM jobs WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| Error::NotFound("Job not found".to_string()))?;
        Ok(job)
    }

    /// Marketplace detail view. Private, inactive and expired postings look
    /// like 404s to the public; a signed-in viewer counts as a view.
    pub async fn get_public(&self, id: Uuid, authenticated: bool) -> Result<Job> {
        let mut job = self.get(id).await?;
        if !job.is_publicly_visible() {
            return Err(Error::NotFound("Job not found".to_string()));
        }
        if authenticated {
            sqlx::query("UPDATE jobs SET views = views + 1 WHERE id = $1")
                .bind(id)
                .execute(&self.pool)
                .await?;
            job.views += 1;
        }
        Ok(job)
    }

    pub async fn update(&self, id: Uuid, employer_id: Uuid, payload: UpdateJobPayload) -> Result<Job> {
        let current = self.get(id).await?;
        if current.employer_id != employer_id {
            return Err(Error::Forbidden(
                "You can only modify your own job postings.".to_string(),
            ));
        }

        let shift_start = payload.shift_start.clone().unwrap_or(current.shift_start);
        let shift_end = payload.shift_end.clone().unwrap_or(current.shift_end);
        let duration = shift_duration_hours(&shift_start, &shift_end)
            .ok_or_else(|| Error::BadRequest("Shift end must be after shift start".to_string()))?;

        let job = sqlx::query_as::<_, Job>(
            r#"
            UPDATE jobs
            SET
                title = COALESCE($2, title),
                description = COALESCE($3, description),
                skills = COALESCE($4, skills),
                min_experience = COALESCE($5, min_experience),
                wage_per_day = COALESCE($6, wage_per_day),
                headcount = COALESCE($7, headcount),
                shift_start = $8,
                shift_end = $9,
                shift_duration_hours = $10,
                work_days = COALESCE($11, work_days),
                end_date = COALESCE($12, end_date),
                is_urgent = COALESCE($13, is_urgent),
                priority = COALESCE($14, priority),
                status = COALESCE($15, status),
                expires_at = COALESCE($16, expires_at),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&payload.title)
        .bind(&payload.description)
        .bind(&payload.skills)
        .bind(payload.min_experience)
        .bind(payload.wage_per_day)
        .bind(payload.headcount)
        .bind(&shift_start)
        .bind(&shift_end)
        .bind(duration)
        .bind(&payload.work_days)
        .bind(payload.end_date)
        .bind(payload.is_urgent)
        .bind(&payload.priority)
        .bind(&payload.status)
        .bind(payload.expires_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(job)
    }

    /// Closing keeps the row so application history stays intact.
    pub async fn soft_close(&self, id: Uuid, employer_id: Uuid) -> Result<()> {
        let current = self.get(id).await?;
        if current.employer_id != employer_id {
            return Err(Error::Forbidden(
                "You can only modify your own job postings.".to_string(),
            ));
        }
        sqlx::query("UPDATE jobs SET status = 'closed', updated_at = NOW() WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    pub async fn my_jobs(&self, employer_id: Uuid, query: MyJobsQuery) -> Result<ListResponse<Job>> {
        let params = PageParams::clamp(query.page, query.per_page, 20);

        let (total, items) = match query.status.filter(|s| !s.is_empty()) {
            Some(status) => {
                let total: i64 = sqlx::query_scalar(
                    "SELECT COUNT(*) FROM jobs WHERE employer_id = $1 AND status = $2",
                )
                .bind(employer_id)
                .bind(&status)
                .fetch_one(&self.pool)
                .await?;
                let items = sqlx::query_as::<_, Job>(
                    r#"
                    SELECT * FROM jobs
                    WHERE employer_id = $1 AND status = $2
                    ORDER BY created_at DESC
                    LIMIT $3 OFFSET $4
                    "#,
                )
                .bind(employer_id)
                .bind(&status)
                .bind(params.per_page)
                .bind(params.offset())
                .fetch_all(&self.pool)
                .await?;
                (total, items)
            }
            None => {
                let total: i64 =
                    sqlx::query_scalar("SELECT COUNT(*) FROM jobs WHERE employer_id = $1")
                        .bind(employer_id)
                        .fetch_one(&self.pool)
                        .await?;
                let items = sqlx::query_as::<_, Job>(
                    r#"
                    SELECT * FROM jobs
                    WHERE employer_id = $1
                    ORDER BY created_at DESC
                    LIMIT $2 OFFSET $3
                    "#,
                )
                .bind(employer_id)
                .bind(params.per_page)
                .bind(params.offset())
                .fetch_all(&self.pool)
                .await?;
                (total, items)
            }
        };

        Ok(ListResponse::new(items, total, params.page, params.per_page))
    }

    pub async fn list_employer_jobs(&self, employer_id: Uuid) -> Result<Vec<Job>> {
        let items = sqlx::query_as::<_, Job>(
            "SELECT * FROM jobs WHERE employer_id = $1 ORDER BY created_at DESC",
        )
        .bind(employer_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(items)
    }

    /// Newest urgent postings still open for applications.
    pub async fn urgent(&self) -> Result<Vec<Job>> {
        let items = sqlx::query_as::<_, Job>(
            r#"
            SELECT * FROM jobs
            WHERE (is_urgent OR priority = 'urgent')
              AND status = 'active' AND is_public AND expires_at > NOW()
            ORDER BY created_at DESC
            LIMIT 20
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(items)
    }

    pub async fn stats(&self, employer_id: Uuid) -> Result<JobStatsResponse> {
        let by_status = sqlx::query_as::<_, StatusCount>(
            r#"
            SELECT status, COUNT(*) AS count
            FROM jobs
            WHERE employer_id = $1
            GROUP BY status
            ORDER BY count DESC
            "#,
        )
        .bind(employer_id)
        .fetch_all(&self.pool)
        .await?;

        let (total_jobs, total_views, total_applications, total_hired): (i64, i64, i64, i64) =
            sqlx::query_as(
                r#"
                SELECT
                    COUNT(*),
                    COALESCE(SUM(views), 0)::bigint,
                    COALESCE(SUM(applications_total), 0)::bigint,
                    COALESCE(SUM(applications_hired), 0)::bigint
                FROM jobs
                WHERE employer_id = $1
                "#,
            )
            .bind(employer_id)
            .fetch_one(&self.pool)
            .await?;

        let recent = sqlx::query_as::<_, Job>(
            "SELECT * FROM jobs WHERE employer_id = $1 ORDER BY created_at DESC LIMIT 5",
        )
        .bind(employer_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(JobStatsResponse {
            total_jobs,
            by_status,
            total_views,
            total_applications,
            total_hired,
            recent_jobs: recent.into_iter().map(Into::into).collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn city_and_state_widen_each_other() {
        let query = JobListQuery {
            city: Some("Pune".into()),
            state: Some("Maharashtra".into()),
            ..Default::default()
        };
        let mut qb: QueryBuilder<Postgres> = QueryBuilder::new("SELECT COUNT(*)");
        push_public_filters(&mut qb, &query, &[]);
        assert!(qb.sql().contains("AND (city ILIKE $1 OR state ILIKE $2)"));
    }

    #[test]
    fn lone_location_filter_stays_narrow() {
        let query = JobListQuery {
            city: Some("Pune".into()),
            ..Default::default()
        };
        let mut qb: QueryBuilder<Postgres> = QueryBuilder::new("SELECT COUNT(*)");
        push_public_filters(&mut qb, &query, &[]);
        let sql = qb.sql().to_string();
        assert!(sql.contains("AND city ILIKE $1"));
        assert!(!sql.contains("OR state ILIKE"));
    }

    #[test]
    fn blank_location_params_are_ignored() {
        let query = JobListQuery {
            city: Some(String::new()),
            state: Some(String::new()),
            ..Default::default()
        };
        let mut qb: QueryBuilder<Postgres> = QueryBuilder::new("SELECT COUNT(*)");
        push_public_filters(&mut qb, &query, &[]);
        assert!(!qb.sql().contains("ILIKE"));
    }
}
