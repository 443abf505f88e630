use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::worker_dto::{JobHistoryItem, UpdateWorkerPayload, UpsertWorkerPayload, WorkerListQuery};
use crate::dto::{ListResponse, PageParams};
use crate::error::{Error, Result};
use crate::models::worker::Worker;

#[derive(Clone)]
pub struct WorkerService {
    pool: PgPool,
}

impl WorkerService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn get(&self, id: Uuid) -> Result<Worker> {
        let worker = sqlx::query_as::<_, Worker>("SELECT * FROM workers WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| Error::NotFound("Worker not found".to_string()))?;
        Ok(worker)
    }

    pub async fn find_by_user(&self, user_id: Uuid) -> Result<Option<Worker>> {
        let worker = sqlx::query_as::<_, Worker>("SELECT * FROM workers WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(worker)
    }

    /// Creates or replaces the caller's profile, then recomputes the
    /// completion percentage from the stored row.
    pub async fn upsert(&self, user_id: Uuid, payload: UpsertWorkerPayload) -> Result<Worker> {
        let worker = sqlx::query_as::<_, Worker>(
            r#"
            INSERT INTO workers (
                user_id, first_name, last_name, date_of_birth, gender,
                city, state, pincode, skills, languages,
                total_experience, education, min_wage_per_day, max_wage_per_day,
                availability, preferred_cities, work_radius_km, aadhaar_number, pan_number
            ) VALUES (
                $1, $2, $3, $4, $5,
                $6, $7, $8, $9, $10,
                $11, $12, $13, $14,
                $15, $16, $17, $18, $19
            )
            ON CONFLICT (user_id) DO UPDATE SET
                first_name = EXCLUDED.first_name,
                last_name = EXCLUDED.last_name,
                date_of_birth = EXCLUDED.date_of_birth,
                gender = EXCLUDED.gender,
                city = EXCLUDED.city,
                state = EXCLUDED.state,
                pincode = EXCLUDED.pincode,
                skills = EXCLUDED.skills,
                languages = EXCLUDED.languages,
                total_experience = EXCLUDED.total_experience,
                education = EXCLUDED.education,
                min_wage_per_day = EXCLUDED.min_wage_per_day,
                max_wage_per_day = EXCLUDED.max_wage_per_day,
                availability = EXCLUDED.availability,
                preferred_cities = EXCLUDED.preferred_cities,
                work_radius_km = EXCLUDED.work_radius_km,
                aadhaar_number = EXCLUDED.aadhaar_number,
                pan_number = EXCLUDED.pan_number,
                updated_at = NOW()
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(&payload.first_name)
        .bind(&payload.last_name)
        .bind(payload.date_of_birth)
        .bind(&payload.gender)
        .bind(&payload.city)
        .bind(&payload.state)
        .bind(&payload.pincode)
        .bind(&payload.skills)
        .bind(&payload.languages)
        .bind(payload.total_experience)
        .bind(payload.education.as_deref().unwrap_or("secondary"))
        .bind(payload.min_wage_per_day)
        .bind(payload.max_wage_per_day)
        .bind(payload.availability.as_deref().unwrap_or("immediate"))
        .bind(&payload.preferred_cities)
        .bind(payload.work_radius_km.unwrap_or(25))
        .bind(&payload.aadhaar_number)
        .bind(&payload.pan_number)
        .fetch_one(&self.pool)
        .await?;

        self.store_completion(worker).await
    }

    pub async fn update(&self, id: Uuid, payload: UpdateWorkerPayload) -> Result<Worker> {
        let worker = sqlx::query_as::<_, Worker>(
            r#"
            UPDATE workers
            SET
                first_name = COALESCE($2, first_name),
                last_name = COALESCE($3, last_name),
                date_of_birth = COALESCE($4, date_of_birth),
                gender = COALESCE($5, gender),
                city = COALESCE($6, city),
                state = COALESCE($7, state),
                pincode = COALESCE($8, pincode),
                skills = COALESCE($9, skills),
                languages = COALESCE($10, languages),
                total_experience = COALESCE($11, total_experience),
                education = COALESCE($12, education),
                min_wage_per_day = COALESCE($13, min_wage_per_day),
                max_wage_per_day = COALESCE($14, max_wage_per_day),
                availability = COALESCE($15, availability),
                preferred_cities = COALESCE($16, preferred_cities),
                work_radius_km = COALESCE($17, work_radius_km),
                aadhaar_number = COALESCE($18, aadhaar_number),
                pan_number = COALESCE($19, pan_number),
                status = COALESCE($20, status),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&payload.first_name)
        .bind(&payload.last_name)
        .bind(payload.date_of_birth)
        .bind(&payload.gender)
        .bind(&payload.city)
        .bind(&payload.state)
        .bind(&payload.pincode)
        .bind(&payload.skills)
        .bind(&payload.languages)
        .bind(payload.total_experience)
        .bind(&payload.education)
        .bind(payload.min_wage_per_day)
        .bind(payload.max_wage_per_day)
        .bind(&payload.availability)
        .bind(&payload.preferred_cities)
        .bind(payload.work_radius_km)
        .bind(&payload.aadhaar_number)
        .bind(&payload.pan_number)
        .bind(&payload.status)
        .fetch_one(&self.pool)
        .await?;

        self.store_completion(worker).await
    }

    /// Ranked directory of workers. City matches are case-insensitive
    /// substrings; skill is an array containment check.
    pub async fn list(&self, query: WorkerListQuery) -> Result<ListResponse<Worker>> {
        let params = PageParams::clamp(query.page, query.per_page, 20);

        let mut conditions = vec!["status <> 'suspended'".to_string()];
        let mut args: Vec<String> = Vec::new();

        if let Some(skill) = query.skill.filter(|s| !s.is_empty()) {
            args.push(skill);
            conditions.push(format!("${} = ANY(skills)", args.len()));
        }
        if let Some(city) = query.city.filter(|s| !s.is_empty()) {
            args.push(format!("%{}%", city));
            conditions.push(format!("city ILIKE ${}", args.len()));
        }
        if let Some(min_experience) = query.min_experience {
            args.push(min_experience.to_string());
            conditions.push(format!("total_experience >= ${}::int", args.len()));
        }
        if let Some(availability) = query.availability.filter(|s| !s.is_empty()) {
            args.push(availability);
            conditions.push(format!("availability = ${}", args.len()));
        }
        if let Some(verified) = query.verified {
            args.push(verified.to_string());
            conditions.push(format!("aadhaar_verified = ${}::boolean", args.len()));
        }

        let where_clause = format!("WHERE {}", conditions.join(" AND "));

        let count_sql = format!("SELECT COUNT(*) FROM workers {}", where_clause);
        let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql);
        for arg in &args {
            count_query = count_query.bind(arg);
        }
        let total = count_query.fetch_one(&self.pool).await?;

        let list_sql = format!(
            r#"
            SELECT * FROM workers
            {}
            ORDER BY average_rating DESC, total_experience DESC
            LIMIT ${} OFFSET ${}
            "#,
            where_clause,
            args.len() + 1,
            args.len() + 2,
        );
        let mut list_query = sqlx::query_as::<_, Worker>(&list_sql);
        for arg in &args {
            list_query = list_query.bind(arg);
        }
        let items = list_query
            .bind(params.per_page)
            .bind(params.offset())
            .fetch_all(&self.pool)
            .await?;

        Ok(ListResponse::new(items, total, params.page, params.per_page))
    }

    pub async fn set_availability(&self, id: Uuid, availability: &str) -> Result<Worker> {
        let worker = sqlx::query_as::<_, Worker>(
            r#"
            UPDATE workers
            SET availability = $2, last_active = NOW(), updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(availability)
        .fetch_one(&self.pool)
        .await?;
        Ok(worker)
    }

    pub async fn set_profile_picture(&self, user_id: Uuid, path: &str) -> Result<()> {
        sqlx::query("UPDATE workers SET profile_picture = $2, updated_at = NOW() WHERE user_id = $1")
            .bind(user_id)
            .bind(path)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    pub async fn delete(&self, id: Uuid) -> Result<()> {
        sqlx::query("DELETE FROM workers WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Engagements the worker was hired for, newest first.
    pub async fn job_history(&self, id: Uuid) -> Result<Vec<JobHistoryItem>> {
        let items = sqlx::query_as::<_, JobHistoryItem>(
            r#"
            SELECT
                j.id AS job_id,
                j.title,
                e.company_name,
                j.wage_per_day,
                j.start_date,
                j.end_date,
                a.hire_date
            FROM applications a
            JOIN jobs j ON j.id = a.job_id
            JOIN employers e ON e.id = j.employer_id
            WHERE a.worker_id = $1 AND a.status = 'hired'
            ORDER BY a.hire_date DESC NULLS LAST
            "#,
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;
        Ok(items)
    }

    /// Persists the recomputed completion and flips the user's flag at 100.
    async fn store_completion(&self, mut worker: Worker) -> Result<Worker> {
        let completion = worker.completion();
        sqlx::query("UPDATE workers SET profile_completion = $2 WHERE id = $1")
            .bind(worker.id)
            .bind(completion)
            .execute(&self.pool)
            .await?;
        sqlx::query("UPDATE users SET profile_completed = $2, updated_at = NOW() WHERE id = $1")
            .bind(worker.user_id)
            .bind(completion == 100)
            .execute(&self.pool)
            .await?;
        worker.profile_completion = completion;
        Ok(worker)
    }
}
