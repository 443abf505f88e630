use std::collections::HashMap;

use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::employer_dto::{EmployerListQuery, UpdateEmployerPayload, UpsertEmployerPayload};
use crate::dto::job_dto::CompanySummary;
use crate::dto::{ListResponse, PageParams};
use crate::error::{Error, Result};
use crate::models::employer::Employer;

#[derive(Clone)]
pub struct EmployerService {
    pool: PgPool,
}

impl EmployerService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn get(&self, id: Uuid) -> Result<Employer> {
        let employer = sqlx::query_as::<_, Employer>("SELECT * FROM employers WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| Error::NotFound("Employer not found".to_string()))?;
        Ok(employer)
    }

    pub async fn find_by_user(&self, user_id: Uuid) -> Result<Option<Employer>> {
        let employer = sqlx::query_as::<_, Employer>("SELECT * FROM employers WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(employer)
    }

    pub async fn upsert(&self, user_id: Uuid, payload: UpsertEmployerPayload) -> Result<Employer> {
        let employer = sqlx::query_as::<_, Employer>(
            r#"
            INSERT INTO employers (
                user_id, company_name, company_type, company_size, industry,
                description, website, contact_name, contact_designation, contact_phone,
                contact_email, city, state, pincode, gst_number,
                pan_number, year_established, employee_count
            ) VALUES (
                $1, $2, $3, $4, $5,
                $6, $7, $8, $9, $10,
                $11, $12, $13, $14, $15,
                $16, $17, $18
            )
            ON CONFLICT (user_id) DO UPDATE SET
                company_name = EXCLUDED.company_name,
                company_type = EXCLUDED.company_type,
                company_size = EXCLUDED.company_size,
                industry = EXCLUDED.industry,
                description = EXCLUDED.description,
                website = EXCLUDED.website,
                contact_name = EXCLUDED.contact_name,
                contact_designation = EXCLUDED.contact_designation,
                contact_phone = EXCLUDED.contact_phone,
                contact_email = EXCLUDED.contact_email,
                city = EXCLUDED.city,
                state = EXCLUDED.state,
                pincode = EXCLUDED.pincode,
                gst_number = EXCLUDED.gst_number,
                pan_number = EXCLUDED.pan_number,
                year_established = EXCLUDED.year_established,
                employee_count = EXCLUDED.employee_count,
                updated_at = NOW()
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(&payload.company_name)
        .bind(&payload.company_type)
        .bind(payload.company_size.as_deref().unwrap_or("small"))
        .bind(&payload.industry)
        .bind(&payload.description)
        .bind(&payload.website)
        .bind(&payload.contact_name)
        .bind(&payload.contact_designation)
        .bind(&payload.contact_phone)
        .bind(&payload.contact_email)
        .bind(&payload.city)
        .bind(&payload.state)
        .bind(&payload.pincode)
        .bind(&payload.gst_number)
        .bind(&payload.pan_number)
        .bind(payload.year_established)
        .bind(payload.employee_count)
        .fetch_one(&self.pool)
        .await?;

        self.store_completion(employer).await
    }

    pub async fn update(&self, id: Uuid, payload: UpdateEmployerPayload) -> Result<Employer> {
        let employer = sqlx::query_as::<_, Employer>(
            r#"
            UPDATE employers
            SET
                company_name = COALESCE($2, company_name),
                company_type = COALESCE($3, company_type),
                company_size = COALESCE($4, company_size),
                industry = COALESCE($5, industry),
                description = COALESCE($6, description),
                website = COALESCE($7, website),
                contact_name = COALESCE($8, contact_name),
                contact_designation = COALESCE($9, contact_designation),
                contact_phone = COALESCE($10, contact_phone),
                contact_email = COALESCE($11, contact_email),
                city = COALESCE($12, city),
                state = COALESCE($13, state),
                pincode = COALESCE($14, pincode),
                gst_number = COALESCE($15, gst_number),
                pan_number = COALESCE($16, pan_number),
                year_established = COALESCE($17, year_established),
                employee_count = COALESCE($18, employee_count),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&payload.company_name)
        .bind(&payload.company_type)
        .bind(&payload.company_size)
        .bind(&payload.industry)
        .bind(&payload.description)
        .bind(&payload.website)
        .bind(&payload.contact_name)
        .bind(&payload.contact_designation)
        .bind(&payload.contact_phone)
        .bind(&payload.contact_email)
        .bind(&payload.city)
        .bind(&payload.state)
        .bind(&payload.pincode)
        .bind(&payload.gst_number)
        .bind(&payload.pan_number)
        .bind(payload.year_established)
        .bind(payload.employee_count)
        .fetch_one(&self.pool)
        .await?;

        self.store_completion(employer).await
    }

    pub async fn list(&self, query: EmployerListQuery) -> Result<ListResponse<Employer>> {
        let params = PageParams::clamp(query.page, query.per_page, 20);

        let mut conditions = vec!["TRUE".to_string()];
        let mut args: Vec<String> = Vec::new();

        if let Some(industry) = query.industry.filter(|s| !s.is_empty()) {
            args.push(format!("%{}%", industry));
            conditions.push(format!("industry ILIKE ${}", args.len()));
        }
        if let Some(city) = query.city.filter(|s| !s.is_empty()) {
            args.push(format!("%{}%", city));
            conditions.push(format!("city ILIKE ${}", args.len()));
        }
        if let Some(verified) = query.verified {
            args.push(verified.to_string());
            conditions.push(format!("is_verified = ${}::boolean", args.len()));
        }

        let where_clause = format!("WHERE {}", conditions.join(" AND "));

        let count_sql = format!("SELECT COUNT(*) FROM employers {}", where_clause);
        let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql);
        for arg in &args {
            count_query = count_query.bind(arg);
        }
        let total = count_query.fetch_one(&self.pool).await?;

        let list_sql = format!(
            r#"
            SELECT * FROM employers
            {}
            ORDER BY average_rating DESC, created_at DESC
            LIMIT ${} OFFSET ${}
            "#,
            where_clause,
            args.len() + 1,
            args.len() + 2,
        );
        let mut list_query = sqlx::query_as::<_, Employer>(&list_sql);
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

    pub async fn set_logo(&self, user_id: Uuid, path: &str) -> Result<()> {
        sqlx::query("UPDATE employers SET logo = $2, updated_at = NOW() WHERE user_id = $1")
            .bind(user_id)
            .bind(path)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    pub async fn delete(&self, id: Uuid) -> Result<()> {
        sqlx::query("DELETE FROM employers WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Company snippets for a batch of employer ids, used when decorating job
    /// listings.
    pub async fn summaries(&self, ids: &[Uuid]) -> Result<HashMap<Uuid, CompanySummary>> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        let rows = sqlx::query_as::<_, CompanySummary>(
            r#"
            SELECT id, company_name, company_type, industry, city, is_verified
            FROM employers
            WHERE id = ANY($1)
            "#,
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(|s| (s.id, s)).collect())
    }

    async fn store_completion(&self, mut employer: Employer) -> Result<Employer> {
        let completion = employer.completion();
        sqlx::query("UPDATE employers SET profile_completion = $2 WHERE id = $1")
            .bind(employer.id)
            .bind(completion)
            .execute(&self.pool)
            .await?;
        sqlx::query("UPDATE users SET profile_completed = $2, updated_at = NOW() WHERE id = $1")
            .bind(employer.user_id)
            .bind(completion == 100)
            .execute(&self.pool)
            .await?;
        employer.profile_completion = completion;
        Ok(employer)
    }
}
