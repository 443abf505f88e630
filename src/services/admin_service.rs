use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::admin_dto::{
    AdminEmployerQuery, AdminJobQuery, AdminUserQuery, AdminWorkerQuery, OverviewResponse,
    PlatformCounts,
};
use crate::dto::{ListResponse, PageParams};
use crate::error::{Error, Result};
use crate::models::employer::Employer;
use crate::models::job::Job;
use crate::models::user::User;
use crate::models::worker::Worker;

#[derive(Clone)]
pub struct AdminService {
    pool: PgPool,
}

impl AdminService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn overview(&self) -> Result<OverviewResponse> {
        let counts = sqlx::query_as::<_, PlatformCounts>(
            r#"
            SELECT
                (SELECT COUNT(*) FROM users) AS total_users,
                (SELECT COUNT(*) FROM workers) AS total_workers,
                (SELECT COUNT(*) FROM employers) AS total_employers,
                (SELECT COUNT(*) FROM jobs) AS total_jobs,
                (SELECT COUNT(*) FROM jobs WHERE status = 'active' AND expires_at > NOW()) AS active_jobs,
                (SELECT COUNT(*) FROM applications) AS total_applications,
                (SELECT COUNT(*) FROM applications WHERE status = 'applied') AS pending_applications,
                (SELECT COUNT(*) FROM applications WHERE status = 'hired') AS hired_applications,
                (SELECT COUNT(*) FROM documents WHERE status = 'pending') AS pending_documents
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        let recent_users = sqlx::query_as::<_, User>(
            "SELECT * FROM users ORDER BY created_at DESC LIMIT 5",
        )
        .fetch_all(&self.pool)
        .await?;

        let recent_jobs = sqlx::query_as::<_, Job>(
            "SELECT * FROM jobs ORDER BY created_at DESC LIMIT 5",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(OverviewResponse {
            counts,
            recent_users: recent_users.into_iter().map(Into::into).collect(),
            recent_jobs: recent_jobs.into_iter().map(Into::into).collect(),
        })
    }

    pub async fn get_user(&self, id: Uuid) -> Result<User> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| Error::NotFound("User not found".to_string()))?;
        Ok(user)
    }

    pub async fn list_users(&self, query: AdminUserQuery) -> Result<ListResponse<User>> {
        let params = PageParams::clamp(query.page, query.per_page, 20);

        let mut conditions = vec!["TRUE".to_string()];
        let mut args: Vec<String> = Vec::new();

        if let Some(role) = query.role.filter(|s| !s.is_empty()) {
            args.push(role);
            conditions.push(format!("role = ${}", args.len()));
        }
        if let Some(status) = query.status.filter(|s| !s.is_empty()) {
            args.push(status);
            conditions.push(format!("status = ${}", args.len()));
        }
        if let Some(search) = query.search.filter(|s| !s.is_empty()) {
            args.push(format!("%{}%", search));
            conditions.push(format!("phone LIKE ${}", args.len()));
        }

        let where_clause = format!("WHERE {}", conditions.join(" AND "));
        self.paged::<User>("users", &where_clause, &args, "created_at DESC", params)
            .await
    }

    /// Suspending or banning a user takes effect on their next request; the
    /// auth middleware refuses non-active accounts.
    pub async fn set_user_status(&self, id: Uuid, status: &str) -> Result<User> {
        let user = sqlx::query_as::<_, User>(
            "UPDATE users SET status = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(status)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| Error::NotFound("User not found".to_string()))?;
        Ok(user)
    }

    pub async fn list_workers(&self, query: AdminWorkerQuery) -> Result<ListResponse<Worker>> {
        let params = PageParams::clamp(query.page, query.per_page, 20);

        let mut conditions = vec!["TRUE".to_string()];
        let mut args: Vec<String> = Vec::new();

        if let Some(city) = query.city.filter(|s| !s.is_empty()) {
            args.push(format!("%{}%", city));
            conditions.push(format!("city ILIKE ${}", args.len()));
        }
        if let Some(status) = query.status.filter(|s| !s.is_empty()) {
            args.push(status);
            conditions.push(format!("status = ${}", args.len()));
        }
        if let Some(verified) = query.verified {
            args.push(verified.to_string());
            conditions.push(format!("aadhaar_verified = ${}::boolean", args.len()));
        }

        let where_clause = format!("WHERE {}", conditions.join(" AND "));
        self.paged::<Worker>("workers", &where_clause, &args, "created_at DESC", params)
            .await
    }

    pub async fn list_employers(&self, query: AdminEmployerQuery) -> Result<ListResponse<Employer>> {
        let params = PageParams::clamp(query.page, query.per_page, 20);

        let mut conditions = vec!["TRUE".to_string()];
        let mut args: Vec<String> = Vec::new();

        if let Some(industry) = query.industry.filter(|s| !s.is_empty()) {
            args.push(format!("%{}%", industry));
            conditions.push(format!("industry ILIKE ${}", args.len()));
        }
        if let Some(verified) = query.verified {
            args.push(verified.to_string());
            conditions.push(format!("is_verified = ${}::boolean", args.len()));
        }

        let where_clause = format!("WHERE {}", conditions.join(" AND "));
        self.paged::<Employer>("employers", &where_clause, &args, "created_at DESC", params)
            .await
    }

    pub async fn list_jobs(&self, query: AdminJobQuery) -> Result<ListResponse<Job>> {
        let params = PageParams::clamp(query.page, query.per_page, 20);

        let mut conditions = vec!["TRUE".to_string()];
        let mut args: Vec<String> = Vec::new();

        if let Some(status) = query.status.filter(|s| !s.is_empty()) {
            args.push(status);
            conditions.push(format!("status = ${}", args.len()));
        }
        if let Some(category) = query.category.filter(|s| !s.is_empty()) {
            args.push(category);
            conditions.push(format!("category = ${}", args.len()));
        }

        let where_clause = format!("WHERE {}", conditions.join(" AND "));
        self.paged::<Job>("jobs", &where_clause, &args, "created_at DESC", params)
            .await
    }

    async fn paged<T>(
        &self,
        table: &str,
        where_clause: &str,
        args: &[String],
        order_by: &str,
        params: PageParams,
    ) -> Result<ListResponse<T>>
    where
        T: for<'r> sqlx::FromRow<'r, sqlx::postgres::PgRow> + Send + Unpin,
    {
        let count_sql = format!("SELECT COUNT(*) FROM {} {}", table, where_clause);
        let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql);
        for arg in args {
            count_query = count_query.bind(arg);
        }
        let total = count_query.fetch_one(&self.pool).await?;

        let list_sql = format!(
            "SELECT * FROM {} {} ORDER BY {} LIMIT ${} OFFSET ${}",
            table,
            where_clause,
            order_by,
            args.len() + 1,
            args.len() + 2,
        );
        let mut list_query = sqlx::query_as::<_, T>(&list_sql);
        for arg in args {
            list_query = list_query.bind(arg);
        }
        let items = list_query
            .bind(params.per_page)
            .bind(params.offset())
            .fetch_all(&self.pool)
            .await?;

        Ok(ListResponse::new(items, total, params.page, params.per_page))
    }
}
