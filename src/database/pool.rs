use crate::config::get_config;
use crate::error::Result;
use sqlx::{postgres::PgPoolOptions, PgPool};
use std::time::Duration;

/// Connection acquisition has to fail fast so request handlers surface a
/// database outage instead of hanging until the HTTP client gives up.
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);

pub async fn create_pool() -> Result<PgPool> {
    let config = get_config();
    let pool = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .acquire_timeout(ACQUIRE_TIMEOUT)
        .connect(&config.database_url)
        .await?;
    Ok(pool)
}

#[cfg(test)]
mod tests {
    const INIT_MIGRATION: &str = include_str!("../../migrations/20240601120000_init.sql");

    #[test]
    fn dependent_rows_cascade_on_profile_delete() {
        assert!(INIT_MIGRATION
            .contains("employer_id UUID NOT NULL REFERENCES employers (id) ON DELETE CASCADE"));
        assert!(INIT_MIGRATION
            .contains("worker_id UUID NOT NULL REFERENCES workers (id) ON DELETE CASCADE"));
        assert!(
            INIT_MIGRATION.contains("job_id UUID NOT NULL REFERENCES jobs (id) ON DELETE CASCADE")
        );
    }
}
