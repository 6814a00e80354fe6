//! Postgres pool and the embedded schema migrations.
//!
//! The schema has two tables: `workflows` (one JSONB document per workflow,
//! plus the owner/sequence/name/updated_at columns used for listing) and
//! `workflow_counters` (the per-owner sequence behind `workflowId`).

use std::time::Duration;

use sqlx::migrate::Migrator;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::info;

use crate::DbError;

pub type DbPool = PgPool;

/// Migrations from the workspace `migrations/` directory, embedded at build time.
pub static MIGRATOR: Migrator = sqlx::migrate!("../../migrations");

/// How long a request may wait for a free connection before failing.
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);

/// Connect to `database_url` with at most `max_connections` connections.
pub async fn create_pool(database_url: &str, max_connections: u32) -> Result<DbPool, DbError> {
    info!(max_connections, "connecting to workflow database");
    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(ACQUIRE_TIMEOUT)
        .connect(database_url)
        .await?;
    Ok(pool)
}

/// Bring the `workflows` / `workflow_counters` schema up to date.
pub async fn run_migrations(pool: &DbPool) -> Result<(), DbError> {
    info!(migrations = MIGRATOR.iter().count(), "applying workflow schema migrations");
    MIGRATOR.run(pool).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_migration_is_embedded() {
        let descriptions: Vec<_> = MIGRATOR.iter().map(|m| m.description.to_string()).collect();
        assert_eq!(descriptions, ["init"]);
    }
}
