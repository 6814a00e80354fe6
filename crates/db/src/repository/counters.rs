//! Per-owner workflow counters.

use sqlx::PgPool;
use uuid::Uuid;

use crate::DbError;

/// Atomically increment and return the owner's workflow counter.
///
/// The first call for an owner returns `1`.
pub async fn next_workflow_sequence(pool: &PgPool, owner_id: Uuid) -> Result<i32, DbError> {
    let count: i32 = sqlx::query_scalar(
        r#"
        INSERT INTO workflow_counters (owner_id, workflow_count)
        VALUES ($1, 1)
        ON CONFLICT (owner_id)
        DO UPDATE SET workflow_count = workflow_counters.workflow_count + 1
        RETURNING workflow_count
        "#,
    )
    .bind(owner_id)
    .fetch_one(pool)
    .await?;

    Ok(count)
}
