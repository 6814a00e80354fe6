//! Workflow document operations.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::{models::WorkflowRow, DbError};

/// Insert a workflow, or replace the stored document if `id` already exists.
///
/// `document` must be a JSON object produced by serialising the domain
/// `Workflow` type from the `engine` crate.
pub async fn upsert_workflow(
    pool: &PgPool,
    id: Uuid,
    owner_id: Uuid,
    workflow_id: &str,
    name: &str,
    document: serde_json::Value,
    updated_at: DateTime<Utc>,
) -> Result<WorkflowRow, DbError> {
    let row = sqlx::query_as::<_, WorkflowRow>(
        r#"
        INSERT INTO workflows (id, owner_id, workflow_id, name, document, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6)
        ON CONFLICT (id) DO UPDATE
            SET name = EXCLUDED.name,
                document = EXCLUDED.document,
                updated_at = EXCLUDED.updated_at
        RETURNING id, owner_id, workflow_id, name, document, updated_at
        "#,
    )
    .bind(id)
    .bind(owner_id)
    .bind(workflow_id)
    .bind(name)
    .bind(document)
    .bind(updated_at)
    .fetch_one(pool)
    .await?;

    Ok(row)
}

/// Fetch a single workflow by its primary key.
pub async fn get_workflow(pool: &PgPool, id: Uuid) -> Result<WorkflowRow, DbError> {
    let row = sqlx::query_as::<_, WorkflowRow>(
        r#"SELECT id, owner_id, workflow_id, name, document, updated_at FROM workflows WHERE id = $1"#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or(DbError::NotFound)?;

    Ok(row)
}

/// Return the owner's workflows whose name or sequence contains `search`
/// (case-insensitive), most recently updated first.
pub async fn list_workflows(
    pool: &PgPool,
    owner_id: Uuid,
    search: &str,
) -> Result<Vec<WorkflowRow>, DbError> {
    let pattern = format!("%{}%", escape_like(search));

    let rows = sqlx::query_as::<_, WorkflowRow>(
        r#"
        SELECT id, owner_id, workflow_id, name, document, updated_at
        FROM workflows
        WHERE owner_id = $1
          AND (name ILIKE $2 OR workflow_id ILIKE $2)
        ORDER BY updated_at DESC
        "#,
    )
    .bind(owner_id)
    .bind(pattern)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Escape LIKE wildcards so `search` matches literally.
fn escape_like(search: &str) -> String {
    let mut out = String::with_capacity(search.len());
    for c in search.chars() {
        if matches!(c, '\\' | '%' | '_') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}
