use async_trait::async_trait;
use uuid::Uuid;

use db::DbPool;

use super::WorkflowStore;
use crate::models::{UserId, Workflow};
use crate::StoreError;

/// Postgres-backed store. The aggregate is kept as a JSONB document.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl From<db::DbError> for StoreError {
    fn from(err: db::DbError) -> Self {
        match err {
            db::DbError::NotFound => StoreError::NotFound,
            other => StoreError::Database(other),
        }
    }
}

#[async_trait]
impl WorkflowStore for PgStore {
    async fn load(&self, id: Uuid) -> Result<Workflow, StoreError> {
        let row = db::repository::workflows::get_workflow(&self.pool, id).await?;
        Ok(serde_json::from_value(row.document)?)
    }

    async fn save(&self, workflow: &Workflow) -> Result<(), StoreError> {
        let document = serde_json::to_value(workflow)?;
        db::repository::workflows::upsert_workflow(
            &self.pool,
            workflow.id,
            workflow.owner.0,
            &workflow.workflow_id,
            &workflow.name,
            document,
            workflow.updated_at,
        )
        .await?;
        Ok(())
    }

    async fn list(&self, owner: UserId, search: &str) -> Result<Vec<Workflow>, StoreError> {
        let rows = db::repository::workflows::list_workflows(&self.pool, owner.0, search.trim()).await?;
        rows.into_iter()
            .map(|row| serde_json::from_value(row.document).map_err(StoreError::from))
            .collect()
    }

    async fn next_sequence(&self, owner: UserId) -> Result<u32, StoreError> {
        let count = db::repository::counters::next_workflow_sequence(&self.pool, owner.0).await?;
        sequence_from_counter(count)
    }
}

/// Counters start at 1; anything below is a corrupt row.
fn sequence_from_counter(count: i32) -> Result<u32, StoreError> {
    match u32::try_from(count) {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(StoreError::InvalidSequence(count)),
    }
}
