use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

use super::WorkflowStore;
use crate::models::{UserId, Workflow};
use crate::StoreError;

/// Process-local store, used for tests and database-less serving.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    workflows: RwLock<HashMap<Uuid, Workflow>>,
    counters: Mutex<HashMap<UserId, u32>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl WorkflowStore for InMemoryStore {
    async fn load(&self, id: Uuid) -> Result<Workflow, StoreError> {
        self.workflows
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn save(&self, workflow: &Workflow) -> Result<(), StoreError> {
        self.workflows
            .write()
            .await
            .insert(workflow.id, workflow.clone());
        Ok(())
    }

    async fn list(&self, owner: UserId, search: &str) -> Result<Vec<Workflow>, StoreError> {
        let mut found: Vec<Workflow> = self
            .workflows
            .read()
            .await
            .values()
            .filter(|wf| wf.owner == owner && wf.matches_search(search))
            .cloned()
            .collect();
        found.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(found)
    }

    async fn next_sequence(&self, owner: UserId) -> Result<u32, StoreError> {
        let mut counters = self.counters.lock().await;
        let count = counters.entry(owner).or_insert(0);
        *count += 1;
        Ok(*count)
    }
}
