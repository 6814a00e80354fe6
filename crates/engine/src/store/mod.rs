//! Persistence store — where workflows are loaded from and saved to.
//!
//! The engine only needs `load`, `save`, `list` and a per-owner counter;
//! how those are backed is up to the implementation.

mod memory;
mod postgres;

pub use memory::InMemoryStore;
pub use postgres::PgStore;

use async_trait::async_trait;
use uuid::Uuid;

use crate::models::{UserId, Workflow};
use crate::StoreError;

#[async_trait]
pub trait WorkflowStore: Send + Sync {
    /// Fetch a workflow by storage key.
    async fn load(&self, id: Uuid) -> Result<Workflow, StoreError>;

    /// Insert or replace a workflow.
    async fn save(&self, workflow: &Workflow) -> Result<(), StoreError>;

    /// The owner's workflows matching `search` (see [`Workflow::matches_search`]),
    /// most recently updated first.
    async fn list(&self, owner: UserId, search: &str) -> Result<Vec<Workflow>, StoreError>;

    /// Increment and return the owner's workflow counter, starting at 1.
    async fn next_sequence(&self, owner: UserId) -> Result<u32, StoreError>;
}
