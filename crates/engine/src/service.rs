//! Workflow service — the create and run pipelines.
//!
//! `WorkflowService::run` is the single entry point for executing a stored
//! workflow:
//! 1. Loads the workflow (only the owner can see it).
//! 2. Runs every node concurrently through the `WorkflowRunner`.
//! 3. Applies the verdict through the status ledger.
//! 4. Saves the workflow; a failed save is the only error a finished run reports.
//!
//! Runs of the same workflow are serialised by a per-workflow async lock held
//! from load to save, so two overlapping runs each append their own entry.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::Utc;
use serde::Serialize;
use tracing::{error, info, instrument};
use uuid::Uuid;

use nodes::{validate_nodes, WorkflowNode};

use crate::ledger;
use crate::models::{NewWorkflow, StatusHistoryEntry, UserId, Workflow};
use crate::runner::{RunReport, WorkflowRunner};
use crate::store::WorkflowStore;
use crate::{EngineError, StoreError};

/// Everything a completed, persisted run produced.
#[derive(Debug, Clone, Serialize)]
pub struct RunRecord {
    /// The workflow as saved after the run.
    pub workflow: Workflow,
    pub report: RunReport,
    /// The history entry this run appended.
    pub entry: StatusHistoryEntry,
}

type RunLocks = Mutex<HashMap<Uuid, Arc<tokio::sync::Mutex<()>>>>;

pub struct WorkflowService {
    store: Arc<dyn WorkflowStore>,
    runner: WorkflowRunner,
    run_locks: RunLocks,
}

impl WorkflowService {
    pub fn new(store: Arc<dyn WorkflowStore>, runner: WorkflowRunner) -> Self {
        Self {
            store,
            runner,
            run_locks: Mutex::new(HashMap::new()),
        }
    }

    pub fn runner(&self) -> &WorkflowRunner {
        &self.runner
    }

    /// Validate and persist a new workflow for `owner`.
    ///
    /// The workflow starts with no status and an empty history.
    ///
    /// # Errors
    /// Validation errors for the draft, or `Persistence` if the store fails.
    #[instrument(skip(self, draft), fields(owner = %owner, nodes = draft.nodes.len()))]
    pub async fn create(&self, owner: UserId, draft: NewWorkflow) -> Result<Workflow, EngineError> {
        draft.validate()?;

        let sequence = self.store.next_sequence(owner).await?;
        let workflow = Workflow::new(owner, sequence, draft, Utc::now());
        self.store.save(&workflow).await?;

        info!("created workflow {} ({})", workflow.workflow_id, workflow.id);
        Ok(workflow)
    }

    /// Fetch one of `owner`'s workflows.
    pub async fn get(&self, owner: UserId, id: Uuid) -> Result<Workflow, EngineError> {
        let workflow = self.store.load(id).await.map_err(|err| match err {
            StoreError::NotFound => EngineError::NotFound(id),
            other => EngineError::Persistence(other),
        })?;

        if workflow.owner != owner {
            return Err(EngineError::NotFound(id));
        }
        Ok(workflow)
    }

    /// `owner`'s workflows whose name or sequence contains `search`.
    pub async fn list(&self, owner: UserId, search: &str) -> Result<Vec<Workflow>, EngineError> {
        Ok(self.store.list(owner, search).await?)
    }

    /// Execute a stored workflow and record the verdict.
    ///
    /// `nodes_override`, when given, is validated and executed instead of the
    /// stored sequence; the stored `nodes` are never modified.
    ///
    /// # Errors
    /// - `Validation` if `nodes_override` is invalid (nothing runs).
    /// - `NotFound` if the workflow does not exist or belongs to someone else.
    /// - `NotSaved` if the run finished but could not be persisted.
    #[instrument(skip(self, nodes_override), fields(workflow = %id, owner = %owner))]
    pub async fn run(
        &self,
        owner: UserId,
        id: Uuid,
        nodes_override: Option<Vec<WorkflowNode>>,
    ) -> Result<RunRecord, EngineError> {
        if let Some(nodes) = &nodes_override {
            validate_nodes(nodes)?;
        }

        // Declared before the guard so it drops after it, on every exit path,
        // including cancellation of this future.
        let slot = self.run_slot(id);
        let _guard = slot.lock.lock().await;
        self.run_locked(owner, id, nodes_override).await
    }

    async fn run_locked(
        &self,
        owner: UserId,
        id: Uuid,
        nodes_override: Option<Vec<WorkflowNode>>,
    ) -> Result<RunRecord, EngineError> {
        let mut workflow = self.get(owner, id).await?;

        let nodes = nodes_override.as_deref().unwrap_or(&workflow.nodes);
        let report = self.runner.run(nodes).await;

        let entry = ledger::record(&mut workflow, report.outcome, Utc::now());

        if let Err(source) = self.store.save(&workflow).await {
            error!("run of {} finished as '{}' but save failed: {}", id, report.outcome, source);
            return Err(EngineError::NotSaved {
                outcome: report.outcome,
                source,
            });
        }

        info!(
            "workflow {} run recorded: {} (history: {} entries)",
            workflow.workflow_id,
            entry.status,
            workflow.status_history().len()
        );

        Ok(RunRecord {
            workflow,
            report,
            entry,
        })
    }

    // -----------------------------------------------------------------------
    // Per-workflow run locks
    // -----------------------------------------------------------------------

    fn run_slot(&self, id: Uuid) -> RunSlot<'_> {
        let mut locks = self.run_locks.lock().unwrap_or_else(|e| e.into_inner());
        let lock = locks.entry(id).or_default().clone();
        RunSlot {
            locks: &self.run_locks,
            id,
            lock,
        }
    }

    /// Number of workflows with a run in progress or waiting.
    #[cfg(test)]
    pub(crate) fn active_run_locks(&self) -> usize {
        self.run_locks.lock().unwrap_or_else(|e| e.into_inner()).len()
    }
}

/// A claim on one workflow's run lock. Dropping the last claim removes the
/// map entry.
struct RunSlot<'a> {
    locks: &'a RunLocks,
    id: Uuid,
    lock: Arc<tokio::sync::Mutex<()>>,
}

impl Drop for RunSlot<'_> {
    fn drop(&mut self) {
        let mut locks = self.locks.lock().unwrap_or_else(|e| e.into_inner());
        // One reference in the map, one in this slot.
        if Arc::strong_count(&self.lock) <= 2 {
            locks.remove(&self.id);
        }
    }
}
