//! Core domain models for the workflow engine.
//!
//! These types are the source of truth for what a workflow looks like
//! in memory.  They serialise to the camelCase JSON document stored in the
//! `document` column of the `workflows` table and returned by the API.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use nodes::{validate_nodes, StepOutcome, WorkflowNode};

use crate::EngineError;

// ---------------------------------------------------------------------------
// UserId
// ---------------------------------------------------------------------------

/// An already-authenticated account identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub Uuid);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for UserId {
    type Err = uuid::Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

// ---------------------------------------------------------------------------
// Author / StatusHistoryEntry
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Author {
    pub first_name: String,
    pub last_name: String,
}

/// One recorded verdict. Timestamps serialise as RFC 3339.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusHistoryEntry {
    pub status: StepOutcome,
    pub timestamp: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// NewWorkflow
// ---------------------------------------------------------------------------

/// A workflow as submitted for creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewWorkflow {
    pub name: String,
    pub description: String,
    pub author: Author,
    #[serde(default)]
    pub nodes: Vec<WorkflowNode>,
}

impl NewWorkflow {
    /// Check metadata and every node payload.
    ///
    /// # Errors
    /// - [`EngineError::MissingField`] for blank name, description or author names.
    /// - [`EngineError::Validation`] for the first invalid node.
    pub fn validate(&self) -> Result<(), EngineError> {
        let required = [
            ("name", &self.name),
            ("description", &self.description),
            ("author.firstName", &self.author.first_name),
            ("author.lastName", &self.author.last_name),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(EngineError::MissingField(field));
            }
        }
        validate_nodes(&self.nodes)?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Workflow
// ---------------------------------------------------------------------------

/// A persisted workflow with its verdict history.
///
/// `status` and `status_history` are only changed through
/// [`ledger::record`](crate::ledger::record), which keeps them in step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Workflow {
    /// Storage key.
    pub id: Uuid,
    /// Human-facing per-owner sequence, e.g. `"001"`.
    pub workflow_id: String,
    #[serde(rename = "userId")]
    pub owner: UserId,
    pub name: String,
    pub description: String,
    pub author: Author,
    pub nodes: Vec<WorkflowNode>,
    #[serde(default)]
    pub(crate) status: Option<StepOutcome>,
    #[serde(default)]
    pub(crate) status_history: Vec<StatusHistoryEntry>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Workflow {
    /// Build a never-run workflow from a validated draft.
    pub fn new(owner: UserId, sequence: u32, draft: NewWorkflow, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            workflow_id: format_sequence(sequence),
            owner,
            name: draft.name,
            description: draft.description,
            author: draft.author,
            nodes: draft.nodes,
            status: None,
            status_history: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Latest aggregate verdict; `None` until the first run.
    pub fn status(&self) -> Option<StepOutcome> {
        self.status
    }

    /// Every verdict ever recorded, oldest first.
    pub fn status_history(&self) -> &[StatusHistoryEntry] {
        &self.status_history
    }

    /// Case-insensitive substring match on name or sequence; empty matches all.
    pub fn matches_search(&self, search: &str) -> bool {
        let needle = search.trim().to_lowercase();
        needle.is_empty()
            || self.name.to_lowercase().contains(&needle)
            || self.workflow_id.to_lowercase().contains(&needle)
    }
}

/// Render a per-owner counter as a zero-padded identifier.
pub fn format_sequence(n: u32) -> String {
    format!("{n:03}")
}
