//! Row structs that map 1-to-1 onto database tables.
//!
//! These are *persistence* models — they carry no domain behaviour.
//! Domain types live in the `engine` crate.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

// ---------------------------------------------------------------------------
// workflows
// ---------------------------------------------------------------------------

/// A persisted workflow row.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct WorkflowRow {
    pub id: Uuid,
    pub owner_id: Uuid,
    /// Human-facing per-owner sequence, e.g. `"007"`.
    pub workflow_id: String,
    pub name: String,
    /// Full JSON workflow document (nodes, status, status history, …)
    pub document: serde_json::Value,
    pub updated_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// workflow_counters
// ---------------------------------------------------------------------------

/// Per-owner counter backing the human-facing workflow sequence.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct WorkflowCounterRow {
    pub owner_id: Uuid,
    pub workflow_count: i32,
}
