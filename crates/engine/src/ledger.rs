//! Status ledger — the append-only verdict history of a workflow.
//!
//! [`record`] is the only writer of `Workflow::status` and
//! `Workflow::status_history`; it overwrites the one and appends to the other
//! in a single step, so `status` always equals the newest entry's status.

use chrono::{DateTime, Utc};

use nodes::StepOutcome;

use crate::models::{StatusHistoryEntry, Workflow};

/// Apply a run's verdict to `workflow` and return the appended entry.
///
/// If `now` is earlier than the newest entry (the clock stepped back), the
/// newest timestamp is reused so history never goes backwards.
pub fn record(workflow: &mut Workflow, outcome: StepOutcome, now: DateTime<Utc>) -> StatusHistoryEntry {
    let timestamp = match workflow.status_history.last() {
        Some(last) if last.timestamp > now => last.timestamp,
        _ => now,
    };

    let entry = StatusHistoryEntry {
        status: outcome,
        timestamp,
    };
    workflow.status = Some(outcome);
    workflow.status_history.push(entry);
    workflow.updated_at = workflow.updated_at.max(timestamp);

    entry
}

/// The most recently appended entry, if the workflow has ever run.
pub fn latest(workflow: &Workflow) -> Option<&StatusHistoryEntry> {
    workflow.status_history.last()
}

/// `true` when `status` mirrors the newest history entry.
pub fn is_consistent(workflow: &Workflow) -> bool {
    workflow.status == latest(workflow).map(|e| e.status)
}
