use axum::{
    body::Bytes,
    extract::{Path, State},
    Json,
};
use engine::{NodeReport, StatusHistoryEntry, StepOutcome};
use nodes::WorkflowNode;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{decode_json, AppState, CurrentUser};
use crate::ApiError;

/// Optional body of a run request.
#[derive(Debug, Default, Deserialize)]
pub struct RunRequest {
    /// Evaluate these instead of the stored nodes (which stay unchanged).
    #[serde(default)]
    pub nodes: Option<Vec<WorkflowNode>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunResponse {
    pub id: Uuid,
    pub workflow_id: String,
    pub status: StepOutcome,
    /// The entry appended by this run.
    pub status_history: StatusHistoryEntry,
    pub nodes: Vec<NodeReport>,
}

pub async fn run(
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<RunResponse>, ApiError> {
    // An empty body runs the stored nodes.
    let request: RunRequest = if body.iter().all(u8::is_ascii_whitespace) {
        RunRequest::default()
    } else {
        decode_json(&body)?
    };
    let record = state.service.run(user, id, request.nodes).await?;

    Ok(Json(RunResponse {
        id: record.workflow.id,
        workflow_id: record.workflow.workflow_id,
        status: record.entry.status,
        status_history: record.entry,
        nodes: record.report.nodes,
    }))
}
