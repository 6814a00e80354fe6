//! Step executor — runs exactly one node and reduces the result to pass/fail.
//!
//! Per-kind contract:
//! - `text`  always passes.
//! - `email` passes iff the address field is non-empty. No mail is sent and the
//!   address is not verified; this is a placeholder check, not a delivery guarantee.
//! - `api`   issues the request and passes iff the endpoint answers 2xx. Transport
//!   errors are caught here and become `failed`.
//!
//! Failures are never retried and never propagated.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::traits::{Credential, ExecutableNode, ExecutionContext};
use crate::transport::HttpTransport;
use crate::{NodeData, WorkflowNode};

/// Binary verdict of one node, or the AND of many.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepOutcome {
    Passed,
    Failed,
}

impl StepOutcome {
    pub fn is_passed(&self) -> bool {
        matches!(self, Self::Passed)
    }
}

impl fmt::Display for StepOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Passed => f.pad("passed"),
            Self::Failed => f.pad("failed"),
        }
    }
}

impl std::str::FromStr for StepOutcome {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "passed" => Ok(Self::Passed),
            "failed" => Ok(Self::Failed),
            other => Err(format!("unknown outcome: {other}")),
        }
    }
}

/// Dispatches a node to its kind's [`ExecutableNode`] implementation.
#[derive(Debug, Clone)]
pub struct StepExecutor {
    ctx: ExecutionContext,
}

impl StepExecutor {
    pub fn new(transport: Arc<dyn HttpTransport>, credential: Credential) -> Self {
        Self {
            ctx: ExecutionContext::new(transport, credential),
        }
    }

    pub fn context(&self) -> &ExecutionContext {
        &self.ctx
    }

    /// Execute one node. Infallible: every error maps to [`StepOutcome::Failed`].
    pub async fn execute(&self, node: &WorkflowNode) -> StepOutcome {
        let step: &dyn ExecutableNode = match &node.data {
            NodeData::Api(data) => data as &dyn ExecutableNode,
            NodeData::Email(data) => data as &dyn ExecutableNode,
            NodeData::Text(data) => data as &dyn ExecutableNode,
        };

        match step.execute(&self.ctx).await {
            Ok(()) => {
                debug!(node_id = %node.id, node_type = %node.node_type(), "step passed");
                StepOutcome::Passed
            }
            Err(err) => {
                warn!(node_id = %node.id, node_type = %node.node_type(), "step failed: {err}");
                StepOutcome::Failed
            }
        }
    }
}

// ============================================================
// Unit tests
// ============================================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockTransport;
    use crate::{EmailNodeData, HttpMethod, TextNodeData};

    fn executor(transport: &Arc<MockTransport>) -> StepExecutor {
        StepExecutor::new(transport.clone(), Credential::bearer("token"))
    }

    #[tokio::test]
    async fn text_always_passes_even_when_empty() {
        let transport = Arc::new(MockTransport::responding(500));
        let exec = executor(&transport);

        for message in ["hi", "", "   "] {
            let node = WorkflowNode::new(NodeData::Text(TextNodeData { message: message.into() }));
            assert_eq!(exec.execute(&node).await, StepOutcome::Passed);
        }
        assert_eq!(transport.call_count(), 0);
    }

    #[tokio::test]
    async fn email_fails_only_when_empty() {
        let transport = Arc::new(MockTransport::responding(200));
        let exec = executor(&transport);

        assert_eq!(exec.execute(&WorkflowNode::email("a@b.com")).await, StepOutcome::Passed);
        // Any non-empty value passes; syntax is checked at construction, not here.
        assert_eq!(exec.execute(&WorkflowNode::email("nope")).await, StepOutcome::Passed);
        assert_eq!(exec.execute(&WorkflowNode::email("")).await, StepOutcome::Failed);
        assert_eq!(transport.call_count(), 0);
    }

    #[tokio::test]
    async fn email_with_absent_field_fails() {
        let node: WorkflowNode = serde_json::from_value(serde_json::json!({
            "id": "e", "type": "email", "data": {}
        }))
        .unwrap();
        assert_eq!(node.data, NodeData::Email(EmailNodeData { email: String::new() }));

        let exec = executor(&Arc::new(MockTransport::responding(200)));
        assert_eq!(exec.execute(&node).await, StepOutcome::Failed);
    }

    #[tokio::test]
    async fn email_outcome_is_idempotent() {
        let exec = executor(&Arc::new(MockTransport::responding(200)));
        let node = WorkflowNode::email("a@b.com");
        let first = exec.execute(&node).await;
        let second = exec.execute(&node).await;
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn api_passes_on_2xx() {
        for status in [200, 201, 204] {
            let transport = Arc::new(MockTransport::responding(status));
            let node = WorkflowNode::api(HttpMethod::Get, "https://example.com");
            assert_eq!(executor(&transport).execute(&node).await, StepOutcome::Passed);
            assert_eq!(transport.call_count(), 1);
        }
    }

    #[tokio::test]
    async fn api_fails_outside_2xx() {
        for status in [301, 400, 404, 500, 503] {
            let transport = Arc::new(MockTransport::responding(status));
            let node = WorkflowNode::api(HttpMethod::Post, "https://example.com");
            assert_eq!(
                executor(&transport).execute(&node).await,
                StepOutcome::Failed,
                "status {status}"
            );
        }
    }

    #[tokio::test]
    async fn api_transport_error_becomes_failed() {
        let transport = Arc::new(MockTransport::failing("dns lookup failed"));
        let node = WorkflowNode::api(HttpMethod::Get, "https://unreachable.invalid");
        assert_eq!(executor(&transport).execute(&node).await, StepOutcome::Failed);
        assert_eq!(transport.call_count(), 1);
    }

    #[tokio::test]
    async fn api_request_carries_fixed_headers() {
        let transport = Arc::new(MockTransport::responding(200));
        let node = WorkflowNode::api(HttpMethod::Get, "https://example.com/ping");
        executor(&transport).execute(&node).await;

        let sent = transport.requests();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].url, "https://example.com/ping");
        assert_eq!(sent[0].headers["Content-Type"], "application/json");
        assert_eq!(sent[0].headers["Authorization"], "Bearer token");
    }

    #[test]
    fn outcome_parses_and_displays_lowercase() {
        assert_eq!("passed".parse::<StepOutcome>().unwrap(), StepOutcome::Passed);
        assert_eq!("failed".parse::<StepOutcome>().unwrap(), StepOutcome::Failed);
        assert!("pending".parse::<StepOutcome>().is_err());
        assert_eq!(StepOutcome::Failed.to_string(), "failed");
    }
}
