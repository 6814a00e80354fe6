//! Workflow runner — evaluates every node of a sequence and AND-reduces.
//!
//! All nodes are started together and awaited together (fan-out / fan-in).
//! A failing node neither cancels its siblings nor stops the run early, so
//! every node's outcome is observed.

use futures::future::join_all;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use nodes::{NodeType, StepExecutor, StepOutcome, WorkflowNode};

/// Outcome of one node within a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeReport {
    pub node_id: String,
    pub node_type: NodeType,
    pub outcome: StepOutcome,
}

/// Aggregate verdict plus per-node outcomes, in sequence order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunReport {
    pub outcome: StepOutcome,
    pub nodes: Vec<NodeReport>,
}

/// `Passed` iff every outcome is `Passed`. Empty input is `Passed`.
pub fn aggregate(outcomes: impl IntoIterator<Item = StepOutcome>) -> StepOutcome {
    if outcomes.into_iter().all(|o| o.is_passed()) {
        StepOutcome::Passed
    } else {
        StepOutcome::Failed
    }
}

/// Runs node sequences through a [`StepExecutor`].
#[derive(Debug, Clone)]
pub struct WorkflowRunner {
    executor: StepExecutor,
}

impl WorkflowRunner {
    pub fn new(executor: StepExecutor) -> Self {
        Self { executor }
    }

    /// Evaluate all `nodes` concurrently and reduce to one verdict.
    #[instrument(skip(self, nodes), fields(nodes = nodes.len()))]
    pub async fn run(&self, nodes: &[WorkflowNode]) -> RunReport {
        let outcomes = join_all(nodes.iter().map(|node| self.executor.execute(node))).await;

        let reports: Vec<NodeReport> = nodes
            .iter()
            .zip(outcomes)
            .map(|(node, outcome)| NodeReport {
                node_id: node.id.clone(),
                node_type: node.node_type(),
                outcome,
            })
            .collect();

        let outcome = aggregate(reports.iter().map(|r| r.outcome));
        let failed = reports.iter().filter(|r| !r.outcome.is_passed()).count();
        info!("run settled: {} ({} of {} nodes failed)", outcome, failed, reports.len());

        RunReport {
            outcome,
            nodes: reports,
        }
    }
}
