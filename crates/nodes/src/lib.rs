//! `nodes` crate — the workflow node model and the step executor.
//!
//! Every node kind implements [`ExecutableNode`]; [`StepExecutor`] dispatches
//! a [`WorkflowNode`] to its kind exhaustively and reduces the result to a
//! [`StepOutcome`].

pub mod error;
pub mod executor;
pub mod mock;
pub mod model;
pub mod traits;
pub mod transport;

pub use error::{NodeError, TransportError, ValidationError};
pub use executor::{StepExecutor, StepOutcome};
pub use model::{
    validate_nodes, ApiNodeData, EmailNodeData, HttpMethod, NodeData, NodeType, TextNodeData,
    WorkflowNode,
};
pub use traits::{Credential, ExecutableNode, ExecutionContext};
pub use transport::{HttpRequest, HttpResponse, HttpTransport, ReqwestTransport};
