//! `engine` crate — the workflow aggregate, runner, status ledger and the
//! run/create pipeline over a pluggable store.

pub mod config;
pub mod error;
pub mod ledger;
pub mod models;
pub mod runner;
pub mod service;
pub mod store;

pub use config::EngineConfig;
pub use error::{EngineError, StoreError};
pub use models::{Author, NewWorkflow, StatusHistoryEntry, UserId, Workflow};
pub use nodes::StepOutcome;
pub use runner::{aggregate, NodeReport, RunReport, WorkflowRunner};
pub use service::{RunRecord, WorkflowService};
pub use store::{InMemoryStore, PgStore, WorkflowStore};
