//! Engine-level error types.

use nodes::{StepOutcome, TransportError, ValidationError};
use thiserror::Error;
use uuid::Uuid;

/// Failures of the persistence store collaborator.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("workflow not found")]
    NotFound,

    #[error("database error: {0}")]
    Database(db::DbError),

    /// The owner's counter row holds a value no sequence can come from.
    #[error("invalid workflow counter value {0}")]
    InvalidSequence(i32),

    /// A stored document could not be (de)serialised.
    #[error("malformed workflow document: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Errors produced by the workflow engine.
///
/// Node failures never appear here: they are folded into the run's verdict.
#[derive(Debug, Error)]
pub enum EngineError {
    // ------ Validation errors ------

    /// A node payload does not match its declared type.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Required workflow metadata is missing.
    #[error("workflow field '{0}' is required")]
    MissingField(&'static str),

    // ------ Lookup ------

    /// No workflow with this ID is visible to the caller.
    #[error("workflow {0} not found")]
    NotFound(Uuid),

    // ------ Infrastructure ------

    /// The store could not load or save a workflow.
    #[error("persistence error: {0}")]
    Persistence(#[from] StoreError),

    /// The run finished with `outcome` but the result could not be recorded.
    #[error("run finished as '{outcome}' but was not saved: {source}")]
    NotSaved {
        outcome: StepOutcome,
        #[source]
        source: StoreError,
    },

    /// No bearer token was configured for API steps.
    #[error("an API token is required")]
    MissingCredential,

    /// The HTTP transport could not be initialised.
    #[error("transport setup failed: {0}")]
    Transport(#[from] TransportError),
}
