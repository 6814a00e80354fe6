//! Node-level error types.

use thiserror::Error;

/// A node's payload does not match the shape its declared type requires.
///
/// Raised when a node is accepted into a workflow, never during execution.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required payload field is absent, empty, or malformed.
    #[error("node '{node_id}': invalid {field}: {reason}")]
    InvalidField {
        node_id: String,
        /// Dotted path of the offending field, e.g. `api.url`.
        field: &'static str,
        reason: String,
    },

    /// Two or more nodes in one sequence share the same ID.
    #[error("duplicate node ID: '{0}'")]
    DuplicateNodeId(String),

    /// A node ID is empty.
    #[error("node ID must not be empty")]
    EmptyNodeId,
}

impl ValidationError {
    pub(crate) fn field(node_id: &str, field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidField {
            node_id: node_id.to_owned(),
            field,
            reason: reason.into(),
        }
    }

    /// The dotted field path for [`ValidationError::InvalidField`], if any.
    pub fn field_name(&self) -> Option<&'static str> {
        match self {
            Self::InvalidField { field, .. } => Some(field),
            _ => None,
        }
    }
}

/// Why a node's execution did not succeed.
///
/// The step executor always reduces these to a `failed` outcome; they exist
/// so the reason can be logged.
#[derive(Debug, Error, Clone)]
pub enum NodeError {
    /// Email step with an empty address field.
    #[error("email address is empty")]
    EmptyEmail,

    /// The endpoint answered outside the 2xx range.
    #[error("endpoint returned HTTP {0}")]
    UnsuccessfulStatus(u16),

    /// The request never produced a response.
    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// Network-level failure raised by an [`HttpTransport`](crate::HttpTransport).
#[derive(Debug, Error, Clone)]
pub enum TransportError {
    /// DNS failure, refused or reset connection.
    #[error("connection failed: {0}")]
    Connect(String),

    /// The network layer gave up waiting.
    #[error("request timed out")]
    Timeout,

    /// The request could not be built or sent for another reason.
    #[error("request failed: {0}")]
    Other(String),
}
