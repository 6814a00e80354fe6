//! Engine configuration.

use std::sync::Arc;
use std::time::Duration;

use nodes::{Credential, ReqwestTransport, StepExecutor};

use crate::runner::WorkflowRunner;
use crate::service::WorkflowService;
use crate::store::WorkflowStore;
use crate::EngineError;

/// Credential and tuning knobs for the step executor's network layer.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Bearer token attached to every API step.
    pub api_token: String,
    /// Upper bound for a whole API step request.
    pub request_timeout: Option<Duration>,
    pub connect_timeout: Option<Duration>,
}

impl EngineConfig {
    /// A config for `api_token` with the default timeouts (30s request, 10s connect).
    pub fn new(api_token: impl Into<String>) -> Self {
        Self {
            api_token: api_token.into(),
            request_timeout: Some(Duration::from_secs(30)),
            connect_timeout: Some(Duration::from_secs(10)),
        }
    }

    /// Build a step executor backed by a real HTTP client.
    ///
    /// # Errors
    /// [`EngineError::MissingCredential`] when the token is blank.
    pub fn step_executor(&self) -> Result<StepExecutor, EngineError> {
        if self.api_token.trim().is_empty() {
            return Err(EngineError::MissingCredential);
        }
        let transport = ReqwestTransport::new(self.request_timeout, self.connect_timeout)?;
        Ok(StepExecutor::new(
            Arc::new(transport),
            Credential::bearer(self.api_token.clone()),
        ))
    }

    /// Wire a [`WorkflowService`] over `store`.
    pub fn build_service(&self, store: Arc<dyn WorkflowStore>) -> Result<WorkflowService, EngineError> {
        let runner = WorkflowRunner::new(self.step_executor()?);
        Ok(WorkflowService::new(store, runner))
    }
}
