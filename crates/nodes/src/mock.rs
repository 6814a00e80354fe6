//! `MockTransport` — a test double for `HttpTransport`.
//!
//! Useful in unit and integration tests where a real endpoint is either
//! unavailable or irrelevant.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::Barrier;

use crate::transport::{HttpRequest, HttpResponse, HttpTransport};
use crate::TransportError;

/// Behaviour injected into `MockTransport` at construction time.
pub enum MockBehaviour {
    /// Answer every request with this status code.
    Respond(u16),
    /// Fail every request with a connection error.
    Fail(String),
    /// Wait until `barrier` releases, then answer with `status`.
    ///
    /// A barrier sized to N only releases once N requests are in flight at
    /// the same time, which makes sequential dispatch observable as a hang.
    Gate { barrier: Arc<Barrier>, status: u16 },
}

/// A mock transport that records every request it receives.
pub struct MockTransport {
    pub behaviour: MockBehaviour,
    /// All requests seen (in call order).
    pub calls: Arc<Mutex<Vec<HttpRequest>>>,
}

impl MockTransport {
    fn with(behaviour: MockBehaviour) -> Self {
        Self {
            behaviour,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Create a mock that always answers with `status`.
    pub fn responding(status: u16) -> Self {
        Self::with(MockBehaviour::Respond(status))
    }

    /// Create a mock whose every request fails at the network level.
    pub fn failing(msg: impl Into<String>) -> Self {
        Self::with(MockBehaviour::Fail(msg.into()))
    }

    /// Create a mock that only answers once `parties` requests are waiting.
    pub fn gated(parties: usize, status: u16) -> Self {
        Self::with(MockBehaviour::Gate {
            barrier: Arc::new(Barrier::new(parties)),
            status,
        })
    }

    /// Number of requests received so far.
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Snapshot of the requests received so far.
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl HttpTransport for MockTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        self.calls.lock().unwrap().push(request);

        match &self.behaviour {
            MockBehaviour::Respond(status) => Ok(HttpResponse {
                status: *status,
                body: String::new(),
            }),
            MockBehaviour::Fail(msg) => Err(TransportError::Connect(msg.clone())),
            MockBehaviour::Gate { barrier, status } => {
                barrier.wait().await;
                Ok(HttpResponse {
                    status: *status,
                    body: String::new(),
                })
            }
        }
    }
}
