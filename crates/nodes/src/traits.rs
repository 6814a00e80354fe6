//! The `ExecutableNode` trait — the contract every payload kind must fulfil.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;

use crate::transport::{HttpRequest, HttpTransport};
use crate::{ApiNodeData, EmailNodeData, HttpMethod, NodeError, TextNodeData};

/// Bearer credential attached to every API step.
///
/// Supplied by the caller; `Debug` never prints the secret.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn bearer(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn token(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}

/// Shared context passed to every node during execution.
#[derive(Clone)]
pub struct ExecutionContext {
    pub transport: Arc<dyn HttpTransport>,
    pub credential: Credential,
}

impl ExecutionContext {
    pub fn new(transport: Arc<dyn HttpTransport>, credential: Credential) -> Self {
        Self { transport, credential }
    }
}

impl fmt::Debug for ExecutionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExecutionContext")
            .field("credential", &self.credential)
            .finish_non_exhaustive()
    }
}

/// The core node trait: run the step, `Ok` on success.
#[async_trait]
pub trait ExecutableNode: Send + Sync {
    async fn execute(&self, ctx: &ExecutionContext) -> Result<(), NodeError>;
}

// ---------------------------------------------------------------------------
// Built-in kinds
// ---------------------------------------------------------------------------

#[async_trait]
impl ExecutableNode for TextNodeData {
    async fn execute(&self, _ctx: &ExecutionContext) -> Result<(), NodeError> {
        Ok(())
    }
}

/// No mail is sent: the step counts as satisfied when an address is present.
#[async_trait]
impl ExecutableNode for EmailNodeData {
    async fn execute(&self, _ctx: &ExecutionContext) -> Result<(), NodeError> {
        if self.email.is_empty() {
            return Err(NodeError::EmptyEmail);
        }
        Ok(())
    }
}

#[async_trait]
impl ExecutableNode for ApiNodeData {
    async fn execute(&self, ctx: &ExecutionContext) -> Result<(), NodeError> {
        let request = self.to_request(&ctx.credential);
        let response = ctx.transport.send(request).await?;
        if !response.is_success() {
            return Err(NodeError::UnsuccessfulStatus(response.status));
        }
        Ok(())
    }
}

impl ApiNodeData {
    /// Assemble the outbound request.
    ///
    /// Caller headers go in first; `Content-Type` and `Authorization` are set
    /// afterwards and replace any caller value. The body is dropped for GET.
    pub fn to_request(&self, credential: &Credential) -> HttpRequest {
        let mut headers: BTreeMap<String, String> = self
            .headers
            .iter()
            .flatten()
            .filter(|(name, _)| {
                !name.eq_ignore_ascii_case("content-type")
                    && !name.eq_ignore_ascii_case("authorization")
            })
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        headers.insert("Content-Type".into(), "application/json".into());
        headers.insert(
            "Authorization".into(),
            format!("Bearer {}", credential.token()),
        );

        let body = match self.method {
            HttpMethod::Get => None,
            _ => self.body.clone(),
        };

        HttpRequest {
            method: self.method,
            url: self.url.clone(),
            headers,
            body,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api(method: HttpMethod, body: Option<&str>) -> ApiNodeData {
        let mut headers = BTreeMap::new();
        headers.insert("X-Custom".to_string(), "yes".to_string());
        headers.insert("content-type".to_string(), "text/plain".to_string());
        headers.insert("AUTHORIZATION".to_string(), "Basic abc".to_string());
        ApiNodeData {
            method,
            url: "https://example.com/x".into(),
            headers: Some(headers),
            body: body.map(str::to_owned),
        }
    }

    fn token() -> Credential {
        Credential::bearer("t0k")
    }

    #[test]
    fn fixed_headers_replace_caller_values() {
        let req = api(HttpMethod::Post, None).to_request(&token());
        assert_eq!(req.headers["Content-Type"], "application/json");
        assert_eq!(req.headers["Authorization"], "Bearer t0k");
        assert_eq!(req.headers["X-Custom"], "yes");
        assert!(!req.headers.contains_key("content-type"));
        assert!(!req.headers.contains_key("AUTHORIZATION"));
    }

    #[test]
    fn every_method_carries_the_bearer_credential() {
        let mut node = api(HttpMethod::Get, None);
        node.headers = None;
        for method in [HttpMethod::Get, HttpMethod::Post, HttpMethod::Delete] {
            node.method = method;
            let req = node.to_request(&token());
            assert_eq!(req.headers["Authorization"], "Bearer t0k", "method {method}");
        }
    }

    #[test]
    fn body_is_dropped_for_get() {
        let req = api(HttpMethod::Get, Some("{}")).to_request(&token());
        assert_eq!(req.body, None);
    }

    #[test]
    fn body_is_sent_verbatim_for_other_methods() {
        for method in [HttpMethod::Post, HttpMethod::Put, HttpMethod::Patch, HttpMethod::Delete] {
            let req = api(method, Some(r#"{"k":"v"}"#)).to_request(&token());
            assert_eq!(req.body.as_deref(), Some(r#"{"k":"v"}"#), "method {method}");
        }
    }

    #[test]
    fn credential_debug_is_redacted() {
        let shown = format!("{:?}", Credential::bearer("super-secret"));
        assert!(!shown.contains("super-secret"));
    }
}
