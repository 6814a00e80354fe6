//! API step tests against a real HTTP server, using wiremock.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use nodes::{
    ApiNodeData, Credential, HttpMethod, NodeData, ReqwestTransport, StepExecutor, StepOutcome,
    WorkflowNode,
};
use wiremock::matchers::{body_string, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// =============================================================================
// HELPERS
// =============================================================================

fn executor(timeout: Option<Duration>) -> StepExecutor {
    let transport = ReqwestTransport::new(timeout, Some(Duration::from_secs(2)))
        .expect("transport builds");
    StepExecutor::new(Arc::new(transport), Credential::bearer("test-token"))
}

fn api_node(method: HttpMethod, url: String, body: Option<&str>) -> WorkflowNode {
    WorkflowNode::new(NodeData::Api(ApiNodeData {
        method,
        url,
        headers: None,
        body: body.map(str::to_owned),
    }))
}

// =============================================================================
// TESTS
// =============================================================================

#[tokio::test]
async fn get_with_2xx_passes() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/test"))
        .and(header("Authorization", "Bearer test-token"))
        .and(header("Content-Type", "application/json"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let node = api_node(HttpMethod::Get, format!("{}/api/test", server.uri()), Some("ignored"));
    assert_eq!(executor(None).execute(&node).await, StepOutcome::Passed);
}

#[tokio::test]
async fn post_sends_body_verbatim() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/items"))
        .and(body_string(r#"{"name":"widget"}"#))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    let node = api_node(
        HttpMethod::Post,
        format!("{}/items", server.uri()),
        Some(r#"{"name":"widget"}"#),
    );
    assert_eq!(executor(None).execute(&node).await, StepOutcome::Passed);
}

#[tokio::test]
async fn caller_headers_are_forwarded() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(header("X-Request-Source", "flowline"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let mut headers = BTreeMap::new();
    headers.insert("X-Request-Source".to_string(), "flowline".to_string());
    let node = WorkflowNode::new(NodeData::Api(ApiNodeData {
        method: HttpMethod::Put,
        url: format!("{}/things/1", server.uri()),
        headers: Some(headers),
        body: None,
    }));
    assert_eq!(executor(None).execute(&node).await, StepOutcome::Passed);
}

#[tokio::test]
async fn server_error_fails() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let node = api_node(HttpMethod::Delete, format!("{}/things/1", server.uri()), None);
    assert_eq!(executor(None).execute(&node).await, StepOutcome::Failed);
}

#[tokio::test]
async fn unmatched_route_404_fails() {
    // wiremock answers 404 for requests no mock matches.
    let server = MockServer::start().await;
    let node = api_node(HttpMethod::Get, format!("{}/missing", server.uri()), None);
    assert_eq!(executor(None).execute(&node).await, StepOutcome::Failed);
}

#[tokio::test]
async fn unreachable_host_fails_without_panicking() {
    // Port 1 on loopback refuses connections.
    let node = api_node(HttpMethod::Get, "http://127.0.0.1:1/".to_string(), None);
    assert_eq!(executor(None).execute(&node).await, StepOutcome::Failed);
}

#[tokio::test]
async fn network_timeout_fails() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
        .mount(&server)
        .await;

    let node = api_node(HttpMethod::Get, format!("{}/slow", server.uri()), None);
    let outcome = executor(Some(Duration::from_millis(100))).execute(&node).await;
    assert_eq!(outcome, StepOutcome::Failed);
}
