//! Node variant model — the closed set of step kinds and their payloads.
//!
//! A node's JSON shape is `{ "id": ..., "type": "api" | "email" | "text", "data": {...} }`.
//! The `type` tag and the `data` payload live in a single enum, so a decoded
//! node can never carry a payload that disagrees with its declared type.

use std::collections::{BTreeMap, HashSet};
use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use url::Url;
use uuid::Uuid;

use crate::ValidationError;

// Loose syntactic check: one '@', no whitespace, a domain of two or more
// non-empty dot-separated labels.
static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@.]+(\.[^\s@.]+)+$").expect("static email pattern")
});

// ---------------------------------------------------------------------------
// NodeType
// ---------------------------------------------------------------------------

/// Tag naming the kind of a workflow step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeType {
    Api,
    Email,
    Text,
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Api => f.pad("api"),
            Self::Email => f.pad("email"),
            Self::Text => f.pad("text"),
        }
    }
}

// ---------------------------------------------------------------------------
// Payloads
// ---------------------------------------------------------------------------

/// HTTP verbs an API step may use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// An outbound HTTP call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiNodeData {
    pub method: HttpMethod,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headers: Option<BTreeMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

/// An email step. Only the address is carried.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailNodeData {
    #[serde(default)]
    pub email: String,
}

/// A static text step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextNodeData {
    #[serde(default)]
    pub message: String,
}

/// The payload of a node, tagged by its kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "lowercase")]
pub enum NodeData {
    Api(ApiNodeData),
    Email(EmailNodeData),
    Text(TextNodeData),
}

impl NodeData {
    pub fn node_type(&self) -> NodeType {
        match self {
            Self::Api(_) => NodeType::Api,
            Self::Email(_) => NodeType::Email,
            Self::Text(_) => NodeType::Text,
        }
    }
}

// ---------------------------------------------------------------------------
// WorkflowNode
// ---------------------------------------------------------------------------

/// One step in a workflow's linear sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowNode {
    /// Assigned once at creation; unique within its workflow.
    pub id: String,
    #[serde(flatten)]
    pub data: NodeData,
}

impl WorkflowNode {
    /// Create a node with a freshly generated ID.
    pub fn new(data: NodeData) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            data,
        }
    }

    pub fn with_id(id: impl Into<String>, data: NodeData) -> Self {
        Self { id: id.into(), data }
    }

    pub fn api(method: HttpMethod, url: impl Into<String>) -> Self {
        Self::new(NodeData::Api(ApiNodeData {
            method,
            url: url.into(),
            headers: None,
            body: None,
        }))
    }

    pub fn email(address: impl Into<String>) -> Self {
        Self::new(NodeData::Email(EmailNodeData {
            email: address.into(),
        }))
    }

    pub fn text(message: impl Into<String>) -> Self {
        Self::new(NodeData::Text(TextNodeData {
            message: message.into(),
        }))
    }

    pub fn node_type(&self) -> NodeType {
        self.data.node_type()
    }

    /// Check the payload against the rules of its declared type.
    ///
    /// # Errors
    /// [`ValidationError::InvalidField`] naming the first offending field.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.id.trim().is_empty() {
            return Err(ValidationError::EmptyNodeId);
        }

        match &self.data {
            NodeData::Api(api) => {
                let parsed = Url::parse(&api.url)
                    .map_err(|e| ValidationError::field(&self.id, "api.url", e.to_string()))?;
                if !matches!(parsed.scheme(), "http" | "https") {
                    return Err(ValidationError::field(
                        &self.id,
                        "api.url",
                        format!("unsupported scheme '{}'", parsed.scheme()),
                    ));
                }
                if let Some(headers) = &api.headers {
                    if headers.keys().any(|k| k.trim().is_empty()) {
                        return Err(ValidationError::field(
                            &self.id,
                            "api.headers",
                            "header name must not be empty",
                        ));
                    }
                }
            }
            NodeData::Email(email) => {
                if email.email.is_empty() {
                    return Err(ValidationError::field(&self.id, "email.email", "is required"));
                }
                if !EMAIL_RE.is_match(&email.email) {
                    return Err(ValidationError::field(
                        &self.id,
                        "email.email",
                        format!("'{}' is not a valid address", email.email),
                    ));
                }
            }
            NodeData::Text(text) => {
                if text.message.trim().is_empty() {
                    return Err(ValidationError::field(
                        &self.id,
                        "text.message",
                        "must not be empty",
                    ));
                }
            }
        }

        Ok(())
    }
}

/// Validate every node of a sequence and ensure IDs are unique.
///
/// # Errors
/// The first [`ValidationError`] found, in sequence order.
pub fn validate_nodes(nodes: &[WorkflowNode]) -> Result<(), ValidationError> {
    let mut seen: HashSet<&str> = HashSet::with_capacity(nodes.len());
    for node in nodes {
        node.validate()?;
        if !seen.insert(node.id.as_str()) {
            return Err(ValidationError::DuplicateNodeId(node.id.clone()));
        }
    }
    Ok(())
}

// ============================================================
// Unit tests
// ============================================================
#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn node_serialises_with_type_tag_and_data() {
        let node = WorkflowNode::with_id(
            "n1",
            NodeData::Text(TextNodeData { message: "hi".into() }),
        );
        let value = serde_json::to_value(&node).unwrap();
        assert_eq!(value, json!({ "id": "n1", "type": "text", "data": { "message": "hi" } }));
    }

    #[test]
    fn api_node_decodes_from_wire_shape() {
        let node: WorkflowNode = serde_json::from_value(json!({
            "id": "call",
            "type": "api",
            "data": {
                "method": "POST",
                "url": "https://example.com/hook",
                "headers": { "X-Trace": "1" },
                "body": "{\"a\":1}"
            }
        }))
        .expect("valid api node");

        assert_eq!(node.node_type(), NodeType::Api);
        let NodeData::Api(api) = &node.data else { panic!("expected api payload") };
        assert_eq!(api.method, HttpMethod::Post);
        assert_eq!(api.headers.as_ref().unwrap()["X-Trace"], "1");
        assert_eq!(api.body.as_deref(), Some("{\"a\":1}"));
    }

    #[test]
    fn mismatched_type_and_payload_is_rejected_on_decode() {
        let decoded = serde_json::from_value::<WorkflowNode>(json!({
            "id": "x",
            "type": "api",
            "data": { "message": "not an api payload" }
        }));
        assert!(decoded.is_err());
    }

    #[test]
    fn unknown_node_type_is_rejected_on_decode() {
        let decoded = serde_json::from_value::<WorkflowNode>(json!({
            "id": "x",
            "type": "sms",
            "data": {}
        }));
        assert!(decoded.is_err());
    }

    #[test]
    fn new_nodes_get_distinct_ids() {
        let a = WorkflowNode::text("a");
        let b = WorkflowNode::text("b");
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn non_url_is_rejected_for_api_url() {
        let node = WorkflowNode::api(HttpMethod::Get, "not a url");
        let err = node.validate().unwrap_err();
        assert_eq!(err.field_name(), Some("api.url"));
    }

    #[test]
    fn non_http_scheme_is_rejected_for_api_url() {
        let node = WorkflowNode::api(HttpMethod::Get, "ftp://example.com/file");
        assert_eq!(node.validate().unwrap_err().field_name(), Some("api.url"));
    }

    #[test]
    fn empty_header_name_is_rejected() {
        let mut headers = BTreeMap::new();
        headers.insert(" ".to_string(), "v".to_string());
        let node = WorkflowNode::new(NodeData::Api(ApiNodeData {
            method: HttpMethod::Get,
            url: "https://example.com".into(),
            headers: Some(headers),
            body: None,
        }));
        assert_eq!(node.validate().unwrap_err().field_name(), Some("api.headers"));
    }

    #[test]
    fn malformed_address_is_rejected_for_email() {
        for bad in [
            "",
            "plainaddress",
            "a@b",
            "a b@c.com",
            "@c.com",
            "a@b..com",
            "a@.b.com",
            "a@b.com.",
        ] {
            let err = WorkflowNode::email(bad).validate().unwrap_err();
            assert_eq!(err.field_name(), Some("email.email"), "input: {bad:?}");
        }
    }

    #[test]
    fn well_formed_address_is_accepted() {
        assert!(WorkflowNode::email("a@b.com").validate().is_ok());
        assert!(WorkflowNode::email("first.last+tag@mail.example.org").validate().is_ok());
    }

    #[test]
    fn empty_text_message_is_rejected() {
        let err = WorkflowNode::text("   ").validate().unwrap_err();
        assert!(matches!(
            err,
            ValidationError::InvalidField { field: "text.message", .. }
        ));
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let nodes = vec![
            WorkflowNode::with_id("a", NodeData::Text(TextNodeData { message: "1".into() })),
            WorkflowNode::with_id("a", NodeData::Text(TextNodeData { message: "2".into() })),
        ];
        assert!(matches!(
            validate_nodes(&nodes),
            Err(ValidationError::DuplicateNodeId(id)) if id == "a"
        ));
    }

    #[test]
    fn empty_sequence_is_valid() {
        assert!(validate_nodes(&[]).is_ok());
    }
}
