//! Route handlers and the shared state / identity extractor they use.

pub mod runs;
pub mod workflows;

use std::sync::Arc;

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use engine::{UserId, WorkflowService};
use serde::de::DeserializeOwned;

use crate::ApiError;

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<WorkflowService>,
}

/// The caller's identity, as resolved upstream and forwarded in `x-user-id`.
#[derive(Debug, Clone, Copy)]
pub struct CurrentUser(pub UserId);

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .headers
            .get("x-user-id")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<UserId>().ok())
            .map(CurrentUser)
            .ok_or(ApiError::Unauthenticated)
    }
}

/// Decode a JSON request body; any shape error is a 400 with a `message`.
pub(crate) fn decode_json<T: DeserializeOwned>(body: &[u8]) -> Result<T, ApiError> {
    serde_json::from_slice(body).map_err(|e| ApiError::BadRequest(e.to_string()))
}
