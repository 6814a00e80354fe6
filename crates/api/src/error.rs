//! Mapping from engine errors to HTTP responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use engine::EngineError;
use serde_json::json;
use thiserror::Error;
use tracing::error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing or malformed `x-user-id` header.
    #[error("missing or invalid x-user-id header")]
    Unauthenticated,

    /// The request body could not be decoded.
    #[error("invalid request body: {0}")]
    BadRequest(String),

    #[error(transparent)]
    Engine(#[from] EngineError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            ApiError::Unauthenticated => (
                StatusCode::UNAUTHORIZED,
                json!({ "message": self.to_string() }),
            ),
            ApiError::BadRequest(_) => (
                StatusCode::BAD_REQUEST,
                json!({ "message": self.to_string() }),
            ),
            ApiError::Engine(err) => match err {
                EngineError::Validation(_) | EngineError::MissingField(_) => (
                    StatusCode::BAD_REQUEST,
                    json!({ "message": err.to_string() }),
                ),
                EngineError::NotFound(_) => (
                    StatusCode::NOT_FOUND,
                    json!({ "message": "Workflow not found" }),
                ),
                EngineError::NotSaved { outcome, .. } => {
                    error!("{err}");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        json!({
                            "message": "Run completed but its result could not be saved",
                            "status": outcome,
                        }),
                    )
                }
                EngineError::Persistence(_)
                | EngineError::Transport(_)
                | EngineError::MissingCredential => {
                    error!("{err}");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        json!({ "message": "Server error" }),
                    )
                }
            },
        };
        (status, Json(body)).into_response()
    }
}
