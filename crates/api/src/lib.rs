//! `api` crate — HTTP REST API layer.
//!
//! Exposes:
//!   POST   /api/workflows
//!   GET    /api/workflows?search=
//!   GET    /api/workflows/:id
//!   POST   /api/workflows/:id/run
//!
//! Every route expects the caller's resolved user ID in the `x-user-id` header.

pub mod error;
pub mod handlers;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use engine::WorkflowService;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

pub use error::ApiError;
pub use handlers::AppState;

/// Build the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route(
            "/api/workflows",
            post(handlers::workflows::create).get(handlers::workflows::list),
        )
        .route("/api/workflows/:id", get(handlers::workflows::get))
        .route("/api/workflows/:id/run", post(handlers::runs::run))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Bind `addr` and serve until the process is stopped.
pub async fn serve(addr: &str, service: Arc<WorkflowService>) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("API listening on {}", listener.local_addr()?);
    axum::serve(listener, router(AppState { service })).await
}
