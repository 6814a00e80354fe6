use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use engine::{NewWorkflow, Workflow};
use serde::Deserialize;
use uuid::Uuid;

use super::{decode_json, AppState, CurrentUser};
use crate::ApiError;

#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    #[serde(default)]
    pub search: String,
}

pub async fn create(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    body: Bytes,
) -> Result<(StatusCode, Json<Workflow>), ApiError> {
    let draft: NewWorkflow = decode_json(&body)?;
    let workflow = state.service.create(user, draft).await?;
    Ok((StatusCode::CREATED, Json(workflow)))
}

pub async fn list(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<Workflow>>, ApiError> {
    Ok(Json(state.service.list(user, &params.search).await?))
}

pub async fn get(
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
) -> Result<Json<Workflow>, ApiError> {
    Ok(Json(state.service.get(user, id).await?))
}
