//! Handlers for node registration and lookup.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use bastion_db::models::{NewNode, Node};

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /nodes
pub async fn list_nodes(State(state): State<AppState>) -> AppResult<Json<DataResponse<Vec<Node>>>> {
    let nodes = state.service.list_nodes().await?;
    Ok(Json(DataResponse { data: nodes }))
}

/// POST /nodes
///
/// Registering a known id updates its name and address.
pub async fn register_node(
    State(state): State<AppState>,
    Json(input): Json<NewNode>,
) -> AppResult<impl IntoResponse> {
    let node = state.service.register_node(input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: node })))
}

/// GET /nodes/{id}
pub async fn get_node(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<DataResponse<Node>>> {
    let node = state.service.get_node(&id).await?;
    Ok(Json(DataResponse { data: node }))
}
