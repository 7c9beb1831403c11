//! Handlers for dispatching commands and reading execution history.

use axum::extract::{Path, State};
use axum::Json;
use bastion_db::models::Execution;
use serde::Deserialize;

use crate::engine::ExecuteError;
use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Request body for `POST /execute`.
#[derive(Debug, Deserialize)]
pub struct ExecuteRequest {
    #[serde(default)]
    pub command_id: String,
    #[serde(default)]
    pub node_id: String,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /execute
///
/// Runs the command synchronously and returns the finished execution. A
/// dispatch failure still answers 200; the execution carries `failed`
/// status and the reason in `stderr`. Unknown ids answer 404 and blank ids
/// 400, with nothing recorded.
pub async fn execute_command(
    State(state): State<AppState>,
    Json(input): Json<ExecuteRequest>,
) -> AppResult<Json<DataResponse<Execution>>> {
    // Server shutdown abandons in-flight dispatches.
    let cancel = state.shutdown.child_token();

    let execution = match state
        .service
        .execute_command(&input.command_id, &input.node_id, &cancel)
        .await
    {
        Ok(execution) => execution,
        Err(ExecuteError::Dispatch { execution, .. }) => *execution,
        Err(ExecuteError::Rejected(err)) => return Err(err),
    };

    Ok(Json(DataResponse { data: execution }))
}

/// GET /executions
///
/// Most recently started first.
pub async fn list_executions(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<Execution>>>> {
    let executions = state.service.list_executions().await?;
    Ok(Json(DataResponse { data: executions }))
}

/// GET /executions/{id}
pub async fn get_execution(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<DataResponse<Execution>>> {
    let execution = state.service.get_execution(&id).await?;
    Ok(Json(DataResponse { data: execution }))
}
