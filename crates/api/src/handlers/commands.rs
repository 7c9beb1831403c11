//! Handlers for the command catalog.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use bastion_db::models::{Command, NewCommand};

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /commands
pub async fn list_commands(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<Command>>>> {
    let commands = state.service.list_commands().await?;
    Ok(Json(DataResponse { data: commands }))
}

/// POST /commands
///
/// Missing or non-positive `timeout_seconds` is stored as 300.
pub async fn create_command(
    State(state): State<AppState>,
    Json(input): Json<NewCommand>,
) -> AppResult<impl IntoResponse> {
    let command = state.service.create_command(input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: command })))
}

/// GET /commands/{id}
pub async fn get_command(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<DataResponse<Command>>> {
    let command = state.service.get_command(&id).await?;
    Ok(Json(DataResponse { data: command }))
}

/// PUT /commands/{id}
pub async fn replace_command(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<NewCommand>,
) -> AppResult<Json<DataResponse<Command>>> {
    let command = state.service.replace_command(&id, input).await?;
    Ok(Json(DataResponse { data: command }))
}

/// DELETE /commands/{id}
pub async fn delete_command(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    state.service.delete_command(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
