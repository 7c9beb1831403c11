//! Route definitions for dispatch and execution history.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::executions;
use crate::state::AppState;

/// ```text
/// POST /execute              -> execute_command
/// GET  /executions           -> list_executions
/// GET  /executions/{id}      -> get_execution
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/execute", post(executions::execute_command))
        .route("/executions", get(executions::list_executions))
        .route("/executions/{id}", get(executions::get_execution))
}
