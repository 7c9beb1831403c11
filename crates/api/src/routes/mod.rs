pub mod commands;
pub mod executions;
pub mod health;
pub mod nodes;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /commands                       list, create
/// /commands/{id}                  get, replace, delete
///
/// /nodes                          list, register
/// /nodes/{id}                     get
///
/// /execute                        dispatch a command to a node (POST)
/// /executions                     execution history
/// /executions/{id}                execution detail
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/commands", commands::router())
        .nest("/nodes", nodes::router())
        .merge(executions::router())
}
