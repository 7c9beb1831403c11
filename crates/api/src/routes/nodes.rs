//! Route definitions for nodes.

use axum::routing::get;
use axum::Router;

use crate::handlers::nodes;
use crate::state::AppState;

/// Routes mounted at `/nodes`.
///
/// ```text
/// GET  /          -> list_nodes
/// POST /          -> register_node
/// GET  /{id}      -> get_node
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(nodes::list_nodes).post(nodes::register_node))
        .route("/{id}", get(nodes::get_node))
}
