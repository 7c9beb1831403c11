//! Route definitions for the command catalog.

use axum::routing::get;
use axum::Router;

use crate::handlers::commands;
use crate::state::AppState;

/// Routes mounted at `/commands`.
///
/// ```text
/// GET    /          -> list_commands
/// POST   /          -> create_command
/// GET    /{id}      -> get_command
/// PUT    /{id}      -> replace_command
/// DELETE /{id}      -> delete_command
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(commands::list_commands).post(commands::create_command),
        )
        .route(
            "/{id}",
            get(commands::get_command)
                .put(commands::replace_command)
                .delete(commands::delete_command),
        )
}
