use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::engine::BastionService;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Command, node and execution operations over the injected store.
    pub service: Arc<BastionService>,
    /// Database connection pool, present only with the PostgreSQL backend.
    pub pool: Option<bastion_db::DbPool>,
    /// Cancelled when the server starts shutting down; in-flight dispatches
    /// run under child tokens of it.
    pub shutdown: CancellationToken,
}
