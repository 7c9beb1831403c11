//! HTTP surface of the runner.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::{HeaderName, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use bastion_core::protocol::{RunRequest, RunResponse, EXEC_PATH};
use bastion_core::scripting::runner::Runner;
use serde::Serialize;
use serde_json::json;
use tokio_util::sync::CancellationToken;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

/// Shared state of the agent's handlers.
#[derive(Clone)]
pub struct AgentState {
    pub runner: Arc<Runner>,
    /// Cancelled on shutdown; running scripts are killed.
    pub shutdown: CancellationToken,
}

/// Health check response payload.
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub shell: String,
}

/// Rejection for run requests the agent cannot decode.
#[derive(Debug)]
pub struct BadPayload(JsonRejection);

impl IntoResponse for BadPayload {
    fn into_response(self) -> Response {
        let body = json!({
            "error": self.0.body_text(),
            "code": "BAD_REQUEST",
        });
        (StatusCode::BAD_REQUEST, Json(body)).into_response()
    }
}

/// POST /api/v1/exec
///
/// Always answers 200 once the payload decodes; script failures travel in
/// the response body. If the caller disconnects, the handler future is
/// dropped and the script's process group is killed with it.
async fn exec(
    State(state): State<AgentState>,
    payload: Result<Json<RunRequest>, JsonRejection>,
) -> Result<Json<RunResponse>, BadPayload> {
    let Json(request) = payload.map_err(|rejection| {
        tracing::warn!(error = %rejection.body_text(), "Rejected run request");
        BadPayload(rejection)
    })?;

    let cancel = state.shutdown.child_token();
    let response = state.runner.run(request, &cancel).await;
    Ok(Json(response))
}

/// GET /health
async fn health(State(state): State<AgentState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        shell: state.runner.shell().program().to_string(),
    })
}

/// Build the agent router with tracing, request ids and panic recovery.
///
/// No request timeout is applied; each script carries its own deadline.
pub fn build_router(state: AgentState) -> Router {
    let request_id_header = HeaderName::from_static("x-request-id");

    Router::new()
        .route("/health", get(health))
        .route(EXEC_PATH, post(exec))
        .layer(CatchPanicLayer::new())
        .layer(PropagateRequestIdLayer::new(request_id_header.clone()))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(SetRequestIdLayer::new(request_id_header, MakeRequestUuid))
        .with_state(state)
}
