#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::response::Response;
use axum::routing::post;
use axum::{Json, Router};
use bastion_core::protocol::{RunRequest, RunResponse};
use bastion_db::models::Execution;
use bastion_db::Store;
use http_body_util::BodyExt;
use tokio::sync::{oneshot, Mutex};
use tokio_util::sync::CancellationToken;
use tower::ServiceExt;

use bastion_api::config::ServerConfig;
use bastion_api::engine::BastionService;
use bastion_api::router::build_app_router;
use bastion_api::state::AppState;

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        dispatch_timeout_secs: 10,
        daemon_url: "http://127.0.0.1:9081".to_string(),
        commands_file: None,
        database_url: None,
    }
}

/// Build a service over a fresh in-memory store.
pub fn test_service() -> Arc<BastionService> {
    Arc::new(BastionService::new(
        Store::in_memory(),
        Duration::from_secs(10),
    ))
}

/// Build the full application router around `service`, with the same
/// middleware stack production uses.
pub fn build_test_app(service: Arc<BastionService>) -> Router {
    let config = test_config();
    let state = AppState {
        service,
        pool: None,
        shutdown: CancellationToken::new(),
    };
    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn get(app: Router, uri: &str) -> Response {
    let request = Request::get(uri).body(Body::empty()).unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    send_json(app, "POST", uri, body).await
}

pub async fn put_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    send_json(app, "PUT", uri, body).await
}

pub async fn delete(app: Router, uri: &str) -> Response {
    let request = Request::delete(uri).body(Body::empty()).unwrap();
    app.oneshot(request).await.unwrap()
}

async fn send_json(app: Router, method: &str, uri: &str, body: serde_json::Value) -> Response {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(&body).unwrap()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Create a command through the API and return its id.
pub async fn create_command(app: Router, name: &str, script: &str) -> String {
    let response = post_json(
        app,
        "/api/v1/commands",
        serde_json::json!({ "name": name, "script": script }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"]["id"]
        .as_str()
        .unwrap()
        .to_string()
}

/// Register a node through the API and return its id.
pub async fn register_node(app: Router, address: &str) -> String {
    let response = post_json(
        app,
        "/api/v1/nodes",
        serde_json::json!({ "name": "test node", "address": address }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"]["id"]
        .as_str()
        .unwrap()
        .to_string()
}

// ---------------------------------------------------------------------------
// Stub runners
// ---------------------------------------------------------------------------

/// Serve `router` on an ephemeral local port and return its base URL.
pub async fn spawn_server(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr: SocketAddr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

/// A runner that answers every request with `response`.
pub async fn spawn_stub_runner(response: RunResponse) -> String {
    let router = Router::new().route(
        "/api/v1/exec",
        post(move |Json(_request): Json<RunRequest>| {
            let response = response.clone();
            async move { Json(response) }
        }),
    );
    spawn_server(router).await
}

/// A runner that answers with `response` and hands the first request it
/// receives to the returned receiver.
pub async fn spawn_capturing_runner(
    response: RunResponse,
) -> (String, oneshot::Receiver<RunRequest>) {
    let (tx, rx) = oneshot::channel();
    let tx = Arc::new(Mutex::new(Some(tx)));
    let router = Router::new().route(
        "/api/v1/exec",
        post(move |Json(request): Json<RunRequest>| {
            let tx = Arc::clone(&tx);
            let response = response.clone();
            async move {
                if let Some(tx) = tx.lock().await.take() {
                    let _ = tx.send(request);
                }
                Json(response)
            }
        }),
    );
    (spawn_server(router).await, rx)
}

/// A runner that waits `delay` before answering with `response`.
pub async fn spawn_slow_runner(delay: Duration, response: RunResponse) -> String {
    let router = Router::new().route(
        "/api/v1/exec",
        post(move || {
            let response = response.clone();
            async move {
                tokio::time::sleep(delay).await;
                Json(response)
            }
        }),
    );
    spawn_server(router).await
}

/// A runner that answers every request with `status` and a raw `body`.
pub async fn spawn_raw_runner(status: StatusCode, body: &'static str) -> String {
    let router = Router::new().route(
        "/api/v1/exec",
        post(move || async move { (status, body) }),
    );
    spawn_server(router).await
}

/// Poll the service until `pred` holds for the stored executions, or give
/// up after five seconds.
pub async fn wait_for_executions<F>(service: &BastionService, pred: F) -> Vec<Execution>
where
    F: Fn(&[Execution]) -> bool,
{
    let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
    loop {
        let executions = service.list_executions().await.unwrap();
        if pred(&executions) || tokio::time::Instant::now() >= deadline {
            return executions;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
}

/// An address with nothing listening behind it.
pub fn unreachable_address() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}
