//! Integration tests for `POST /execute` and execution history, using stub
//! runners served on ephemeral ports.

mod common;

use axum::http::StatusCode;
use std::time::Duration;

use bastion_core::protocol::RunResponse;
use bastion_core::status::ExecutionStatus;
use common::{body_json, build_test_app, get, post_json, test_service};
use serde_json::json;

async fn execute(
    service: std::sync::Arc<bastion_api::engine::BastionService>,
    command_id: &str,
    node_id: &str,
) -> (StatusCode, serde_json::Value) {
    let response = post_json(
        build_test_app(service),
        "/api/v1/execute",
        json!({ "command_id": command_id, "node_id": node_id }),
    )
    .await;
    let status = response.status();
    (status, body_json(response).await)
}

#[tokio::test]
async fn successful_run_is_recorded_as_succeeded() {
    let runner = common::spawn_stub_runner(RunResponse {
        stdout: "hello\n".to_string(),
        stderr: String::new(),
        exit_code: 0,
        duration_ms: 12,
    })
    .await;

    let service = test_service();
    let command_id = common::create_command(build_test_app(service.clone()), "Hello", "echo hello").await;
    let node_id = common::register_node(build_test_app(service.clone()), &runner).await;

    let (status, json) = execute(service.clone(), &command_id, &node_id).await;
    assert_eq!(status, StatusCode::OK);
    let data = &json["data"];
    assert_eq!(data["status"], "succeeded");
    assert_eq!(data["exit_code"], 0);
    assert_eq!(data["stdout"], "hello\n");
    assert_eq!(data["duration_ms"], 12);
    assert_eq!(data["command_id"], command_id.as_str());
    assert_eq!(data["node_id"], node_id.as_str());

    let started: chrono::DateTime<chrono::Utc> =
        data["started_at"].as_str().unwrap().parse().unwrap();
    let completed: chrono::DateTime<chrono::Utc> =
        data["completed_at"].as_str().unwrap().parse().unwrap();
    assert!(completed >= started);

    let uri = format!("/api/v1/executions/{}", data["id"].as_str().unwrap());
    let stored = body_json(get(build_test_app(service), &uri).await).await;
    assert_eq!(stored["data"], *data);
}

#[tokio::test]
async fn non_zero_exit_is_failed_with_stderr_verbatim() {
    let runner = common::spawn_stub_runner(RunResponse {
        stdout: String::new(),
        stderr: "ls: cannot access '/nope': No such file or directory\n".to_string(),
        exit_code: 2,
        duration_ms: 3,
    })
    .await;

    let service = test_service();
    let command_id = common::create_command(build_test_app(service.clone()), "ls", "ls /nope").await;
    let node_id = common::register_node(build_test_app(service.clone()), &runner).await;

    let (status, json) = execute(service, &command_id, &node_id).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["status"], "failed");
    assert_eq!(json["data"]["exit_code"], 2);
    assert_eq!(
        json["data"]["stderr"],
        "ls: cannot access '/nope': No such file or directory\n"
    );
}

#[tokio::test]
async fn unreachable_node_returns_failed_execution() {
    let service = test_service();
    let command_id = common::create_command(build_test_app(service.clone()), "a", "true").await;
    let node_id =
        common::register_node(build_test_app(service.clone()), &common::unreachable_address()).await;

    let (status, json) = execute(service.clone(), &command_id, &node_id).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["status"], "failed");
    assert_eq!(json["data"]["exit_code"], 1);
    let stderr = json["data"]["stderr"].as_str().unwrap();
    assert!(stderr.starts_with("request failed: "), "stderr was {stderr:?}");

    let list = body_json(get(build_test_app(service), "/api/v1/executions").await).await;
    assert_eq!(list["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn runner_error_status_is_recorded() {
    let runner =
        common::spawn_raw_runner(StatusCode::INTERNAL_SERVER_ERROR, "runner exploded").await;

    let service = test_service();
    let command_id = common::create_command(build_test_app(service.clone()), "a", "true").await;
    let node_id = common::register_node(build_test_app(service.clone()), &runner).await;

    let (status, json) = execute(service, &command_id, &node_id).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["status"], "failed");
    assert_eq!(json["data"]["exit_code"], 1);
    assert_eq!(
        json["data"]["stderr"],
        "unexpected status: runner returned HTTP 500: runner exploded"
    );
}

#[tokio::test]
async fn malformed_runner_reply_is_recorded() {
    let runner = common::spawn_raw_runner(StatusCode::OK, "{\"stdout\": 42}").await;

    let service = test_service();
    let command_id = common::create_command(build_test_app(service.clone()), "a", "true").await;
    let node_id = common::register_node(build_test_app(service.clone()), &runner).await;

    let (status, json) = execute(service, &command_id, &node_id).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["status"], "failed");
    assert!(json["data"]["stderr"]
        .as_str()
        .unwrap()
        .starts_with("decode response: "));
}

#[tokio::test]
async fn unknown_ids_are_404_and_record_nothing() {
    let service = test_service();
    let command_id = common::create_command(build_test_app(service.clone()), "a", "true").await;

    let (status, json) = execute(service.clone(), &command_id, "node-missing").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["code"], "NOT_FOUND");

    let (status, _) = execute(service.clone(), "cmd-missing", "node-missing").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let list = body_json(get(build_test_app(service), "/api/v1/executions").await).await;
    assert!(list["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn blank_ids_are_400() {
    let service = test_service();
    let (status, json) = execute(service.clone(), "", "node-local").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "VALIDATION_ERROR");

    let response = post_json(build_test_app(service), "/api/v1/execute", json!({})).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unknown_execution_is_404() {
    let response = get(build_test_app(test_service()), "/api/v1/executions/exec-missing").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

fn ok_response(stdout: &str) -> RunResponse {
    RunResponse {
        stdout: stdout.to_string(),
        stderr: String::new(),
        exit_code: 0,
        duration_ms: 7,
    }
}

#[tokio::test]
async fn dispatch_sends_script_and_timeout() {
    let (runner, captured) = common::spawn_capturing_runner(ok_response("")).await;

    let service = test_service();
    let response = post_json(
        build_test_app(service.clone()),
        "/api/v1/commands",
        json!({ "name": "Disk", "script": "df -h /", "timeout_seconds": 42 }),
    )
    .await;
    let command_id = body_json(response).await["data"]["id"]
        .as_str()
        .unwrap()
        .to_string();
    let node_id = common::register_node(build_test_app(service.clone()), &runner).await;

    let (status, _) = execute(service, &command_id, &node_id).await;
    assert_eq!(status, StatusCode::OK);

    let request = captured.await.unwrap();
    assert_eq!(request.script, "df -h /");
    assert_eq!(request.timeout_seconds, 42);
    assert_eq!(request.working_dir, None);
}

#[tokio::test]
async fn execution_is_visible_as_running_mid_flight() {
    let runner =
        common::spawn_slow_runner(Duration::from_millis(800), ok_response("late\n")).await;

    let service = test_service();
    let command_id = common::create_command(build_test_app(service.clone()), "a", "true").await;
    let node_id = common::register_node(build_test_app(service.clone()), &runner).await;

    let in_flight = {
        let service = service.clone();
        tokio::spawn(async move { execute(service, &command_id, &node_id).await })
    };

    let seen = common::wait_for_executions(&service, |e| !e.is_empty()).await;
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].status, ExecutionStatus::Running);
    assert!(seen[0].completed_at.is_none());

    let json = body_json(get(build_test_app(service), "/api/v1/executions").await).await;
    assert_eq!(json["data"][0]["status"], "running");
    assert!(json["data"][0].get("completed_at").is_none());

    let (status, json) = in_flight.await.unwrap();
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["status"], "succeeded");
    assert_eq!(json["data"]["stdout"], "late\n");
}

#[tokio::test]
async fn dropped_request_still_records_outcome() {
    let runner =
        common::spawn_slow_runner(Duration::from_millis(500), ok_response("done\n")).await;

    let service = test_service();
    let command_id = common::create_command(build_test_app(service.clone()), "a", "true").await;
    let node_id = common::register_node(build_test_app(service.clone()), &runner).await;

    // The caller gives up long before the runner answers.
    let abandoned = tokio::time::timeout(
        Duration::from_millis(100),
        execute(service.clone(), &command_id, &node_id),
    )
    .await;
    assert!(abandoned.is_err());

    let executions = common::wait_for_executions(&service, |e| {
        e.iter().all(|x| x.status.is_terminal()) && !e.is_empty()
    })
    .await;
    assert_eq!(executions.len(), 1);
    assert_eq!(executions[0].status, ExecutionStatus::Succeeded);
    assert_eq!(executions[0].stdout, "done\n");
    assert!(executions[0].completed_at.is_some());
}
