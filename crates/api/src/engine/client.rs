//! HTTP client for a node's runner endpoint.
//!
//! Wraps `POST {address}/api/v1/exec` using [`reqwest`]. Every failure is
//! reported as a [`CoreError::Dispatch`] naming the stage that failed.

use bastion_core::error::{CoreError, DispatchStage};
use bastion_core::protocol::{exec_url, RunRequest, RunResponse};
use reqwest::header::CONTENT_TYPE;

/// Sends run requests to remote runners.
///
/// Cheap to clone; clones share one connection pool.
#[derive(Debug, Clone, Default)]
pub struct RunnerClient {
    client: reqwest::Client,
}

impl RunnerClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a client reusing an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// Send one run request to the runner at `address` and decode its reply.
    ///
    /// Has no deadline of its own; callers bound it and drop the future to
    /// abandon the connection.
    pub async fn run(&self, address: &str, request: &RunRequest) -> Result<RunResponse, CoreError> {
        let payload = serde_json::to_vec(request)
            .map_err(|e| CoreError::dispatch(DispatchStage::Encode, e))?;

        let http_request = self
            .client
            .post(exec_url(address))
            .header(CONTENT_TYPE, "application/json")
            .body(payload)
            .build()
            .map_err(|e| CoreError::dispatch(DispatchStage::Build, e))?;

        let response = self
            .client
            .execute(http_request)
            .await
            .map_err(|e| CoreError::dispatch(DispatchStage::Send, e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(CoreError::dispatch(
                DispatchStage::Status,
                format!("runner returned HTTP {}: {}", status.as_u16(), body.trim()),
            ));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| CoreError::dispatch(DispatchStage::Send, e))?;

        serde_json::from_slice(&body).map_err(|e| CoreError::dispatch(DispatchStage::Decode, e))
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn request() -> RunRequest {
        RunRequest {
            script: "echo hi".to_string(),
            timeout_seconds: 5,
            working_dir: None,
        }
    }

    #[tokio::test]
    async fn invalid_address_fails_at_build() {
        let err = RunnerClient::new()
            .run("not a url", &request())
            .await
            .unwrap_err();
        assert_matches!(
            err,
            CoreError::Dispatch {
                stage: DispatchStage::Build,
                ..
            }
        );
    }

    #[tokio::test]
    async fn refused_connection_fails_at_send() {
        // Bind then drop a listener to get a port with nothing behind it.
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = RunnerClient::new()
            .run(&format!("http://{addr}"), &request())
            .await
            .unwrap_err();
        assert_matches!(
            err,
            CoreError::Dispatch {
                stage: DispatchStage::Send,
                ..
            }
        );
        assert!(err.to_string().starts_with("request failed: "));
    }
}
