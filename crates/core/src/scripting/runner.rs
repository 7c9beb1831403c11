//! The node-side run operation.
//!
//! [`Runner::run`] turns a [`RunRequest`] into a [`RunResponse`] and never
//! fails: every problem (blank script, spawn failure, timeout, cancellation)
//! is folded into exit code `1` with a non-empty stderr.

use std::time::{Duration, Instant};

use tokio_util::sync::CancellationToken;

use crate::error::CoreError;
use crate::protocol::{normalize_timeout, RunRequest, RunResponse};

use super::executor::{ScriptError, ScriptInput};
use super::shell::ShellExecutor;

/// Runs scripts for the agent's exec endpoint.
#[derive(Debug, Clone, Default)]
pub struct Runner {
    shell: ShellExecutor,
}

impl Runner {
    pub fn new(shell: ShellExecutor) -> Self {
        Self { shell }
    }

    pub fn shell(&self) -> &ShellExecutor {
        &self.shell
    }

    pub async fn run(&self, request: RunRequest, cancel: &CancellationToken) -> RunResponse {
        if request.script.trim().is_empty() {
            return failed_response(ScriptError::EmptyScript.to_string(), 0);
        }

        let timeout = Duration::from_secs(normalize_timeout(Some(request.timeout_seconds)) as u64);
        let input = ScriptInput {
            working_directory: request.working_dir.filter(|dir| !dir.trim().is_empty()),
            timeout,
        };

        let start = Instant::now();
        let output = match self.shell.execute(&request.script, input, cancel).await {
            Ok(output) => output,
            Err(e) => {
                let duration_ms = start.elapsed().as_millis() as i64;
                let message = e.to_string();
                tracing::warn!(error = %CoreError::from(e), "Script could not be run");
                return failed_response(message, duration_ms);
            }
        };

        let exit_code = output.exit_code();
        let mut stderr = output.stderr.clone();
        if let Some(CoreError::Process(reason)) = output.failure(timeout) {
            tracing::warn!(
                reason = %reason,
                duration_ms = output.duration_ms,
                "Script terminated abnormally",
            );
            if stderr.is_empty() {
                stderr = reason;
            }
        }

        tracing::info!(exit_code, duration_ms = output.duration_ms, "Script finished");

        RunResponse {
            stdout: output.stdout,
            stderr,
            exit_code,
            duration_ms: output.duration_ms as i64,
        }
    }
}

fn failed_response(stderr: String, duration_ms: i64) -> RunResponse {
    RunResponse {
        stdout: String::new(),
        stderr,
        exit_code: 1,
        duration_ms,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
