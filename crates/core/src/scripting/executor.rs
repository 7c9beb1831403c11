//! Shared types for script execution.

use std::time::Duration;

use crate::error::CoreError;

/// Execution parameters for a single script run.
#[derive(Debug, Clone)]
pub struct ScriptInput {
    /// Working directory for the child process (uses current dir if `None`).
    pub working_directory: Option<String>,
    /// Maximum wall-clock time before the process group is killed.
    pub timeout: Duration,
}

/// How a supervised process came to an end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// The process exited on its own with this code.
    Exited(i32),
    /// The process was killed by a signal it did not receive from us.
    Signaled(i32),
    /// The deadline elapsed and the process group was killed.
    TimedOut,
    /// The caller cancelled and the process group was killed.
    Cancelled,
}

/// Captured output from a supervised process.
#[derive(Debug, Clone)]
pub struct ScriptOutput {
    /// Complete stdout captured from the process (lossy UTF-8).
    pub stdout: String,
    /// Complete stderr captured from the process (lossy UTF-8).
    pub stderr: String,
    pub termination: Termination,
    /// Wall-clock time from spawn to exit or kill.
    pub duration_ms: u64,
}

impl ScriptOutput {
    /// Exit code reported to callers: the real code on normal exit, `1` for
    /// any forced or abnormal termination.
    pub fn exit_code(&self) -> i32 {
        match self.termination {
            Termination::Exited(code) => code,
            _ => 1,
        }
    }

    /// Process-level failure for abnormal terminations, `None` on normal exit.
    pub fn failure(&self, timeout: Duration) -> Option<CoreError> {
        let reason = match self.termination {
            Termination::Exited(_) => return None,
            Termination::Signaled(signal) => format!("terminated by signal {signal}"),
            Termination::TimedOut => {
                format!("script timed out after {}s", timeout.as_secs())
            }
            Termination::Cancelled => "script cancelled".to_string(),
        };
        Some(CoreError::Process(reason))
    }
}

/// Errors that prevent a script from running at all.
#[derive(Debug, thiserror::Error)]
pub enum ScriptError {
    /// The script body was empty or whitespace only.
    #[error("empty script")]
    EmptyScript,

    /// The interpreter could not be spawned.
    #[error("failed to start process: {0}")]
    Spawn(#[source] std::io::Error),

    /// Waiting on the child process failed.
    #[error("I/O error: {0}")]
    Io(#[source] std::io::Error),
}

impl From<ScriptError> for CoreError {
    fn from(err: ScriptError) -> Self {
        CoreError::Process(err.to_string())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
