//! Shell script executor.
//!
//! Hands the script body to `<shell> -c`, so pipes, redirection and `&&`
//! behave as they would at a prompt.

use tokio_util::sync::CancellationToken;

use super::executor::{ScriptError, ScriptInput, ScriptOutput};
use super::subprocess;

/// Interpreter used when none is configured.
pub const DEFAULT_SHELL: &str = "bash";

/// Executor for inline shell scripts.
#[derive(Debug, Clone)]
pub struct ShellExecutor {
    program: String,
}

impl ShellExecutor {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub async fn execute(
        &self,
        script: &str,
        input: ScriptInput,
        cancel: &CancellationToken,
    ) -> Result<ScriptOutput, ScriptError> {
        let mut cmd = tokio::process::Command::new(&self.program);
        cmd.arg("-c").arg(script);
        subprocess::run_command(&mut cmd, input, cancel).await
    }
}

impl Default for ShellExecutor {
    fn default() -> Self {
        Self::new(DEFAULT_SHELL)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
