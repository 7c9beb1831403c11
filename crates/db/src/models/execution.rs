//! Model for the `executions` table and its lifecycle transitions.

use bastion_core::id::{new_id, EXECUTION_PREFIX};
use bastion_core::protocol::RunResponse;
use bastion_core::status::ExecutionStatus;
use bastion_core::types::{now, EntityId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// The record of one attempt to run a command on a node.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Execution {
    pub id: EntityId,
    pub command_id: EntityId,
    pub node_id: EntityId,
    #[sqlx(try_from = "String")]
    pub status: ExecutionStatus,
    pub started_at: Timestamp,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<Timestamp>,
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
    pub duration_ms: i64,
}

impl Execution {
    /// A fresh execution in `running`, started now.
    pub fn start(command_id: &str, node_id: &str) -> Self {
        Self {
            id: new_id(EXECUTION_PREFIX),
            command_id: command_id.to_string(),
            node_id: node_id.to_string(),
            status: ExecutionStatus::Running,
            started_at: now(),
            completed_at: None,
            stdout: String::new(),
            stderr: String::new(),
            exit_code: 0,
            duration_ms: 0,
        }
    }

    /// Record the runner's response and classify by exit code.
    pub fn complete(&mut self, response: RunResponse) {
        debug_assert!(!self.status.is_terminal(), "execution already finished");
        self.stdout = storable_text(response.stdout);
        self.stderr = storable_text(response.stderr);
        self.exit_code = response.exit_code;
        self.duration_ms = response.duration_ms;
        self.status = ExecutionStatus::from_exit_code(response.exit_code);
        self.completed_at = Some(now());
    }

    /// Mark as failed without a runner response.
    pub fn fail(&mut self, message: impl Into<String>) {
        debug_assert!(!self.status.is_terminal(), "execution already finished");
        self.stderr = storable_text(message.into());
        self.exit_code = 1;
        self.status = ExecutionStatus::Failed;
        self.completed_at = Some(now());
    }
}

/// PostgreSQL `TEXT` cannot hold NUL; both backends store U+FFFD instead.
fn storable_text(text: String) -> String {
    if text.contains('\0') {
        text.replace('\0', "\u{FFFD}")
    } else {
        text
    }
}
