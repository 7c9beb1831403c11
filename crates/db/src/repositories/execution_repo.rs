//! PostgreSQL repository for the `executions` table.

use async_trait::async_trait;
use sqlx::PgPool;

use super::{EntityStore, StoreError};
use crate::models::Execution;

/// Column list for `executions` queries.
const COLUMNS: &str = "\
    id, command_id, node_id, status, \
    started_at, completed_at, \
    stdout, stderr, exit_code, duration_ms";

pub struct ExecutionRepo {
    pool: PgPool,
}

impl ExecutionRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EntityStore<Execution> for ExecutionRepo {
    async fn list(&self) -> Result<Vec<Execution>, StoreError> {
        let query = format!(
            r#"SELECT {COLUMNS} FROM executions ORDER BY started_at DESC, id COLLATE "C" ASC"#
        );
        let rows = sqlx::query_as::<_, Execution>(&query)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn get(&self, id: &str) -> Result<Option<Execution>, StoreError> {
        let query = format!("SELECT {COLUMNS} FROM executions WHERE id = $1");
        let row = sqlx::query_as::<_, Execution>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    /// Upsert; `command_id`, `node_id` and `started_at` keep their
    /// first-inserted values. A `None` completion time is written as `NULL`.
    async fn save(&self, execution: Execution) -> Result<Execution, StoreError> {
        let query = format!(
            "INSERT INTO executions ({COLUMNS}) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) \
             ON CONFLICT (id) DO UPDATE SET \
                status = EXCLUDED.status, \
                completed_at = EXCLUDED.completed_at, \
                stdout = EXCLUDED.stdout, \
                stderr = EXCLUDED.stderr, \
                exit_code = EXCLUDED.exit_code, \
                duration_ms = EXCLUDED.duration_ms \
             RETURNING {COLUMNS}"
        );
        let stored = sqlx::query_as::<_, Execution>(&query)
            .bind(&execution.id)
            .bind(&execution.command_id)
            .bind(&execution.node_id)
            .bind(execution.status.as_str())
            .bind(execution.started_at)
            .bind(execution.completed_at)
            .bind(&execution.stdout)
            .bind(&execution.stderr)
            .bind(execution.exit_code)
            .bind(execution.duration_ms)
            .fetch_one(&self.pool)
            .await?;
        Ok(stored)
    }
}
