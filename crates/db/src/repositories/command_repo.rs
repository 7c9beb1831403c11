//! PostgreSQL repository for the `commands` table.

use async_trait::async_trait;
use sqlx::PgPool;

use super::{CommandStore, EntityStore, StoreError};
use crate::models::Command;

/// Column list for `commands` queries.
const COLUMNS: &str = "id, name, description, script, timeout_seconds, created_at";

pub struct CommandRepo {
    pool: PgPool,
}

impl CommandRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EntityStore<Command> for CommandRepo {
    async fn list(&self) -> Result<Vec<Command>, StoreError> {
        let query = format!(
            r#"SELECT {COLUMNS} FROM commands ORDER BY created_at DESC, id COLLATE "C" ASC"#
        );
        let rows = sqlx::query_as::<_, Command>(&query)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn get(&self, id: &str) -> Result<Option<Command>, StoreError> {
        let query = format!("SELECT {COLUMNS} FROM commands WHERE id = $1");
        let row = sqlx::query_as::<_, Command>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    /// Upsert; `created_at` keeps its first-inserted value.
    async fn save(&self, command: Command) -> Result<Command, StoreError> {
        let query = format!(
            "INSERT INTO commands ({COLUMNS}) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             ON CONFLICT (id) DO UPDATE SET \
                name = EXCLUDED.name, \
                description = EXCLUDED.description, \
                script = EXCLUDED.script, \
                timeout_seconds = EXCLUDED.timeout_seconds \
             RETURNING {COLUMNS}"
        );
        let stored = sqlx::query_as::<_, Command>(&query)
            .bind(&command.id)
            .bind(&command.name)
            .bind(&command.description)
            .bind(&command.script)
            .bind(command.timeout_seconds)
            .bind(command.created_at)
            .fetch_one(&self.pool)
            .await?;
        Ok(stored)
    }
}

#[async_trait]
impl CommandStore for CommandRepo {
    async fn delete(&self, id: &str) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM commands WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
