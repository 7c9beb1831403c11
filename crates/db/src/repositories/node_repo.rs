//! PostgreSQL repository for the `nodes` table.

use async_trait::async_trait;
use sqlx::PgPool;

use super::{EntityStore, StoreError};
use crate::models::Node;

const COLUMNS: &str = "id, name, address";

pub struct NodeRepo {
    pool: PgPool,
}

impl NodeRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EntityStore<Node> for NodeRepo {
    async fn list(&self) -> Result<Vec<Node>, StoreError> {
        let query = format!(
            r#"SELECT {COLUMNS} FROM nodes ORDER BY name COLLATE "C" ASC, id COLLATE "C" ASC"#
        );
        let rows = sqlx::query_as::<_, Node>(&query)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn get(&self, id: &str) -> Result<Option<Node>, StoreError> {
        let query = format!("SELECT {COLUMNS} FROM nodes WHERE id = $1");
        let row = sqlx::query_as::<_, Node>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn save(&self, node: Node) -> Result<Node, StoreError> {
        let query = format!(
            "INSERT INTO nodes ({COLUMNS}) VALUES ($1, $2, $3) \
             ON CONFLICT (id) DO UPDATE SET name = EXCLUDED.name, address = EXCLUDED.address \
             RETURNING {COLUMNS}"
        );
        let stored = sqlx::query_as::<_, Node>(&query)
            .bind(&node.id)
            .bind(&node.name)
            .bind(&node.address)
            .fetch_one(&self.pool)
            .await?;
        Ok(stored)
    }
}
