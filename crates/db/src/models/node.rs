//! Models for the `nodes` table.

use bastion_core::error::CoreError;
use bastion_core::id::{new_id, NODE_PREFIX};
use bastion_core::types::EntityId;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Id of the node registered at startup for the co-located agent.
pub const LOCAL_NODE_ID: &str = "node-local";

/// A registered agent reachable at `address` (base URL of its runner).
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Node {
    pub id: EntityId,
    pub name: String,
    pub address: String,
}

/// DTO for registering a node. The id is generated when absent.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewNode {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub address: String,
}

impl NewNode {
    pub fn into_node(self) -> Result<Node, CoreError> {
        if self.address.trim().is_empty() {
            return Err(CoreError::Validation("address is required".to_string()));
        }
        let id = self
            .id
            .filter(|id| !id.trim().is_empty())
            .unwrap_or_else(|| new_id(NODE_PREFIX));
        Ok(Node {
            id,
            name: self.name,
            address: self.address,
        })
    }
}
