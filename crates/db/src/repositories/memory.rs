//! In-memory backend.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{CommandStore, Entity, EntityStore, StoreError};
use crate::models::Command;

/// Keyed collection of one entity kind behind a single reader/writer lock.
///
/// Reads hand out clones, so callers never hold references into the map.
pub struct MemoryStore<T> {
    data: RwLock<HashMap<String, T>>,
}

impl<T: Entity> MemoryStore<T> {
    pub fn new() -> Self {
        Self {
            data: RwLock::new(HashMap::new()),
        }
    }
}

impl<T: Entity> Default for MemoryStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<T: Entity> EntityStore<T> for MemoryStore<T> {
    async fn list(&self) -> Result<Vec<T>, StoreError> {
        let mut out: Vec<T> = self.data.read().await.values().cloned().collect();
        out.sort_by(T::list_order);
        Ok(out)
    }

    async fn get(&self, id: &str) -> Result<Option<T>, StoreError> {
        Ok(self.data.read().await.get(id).cloned())
    }

    async fn save(&self, entity: T) -> Result<T, StoreError> {
        let mut data = self.data.write().await;
        let stored = match data.get(entity.id()) {
            Some(existing) => T::merge(existing, entity),
            None => entity,
        };
        data.insert(stored.id().to_string(), stored.clone());
        Ok(stored)
    }
}

#[async_trait]
impl CommandStore for MemoryStore<Command> {
    async fn delete(&self, id: &str) -> Result<bool, StoreError> {
        Ok(self.data.write().await.remove(id).is_some())
    }
}
