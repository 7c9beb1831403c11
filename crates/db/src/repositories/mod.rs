//! Storage contract and backends.
//!
//! [`EntityStore`] is the contract every backend implements per entity kind;
//! [`CommandStore`] adds deletion for commands. [`Store`] bundles one store
//! per kind and is what services receive at construction.
//!
//! Two backends exist: [`memory::MemoryStore`] and the PostgreSQL
//! repositories ([`CommandRepo`], [`NodeRepo`], [`ExecutionRepo`]). They
//! order `list` results the same way and apply the same upsert rules.

use std::cmp::Ordering;
use std::sync::Arc;

use async_trait::async_trait;

use crate::models::{Command, Execution, Node};
use crate::DbPool;

pub mod command_repo;
pub mod execution_repo;
pub mod memory;
pub mod node_repo;

pub use command_repo::CommandRepo;
pub use execution_repo::ExecutionRepo;
pub use memory::MemoryStore;
pub use node_repo::NodeRepo;

/// Errors from a storage backend.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// A persisted entity kind.
pub trait Entity: Clone + Send + Sync + 'static {
    /// Entity name used in not-found errors.
    const KIND: &'static str;

    fn id(&self) -> &str;

    /// Order of `list` results.
    fn list_order(a: &Self, b: &Self) -> Ordering;

    /// Result of upserting `incoming` over an already stored `existing`.
    ///
    /// Defaults to full replacement.
    fn merge(_existing: &Self, incoming: Self) -> Self {
        incoming
    }
}

impl Entity for Command {
    const KIND: &'static str = "command";

    fn id(&self) -> &str {
        &self.id
    }

    /// Newest first.
    fn list_order(a: &Self, b: &Self) -> Ordering {
        b.created_at.cmp(&a.created_at).then_with(|| a.id.cmp(&b.id))
    }

    /// Creation time is fixed at first insert.
    fn merge(existing: &Self, incoming: Self) -> Self {
        Self {
            created_at: existing.created_at,
            ..incoming
        }
    }
}

impl Entity for Node {
    const KIND: &'static str = "node";

    fn id(&self) -> &str {
        &self.id
    }

    /// By display name in byte order, matching `COLLATE "C"` in PostgreSQL.
    fn list_order(a: &Self, b: &Self) -> Ordering {
        a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id))
    }
}

impl Entity for Execution {
    const KIND: &'static str = "execution";

    fn id(&self) -> &str {
        &self.id
    }

    /// Most recently started first.
    fn list_order(a: &Self, b: &Self) -> Ordering {
        b.started_at.cmp(&a.started_at).then_with(|| a.id.cmp(&b.id))
    }

    /// What ran, where, and when it started never change.
    fn merge(existing: &Self, incoming: Self) -> Self {
        Self {
            command_id: existing.command_id.clone(),
            node_id: existing.node_id.clone(),
            started_at: existing.started_at,
            ..incoming
        }
    }
}

/// Persistence contract for one entity kind.
#[async_trait]
pub trait EntityStore<T: Entity>: Send + Sync {
    /// All entities, in [`Entity::list_order`].
    async fn list(&self) -> Result<Vec<T>, StoreError>;

    async fn get(&self, id: &str) -> Result<Option<T>, StoreError>;

    /// Insert, or update the mutable fields of an existing entity with the
    /// same id. Returns the stored value.
    async fn save(&self, entity: T) -> Result<T, StoreError>;
}

/// Commands can additionally be deleted.
#[async_trait]
pub trait CommandStore: EntityStore<Command> {
    /// Remove a command. Returns `false` if it did not exist.
    async fn delete(&self, id: &str) -> Result<bool, StoreError>;
}

/// One store per entity kind, shared by every caller.
#[derive(Clone)]
pub struct Store {
    pub commands: Arc<dyn CommandStore>,
    pub nodes: Arc<dyn EntityStore<Node>>,
    pub executions: Arc<dyn EntityStore<Execution>>,
}

impl Store {
    /// Process-local store; contents are lost on restart.
    pub fn in_memory() -> Self {
        Self {
            commands: Arc::new(MemoryStore::<Command>::new()),
            nodes: Arc::new(MemoryStore::<Node>::new()),
            executions: Arc::new(MemoryStore::<Execution>::new()),
        }
    }

    /// PostgreSQL-backed store. Migrations must already be applied.
    pub fn postgres(pool: DbPool) -> Self {
        Self {
            commands: Arc::new(CommandRepo::new(pool.clone())),
            nodes: Arc::new(NodeRepo::new(pool.clone())),
            executions: Arc::new(ExecutionRepo::new(pool)),
        }
    }
}
