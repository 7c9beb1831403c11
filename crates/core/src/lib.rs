//! Shared domain logic for the bastion orchestrator and its agents.
//!
//! Nothing in this crate touches the database or the network. It holds the
//! error taxonomy, identifier generation, the runner wire protocol, and the
//! subprocess supervision used by the agent.

pub mod error;
pub mod id;
pub mod protocol;
pub mod scripting;
pub mod status;
pub mod types;
