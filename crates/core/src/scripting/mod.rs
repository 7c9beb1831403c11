//! Agent-side script execution.
//!
//! [`runner::Runner`] implements the node's run operation on top of the
//! shell executor and the shared subprocess supervision in [`subprocess`].
//! Nothing here knows about commands, nodes, or executions.

pub mod executor;
pub mod runner;
pub mod shell;
pub mod subprocess;
