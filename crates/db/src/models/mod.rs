//! Entity models and DTOs.

pub mod command;
pub mod execution;
pub mod node;

pub use command::{Command, NewCommand};
pub use execution::Execution;
pub use node::{NewNode, Node};
