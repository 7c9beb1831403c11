//! Command dispatch engine.
//!
//! [`BastionService`] owns the store and the runner client and implements
//! every command, node and execution operation, including the two-phase
//! execution lifecycle of [`BastionService::execute_command`].

pub mod client;
pub mod service;

pub use client::RunnerClient;
pub use service::{BastionService, ExecuteError};
