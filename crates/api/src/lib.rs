//! Bastion orchestrator library.
//!
//! Exposes the building blocks (config, state, error handling, dispatch
//! engine, routes) so integration tests and the binary entrypoint can both
//! access them.

pub mod bootstrap;
pub mod config;
pub mod engine;
pub mod error;
pub mod handlers;
pub mod import;
pub mod response;
pub mod router;
pub mod routes;
pub mod state;
