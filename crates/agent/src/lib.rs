//! Remote runner daemon.
//!
//! Runs on every node. Accepts run requests from the orchestrator on
//! `POST /api/v1/exec`, executes the script through the local shell and
//! replies with its captured output.

pub mod config;
pub mod server;
