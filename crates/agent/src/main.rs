//! `bastion-agent` -- remote runner daemon.
//!
//! Executes scripts sent by the orchestrator and returns their output.
//!
//! # Environment variables
//!
//! | Variable       | Default     | Description                         |
//! |----------------|-------------|-------------------------------------|
//! | `DAEMON_HOST`  | `127.0.0.1` | Bind address                        |
//! | `DAEMON_PORT`  | `9081`      | Bind port                           |
//! | `DAEMON_SHELL` | `bash`      | Interpreter, run as `<shell> -c`    |

use std::net::SocketAddr;
use std::sync::Arc;

use bastion_agent::config::AgentConfig;
use bastion_agent::server::{build_router, AgentState};
use bastion_core::scripting::runner::Runner;
use bastion_core::scripting::shell::ShellExecutor;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bastion_agent=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AgentConfig::from_env();

    let shutdown = CancellationToken::new();
    let state = AgentState {
        runner: Arc::new(Runner::new(ShellExecutor::new(config.shell.clone()))),
        shutdown: shutdown.clone(),
    };

    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid DAEMON_HOST address"),
        config.port,
    );
    tracing::info!(%addr, shell = %config.shell, "Starting bastion-agent");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(async move {
            shutdown_signal().await;
            shutdown.cancel();
        })
        .await
        .expect("Server error");

    tracing::info!("Graceful shutdown complete");
}

/// Wait for SIGINT or (on Unix) SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("Received SIGINT (Ctrl-C), shutting down"),
        () = terminate => tracing::info!("Received SIGTERM, shutting down"),
    }
}
