//! Startup seeding: the local node, the command file, default commands.

use bastion_db::models::node::LOCAL_NODE_ID;
use bastion_db::models::{NewCommand, NewNode};

use crate::config::ServerConfig;
use crate::engine::BastionService;
use crate::error::AppResult;
use crate::import;

/// Display name of the bootstrap node.
pub const LOCAL_NODE_NAME: &str = "Local Daemon";

/// Commands seeded into an empty catalog.
pub fn default_commands() -> Vec<NewCommand> {
    vec![
        NewCommand {
            name: "Check GPU".to_string(),
            description: Some("Show GPU status via nvidia-smi".to_string()),
            script: "nvidia-smi || echo 'nvidia-smi not available'".to_string(),
            timeout_seconds: Some(60),
        },
        NewCommand {
            name: "Docker ps".to_string(),
            description: Some("List running containers".to_string()),
            script: "docker ps".to_string(),
            timeout_seconds: Some(60),
        },
    ]
}

/// Register the local node, import `COMMANDS_FILE` if configured, and seed
/// the default commands when the catalog is still empty.
///
/// A command file that cannot be read or parsed is logged and skipped.
pub async fn bootstrap(service: &BastionService, config: &ServerConfig) -> AppResult<()> {
    service
        .register_node(NewNode {
            id: Some(LOCAL_NODE_ID.to_string()),
            name: LOCAL_NODE_NAME.to_string(),
            address: config.daemon_url.clone(),
        })
        .await?;

    if let Some(path) = &config.commands_file {
        match import::import_command_file(service, path).await {
            Ok(_) => {}
            Err(import::ImportError::Store(err)) => return Err(err),
            Err(err) => tracing::warn!(error = %err, "Command file not imported"),
        }
    }

    if service.list_commands().await?.is_empty() {
        for command in default_commands() {
            service.create_command(command).await?;
        }
        tracing::info!("Seeded default commands");
    }

    Ok(())
}
