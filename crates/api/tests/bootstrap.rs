//! Startup seeding against an in-memory store.

mod common;

use std::io::Write;

use bastion_api::bootstrap::{bootstrap, LOCAL_NODE_NAME};
use bastion_db::models::node::LOCAL_NODE_ID;

#[tokio::test]
async fn empty_store_gets_local_node_and_defaults() {
    let service = common::test_service();
    let config = common::test_config();

    bootstrap(&service, &config).await.unwrap();

    let node = service.get_node(LOCAL_NODE_ID).await.unwrap();
    assert_eq!(node.name, LOCAL_NODE_NAME);
    assert_eq!(node.address, config.daemon_url);

    let mut names: Vec<String> = service
        .list_commands()
        .await
        .unwrap()
        .into_iter()
        .map(|c| c.name)
        .collect();
    names.sort();
    assert_eq!(names, vec!["Check GPU", "Docker ps"]);
}

#[tokio::test]
async fn command_file_replaces_defaults() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "- name: Uptime\n  script: uptime").unwrap();

    let service = common::test_service();
    let mut config = common::test_config();
    config.commands_file = Some(file.path().to_path_buf());

    bootstrap(&service, &config).await.unwrap();

    let commands = service.list_commands().await.unwrap();
    assert_eq!(commands.len(), 1);
    assert_eq!(commands[0].name, "Uptime");
}

#[tokio::test]
async fn unreadable_command_file_falls_back_to_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let service = common::test_service();
    let mut config = common::test_config();
    config.commands_file = Some(dir.path().join("missing.yaml"));

    bootstrap(&service, &config).await.unwrap();
    assert_eq!(service.list_commands().await.unwrap().len(), 2);
}

#[tokio::test]
async fn bootstrap_is_idempotent() {
    let service = common::test_service();
    let config = common::test_config();

    bootstrap(&service, &config).await.unwrap();
    bootstrap(&service, &config).await.unwrap();

    assert_eq!(service.list_nodes().await.unwrap().len(), 1);
    assert_eq!(service.list_commands().await.unwrap().len(), 2);
}
