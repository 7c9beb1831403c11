//! Command, node and execution operations over an injected [`Store`].

use std::sync::Arc;
use std::time::Duration;

use bastion_core::error::{CoreError, DispatchStage};
use bastion_core::protocol::{RunRequest, RunResponse};
use bastion_db::models::{Command, Execution, NewCommand, NewNode, Node};
use bastion_db::repositories::Entity;
use bastion_db::{EntityStore, Store, StoreError};
use tokio_util::sync::CancellationToken;

use crate::engine::client::RunnerClient;
use crate::error::{AppError, AppResult};

/// Failure of [`BastionService::execute_command`].
#[derive(Debug, thiserror::Error)]
pub enum ExecuteError {
    /// No dispatch outcome: blank or unknown ids (nothing persisted), or a
    /// storage failure.
    #[error(transparent)]
    Rejected(#[from] AppError),

    /// The dispatch itself failed. The execution has been recorded as
    /// failed and is returned alongside the cause.
    #[error("execution failed: {cause}")]
    Dispatch {
        execution: Box<Execution>,
        #[source]
        cause: CoreError,
    },
}

/// Orchestrator operations. Shared across handlers behind an `Arc`.
pub struct BastionService {
    store: Store,
    client: RunnerClient,
    dispatch_timeout: Duration,
}

impl BastionService {
    pub fn new(store: Store, dispatch_timeout: Duration) -> Self {
        Self::with_client(store, RunnerClient::new(), dispatch_timeout)
    }

    pub fn with_client(store: Store, client: RunnerClient, dispatch_timeout: Duration) -> Self {
        Self {
            store,
            client,
            dispatch_timeout,
        }
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    // ---- Commands ----

    pub async fn list_commands(&self) -> AppResult<Vec<Command>> {
        Ok(self.store.commands.list().await?)
    }

    pub async fn get_command(&self, id: &str) -> AppResult<Command> {
        require_id(id, "command id")?;
        self.store
            .commands
            .get(id)
            .await?
            .ok_or_else(|| AppError::not_found(Command::KIND, id))
    }

    pub async fn create_command(&self, input: NewCommand) -> AppResult<Command> {
        let command = input.into_command()?;
        let command = self.store.commands.save(command).await?;
        tracing::info!(command_id = %command.id, name = %command.name, "Command created");
        Ok(command)
    }

    /// Replace every mutable field of an existing command.
    pub async fn replace_command(&self, id: &str, input: NewCommand) -> AppResult<Command> {
        let existing = self.get_command(id).await?;
        let command = input.replace(&existing)?;
        let command = self.store.commands.save(command).await?;
        tracing::info!(command_id = %command.id, "Command replaced");
        Ok(command)
    }

    /// Delete a command. Executions that reference it are kept.
    pub async fn delete_command(&self, id: &str) -> AppResult<()> {
        require_id(id, "command id")?;
        if !self.store.commands.delete(id).await? {
            return Err(AppError::not_found(Command::KIND, id));
        }
        tracing::info!(command_id = %id, "Command deleted");
        Ok(())
    }

    // ---- Nodes ----

    pub async fn list_nodes(&self) -> AppResult<Vec<Node>> {
        Ok(self.store.nodes.list().await?)
    }

    pub async fn get_node(&self, id: &str) -> AppResult<Node> {
        require_id(id, "node id")?;
        self.store
            .nodes
            .get(id)
            .await?
            .ok_or_else(|| AppError::not_found(Node::KIND, id))
    }

    /// Register a node, or update the name and address of a known id.
    pub async fn register_node(&self, input: NewNode) -> AppResult<Node> {
        let node = input.into_node()?;
        let node = self.store.nodes.save(node).await?;
        tracing::info!(node_id = %node.id, address = %node.address, "Node registered");
        Ok(node)
    }

    // ---- Executions ----

    pub async fn list_executions(&self) -> AppResult<Vec<Execution>> {
        Ok(self.store.executions.list().await?)
    }

    pub async fn get_execution(&self, id: &str) -> AppResult<Execution> {
        require_id(id, "execution id")?;
        self.store
            .executions
            .get(id)
            .await?
            .ok_or_else(|| AppError::not_found(Execution::KIND, id))
    }

    /// Run a command on a node and record the outcome.
    ///
    /// The execution is persisted as `running` before the request is sent
    /// and written exactly once more with its terminal state. Dispatch is
    /// bounded by the service's dispatch timeout and by `cancel`.
    ///
    /// The round trip and the terminal write run on their own task, so
    /// dropping the returned future does not leave the execution `running`.
    pub async fn execute_command(
        &self,
        command_id: &str,
        node_id: &str,
        cancel: &CancellationToken,
    ) -> Result<Execution, ExecuteError> {
        let command = self.get_command(command_id).await?;
        let node = self.get_node(node_id).await?;

        let execution = self
            .store
            .executions
            .save(Execution::start(&command.id, &node.id))
            .await
            .map_err(AppError::from)?;

        tracing::info!(
            execution_id = %execution.id,
            command_id = %command.id,
            node_id = %node.id,
            address = %node.address,
            "Dispatching command",
        );

        let dispatch = Dispatch {
            executions: Arc::clone(&self.store.executions),
            client: self.client.clone(),
            node_id: node.id,
            address: node.address,
            request: RunRequest {
                script: command.script,
                timeout_seconds: command.timeout_seconds,
                working_dir: None,
            },
            timeout: self.dispatch_timeout,
            cancel: cancel.clone(),
        };

        tokio::spawn(dispatch.run(execution))
            .await
            .map_err(|e| {
                AppError::Core(CoreError::Internal(format!("dispatch task failed: {e}")))
            })?
    }
}

/// One in-flight dispatch, owned by its own task.
struct Dispatch {
    executions: Arc<dyn EntityStore<Execution>>,
    client: RunnerClient,
    node_id: String,
    address: String,
    request: RunRequest,
    timeout: Duration,
    cancel: CancellationToken,
}

impl Dispatch {
    async fn run(self, running: Execution) -> Result<Execution, ExecuteError> {
        let mut execution = running.clone();
        let cause = match self.send().await {
            Ok(response) => {
                execution.complete(response);
                None
            }
            Err(cause) => {
                execution.fail(cause.to_string());
                Some(cause)
            }
        };

        let stored = match self.executions.save(execution).await {
            Ok(stored) => stored,
            Err(err) => return Err(self.record_storage_failure(running, err).await),
        };

        match cause {
            None => {
                tracing::info!(
                    execution_id = %stored.id,
                    status = %stored.status,
                    exit_code = stored.exit_code,
                    duration_ms = stored.duration_ms,
                    "Execution finished",
                );
                Ok(stored)
            }
            Some(cause) => {
                tracing::warn!(
                    execution_id = %stored.id,
                    node_id = %self.node_id,
                    error = %cause,
                    "Dispatch failed",
                );
                Err(ExecuteError::Dispatch {
                    execution: Box::new(stored),
                    cause,
                })
            }
        }
    }

    async fn send(&self) -> Result<RunResponse, CoreError> {
        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Err(CoreError::dispatch(
                DispatchStage::Cancelled,
                "request cancelled by caller",
            )),
            result = tokio::time::timeout(
                self.timeout,
                self.client.run(&self.address, &self.request),
            ) => match result {
                Ok(inner) => inner,
                Err(_) => Err(CoreError::dispatch(
                    DispatchStage::Cancelled,
                    format!("no response within {}s", self.timeout.as_secs()),
                )),
            },
        }
    }

    /// The terminal write was refused. Replace the outcome with a failure
    /// naming the storage error and write that once instead.
    async fn record_storage_failure(&self, running: Execution, err: StoreError) -> ExecuteError {
        let message = format!("failed to record outcome: {err}");
        tracing::error!(execution_id = %running.id, error = %err, "Terminal write failed");

        let mut failed = running;
        failed.fail(message.clone());
        let execution = match self.executions.save(failed.clone()).await {
            Ok(stored) => stored,
            Err(err) => {
                tracing::error!(
                    execution_id = %failed.id,
                    error = %err,
                    "Execution left running",
                );
                failed
            }
        };

        ExecuteError::Dispatch {
            execution: Box::new(execution),
            cause: CoreError::Internal(message),
        }
    }
}

fn require_id(id: &str, field: &str) -> AppResult<()> {
    if id.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(format!(
            "{field} is required"
        ))));
    }
    Ok(())
}

// ---- Tests ----
