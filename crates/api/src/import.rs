//! Command file import.
//!
//! A command file is a YAML sequence of command definitions:
//!
//! ```yaml
//! - name: Disk usage
//!   description: Free space on every mount
//!   script: df -h
//!   timeout_seconds: 30
//! ```
//!
//! Every entry passes through the same validation as `POST /commands`.
//! Invalid entries are skipped with a warning.

use std::path::{Path, PathBuf};

use bastion_core::error::CoreError;
use bastion_db::models::NewCommand;

use crate::engine::BastionService;
use crate::error::AppError;

/// Failure to load a command file as a whole.
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// A store failure while saving an entry.
    #[error(transparent)]
    Store(#[from] AppError),
}

/// Outcome of one import run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ImportSummary {
    pub imported: usize,
    pub skipped: usize,
}

/// Parse command definitions from YAML text. Blank input yields no entries.
pub fn parse_commands(text: &str) -> Result<Vec<NewCommand>, serde_yaml::Error> {
    if text.trim().is_empty() {
        return Ok(Vec::new());
    }
    serde_yaml::from_str(text)
}

/// Read and parse a command file.
pub async fn load_command_file(path: &Path) -> Result<Vec<NewCommand>, ImportError> {
    let text = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| ImportError::Read {
            path: path.to_path_buf(),
            source,
        })?;
    parse_commands(&text).map_err(|source| ImportError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Create every valid entry. Validation failures are logged and skipped;
/// storage failures abort the import.
pub async fn import_commands(
    service: &BastionService,
    entries: Vec<NewCommand>,
) -> Result<ImportSummary, ImportError> {
    let mut summary = ImportSummary::default();

    for (index, entry) in entries.into_iter().enumerate() {
        let name = entry.name.clone();
        match service.create_command(entry).await {
            Ok(_) => summary.imported += 1,
            Err(AppError::Core(CoreError::Validation(reason))) => {
                tracing::warn!(index, name = %name, reason = %reason, "Skipping invalid command");
                summary.skipped += 1;
            }
            Err(err) => return Err(err.into()),
        }
    }

    Ok(summary)
}

/// Load `path` and import its commands.
pub async fn import_command_file(
    service: &BastionService,
    path: &Path,
) -> Result<ImportSummary, ImportError> {
    let entries = load_command_file(path).await?;
    let summary = import_commands(service, entries).await?;
    tracing::info!(
        path = %path.display(),
        imported = summary.imported,
        skipped = summary.skipped,
        "Imported command file",
    );
    Ok(summary)
}

// ---- Tests ----
