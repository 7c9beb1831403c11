//! Models for the `commands` table.

use bastion_core::error::CoreError;
use bastion_core::id::{new_id, COMMAND_PREFIX};
use bastion_core::protocol::normalize_timeout;
use bastion_core::types::{now, EntityId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A named, reusable script template.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Command {
    pub id: EntityId,
    pub name: String,
    pub description: Option<String>,
    pub script: String,
    pub timeout_seconds: i32,
    pub created_at: Timestamp,
}

/// DTO for creating (or fully replacing) a command.
///
/// Every field defaults so that missing values surface as validation errors
/// rather than deserialization failures.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct NewCommand {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub script: String,
    #[serde(default)]
    pub timeout_seconds: Option<i32>,
}

impl NewCommand {
    /// Reject blank names and scripts.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.name.trim().is_empty() {
            return Err(CoreError::Validation("name is required".to_string()));
        }
        if self.script.trim().is_empty() {
            return Err(CoreError::Validation("script is required".to_string()));
        }
        Ok(())
    }

    /// Validate and build a new [`Command`] with a fresh id and creation time.
    pub fn into_command(self) -> Result<Command, CoreError> {
        self.validate()?;
        Ok(Command {
            id: new_id(COMMAND_PREFIX),
            created_at: now(),
            name: self.name,
            description: normalize_description(self.description),
            script: self.script,
            timeout_seconds: normalize_timeout(self.timeout_seconds),
        })
    }

    /// Validate and apply as a full replacement of `existing`, keeping its id
    /// and creation time.
    pub fn replace(self, existing: &Command) -> Result<Command, CoreError> {
        self.validate()?;
        Ok(Command {
            id: existing.id.clone(),
            created_at: existing.created_at,
            name: self.name,
            description: normalize_description(self.description),
            script: self.script,
            timeout_seconds: normalize_timeout(self.timeout_seconds),
        })
    }
}

fn normalize_description(description: Option<String>) -> Option<String> {
    description.filter(|d| !d.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(name: &str, script: &str, timeout_seconds: Option<i32>) -> NewCommand {
        NewCommand {
            name: name.to_string(),
            description: Some("desc".to_string()),
            script: script.to_string(),
            timeout_seconds,
        }
    }

    #[test]
    fn blank_name_is_rejected() {
        let err = input("  ", "echo hi", None).into_command().unwrap_err();
        assert_eq!(err.to_string(), "Validation failed: name is required");
    }

    #[test]
    fn blank_script_is_rejected() {
        let err = input("list", "\n\t", None).into_command().unwrap_err();
        assert_eq!(err.to_string(), "Validation failed: script is required");
    }

    #[test]
    fn timeout_defaults_to_300() {
        assert_eq!(input("a", "ls", None).into_command().unwrap().timeout_seconds, 300);
        assert_eq!(input("a", "ls", Some(0)).into_command().unwrap().timeout_seconds, 300);
        assert_eq!(input("a", "ls", Some(-1)).into_command().unwrap().timeout_seconds, 300);
        assert_eq!(input("a", "ls", Some(90)).into_command().unwrap().timeout_seconds, 90);
    }

    #[test]
    fn new_command_gets_prefixed_id() {
        let cmd = input("a", "ls", None).into_command().unwrap();
        assert!(cmd.id.starts_with("cmd-"));
    }

    #[test]
    fn replace_keeps_identity() {
        let original = input("a", "ls", Some(10)).into_command().unwrap();
        let replaced = input("b", "pwd", None).replace(&original).unwrap();
        assert_eq!(replaced.id, original.id);
        assert_eq!(replaced.created_at, original.created_at);
        assert_eq!(replaced.name, "b");
        assert_eq!(replaced.timeout_seconds, 300);
    }

    #[test]
    fn missing_fields_deserialize_to_defaults() {
        let dto: NewCommand = serde_json::from_str(r#"{"script":"ls"}"#).unwrap();
        assert_eq!(dto.name, "");
        assert_eq!(dto.timeout_seconds, None);
        assert!(dto.validate().is_err());
    }
}
