//! Wire contract between the orchestrator and a node's runner.
//!
//! One `POST {node address}/api/v1/exec` per execution, JSON in both
//! directions.

use serde::{Deserialize, Serialize};

/// Sub-path of the runner endpoint, appended to a node's base address.
pub const EXEC_PATH: &str = "/api/v1/exec";

/// Script timeout used when none (or a non-positive one) is configured.
pub const DEFAULT_TIMEOUT_SECS: i32 = 300;

/// Replace a missing or non-positive timeout with [`DEFAULT_TIMEOUT_SECS`].
pub fn normalize_timeout(timeout_seconds: Option<i32>) -> i32 {
    match timeout_seconds {
        Some(secs) if secs > 0 => secs,
        _ => DEFAULT_TIMEOUT_SECS,
    }
}

/// Join a node's base address and [`EXEC_PATH`].
pub fn exec_url(address: &str) -> String {
    format!("{}{EXEC_PATH}", address.trim_end_matches('/'))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunRequest {
    pub script: String,
    #[serde(default)]
    pub timeout_seconds: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub working_dir: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunResponse {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
    pub duration_ms: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_positive_timeouts_use_default() {
        assert_eq!(normalize_timeout(None), 300);
        assert_eq!(normalize_timeout(Some(0)), 300);
        assert_eq!(normalize_timeout(Some(-5)), 300);
        assert_eq!(normalize_timeout(Some(45)), 45);
    }

    #[test]
    fn exec_url_strips_trailing_slashes() {
        assert_eq!(exec_url("http://host:9081/"), "http://host:9081/api/v1/exec");
        assert_eq!(exec_url("http://host:9081"), "http://host:9081/api/v1/exec");
    }

    #[test]
    fn working_dir_is_omitted_when_unset() {
        let req = RunRequest {
            script: "echo hi".to_string(),
            timeout_seconds: 60,
            working_dir: None,
        };
        let json = serde_json::to_value(&req).unwrap();
        assert!(json.get("working_dir").is_none());
        assert_eq!(json["timeout_seconds"], 60);
    }

    #[test]
    fn request_without_timeout_decodes_as_zero() {
        let req: RunRequest = serde_json::from_str(r#"{"script":"ls"}"#).unwrap();
        assert_eq!(req.timeout_seconds, 0);
        assert_eq!(req.working_dir, None);
    }
}
