//! Prefixed, unguessable entity identifiers.
//!
//! Identifiers look like `cmd-3f9a0c12b7e4`: a prefix, a hyphen, and 12 hex
//! characters from 6 bytes of OS randomness (48 bits).

use std::fmt::Write;

use rand::rngs::OsRng;
use rand::TryRngCore;

/// Number of random bytes in an identifier suffix.
const SUFFIX_BYTES: usize = 6;

pub const COMMAND_PREFIX: &str = "cmd";
pub const NODE_PREFIX: &str = "node";
pub const EXECUTION_PREFIX: &str = "exec";

/// Generate a new identifier with the given prefix.
///
/// Never fails: if the OS random source is unavailable the suffix falls back
/// to the current Unix time in nanoseconds.
pub fn new_id(prefix: &str) -> String {
    let mut bytes = [0u8; SUFFIX_BYTES];
    match OsRng.try_fill_bytes(&mut bytes) {
        Ok(()) => format!("{prefix}-{}", to_hex(&bytes)),
        Err(e) => {
            tracing::warn!(error = %e, "OS random source unavailable, using timestamp id");
            format!("{prefix}-{}", timestamp_suffix())
        }
    }
}

fn to_hex(bytes: &[u8]) -> String {
    bytes
        .iter()
        .fold(String::with_capacity(bytes.len() * 2), |mut out, b| {
            let _ = write!(out, "{b:02x}");
            out
        })
}

fn timestamp_suffix() -> i64 {
    let now = chrono::Utc::now();
    now.timestamp_nanos_opt()
        .unwrap_or_else(|| now.timestamp_micros())
}
