//! Errors surfaced by the `swatch` binary, each with its own exit code.
//!
//! - 0:  success
//! - 2:  bad arguments, including a malformed `--lock SLOT=HEX` (clap)
//! - 10: the core rejected a color, harmony name or model reply
//! - 11: the reply file or history file could not be read or written
//! - 12: `history show` was given an index with no saved palette
//! - 13: a result could not be rendered as JSON

use std::fmt;
use swatch_core::SwatchError;

/// Errors produced by CLI operations, each mapped to a distinct exit code.
#[derive(Debug)]
pub enum CliError {
    /// Bad hex, unknown harmony, wrong color count, unusable model reply.
    Swatch(SwatchError),
    /// Reading or writing the reply or history file failed.
    Io(String),
    /// Arguments clap accepts but that point at nothing, such as a history index.
    Input(String),
    /// `--json` output failed to encode.
    Serialization(String),
}

impl CliError {
    /// Returns the process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Swatch(_) => 10,
            CliError::Io(_) => 11,
            CliError::Input(_) => 12,
            CliError::Serialization(_) => 13,
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Swatch(e) => write!(f, "{e}"),
            CliError::Io(msg) => write!(f, "{msg}"),
            CliError::Input(msg) => write!(f, "{msg}"),
            CliError::Serialization(msg) => write!(f, "{msg}"),
        }
    }
}

impl From<SwatchError> for CliError {
    fn from(e: SwatchError) -> Self {
        match e {
            SwatchError::Io(msg) => CliError::Io(msg),
            SwatchError::Serialization(msg) => CliError::Serialization(msg),
            other => CliError::Swatch(other),
        }
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        CliError::Serialization(e.to_string())
    }
}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        CliError::Io(e.to_string())
    }
}
