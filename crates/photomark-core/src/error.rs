//! Error types for the annotation core.

use thiserror::Error;

pub use crate::shapes::ColorParseError;

/// Errors from scene snapshot encoding and rasterizing.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("Snapshot JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Engine is not active")]
    Inactive,
    #[error("Render failed: {0}")]
    Render(String),
}

/// Errors loading an [`EngineConfig`](crate::config::EngineConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid config value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Reasons a leader-line finalize is abandoned.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LeaderError {
    #[error("Leader part missing from scene: {0}")]
    MissingPart(&'static str),
    #[error("Object is not a leader-line composite")]
    NotLeader,
    #[error("Transition {transition} is invalid from the {state} state")]
    InvalidTransition {
        transition: &'static str,
        state: &'static str,
    },
}
