//! Sequencer error types

use std::path::PathBuf;

use shared::{CheckKind, SharedError};
use thiserror::Error;

/// Result type for sequencer operations
pub type E2eResult<T> = Result<T, E2eError>;

/// Sequencer error types
#[derive(Error, Debug)]
pub enum E2eError {
    #[error("{check} start timeout after {attempts} attempts")]
    StartupTimeout { check: CheckKind, attempts: u32 },

    #[error("{check} readiness probe failed: {message}")]
    TransientProbe { check: CheckKind, message: String },

    #[error("Saved auth state is stale or missing: {}", .path.display())]
    AuthArtifactStale { path: PathBuf },

    #[error("`{command}` exited with {}", describe_exit(.code))]
    ToolFailed { command: String, code: Option<i32> },

    #[error("Failed to spawn {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Configuration error: {0}")]
    Config(#[from] SharedError),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl E2eError {
    pub fn probe(check: CheckKind, message: impl Into<String>) -> Self {
        E2eError::TransientProbe {
            check,
            message: message.into(),
        }
    }

    /// Errors a polling loop may swallow and retry on the next tick
    pub fn is_transient(&self) -> bool {
        matches!(self, E2eError::TransientProbe { .. })
    }
}

fn describe_exit(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {code}"),
        None => "no exit code (terminated by signal)".to_string(),
    }
}
