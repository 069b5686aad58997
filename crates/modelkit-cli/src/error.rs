//! CLI error types.

use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by the `modelkit` command.
#[derive(Debug, Error)]
pub enum CliError {
    /// Schema document could not be read.
    #[error("failed to read '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Schema document is not valid JSON or violates a declaration rule.
    #[error("invalid schema document '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Compilation failed.
    #[error(transparent)]
    Schema(#[from] modelkit_core::SchemaError),

    /// Rendering the output failed.
    #[error(transparent)]
    Output(#[from] modelkit_core::Error),
}
