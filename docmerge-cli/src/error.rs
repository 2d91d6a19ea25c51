//! CLI error types.

use thiserror::Error;

use docmerge::config::ConfigError;
use docmerge::engine::EngineError;
use docmerge::merge::MergeError;

/// Errors surfaced to the CLI user. Any of these yields a non-zero exit.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration could not be resolved.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The merge run failed fatally.
    #[error("Merge failed: {0}")]
    Merge(#[from] MergeError),

    /// The engine session could not be created.
    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),

    /// The merge ran but the fixed-layout export did not produce a file.
    #[error("Fixed-layout export failed: {0}")]
    ExportFailed(String),
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        CliError::Config(e.to_string())
    }
}
