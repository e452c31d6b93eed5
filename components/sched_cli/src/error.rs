//! Error types for the CLI

use core_types::SchedulerError;
use thiserror::Error;

/// CLI-specific errors
#[derive(Debug, Error)]
pub enum CliError {
    /// Scheduler bookkeeping error
    #[error("scheduler error: {0}")]
    Scheduler(#[from] SchedulerError),

    /// Requested scenario does not exist
    #[error("unknown scenario '{0}' (use --list to see available scenarios)")]
    UnknownScenario(String),

    /// Report serialization error
    #[error("output error: {0}")]
    Json(#[from] serde_json::Error),

    /// Logging setup error
    #[error("logging error: {0}")]
    Logging(String),
}

/// Result type for CLI operations
pub type CliResult<T> = Result<T, CliError>;
