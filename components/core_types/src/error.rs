//! Scheduler error types.
//!
//! Two separate families live here. [`ActionFault`] describes a task's action
//! failing; it is captured in that task's completion record and never aborts a
//! cycle. [`SchedulerError`] describes misuse of the scheduler itself and is
//! returned synchronously to whoever made the call.

use crate::TaskId;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// How an action faulted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FaultKind {
    /// The action returned an error
    Error,
    /// The action panicked and the panic was caught by the driver
    Panic,
}

impl fmt::Display for FaultKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FaultKind::Error => f.write_str("failed"),
            FaultKind::Panic => f.write_str("panicked"),
        }
    }
}

/// A fault raised by a task's action.
///
/// # Examples
///
/// ```
/// use core_types::{ActionFault, FaultKind};
///
/// let fault = ActionFault::error("file not found");
/// assert_eq!(fault.kind, FaultKind::Error);
/// assert_eq!(fault.to_string(), "action failed: file not found");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("action {kind}: {message}")]
pub struct ActionFault {
    /// The way the action faulted
    pub kind: FaultKind,
    /// Human-readable fault message
    pub message: String,
}

impl ActionFault {
    /// Creates a fault for an action that returned an error.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: FaultKind::Error,
            message: message.into(),
        }
    }

    /// Creates a fault for an action that panicked.
    pub fn panic(message: impl Into<String>) -> Self {
        Self {
            kind: FaultKind::Panic,
            message: message.into(),
        }
    }
}

impl From<String> for ActionFault {
    fn from(message: String) -> Self {
        ActionFault::error(message)
    }
}

impl From<&str> for ActionFault {
    fn from(message: &str) -> Self {
        ActionFault::error(message)
    }
}

impl From<SchedulerError> for ActionFault {
    fn from(err: SchedulerError) -> Self {
        ActionFault::error(err.to_string())
    }
}

/// Errors in the scheduler's own bookkeeping.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchedulerError {
    /// Timer delay was negative or above the configured ceiling
    #[error("invalid timer delay {delay_ms}ms (allowed 0..={max_ms})")]
    InvalidDelay {
        /// Requested delay
        delay_ms: i64,
        /// Configured ceiling
        max_ms: u64,
    },

    /// Another task already registered under this label
    #[error("duplicate task label '{label}' (already used by {existing})")]
    DuplicateLabel {
        /// The label that was requested
        label: String,
        /// The task that owns the label
        existing: TaskId,
    },

    /// The scheduler went idle with re-entry disabled
    #[error("scheduler is closed: it reached idle with re-entry disabled")]
    Closed,

    /// No pending task with this identifier
    #[error("no pending task {0}")]
    UnknownTask(TaskId),

    /// The task exists but is not an I/O callback
    #[error("task {0} is not an I/O callback")]
    NotIoTask(TaskId),

    /// Invalid configuration value
    #[error("invalid configuration: {0}")]
    Config(String),
}

/// Result type for scheduler operations
pub type SchedulerResult<T> = Result<T, SchedulerError>;

/// Why a cancellation request was a no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CancellationMiss {
    /// The task already ran (or faulted)
    AlreadyRan,
    /// The task was cancelled earlier
    AlreadyCancelled,
    /// The identifier was never handed out by this scheduler
    Unknown,
}
