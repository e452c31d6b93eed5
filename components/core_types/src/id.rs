//! Task identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a scheduled task.
///
/// Identifiers are allocated by the scheduler in strictly increasing order, so
/// comparing two ids also tells which task was registered first.
///
/// # Examples
///
/// ```
/// use core_types::TaskId;
///
/// let first = TaskId::new(1);
/// let second = first.next();
/// assert!(first < second);
/// assert_eq!(second.to_string(), "#2");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(u64);

impl TaskId {
    /// Wraps a raw identifier.
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw identifier.
    pub const fn get(self) -> u64 {
        self.0
    }

    /// Returns the identifier that follows this one.
    pub const fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}
