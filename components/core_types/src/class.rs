//! Priority classes.
//!
//! Classes are declared from highest to lowest priority, so the derived `Ord`
//! matches drain precedence for the microtask classes and the order in which a
//! cycle visits the macrotask phases.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The priority class of a deferred task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskClass {
    /// Highest-priority microtask, drained before any other queued work
    ImmediateMicrotask,
    /// Standard microtask, drained after immediate microtasks
    Microtask,
    /// Timer macrotask, eligible once its delay has elapsed
    Timer,
    /// I/O-callback macrotask, eligible once its readiness fires
    Io,
    /// Check-phase macrotask, drained after I/O callbacks in the same cycle
    Check,
}

impl TaskClass {
    /// All classes in declaration order.
    pub const ALL: [TaskClass; 5] = [
        TaskClass::ImmediateMicrotask,
        TaskClass::Microtask,
        TaskClass::Timer,
        TaskClass::Io,
        TaskClass::Check,
    ];

    /// Returns true for both microtask classes.
    pub fn is_microtask(self) -> bool {
        matches!(self, TaskClass::ImmediateMicrotask | TaskClass::Microtask)
    }

    /// Returns true for the timer, I/O and check classes.
    pub fn is_macrotask(self) -> bool {
        !self.is_microtask()
    }

    /// Stable kebab-case name, matching the serde representation.
    pub fn as_str(self) -> &'static str {
        match self {
            TaskClass::ImmediateMicrotask => "immediate-microtask",
            TaskClass::Microtask => "microtask",
            TaskClass::Timer => "timer",
            TaskClass::Io => "io",
            TaskClass::Check => "check",
        }
    }
}

impl fmt::Display for TaskClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskClass {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TaskClass::ALL
            .into_iter()
            .find(|class| class.as_str() == s)
            .ok_or_else(|| format!("unknown task class '{}'", s))
    }
}
