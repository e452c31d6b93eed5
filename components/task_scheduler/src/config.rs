//! Scheduler configuration.

use core_types::{SchedulerError, SchedulerResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Largest timer delay accepted by default, in milliseconds.
pub const DEFAULT_MAX_DELAY_MS: u64 = 2_147_483_647;

/// Default runaway guard for a single `run()`.
pub const DEFAULT_MAX_CYCLES: u64 = 1_000_000;

/// Tunables for a [`Scheduler`](crate::Scheduler).
///
/// Every field has a default, so a JSON file only needs the fields it changes.
///
/// # Examples
///
/// ```
/// use task_scheduler::SchedulerConfig;
///
/// let config = SchedulerConfig::from_json_str(r#"{ "start_time_ms": 500 }"#).unwrap();
/// assert_eq!(config.start_time_ms, 500);
/// assert!(config.reentrant);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SchedulerConfig {
    /// Initial reading of the default virtual clock
    pub start_time_ms: u64,
    /// Timer delays above this are rejected
    pub max_delay_ms: u64,
    /// A run stops after this many cycles even if work remains
    pub max_cycles: u64,
    /// When only predicate-gated I/O remains, advance the clock by this step
    /// per cycle instead of stopping
    pub io_poll_step_ms: Option<u64>,
    /// When false, the scheduler refuses new work once a run reaches idle
    pub reentrant: bool,
    /// Capture panicking actions as faults instead of unwinding through `run()`
    pub catch_panics: bool,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            start_time_ms: 0,
            max_delay_ms: DEFAULT_MAX_DELAY_MS,
            max_cycles: DEFAULT_MAX_CYCLES,
            io_poll_step_ms: None,
            reentrant: true,
            catch_panics: true,
        }
    }
}

impl SchedulerConfig {
    /// Parses and validates a JSON configuration.
    pub fn from_json_str(json: &str) -> SchedulerResult<Self> {
        let config: SchedulerConfig =
            serde_json::from_str(json).map_err(|e| SchedulerError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a JSON configuration file.
    pub fn from_file(path: impl AsRef<Path>) -> SchedulerResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| SchedulerError::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_json_str(&json)
    }

    /// Checks value ranges.
    pub fn validate(&self) -> SchedulerResult<()> {
        if self.max_cycles == 0 {
            return Err(SchedulerError::Config(
                "max_cycles must be positive".to_string(),
            ));
        }
        if self.io_poll_step_ms == Some(0) {
            return Err(SchedulerError::Config(
                "io_poll_step_ms must be positive".to_string(),
            ));
        }
        Ok(())
    }
}
