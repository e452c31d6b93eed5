//! Scenario execution
//!
//! The Runner builds a fresh scheduler for every scenario:
//! - SchedulerConfig for tunables (defaults or a JSON file)
//! - VirtualClock, or SystemClock when running in real time
//! - Console transcript shared with the scenario's actions

use crate::error::{CliError, CliResult};
use crate::report::ScenarioReport;
use crate::scenario::{self, Console, Scenario};
use std::path::Path;
use task_scheduler::{Scheduler, SchedulerConfig, SystemClock};
use tracing::info;

/// Runs built-in scenarios on a configured scheduler
#[derive(Debug, Clone, Default)]
pub struct Runner {
    /// Configuration applied to each scheduler
    config: SchedulerConfig,
    /// Whether to use the wall clock
    realtime: bool,
}

impl Runner {
    /// Create a runner with default configuration
    ///
    /// # Example
    /// ```
    /// use sched_cli::Runner;
    ///
    /// let runner = Runner::new();
    /// assert!(!runner.is_realtime());
    /// ```
    pub fn new() -> Self {
        Self::default()
    }

    /// Use the given configuration
    pub fn with_config(mut self, config: SchedulerConfig) -> Self {
        self.config = config;
        self
    }

    /// Load the configuration from a JSON file
    ///
    /// # Errors
    /// Returns `CliError::Scheduler` if the file cannot be read or is invalid
    pub fn with_config_file(self, path: impl AsRef<Path>) -> CliResult<Self> {
        let config = SchedulerConfig::from_file(path.as_ref())?;
        info!(path = %path.as_ref().display(), "loaded scheduler config");
        Ok(self.with_config(config))
    }

    /// Run on the wall clock instead of virtual time
    pub fn with_realtime(mut self, enabled: bool) -> Self {
        self.realtime = enabled;
        self
    }

    /// Check if the wall clock is used
    pub fn is_realtime(&self) -> bool {
        self.realtime
    }

    /// Active configuration
    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// Run a scenario by name
    ///
    /// # Errors
    /// Returns `CliError::UnknownScenario` for names not in the registry
    ///
    /// # Example
    /// ```
    /// use sched_cli::Runner;
    ///
    /// let report = Runner::new().run_named("io-cycle").unwrap();
    /// assert_eq!(report.console, vec!["Immediate (First)", "Timeout (Second)"]);
    /// ```
    pub fn run_named(&self, name: &str) -> CliResult<ScenarioReport> {
        let scenario =
            scenario::find(name).ok_or_else(|| CliError::UnknownScenario(name.to_string()))?;
        self.run(scenario)
    }

    /// Run a scenario and collect its report
    pub fn run(&self, scenario: &Scenario) -> CliResult<ScenarioReport> {
        let mut scheduler = Scheduler::with_config(self.config.clone())?;
        if self.realtime {
            scheduler = scheduler.with_clock(SystemClock::new());
        }

        let console = Console::new();
        scenario.build(&mut scheduler, &console)?;

        let (log, summary) = scheduler.run_with_summary();
        info!(
            scenario = scenario.name,
            executed = summary.executed,
            faulted = summary.faulted,
            "scenario finished"
        );

        Ok(ScenarioReport {
            scenario: scenario.name.to_string(),
            console: console.lines(),
            finished_at_ms: scheduler.now_ms(),
            log,
            summary,
        })
    }
}
