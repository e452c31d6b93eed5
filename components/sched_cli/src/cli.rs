//! Command-line argument definitions

use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use task_scheduler::TaskClass;

/// How the report is printed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Console transcript followed by an aligned execution log
    #[default]
    Text,
    /// The whole report as pretty-printed JSON
    Json,
}

/// Corten deferred task scheduler
#[derive(Debug, Clone, Parser)]
#[command(name = "corten-sched", version, about = "Run task ordering scenarios on the Corten scheduler")]
pub struct Cli {
    /// Scenario to run
    #[arg(short, long)]
    pub scenario: Option<String>,

    /// List built-in scenarios
    #[arg(short, long)]
    pub list: bool,

    /// Scheduler configuration file (JSON)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Only show execution log records of this class, e.g. "check" or "io"
    #[arg(long)]
    pub class: Option<TaskClass>,

    /// Use the wall clock instead of virtual time
    #[arg(long)]
    pub realtime: bool,

    /// Log filter, e.g. "debug" or "task_scheduler=trace" (overrides RUST_LOG)
    #[arg(long)]
    pub log_level: Option<String>,
}

impl Cli {
    /// Creates arguments that run a single scenario with defaults.
    pub fn with_scenario(name: impl Into<String>) -> Self {
        Self {
            scenario: Some(name.into()),
            list: false,
            config: None,
            format: OutputFormat::Text,
            class: None,
            realtime: false,
            log_level: None,
        }
    }
}
