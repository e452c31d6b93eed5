//! Scheduler CLI Library
//!
//! Provides the Runner, the built-in scenarios and report rendering for the
//! `corten-sched` binary.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod cli;
pub mod error;
pub mod report;
pub mod runner;
pub mod scenario;

pub use cli::{Cli, OutputFormat};
pub use error::{CliError, CliResult};
pub use report::ScenarioReport;
pub use runner::Runner;
pub use scenario::{Console, Scenario};
