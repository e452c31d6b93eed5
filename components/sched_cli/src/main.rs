//! Corten Scheduler CLI
//!
//! Entry point for the scenario runner. Parses CLI arguments, sets up logging
//! and delegates to the Runner for execution.

use clap::Parser as ClapParser;
use sched_cli::{scenario, Cli, CliError, CliResult, Runner};
use tracing_subscriber::EnvFilter;

fn init_logging(level: Option<&str>) -> CliResult<()> {
    let filter = match level {
        Some(level) => EnvFilter::try_new(level).map_err(|e| CliError::Logging(e.to_string()))?,
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| CliError::Logging(e.to_string()))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.log_level.as_deref())?;

    if cli.list {
        for s in scenario::all() {
            println!("{:<16} {}", s.name, s.description);
        }
        return Ok(());
    }

    let Some(name) = cli.scenario.as_deref() else {
        // Default: show usage
        println!("Corten Scheduler v{}", env!("CARGO_PKG_VERSION"));
        println!();
        println!("Usage:");
        println!("  corten-sched --scenario <NAME>     Run a built-in scenario");
        println!("  corten-sched --list                List built-in scenarios");
        println!();
        println!("Run 'corten-sched --help' for more options.");
        return Ok(());
    };

    let mut runner = Runner::new().with_realtime(cli.realtime);
    if let Some(path) = &cli.config {
        runner = match runner.with_config_file(path) {
            Ok(runner) => runner,
            Err(e) => {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        };
    }

    match runner.run_named(name) {
        Ok(report) => {
            let report = match cli.class {
                Some(class) => report.only_class(class),
                None => report,
            };
            print!("{}", report.render(cli.format)?);
            if cli.format == sched_cli::OutputFormat::Json {
                println!();
            }
        }
        Err(CliError::UnknownScenario(name)) => {
            eprintln!("Unknown scenario '{}'. Available:", name);
            for s in scenario::all() {
                eprintln!("  {}", s.name);
            }
            std::process::exit(2);
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }

    Ok(())
}
