//! Report rendering

use crate::cli::OutputFormat;
use crate::error::CliResult;
use serde::Serialize;
use task_scheduler::{CompletionStatus, ExecutionLog, RunSummary, TaskClass};

/// Everything a scenario run produced
#[derive(Debug, Clone, Serialize)]
pub struct ScenarioReport {
    /// Scenario name
    pub scenario: String,
    /// Lines printed by synchronous code and actions, in print order
    pub console: Vec<String>,
    /// Clock reading when the run ended
    pub finished_at_ms: u64,
    /// Completion records in execution order
    pub log: ExecutionLog,
    /// Counters for the run
    pub summary: RunSummary,
}

impl ScenarioReport {
    /// Renders the report in the requested format
    pub fn render(&self, format: OutputFormat) -> CliResult<String> {
        match format {
            OutputFormat::Text => Ok(self.to_text()),
            OutputFormat::Json => Ok(serde_json::to_string_pretty(self)?),
        }
    }

    /// Drops log records of every class but `class`. Console and summary
    /// still describe the whole run.
    pub fn only_class(mut self, class: TaskClass) -> Self {
        self.log.retain(|record| record.class == class);
        self
    }

    /// Console transcript followed by an aligned table of the execution log
    pub fn to_text(&self) -> String {
        let mut lines = vec![format!("scenario: {}", self.scenario), String::new()];

        lines.push("console:".to_string());
        lines.extend(self.console.iter().map(|line| format!("  {}", line)));
        lines.push(String::new());

        lines.push("execution log:".to_string());
        lines.push(format!(
            "  {:<5} {:<6} {:<7} {:<20} {:<12} {}",
            "cycle", "id", "at_ms", "class", "label", "status"
        ));
        for record in &self.log {
            let status = match &record.status {
                CompletionStatus::Completed => "completed".to_string(),
                CompletionStatus::Faulted(fault) => format!("faulted ({})", fault),
            };
            lines.push(format!(
                "  {:<5} {:<6} {:<7} {:<20} {:<12} {}",
                record.cycle,
                record.id.to_string(),
                record.at_ms,
                record.class.as_str(),
                record.label.as_deref().unwrap_or("-"),
                status
            ));
        }
        lines.push(String::new());

        let mut footer = format!(
            "{} executed, {} faulted, {} cycles, finished at {} ms",
            self.summary.executed, self.summary.faulted, self.summary.cycles, self.finished_at_ms
        );
        if self.summary.stalled_io > 0 {
            footer.push_str(&format!(
                ", {} I/O callbacks never ready",
                self.summary.stalled_io
            ));
        }
        lines.push(footer);

        let mut out = lines.join("\n");
        out.push('\n');
        out
    }
}
