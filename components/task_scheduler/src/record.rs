//! Completion records and the execution log.

use core_types::{ActionFault, CancellationMiss, TaskClass, TaskId};
use serde::{Deserialize, Serialize};

/// How a task's action finished.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "fault", rename_all = "kebab-case")]
pub enum CompletionStatus {
    /// The action returned `Ok`
    Completed,
    /// The action faulted; the fault is kept here
    Faulted(ActionFault),
}

impl CompletionStatus {
    /// Returns true if the action faulted.
    pub fn is_faulted(&self) -> bool {
        matches!(self, CompletionStatus::Faulted(_))
    }
}

/// One executed task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionRecord {
    /// Task identifier
    pub id: TaskId,
    /// Label given at scheduling time
    pub label: Option<String>,
    /// Priority class the task ran in
    pub class: TaskClass,
    /// Outcome of the action
    #[serde(flatten)]
    pub status: CompletionStatus,
    /// Cycle in which the task ran
    pub cycle: u64,
    /// Virtual time when the action started
    pub at_ms: u64,
    /// Task that scheduled this one
    pub parent: Option<TaskId>,
}

impl CompletionRecord {
    /// Label if present, otherwise the identifier.
    pub fn name(&self) -> String {
        self.label.clone().unwrap_or_else(|| self.id.to_string())
    }
}

/// Ordered list of completion records, in execution order.
///
/// # Examples
///
/// ```
/// use task_scheduler::{Schedule, Scheduler, TaskSpec};
///
/// let mut scheduler = Scheduler::new();
/// scheduler.submit(TaskSpec::microtask(|_| Ok(())).labeled("A")).unwrap();
/// scheduler.submit(TaskSpec::immediate_microtask(|_| Ok(())).labeled("B")).unwrap();
///
/// let log = scheduler.run();
/// assert_eq!(log.names(), vec!["B", "A"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExecutionLog {
    records: Vec<CompletionRecord>,
}

impl ExecutionLog {
    /// Creates an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, record: CompletionRecord) {
        self.records.push(record);
    }

    /// All records in execution order.
    pub fn records(&self) -> &[CompletionRecord] {
        &self.records
    }

    /// Identifiers in execution order.
    pub fn ids(&self) -> Vec<TaskId> {
        self.records.iter().map(|r| r.id).collect()
    }

    /// Names (label or identifier) in execution order.
    pub fn names(&self) -> Vec<String> {
        self.records.iter().map(CompletionRecord::name).collect()
    }

    /// Records whose action faulted.
    pub fn faults(&self) -> impl Iterator<Item = &CompletionRecord> {
        self.records.iter().filter(|r| r.status.is_faulted())
    }

    /// Record for `id`, if it ran.
    pub fn get(&self, id: TaskId) -> Option<&CompletionRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    /// Position of `id` in the execution order.
    pub fn position(&self, id: TaskId) -> Option<usize> {
        self.records.iter().position(|r| r.id == id)
    }

    /// Keeps only the records for which `keep` returns true.
    pub fn retain<F>(&mut self, keep: F)
    where
        F: FnMut(&CompletionRecord) -> bool,
    {
        self.records.retain(keep);
    }

    /// Iterates over the records.
    pub fn iter(&self) -> std::slice::Iter<'_, CompletionRecord> {
        self.records.iter()
    }

    /// Number of executed tasks.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if nothing ran.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl IntoIterator for ExecutionLog {
    type Item = CompletionRecord;
    type IntoIter = std::vec::IntoIter<CompletionRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.into_iter()
    }
}

impl<'a> IntoIterator for &'a ExecutionLog {
    type Item = &'a CompletionRecord;
    type IntoIter = std::slice::Iter<'a, CompletionRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// Counters for one `run_until_idle()` call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Tasks whose actions ran
    pub executed: usize,
    /// Of those, how many faulted
    pub faulted: usize,
    /// Cycles driven
    pub cycles: u64,
    /// I/O callbacks still waiting on readiness when the run ended
    pub stalled_io: usize,
}

/// Result of a cancellation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", content = "reason", rename_all = "kebab-case")]
pub enum CancelOutcome {
    /// The task was withdrawn and will never run
    Cancelled,
    /// The task's class is draining with the task already in it
    Draining,
    /// Nothing to cancel
    Miss(CancellationMiss),
}
