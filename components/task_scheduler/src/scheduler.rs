//! Scheduler driver loop.
//!
//! This module provides the scheduler that owns every class queue and drives
//! cycles until no work remains.

use crate::clock::{Clock, VirtualClock};
use crate::config::SchedulerConfig;
use crate::context::TaskContext;
use crate::record::{CancelOutcome, CompletionRecord, CompletionStatus, ExecutionLog, RunSummary};
use crate::task::{Schedule, Task, TaskSpec};
use crate::task_queue::{QueueSet, Removal};
use core_types::{
    ActionFault, CancellationMiss, SchedulerError, SchedulerResult, TaskClass, TaskId,
};
use std::any::Any;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use tracing::{debug, trace, warn};

/// State reachable from running actions.
pub(crate) struct SchedulerState {
    pub(crate) config: SchedulerConfig,
    pub(crate) clock: Box<dyn Clock>,
    pub(crate) queues: QueueSet,
    pub(crate) cycle: u64,
    next_id: TaskId,
    labels: HashMap<String, TaskId>,
    pending: HashMap<TaskId, TaskClass>,
    cancelled: HashSet<TaskId>,
    closed: bool,
}

impl SchedulerState {
    fn new(config: SchedulerConfig, clock: Box<dyn Clock>) -> Self {
        Self {
            config,
            clock,
            queues: QueueSet::new(),
            cycle: 1,
            next_id: TaskId::new(1),
            labels: HashMap::new(),
            pending: HashMap::new(),
            cancelled: HashSet::new(),
            closed: false,
        }
    }

    pub(crate) fn submit(
        &mut self,
        spec: TaskSpec,
        parent: Option<TaskId>,
    ) -> SchedulerResult<TaskId> {
        if self.closed {
            return Err(SchedulerError::Closed);
        }

        let TaskSpec {
            class,
            action,
            label,
            delay_ms,
            readiness,
        } = spec;

        let delay = if class == TaskClass::Timer {
            self.check_delay(delay_ms)?
        } else {
            0
        };

        if let Some(label) = &label {
            if let Some(&existing) = self.labels.get(label) {
                return Err(SchedulerError::DuplicateLabel {
                    label: label.clone(),
                    existing,
                });
            }
        }

        let id = self.next_id;
        self.next_id = id.next();
        if let Some(label) = &label {
            self.labels.insert(label.clone(), id);
        }

        let task = Task {
            id,
            label,
            class,
            parent,
            registered_cycle: self.cycle,
            action,
        };
        trace!(task = %id, %class, cycle = self.cycle, parent = ?parent, "scheduled task");

        match class {
            TaskClass::ImmediateMicrotask => self.queues.immediate.enqueue(task),
            TaskClass::Microtask => self.queues.microtasks.enqueue(task),
            TaskClass::Timer => {
                let eligible_at = self.clock.now_ms().saturating_add(delay);
                self.queues.timers.enqueue(eligible_at, task);
            }
            TaskClass::Io => self.queues.io.enqueue(task, readiness),
            TaskClass::Check => self.queues.check.enqueue(task),
        }
        self.pending.insert(id, class);

        Ok(id)
    }

    fn check_delay(&self, delay_ms: i64) -> SchedulerResult<u64> {
        let max_ms = self.config.max_delay_ms;
        match u64::try_from(delay_ms) {
            Ok(delay) if delay <= max_ms => Ok(delay),
            _ => Err(SchedulerError::InvalidDelay { delay_ms, max_ms }),
        }
    }

    pub(crate) fn cancel(&mut self, id: TaskId) -> CancelOutcome {
        let Some(&class) = self.pending.get(&id) else {
            let miss = if self.cancelled.contains(&id) {
                CancellationMiss::AlreadyCancelled
            } else if id.get() > 0 && id < self.next_id {
                CancellationMiss::AlreadyRan
            } else {
                CancellationMiss::Unknown
            };
            debug!(task = %id, ?miss, "cancel was a no-op");
            return CancelOutcome::Miss(miss);
        };

        match self.queues.remove(class, id) {
            Removal::Removed(_) => {
                self.pending.remove(&id);
                self.cancelled.insert(id);
                debug!(task = %id, %class, "cancelled task");
                CancelOutcome::Cancelled
            }
            Removal::Locked => {
                debug!(task = %id, %class, "cancel refused, class is draining");
                CancelOutcome::Draining
            }
            Removal::NotFound => CancelOutcome::Miss(CancellationMiss::Unknown),
        }
    }

    pub(crate) fn complete_io(&mut self, id: TaskId) -> SchedulerResult<()> {
        match self.pending.get(&id) {
            Some(TaskClass::Io) => {
                self.queues.io.signal(id);
                trace!(task = %id, "I/O readiness signaled");
                Ok(())
            }
            Some(_) => Err(SchedulerError::NotIoTask(id)),
            None => Err(SchedulerError::UnknownTask(id)),
        }
    }

    /// Runs one task to completion and records the outcome.
    fn execute(&mut self, task: Task, log: &mut ExecutionLog) {
        let Task {
            id,
            label,
            class,
            parent,
            action,
            ..
        } = task;
        self.pending.remove(&id);

        let at_ms = self.clock.now_ms();
        let cycle = self.cycle;
        let catch_panics = self.config.catch_panics;
        trace!(task = %id, %class, cycle, at_ms, "running task");

        let mut ctx = TaskContext::new(self, id, class);
        let outcome = if catch_panics {
            panic::catch_unwind(AssertUnwindSafe(|| action(&mut ctx)))
                .unwrap_or_else(|payload| Err(ActionFault::panic(panic_message(payload.as_ref()))))
        } else {
            action(&mut ctx)
        };

        let status = match outcome {
            Ok(()) => CompletionStatus::Completed,
            Err(fault) => {
                warn!(task = %id, %class, error = %fault, "task action faulted");
                CompletionStatus::Faulted(fault)
            }
        };

        log.push(CompletionRecord {
            id,
            label,
            class,
            status,
            cycle,
            at_ms,
            parent,
        });
    }

    /// Drains both microtask classes, always taking from the immediate class
    /// first, until both are empty.
    ///
    /// Standard microtasks are locked only once the immediate class first
    /// runs dry.
    fn drain_microtasks(&mut self, log: &mut ExecutionLog) {
        if self.queues.microtasks_empty() {
            return;
        }
        self.queues.immediate.lock_all();
        let mut standard_draining = false;

        loop {
            if let Some(task) = self.queues.immediate.dequeue() {
                self.execute(task, log);
                continue;
            }
            if !standard_draining {
                self.queues.microtasks.lock_all();
                standard_draining = true;
            }
            match self.queues.microtasks.dequeue() {
                Some(task) => self.execute(task, log),
                None => break,
            }
        }
    }

    fn run_timers(&mut self, log: &mut ExecutionLog) {
        let due = self.queues.timers.lock_due(self.clock.now_ms(), self.cycle);
        for key in due {
            if let Some(task) = self.queues.timers.take(key) {
                self.execute(task, log);
                self.drain_microtasks(log);
            }
        }
    }

    fn run_io(&mut self, log: &mut ExecutionLog) {
        let ready = self.queues.io.lock_ready(self.clock.now_ms());
        for id in ready {
            if let Some(task) = self.queues.io.take(id) {
                self.execute(task, log);
                self.drain_microtasks(log);
            }
        }
    }

    fn run_check(&mut self, log: &mut ExecutionLog) {
        self.queues.check.lock_all();
        while let Some(task) = self.queues.check.dequeue_locked() {
            self.execute(task, log);
            self.drain_microtasks(log);
        }
    }

    fn run_cycle(&mut self, log: &mut ExecutionLog) {
        self.drain_microtasks(log);
        self.run_timers(log);
        self.run_io(log);
        self.run_check(log);
    }

    /// Returns true if the next cycle is certain to run something.
    fn has_runnable_now(&self) -> bool {
        !self.queues.microtasks_empty()
            || !self.queues.check.is_empty()
            || self.queues.io.has_known_ready()
            || self.queues.timers.has_due(self.clock.now_ms(), self.cycle)
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

/// The deferred task scheduler.
///
/// Each cycle:
/// 1. Drains the microtask classes (immediate first) to empty
/// 2. Runs due timers registered in an earlier cycle, in eligible-time order
/// 3. Runs I/O callbacks whose readiness fired
/// 4. Runs check-phase tasks queued when the phase started
///
/// Microtasks are drained again after every timer, I/O and check task.
/// Actions are never preempted, so a slow action delays everything behind it.
///
/// # Examples
///
/// ```
/// use task_scheduler::{IoReadiness, Schedule, Scheduler, TaskSpec};
///
/// let mut scheduler = Scheduler::new();
/// scheduler.submit(TaskSpec::microtask(|_| Ok(())).labeled("A")).unwrap();
/// scheduler.submit(TaskSpec::immediate_microtask(|_| Ok(())).labeled("B")).unwrap();
/// scheduler.submit(TaskSpec::timer(|_| Ok(()), 0).labeled("C")).unwrap();
/// scheduler
///     .submit(
///         TaskSpec::io(
///             |ctx| {
///                 ctx.submit(TaskSpec::check(|_| Ok(())).labeled("D"))?;
///                 Ok(())
///             },
///             IoReadiness::Ready,
///         )
///         .labeled("E"),
///     )
///     .unwrap();
///
/// assert_eq!(scheduler.run().names(), vec!["B", "A", "E", "D", "C"]);
/// ```
pub struct Scheduler {
    state: SchedulerState,
}

impl Scheduler {
    /// Creates a scheduler with default configuration and a virtual clock at 0.
    pub fn new() -> Self {
        let config = SchedulerConfig::default();
        let clock = VirtualClock::new(config.start_time_ms);
        Self {
            state: SchedulerState::new(config, Box::new(clock)),
        }
    }

    /// Creates a scheduler from a validated configuration.
    pub fn with_config(config: SchedulerConfig) -> SchedulerResult<Self> {
        config.validate()?;
        let clock = VirtualClock::new(config.start_time_ms);
        Ok(Self {
            state: SchedulerState::new(config, Box::new(clock)),
        })
    }

    /// Replaces the clock.
    pub fn with_clock<C>(mut self, clock: C) -> Self
    where
        C: Clock + 'static,
    {
        self.state.clock = Box::new(clock);
        self
    }

    /// Drives cycles until idle and returns the tasks executed by this call.
    ///
    /// On an idle scheduler this returns an empty log without touching the
    /// clock or the cycle counter.
    pub fn run(&mut self) -> ExecutionLog {
        self.drive().0
    }

    /// Drives cycles until idle and returns counters instead of the log.
    pub fn run_until_idle(&mut self) -> RunSummary {
        self.run_with_summary().1
    }

    /// Drives cycles until idle and returns both the log and its counters.
    pub fn run_with_summary(&mut self) -> (ExecutionLog, RunSummary) {
        let (log, cycles) = self.drive();
        let summary = RunSummary {
            executed: log.len(),
            faulted: log.faults().count(),
            cycles,
            stalled_io: self.state.queues.io.len(),
        };
        (log, summary)
    }

    fn drive(&mut self) -> (ExecutionLog, u64) {
        let mut log = ExecutionLog::new();
        if self.state.queues.is_empty() {
            return (log, 0);
        }

        let state = &mut self.state;
        let mut cycles = 0;
        loop {
            let before = log.len();
            debug!(cycle = state.cycle, now_ms = state.clock.now_ms(), "cycle start");
            state.run_cycle(&mut log);
            cycles += 1;
            state.cycle += 1;

            if state.queues.is_empty() {
                break;
            }
            if cycles >= state.config.max_cycles {
                warn!(cycles, "cycle limit reached with work still queued");
                break;
            }
            if state.has_runnable_now() {
                continue;
            }

            // Predicates may depend on state the last cycle changed.
            let progressed = log.len() > before;
            if progressed && state.queues.io.has_predicates() {
                continue;
            }

            if let Some(at) = state.queues.timers.next_eligible_at() {
                debug!(from_ms = state.clock.now_ms(), to_ms = at, "advancing clock to next timer");
                state.clock.advance_to(at);
                continue;
            }

            if state.queues.io.has_predicates() {
                if let Some(step) = state.config.io_poll_step_ms {
                    state.clock.advance(step);
                    continue;
                }
            }

            warn!(
                pending_io = state.queues.io.len(),
                "run stalled, I/O callbacks never became ready"
            );
            break;
        }

        if !state.config.reentrant && state.queues.is_empty() {
            debug!("scheduler idle with re-entry disabled, closing");
            state.closed = true;
        }
        debug!(executed = log.len(), cycles, "run finished");
        (log, cycles)
    }

    /// Moves the clock forward without running anything.
    pub fn advance_time(&mut self, ms: u64) {
        self.state.clock.advance(ms);
    }

    /// Withdraws a pending task.
    ///
    /// Tasks already queued when their class started draining cannot be
    /// withdrawn. Cancelling a task that already ran is a no-op.
    pub fn cancel(&mut self, id: TaskId) -> CancelOutcome {
        self.state.cancel(id)
    }

    /// Signals readiness of a pending I/O callback.
    pub fn complete_io(&mut self, id: TaskId) -> SchedulerResult<()> {
        self.state.complete_io(id)
    }

    /// Current clock reading in milliseconds.
    pub fn now_ms(&self) -> u64 {
        self.state.clock.now_ms()
    }

    /// Cycle that the next scheduled work belongs to.
    pub fn cycle(&self) -> u64 {
        self.state.cycle
    }

    /// Returns true if every queue is empty.
    pub fn is_idle(&self) -> bool {
        self.state.queues.is_empty()
    }

    /// Returns true once the scheduler refuses new work.
    pub fn is_closed(&self) -> bool {
        self.state.closed
    }

    /// Number of queued tasks in `class`.
    pub fn pending(&self, class: TaskClass) -> usize {
        self.state.queues.len_of(class)
    }

    /// Active configuration.
    pub fn config(&self) -> &SchedulerConfig {
        &self.state.config
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Schedule for Scheduler {
    fn submit(&mut self, spec: TaskSpec) -> SchedulerResult<TaskId> {
        self.state.submit(spec, None)
    }
}

impl fmt::Debug for Scheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scheduler")
            .field("cycle", &self.state.cycle)
            .field("now_ms", &self.state.clock.now_ms())
            .field("queues", &self.state.queues)
            .field("closed", &self.state.closed)
            .finish()
    }
}
