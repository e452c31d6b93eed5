//! The handle passed to running actions.

use crate::record::CancelOutcome;
use crate::scheduler::SchedulerState;
use crate::task::{Schedule, TaskSpec};
use core_types::{SchedulerResult, TaskClass, TaskId};

/// Access to the scheduler from inside a running action.
///
/// Tasks scheduled through the context record the running task as their
/// enclosing scope (`parent`).
///
/// # Examples
///
/// ```
/// use task_scheduler::{IoReadiness, Schedule, Scheduler};
///
/// let mut scheduler = Scheduler::new();
/// scheduler
///     .schedule_io_callback(
///         |ctx| {
///             ctx.schedule_timer(|_| Ok(()), 0)?;
///             ctx.schedule_check_task(|_| Ok(()))?;
///             Ok(())
///         },
///         IoReadiness::Ready,
///     )
///     .unwrap();
///
/// let log = scheduler.run();
/// assert_eq!(log.len(), 3);
/// ```
pub struct TaskContext<'a> {
    state: &'a mut SchedulerState,
    current: TaskId,
    class: TaskClass,
}

impl<'a> TaskContext<'a> {
    pub(crate) fn new(state: &'a mut SchedulerState, current: TaskId, class: TaskClass) -> Self {
        Self {
            state,
            current,
            class,
        }
    }

    /// Identifier of the running task.
    pub fn current(&self) -> TaskId {
        self.current
    }

    /// Class of the running task.
    pub fn class(&self) -> TaskClass {
        self.class
    }

    /// Cycle the running task executes in.
    pub fn cycle(&self) -> u64 {
        self.state.cycle
    }

    /// Current virtual time in milliseconds.
    pub fn now_ms(&self) -> u64 {
        self.state.clock.now_ms()
    }

    /// Keeps the action busy for `ms` milliseconds.
    ///
    /// There is no preemption: the clock moves, but nothing else runs until
    /// the action returns. Timers that become due meanwhile run late.
    pub fn block_for(&mut self, ms: u64) {
        self.state.clock.advance(ms);
    }

    /// Withdraws a pending task.
    pub fn cancel(&mut self, id: TaskId) -> CancelOutcome {
        self.state.cancel(id)
    }

    /// Signals readiness of a pending I/O callback.
    pub fn complete_io(&mut self, id: TaskId) -> SchedulerResult<()> {
        self.state.complete_io(id)
    }
}

impl Schedule for TaskContext<'_> {
    fn submit(&mut self, spec: TaskSpec) -> SchedulerResult<TaskId> {
        self.state.submit(spec, Some(self.current))
    }
}
