//! Tasks and task submission.
//!
//! A [`TaskSpec`] describes work before it is registered; the scheduler turns it
//! into a [`Task`] by allocating an identifier and stamping the registration
//! cycle and enclosing scope. The [`Schedule`] trait is implemented by both the
//! [`Scheduler`](crate::Scheduler) (synchronous code) and the
//! [`TaskContext`](crate::TaskContext) handed to running actions.

use crate::context::TaskContext;
use core_types::{ActionFault, SchedulerResult, TaskClass, TaskId};
use std::fmt;

/// Result returned by an action.
pub type ActionResult = Result<(), ActionFault>;

/// The deferred computation of a task, opaque to the scheduler.
pub type Action = Box<dyn FnOnce(&mut TaskContext<'_>) -> ActionResult>;

/// Readiness of an I/O callback.
///
/// An I/O callback only becomes eligible once its readiness fires. Readiness
/// is checked at the start of each I/O phase.
pub enum IoReadiness {
    /// Eligible from the first I/O phase after registration
    Ready,
    /// Eligible once `complete_io` is called for the task
    Signal,
    /// Eligible once the predicate returns true for the current virtual time,
    /// or once `complete_io` is called
    When(Box<dyn FnMut(u64) -> bool>),
}

impl IoReadiness {
    /// Readiness decided by a predicate over the virtual clock in milliseconds.
    pub fn when<P>(predicate: P) -> Self
    where
        P: FnMut(u64) -> bool + 'static,
    {
        IoReadiness::When(Box::new(predicate))
    }

    /// Readiness that fires once the virtual clock reaches `at_ms`.
    pub fn at(at_ms: u64) -> Self {
        IoReadiness::when(move |now| now >= at_ms)
    }
}

impl fmt::Debug for IoReadiness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IoReadiness::Ready => write!(f, "Ready"),
            IoReadiness::Signal => write!(f, "Signal"),
            IoReadiness::When(_) => write!(f, "When(..)"),
        }
    }
}

/// Description of a task that has not been registered yet.
///
/// # Examples
///
/// ```
/// use task_scheduler::{Schedule, Scheduler, TaskSpec};
///
/// let mut scheduler = Scheduler::new();
/// scheduler
///     .submit(TaskSpec::timer(|_| Ok(()), 10).labeled("poll"))
///     .unwrap();
/// let log = scheduler.run();
/// assert_eq!(log.names(), vec!["poll"]);
/// ```
pub struct TaskSpec {
    pub(crate) class: TaskClass,
    pub(crate) action: Action,
    pub(crate) label: Option<String>,
    pub(crate) delay_ms: i64,
    pub(crate) readiness: IoReadiness,
}

impl TaskSpec {
    fn new<F>(class: TaskClass, action: F) -> Self
    where
        F: FnOnce(&mut TaskContext<'_>) -> ActionResult + 'static,
    {
        Self {
            class,
            action: Box::new(action),
            label: None,
            delay_ms: 0,
            readiness: IoReadiness::Ready,
        }
    }

    /// An immediate microtask.
    pub fn immediate_microtask<F>(action: F) -> Self
    where
        F: FnOnce(&mut TaskContext<'_>) -> ActionResult + 'static,
    {
        Self::new(TaskClass::ImmediateMicrotask, action)
    }

    /// A standard microtask.
    pub fn microtask<F>(action: F) -> Self
    where
        F: FnOnce(&mut TaskContext<'_>) -> ActionResult + 'static,
    {
        Self::new(TaskClass::Microtask, action)
    }

    /// A timer firing `delay_ms` after registration.
    ///
    /// Negative delays are rejected at submission.
    pub fn timer<F>(action: F, delay_ms: i64) -> Self
    where
        F: FnOnce(&mut TaskContext<'_>) -> ActionResult + 'static,
    {
        let mut spec = Self::new(TaskClass::Timer, action);
        spec.delay_ms = delay_ms;
        spec
    }

    /// A check-phase task.
    pub fn check<F>(action: F) -> Self
    where
        F: FnOnce(&mut TaskContext<'_>) -> ActionResult + 'static,
    {
        Self::new(TaskClass::Check, action)
    }

    /// An I/O callback gated on `readiness`.
    pub fn io<F>(action: F, readiness: IoReadiness) -> Self
    where
        F: FnOnce(&mut TaskContext<'_>) -> ActionResult + 'static,
    {
        let mut spec = Self::new(TaskClass::Io, action);
        spec.readiness = readiness;
        spec
    }

    /// Attaches a label. Labels must be unique per scheduler.
    pub fn labeled(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Class the task will be queued in.
    pub fn class(&self) -> TaskClass {
        self.class
    }
}

impl fmt::Debug for TaskSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskSpec")
            .field("class", &self.class)
            .field("label", &self.label)
            .field("delay_ms", &self.delay_ms)
            .field("readiness", &self.readiness)
            .finish()
    }
}

/// A registered task waiting in its class queue.
pub struct Task {
    /// Identifier allocated at registration
    pub id: TaskId,
    /// Optional caller-supplied label
    pub label: Option<String>,
    /// Priority class
    pub class: TaskClass,
    /// The task whose action scheduled this one, if any
    pub parent: Option<TaskId>,
    /// Cycle during which the task was registered
    pub registered_cycle: u64,
    pub(crate) action: Action,
}

impl Task {
    /// Label if present, otherwise the identifier.
    pub fn name(&self) -> String {
        self.label.clone().unwrap_or_else(|| self.id.to_string())
    }
}

impl fmt::Debug for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Task")
            .field("id", &self.id)
            .field("label", &self.label)
            .field("class", &self.class)
            .field("parent", &self.parent)
            .field("registered_cycle", &self.registered_cycle)
            .finish_non_exhaustive()
    }
}

/// Scheduling operations shared by the scheduler and running actions.
///
/// Every helper funnels into [`Schedule::submit`]; implementors only provide
/// that one method.
pub trait Schedule {
    /// Registers a task described by `spec` and returns its identifier.
    fn submit(&mut self, spec: TaskSpec) -> SchedulerResult<TaskId>;

    /// Enqueues into the immediate-microtask class.
    ///
    /// Runs before any other queued microtask or macrotask, once the current
    /// synchronous code or action has returned.
    fn schedule_immediate_microtask<F>(&mut self, action: F) -> SchedulerResult<TaskId>
    where
        F: FnOnce(&mut TaskContext<'_>) -> ActionResult + 'static,
        Self: Sized,
    {
        self.submit(TaskSpec::immediate_microtask(action))
    }

    /// Enqueues into the standard microtask class.
    fn schedule_microtask<F>(&mut self, action: F) -> SchedulerResult<TaskId>
    where
        F: FnOnce(&mut TaskContext<'_>) -> ActionResult + 'static,
        Self: Sized,
    {
        self.submit(TaskSpec::microtask(action))
    }

    /// Enqueues a timer eligible `delay_ms` from now.
    ///
    /// A zero delay still defers past every microtask and past the current
    /// cycle's timer phase.
    fn schedule_timer<F>(&mut self, action: F, delay_ms: i64) -> SchedulerResult<TaskId>
    where
        F: FnOnce(&mut TaskContext<'_>) -> ActionResult + 'static,
        Self: Sized,
    {
        self.submit(TaskSpec::timer(action, delay_ms))
    }

    /// Enqueues into the check phase.
    fn schedule_check_task<F>(&mut self, action: F) -> SchedulerResult<TaskId>
    where
        F: FnOnce(&mut TaskContext<'_>) -> ActionResult + 'static,
        Self: Sized,
    {
        self.submit(TaskSpec::check(action))
    }

    /// Enqueues an I/O callback gated on `readiness`.
    fn schedule_io_callback<F>(
        &mut self,
        action: F,
        readiness: IoReadiness,
    ) -> SchedulerResult<TaskId>
    where
        F: FnOnce(&mut TaskContext<'_>) -> ActionResult + 'static,
        Self: Sized,
    {
        self.submit(TaskSpec::io(action, readiness))
    }
}
