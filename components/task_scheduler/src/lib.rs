//! Deferred task scheduler.
//!
//! This crate provides a deterministic simulator for the ordering contract
//! among deferred units of work:
//! - Immediate microtasks and standard microtasks, drained before any macrotask
//! - Timers, eligible once their delay has elapsed on the scheduler's clock
//! - I/O callbacks, eligible once their readiness fires
//! - Check-phase tasks, drained after I/O callbacks in the same cycle
//!
//! # Overview
//!
//! - [`Scheduler`] - Owns the queues and drives cycles until idle
//! - [`TaskContext`] - Handle given to running actions for scheduling more work
//! - [`Schedule`] - Scheduling operations shared by both of the above
//! - [`ExecutionLog`] - Ordered completion records returned by [`Scheduler::run`]
//! - [`VirtualClock`] - Deterministic clock for timer testing
//! - [`SchedulerConfig`] - Tunables, loadable from JSON
//!
//! # Examples
//!
//! ## Check phase before timers when scheduled from I/O
//!
//! ```
//! use task_scheduler::{IoReadiness, Schedule, Scheduler};
//!
//! let mut scheduler = Scheduler::new();
//! let ids = std::rc::Rc::new(std::cell::RefCell::new(vec![]));
//!
//! let slot = ids.clone();
//! scheduler
//!     .schedule_io_callback(
//!         move |ctx| {
//!             let timer = ctx.schedule_timer(|_| Ok(()), 0)?;
//!             let check = ctx.schedule_check_task(|_| Ok(()))?;
//!             slot.borrow_mut().extend([timer, check]);
//!             Ok(())
//!         },
//!         IoReadiness::Ready,
//!     )
//!     .unwrap();
//!
//! let log = scheduler.run();
//! let (timer, check) = (ids.borrow()[0], ids.borrow()[1]);
//! assert!(log.position(check) < log.position(timer));
//! ```
//!
//! ## Cancellation
//!
//! ```
//! use task_scheduler::{CancelOutcome, Schedule, Scheduler};
//!
//! let mut scheduler = Scheduler::new();
//! let id = scheduler.schedule_timer(|_| Ok(()), 100).unwrap();
//! assert_eq!(scheduler.cancel(id), CancelOutcome::Cancelled);
//! assert!(scheduler.run().is_empty());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod clock;
pub mod config;
pub mod context;
pub mod record;
pub mod scheduler;
pub mod task;
pub mod task_queue;

// Re-export main types at crate root
pub use clock::{Clock, SystemClock, VirtualClock};
pub use config::SchedulerConfig;
pub use context::TaskContext;
pub use core_types::{
    ActionFault, CancellationMiss, FaultKind, SchedulerError, SchedulerResult, TaskClass, TaskId,
};
pub use record::{CancelOutcome, CompletionRecord, CompletionStatus, ExecutionLog, RunSummary};
pub use scheduler::Scheduler;
pub use task::{Action, ActionResult, IoReadiness, Schedule, Task, TaskSpec};
pub use task_queue::{ClassQueue, IoQueue, QueueSet, TimerQueue};
