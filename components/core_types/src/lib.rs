//! Shared vocabulary for the Corten deferred task scheduler.
//!
//! This crate provides the foundational types every scheduler component agrees
//! on: task identifiers, priority classes, and the error taxonomy.
//!
//! # Overview
//!
//! - [`TaskId`] - Identifier handed out for every scheduled task
//! - [`TaskClass`] - Priority class of a task, ordered from highest to lowest
//! - [`ActionFault`] - Fault raised by a task's action, captured per task
//! - [`SchedulerError`] - Bookkeeping errors surfaced to the scheduling caller
//! - [`CancellationMiss`] - Why a cancellation request found nothing to cancel
//!
//! # Examples
//!
//! ```
//! use core_types::{ActionFault, FaultKind, TaskClass};
//!
//! assert!(TaskClass::ImmediateMicrotask < TaskClass::Microtask);
//! assert!(TaskClass::Microtask.is_microtask());
//!
//! let fault = ActionFault::error("connection reset");
//! assert_eq!(fault.kind, FaultKind::Error);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

mod class;
mod error;
mod id;

pub use class::TaskClass;
pub use error::{ActionFault, CancellationMiss, FaultKind, SchedulerError, SchedulerResult};
pub use id::TaskId;
