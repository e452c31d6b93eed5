//! Integration test suite for the Corten scheduler
//!
//! This crate provides integration tests that verify components work
//! together correctly across component boundaries.

/// Re-export components for test convenience
pub mod components {
    pub use core_types;
    pub use sched_cli;
    pub use task_scheduler;
}
