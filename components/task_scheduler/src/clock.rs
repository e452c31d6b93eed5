//! Clocks driving timer eligibility.
//!
//! The scheduler never reads wall time directly. It asks a [`Clock`] for the
//! current time and asks it to move forward when only future timers remain.

use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

/// Source of time for the scheduler, in milliseconds.
pub trait Clock {
    /// Current time in milliseconds.
    fn now_ms(&self) -> u64;

    /// Moves the clock forward by `ms`.
    fn advance(&mut self, ms: u64);

    /// Moves the clock forward to `target_ms`. Does nothing if the clock is
    /// already there or past it.
    fn advance_to(&mut self, target_ms: u64) {
        let now = self.now_ms();
        if target_ms > now {
            self.advance(target_ms - now);
        }
    }
}

/// Deterministic clock that only moves when told to.
///
/// Clones share the same time, so a test can keep a handle after giving the
/// clock to a scheduler.
///
/// # Examples
///
/// ```
/// use task_scheduler::{Clock, VirtualClock};
///
/// let mut clock = VirtualClock::new(0);
/// let observer = clock.clone();
/// clock.advance(250);
/// assert_eq!(observer.now_ms(), 250);
/// ```
#[derive(Debug, Clone, Default)]
pub struct VirtualClock {
    now: Rc<Cell<u64>>,
}

impl VirtualClock {
    /// Creates a virtual clock reading `start_ms`.
    pub fn new(start_ms: u64) -> Self {
        Self {
            now: Rc::new(Cell::new(start_ms)),
        }
    }
}

impl Clock for VirtualClock {
    fn now_ms(&self) -> u64 {
        self.now.get()
    }

    fn advance(&mut self, ms: u64) {
        self.now.set(self.now.get().saturating_add(ms));
    }
}

/// Wall clock. Advancing sleeps the current thread.
#[derive(Debug, Clone)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    /// Creates a clock reading 0 now.
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        u64::try_from(self.origin.elapsed().as_millis()).unwrap_or(u64::MAX)
    }

    fn advance(&mut self, ms: u64) {
        std::thread::sleep(Duration::from_millis(ms));
    }
}
