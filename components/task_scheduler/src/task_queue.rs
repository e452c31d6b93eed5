//! Per-class queue management.
//!
//! Every class has its own queue, FIFO within the class. Timers are kept
//! sorted by eligible time with arrival order breaking ties, and I/O callbacks
//! carry their readiness alongside the task.
//!
//! Entries become *locked* when their class begins draining. A locked entry is
//! guaranteed to run in the current drain and can no longer be cancelled.

use crate::task::{IoReadiness, Task};
use core_types::{TaskClass, TaskId};
use std::collections::{BTreeMap, VecDeque};

/// Outcome of removing a task from a queue by identifier.
#[derive(Debug)]
pub enum Removal {
    /// The task was removed
    Removed(Task),
    /// The task is part of a drain in progress
    Locked,
    /// No such task in this queue
    NotFound,
}

#[derive(Debug)]
struct Queued {
    task: Task,
    locked: bool,
}

impl Queued {
    fn new(task: Task) -> Self {
        Self {
            task,
            locked: false,
        }
    }
}

/// FIFO queue for the microtask and check classes.
#[derive(Debug, Default)]
pub struct ClassQueue {
    queue: VecDeque<Queued>,
}

impl ClassQueue {
    /// Creates a new empty ClassQueue.
    pub fn new() -> Self {
        Self {
            queue: VecDeque::new(),
        }
    }

    /// Adds a task to the end of the queue.
    pub fn enqueue(&mut self, task: Task) {
        self.queue.push_back(Queued::new(task));
    }

    /// Removes and returns the next task from the queue.
    pub fn dequeue(&mut self) -> Option<Task> {
        self.queue.pop_front().map(|q| q.task)
    }

    /// Removes and returns the next task only if it was locked by the current drain.
    pub fn dequeue_locked(&mut self) -> Option<Task> {
        match self.queue.front() {
            Some(q) if q.locked => self.dequeue(),
            _ => None,
        }
    }

    /// Locks every entry currently queued. Returns how many were locked.
    pub fn lock_all(&mut self) -> usize {
        for q in self.queue.iter_mut() {
            q.locked = true;
        }
        self.queue.len()
    }

    /// Removes a task by identifier unless it is locked.
    pub fn remove(&mut self, id: TaskId) -> Removal {
        match self.queue.iter().position(|q| q.task.id == id) {
            Some(pos) if self.queue[pos].locked => Removal::Locked,
            Some(pos) => match self.queue.remove(pos) {
                Some(q) => Removal::Removed(q.task),
                None => Removal::NotFound,
            },
            None => Removal::NotFound,
        }
    }

    /// Returns true if the queue is empty.
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Returns the number of tasks in the queue.
    pub fn len(&self) -> usize {
        self.queue.len()
    }
}

/// Timer queue ordered by (eligible time, arrival).
///
/// Identifiers are allocated in arrival order, so they double as the
/// tie-breaker.
#[derive(Debug, Default)]
pub struct TimerQueue {
    timers: BTreeMap<(u64, TaskId), Queued>,
}

impl TimerQueue {
    /// Creates a new empty TimerQueue.
    pub fn new() -> Self {
        Self {
            timers: BTreeMap::new(),
        }
    }

    /// Adds a timer eligible at `eligible_at` milliseconds.
    pub fn enqueue(&mut self, eligible_at: u64, task: Task) {
        self.timers.insert((eligible_at, task.id), Queued::new(task));
    }

    /// Locks and returns the keys of timers that may run this cycle.
    ///
    /// A timer qualifies when its eligible time has elapsed and it was
    /// registered in an earlier cycle.
    pub fn lock_due(&mut self, now: u64, cycle: u64) -> Vec<(u64, TaskId)> {
        let mut due = Vec::new();
        for (key, q) in self.timers.range_mut(..=(now, TaskId::new(u64::MAX))) {
            if q.task.registered_cycle < cycle {
                q.locked = true;
                due.push(*key);
            }
        }
        due
    }

    /// Removes the timer stored under `key`.
    pub fn take(&mut self, key: (u64, TaskId)) -> Option<Task> {
        self.timers.remove(&key).map(|q| q.task)
    }

    /// Returns true if some timer would qualify for a timer phase run at `now`
    /// during `cycle`.
    pub fn has_due(&self, now: u64, cycle: u64) -> bool {
        self.timers
            .range(..=(now, TaskId::new(u64::MAX)))
            .any(|(_, q)| q.task.registered_cycle < cycle)
    }

    /// Earliest eligible time among pending timers.
    pub fn next_eligible_at(&self) -> Option<u64> {
        self.timers.keys().next().map(|(at, _)| *at)
    }

    /// Removes a timer by identifier unless it is locked.
    pub fn remove(&mut self, id: TaskId) -> Removal {
        let key = self.timers.keys().find(|(_, tid)| *tid == id).copied();
        match key {
            Some(key) if self.timers[&key].locked => Removal::Locked,
            Some(key) => match self.timers.remove(&key) {
                Some(q) => Removal::Removed(q.task),
                None => Removal::NotFound,
            },
            None => Removal::NotFound,
        }
    }

    /// Returns true if no timers are pending.
    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }

    /// Returns the number of pending timers.
    pub fn len(&self) -> usize {
        self.timers.len()
    }
}

#[derive(Debug)]
struct IoEntry {
    queued: Queued,
    readiness: IoReadiness,
    signaled: bool,
}

impl IoEntry {
    fn is_ready(&mut self, now: u64) -> bool {
        if self.signaled {
            return true;
        }
        match &mut self.readiness {
            IoReadiness::Ready => true,
            IoReadiness::Signal => false,
            IoReadiness::When(predicate) => predicate(now),
        }
    }
}

/// I/O callbacks in arrival order, each gated on its readiness.
#[derive(Debug, Default)]
pub struct IoQueue {
    entries: VecDeque<IoEntry>,
}

impl IoQueue {
    /// Creates a new empty IoQueue.
    pub fn new() -> Self {
        Self {
            entries: VecDeque::new(),
        }
    }

    /// Adds an I/O callback.
    pub fn enqueue(&mut self, task: Task, readiness: IoReadiness) {
        self.entries.push_back(IoEntry {
            queued: Queued::new(task),
            readiness,
            signaled: false,
        });
    }

    /// Evaluates readiness of every entry, locks the ready ones and returns
    /// their identifiers in arrival order.
    pub fn lock_ready(&mut self, now: u64) -> Vec<TaskId> {
        let mut ready = Vec::new();
        for entry in self.entries.iter_mut() {
            if entry.is_ready(now) {
                entry.queued.locked = true;
                ready.push(entry.queued.task.id);
            }
        }
        ready
    }

    /// Removes the entry for `id` regardless of its lock.
    pub fn take(&mut self, id: TaskId) -> Option<Task> {
        let pos = self.entries.iter().position(|e| e.queued.task.id == id)?;
        self.entries.remove(pos).map(|e| e.queued.task)
    }

    /// Marks an entry as signaled. Returns false if `id` is not queued here.
    pub fn signal(&mut self, id: TaskId) -> bool {
        match self.entries.iter_mut().find(|e| e.queued.task.id == id) {
            Some(entry) => {
                entry.signaled = true;
                true
            }
            None => false,
        }
    }

    /// Returns true if some entry is known to be ready without consulting
    /// predicates.
    pub fn has_known_ready(&self) -> bool {
        self.entries
            .iter()
            .any(|e| e.signaled || matches!(e.readiness, IoReadiness::Ready))
    }

    /// Returns true if some entry waits on a predicate.
    pub fn has_predicates(&self) -> bool {
        self.entries
            .iter()
            .any(|e| !e.signaled && matches!(e.readiness, IoReadiness::When(_)))
    }

    /// Removes an entry by identifier unless it is locked.
    pub fn remove(&mut self, id: TaskId) -> Removal {
        match self.entries.iter().position(|e| e.queued.task.id == id) {
            Some(pos) if self.entries[pos].queued.locked => Removal::Locked,
            Some(pos) => match self.entries.remove(pos) {
                Some(e) => Removal::Removed(e.queued.task),
                None => Removal::NotFound,
            },
            None => Removal::NotFound,
        }
    }

    /// Returns true if no callbacks are pending.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the number of pending callbacks.
    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

/// One queue per priority class.
#[derive(Debug, Default)]
pub struct QueueSet {
    /// Immediate-microtask queue
    pub immediate: ClassQueue,
    /// Standard microtask queue
    pub microtasks: ClassQueue,
    /// Timer queue
    pub timers: TimerQueue,
    /// I/O-callback queue
    pub io: IoQueue,
    /// Check-phase queue
    pub check: ClassQueue,
}

impl QueueSet {
    /// Creates a queue-set with every queue empty.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if both microtask queues are empty.
    pub fn microtasks_empty(&self) -> bool {
        self.immediate.is_empty() && self.microtasks.is_empty()
    }

    /// Returns true if every queue is empty.
    pub fn is_empty(&self) -> bool {
        self.microtasks_empty()
            && self.timers.is_empty()
            && self.io.is_empty()
            && self.check.is_empty()
    }

    /// Number of queued tasks in `class`.
    pub fn len_of(&self, class: TaskClass) -> usize {
        match class {
            TaskClass::ImmediateMicrotask => self.immediate.len(),
            TaskClass::Microtask => self.microtasks.len(),
            TaskClass::Timer => self.timers.len(),
            TaskClass::Io => self.io.len(),
            TaskClass::Check => self.check.len(),
        }
    }

    /// Removes a task of `class` by identifier unless it is locked.
    pub fn remove(&mut self, class: TaskClass, id: TaskId) -> Removal {
        match class {
            TaskClass::ImmediateMicrotask => self.immediate.remove(id),
            TaskClass::Microtask => self.microtasks.remove(id),
            TaskClass::Timer => self.timers.remove(id),
            TaskClass::Io => self.io.remove(id),
            TaskClass::Check => self.check.remove(id),
        }
    }
}
