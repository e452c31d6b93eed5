//! Built-in ordering scenarios
//!
//! Each scenario registers work on a fresh scheduler the way a short script
//! would: synchronous lines are written to the [`Console`] while the scenario
//! builds, deferred lines are written by task actions when they run.

use std::cell::RefCell;
use std::rc::Rc;
use task_scheduler::{
    ActionFault, ActionResult, IoReadiness, Schedule, Scheduler, SchedulerResult, TaskContext,
    TaskSpec,
};

/// Shared transcript of printed lines.
#[derive(Debug, Clone, Default)]
pub struct Console {
    lines: Rc<RefCell<Vec<String>>>,
}

impl Console {
    /// Creates an empty console.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a line.
    pub fn log(&self, line: impl Into<String>) {
        self.lines.borrow_mut().push(line.into());
    }

    /// Snapshot of every line so far.
    pub fn lines(&self) -> Vec<String> {
        self.lines.borrow().clone()
    }
}

type Build = fn(&mut Scheduler, &Console) -> SchedulerResult<()>;

/// A named scenario.
#[derive(Clone, Copy)]
pub struct Scenario {
    /// Name used on the command line
    pub name: &'static str,
    /// One-line summary for `--list`
    pub description: &'static str,
    build: Build,
}

impl std::fmt::Debug for Scenario {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Scenario {{ name: {:?} }}", self.name)
    }
}

impl Scenario {
    /// Registers the scenario's work on `scheduler`.
    pub fn build(&self, scheduler: &mut Scheduler, console: &Console) -> SchedulerResult<()> {
        (self.build)(scheduler, console)
    }
}

const SCENARIOS: &[Scenario] = &[
    Scenario {
        name: "priority",
        description: "sync code, next tick, promise and timeout(0) in one script",
        build: priority,
    },
    Scenario {
        name: "macro-vs-micro",
        description: "a promise reaction overtakes an earlier timeout(0)",
        build: macro_vs_micro,
    },
    Scenario {
        name: "busy-loop",
        description: "a 3000 ms blocking loop delays a timeout(0)",
        build: busy_loop,
    },
    Scenario {
        name: "main-module",
        description: "timeout(0) and an immediate scheduled from the main module",
        build: main_module,
    },
    Scenario {
        name: "io-cycle",
        description: "timeout(0) and an immediate scheduled from an I/O callback",
        build: io_cycle,
    },
    Scenario {
        name: "mixed",
        description: "microtask A, immediate B, timer C, I/O E scheduling check D",
        build: mixed,
    },
    Scenario {
        name: "faults",
        description: "failing actions are recorded without stopping the run",
        build: faults,
    },
];

/// Every built-in scenario.
pub fn all() -> &'static [Scenario] {
    SCENARIOS
}

/// Looks up a scenario by name.
pub fn find(name: &str) -> Option<&'static Scenario> {
    SCENARIOS.iter().find(|s| s.name == name)
}

/// Action that writes `line` to the console.
fn say(
    console: &Console,
    line: &'static str,
) -> impl FnOnce(&mut TaskContext<'_>) -> ActionResult {
    let console = console.clone();
    move |_| {
        console.log(line);
        Ok(())
    }
}

fn priority(scheduler: &mut Scheduler, console: &Console) -> SchedulerResult<()> {
    console.log("1. SYNC START");
    scheduler.submit(TaskSpec::microtask(say(console, "3. PROMISE")).labeled("promise"))?;
    scheduler.submit(
        TaskSpec::immediate_microtask(say(console, "2. NEXT TICK")).labeled("next-tick"),
    )?;
    scheduler.submit(TaskSpec::timer(say(console, "4. SET TIMEOUT"), 0).labeled("timeout"))?;
    console.log("5. SYNC END");
    Ok(())
}

fn macro_vs_micro(scheduler: &mut Scheduler, console: &Console) -> SchedulerResult<()> {
    console.log("1. Program Start");
    scheduler.submit(
        TaskSpec::timer(say(console, "3. Macro-task: timeout(0)"), 0).labeled("timeout"),
    )?;
    scheduler.submit(
        TaskSpec::microtask(say(console, "2. Micro-task: promise")).labeled("promise"),
    )?;
    console.log("4. Program End");
    Ok(())
}

fn busy_loop(scheduler: &mut Scheduler, console: &Console) -> SchedulerResult<()> {
    console.log("1. Program Start");
    scheduler.submit(
        TaskSpec::timer(say(console, "4. Timer fired after the blocking loop"), 0)
            .labeled("timeout"),
    )?;
    // Synchronous code holds the thread; time passes but nothing else runs.
    scheduler.advance_time(3_000);
    console.log("3. CPU task complete after 3000 ms");
    console.log("2. Program End");
    Ok(())
}

fn main_module(scheduler: &mut Scheduler, console: &Console) -> SchedulerResult<()> {
    scheduler.submit(TaskSpec::timer(say(console, "Timeout"), 0).labeled("timeout"))?;
    scheduler.submit(TaskSpec::check(say(console, "Immediate")).labeled("immediate"))?;
    Ok(())
}

fn io_cycle(scheduler: &mut Scheduler, console: &Console) -> SchedulerResult<()> {
    let inner = console.clone();
    scheduler.submit(
        TaskSpec::io(
            move |ctx| {
                ctx.submit(TaskSpec::timer(say(&inner, "Timeout (Second)"), 0).labeled("timeout"))?;
                ctx.submit(TaskSpec::check(say(&inner, "Immediate (First)")).labeled("immediate"))?;
                Ok(())
            },
            IoReadiness::Ready,
        )
        .labeled("read-file"),
    )?;
    Ok(())
}

fn mixed(scheduler: &mut Scheduler, console: &Console) -> SchedulerResult<()> {
    scheduler.submit(TaskSpec::microtask(say(console, "A")).labeled("A"))?;
    scheduler.submit(TaskSpec::immediate_microtask(say(console, "B")).labeled("B"))?;
    scheduler.submit(TaskSpec::timer(say(console, "C"), 0).labeled("C"))?;
    let inner = console.clone();
    scheduler.submit(
        TaskSpec::io(
            move |ctx| {
                inner.log("E");
                ctx.submit(TaskSpec::check(say(&inner, "D")).labeled("D"))?;
                Ok(())
            },
            IoReadiness::Ready,
        )
        .labeled("E"),
    )?;
    Ok(())
}

fn faults(scheduler: &mut Scheduler, console: &Console) -> SchedulerResult<()> {
    let c = console.clone();
    scheduler.submit(
        TaskSpec::microtask(move |_| {
            c.log("fetching user");
            Err(ActionFault::error("request failed with status 401"))
        })
        .labeled("fetch-user"),
    )?;
    scheduler.submit(TaskSpec::microtask(say(console, "rendering fallback")).labeled("fallback"))?;
    let c = console.clone();
    scheduler.submit(
        TaskSpec::timer(
            move |_| {
                c.log("retrying");
                Err(ActionFault::error("network timeout after 5000 ms"))
            },
            5_000,
        )
        .labeled("retry"),
    )?;
    scheduler.submit(TaskSpec::check(say(console, "cleanup")).labeled("cleanup"))?;
    Ok(())
}
