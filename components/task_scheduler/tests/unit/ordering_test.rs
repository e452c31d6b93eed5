//! Unit tests for class ordering and cycle draining

use std::cell::RefCell;
use std::rc::Rc;
use task_scheduler::{IoReadiness, Schedule, Scheduler, TaskClass, TaskSpec};

type Trace = Rc<RefCell<Vec<&'static str>>>;

fn push(trace: &Trace, name: &'static str) {
    trace.borrow_mut().push(name);
}

#[test]
fn immediate_microtasks_before_microtasks_before_macrotasks() {
    let mut scheduler = Scheduler::new();

    // Registration order deliberately inverted across classes.
    scheduler
        .submit(TaskSpec::check(|_| Ok(())).labeled("check"))
        .unwrap();
    scheduler
        .submit(TaskSpec::timer(|_| Ok(()), 0).labeled("timer"))
        .unwrap();
    scheduler
        .submit(TaskSpec::io(|_| Ok(()), IoReadiness::Ready).labeled("io"))
        .unwrap();
    scheduler
        .submit(TaskSpec::microtask(|_| Ok(())).labeled("micro"))
        .unwrap();
    scheduler
        .submit(TaskSpec::immediate_microtask(|_| Ok(())).labeled("tick"))
        .unwrap();

    let log = scheduler.run();
    let names = log.names();
    assert_eq!(&names[..2], &["tick", "micro"]);
    for record in log.iter().skip(2) {
        assert!(record.class.is_macrotask());
    }
}

#[test]
fn zero_delay_timer_runs_after_later_microtasks() {
    let mut scheduler = Scheduler::new();
    let timer = scheduler.schedule_timer(|_| Ok(()), 0).unwrap();
    let micro = scheduler.schedule_microtask(|_| Ok(())).unwrap();
    let tick = scheduler.schedule_immediate_microtask(|_| Ok(())).unwrap();

    assert_eq!(scheduler.run().ids(), vec![tick, micro, timer]);
}

#[test]
fn check_before_timer_when_both_scheduled_from_io() {
    for _ in 0..10 {
        let mut scheduler = Scheduler::new();
        let trace: Trace = Rc::default();

        let t = trace.clone();
        scheduler
            .schedule_io_callback(
                move |ctx| {
                    let t1 = t.clone();
                    ctx.schedule_timer(
                        move |_| {
                            push(&t1, "timeout");
                            Ok(())
                        },
                        0,
                    )?;
                    let t2 = t.clone();
                    ctx.schedule_check_task(move |_| {
                        push(&t2, "immediate");
                        Ok(())
                    })?;
                    Ok(())
                },
                IoReadiness::Ready,
            )
            .unwrap();

        scheduler.run();
        assert_eq!(*trace.borrow(), vec!["immediate", "timeout"]);
    }
}

#[test]
fn mixed_scenario_log_order() {
    let mut scheduler = Scheduler::new();
    scheduler
        .submit(TaskSpec::microtask(|_| Ok(())).labeled("A"))
        .unwrap();
    scheduler
        .submit(TaskSpec::immediate_microtask(|_| Ok(())).labeled("B"))
        .unwrap();
    scheduler
        .submit(TaskSpec::timer(|_| Ok(()), 0).labeled("C"))
        .unwrap();
    scheduler
        .submit(
            TaskSpec::io(
                |ctx| {
                    ctx.submit(TaskSpec::check(|_| Ok(())).labeled("D"))?;
                    Ok(())
                },
                IoReadiness::Ready,
            )
            .labeled("E"),
        )
        .unwrap();

    assert_eq!(scheduler.run().names(), vec!["B", "A", "E", "D", "C"]);
}

#[test]
fn microtasks_drain_after_each_macrotask() {
    let mut scheduler = Scheduler::new();
    let trace: Trace = Rc::default();

    for (task, micro) in [("check1", "micro1"), ("check2", "micro2")] {
        let t = trace.clone();
        scheduler
            .schedule_check_task(move |ctx| {
                push(&t, task);
                let t = t.clone();
                ctx.schedule_microtask(move |_| {
                    push(&t, micro);
                    Ok(())
                })?;
                Ok(())
            })
            .unwrap();
    }

    scheduler.run();
    assert_eq!(
        *trace.borrow(),
        vec!["check1", "micro1", "check2", "micro2"]
    );
}

#[test]
fn microtask_chain_drains_within_one_phase() {
    let mut scheduler = Scheduler::new();
    let timer = scheduler.schedule_timer(|_| Ok(()), 0).unwrap();
    scheduler
        .schedule_microtask(|ctx| {
            ctx.schedule_microtask(|ctx| {
                ctx.schedule_microtask(|_| Ok(()))?;
                Ok(())
            })?;
            Ok(())
        })
        .unwrap();

    let log = scheduler.run();
    assert_eq!(log.len(), 4);
    assert_eq!(log.ids().last(), Some(&timer));
    assert!(log.iter().take(3).all(|r| r.cycle == 1));
}

#[test]
fn timers_run_in_eligible_time_order() {
    let mut scheduler = Scheduler::new();
    scheduler
        .submit(TaskSpec::timer(|_| Ok(()), 30).labeled("slow"))
        .unwrap();
    scheduler
        .submit(TaskSpec::timer(|_| Ok(()), 10).labeled("fast"))
        .unwrap();
    scheduler
        .submit(TaskSpec::timer(|_| Ok(()), 10).labeled("fast-2"))
        .unwrap();

    let log = scheduler.run();
    assert_eq!(log.names(), vec!["fast", "fast-2", "slow"]);
    let times: Vec<u64> = log.iter().map(|r| r.at_ms).collect();
    assert_eq!(times, vec![10, 10, 30]);
}

#[test]
fn check_task_queued_during_check_phase_runs_next_cycle() {
    let mut scheduler = Scheduler::new();
    scheduler
        .submit(
            TaskSpec::check(|ctx| {
                ctx.submit(TaskSpec::check(|_| Ok(())).labeled("inner"))?;
                Ok(())
            })
            .labeled("outer"),
        )
        .unwrap();

    let log = scheduler.run();
    let cycles: Vec<(String, u64)> = log.iter().map(|r| (r.name(), r.cycle)).collect();
    assert_eq!(
        cycles,
        vec![("outer".to_string(), 1), ("inner".to_string(), 2)]
    );
}

#[test]
fn io_callbacks_run_in_arrival_order() {
    let mut scheduler = Scheduler::new();
    let first = scheduler
        .schedule_io_callback(|_| Ok(()), IoReadiness::Ready)
        .unwrap();
    let second = scheduler
        .schedule_io_callback(|_| Ok(()), IoReadiness::Ready)
        .unwrap();

    assert_eq!(scheduler.run().ids(), vec![first, second]);
}

#[test]
fn io_predicate_unlocks_with_clock() {
    let mut scheduler = Scheduler::new();
    let io = scheduler
        .schedule_io_callback(|_| Ok(()), IoReadiness::at(25))
        .unwrap();
    // The timer drives the clock to 25, after which the predicate passes.
    let timer = scheduler.schedule_timer(|_| Ok(()), 25).unwrap();

    let log = scheduler.run();
    assert_eq!(log.ids(), vec![timer, io]);
    assert_eq!(log.get(io).unwrap().at_ms, 25);
}

#[test]
fn io_signaled_from_another_task() {
    let mut scheduler = Scheduler::new();
    let io = scheduler
        .schedule_io_callback(|_| Ok(()), IoReadiness::Signal)
        .unwrap();
    scheduler
        .schedule_timer(
            move |ctx| {
                ctx.complete_io(io)?;
                Ok(())
            },
            5,
        )
        .unwrap();

    let log = scheduler.run();
    assert_eq!(log.len(), 2);
    assert_eq!(log.ids()[1], io);
    assert!(scheduler.is_idle());
}

#[test]
fn long_action_delays_due_timer() {
    let mut scheduler = Scheduler::new();
    let timer = scheduler.schedule_timer(|_| Ok(()), 0).unwrap();
    let busy = scheduler
        .schedule_microtask(|ctx| {
            ctx.block_for(3_000);
            Ok(())
        })
        .unwrap();

    let log = scheduler.run();
    assert_eq!(log.ids(), vec![busy, timer]);
    assert_eq!(log.get(timer).unwrap().at_ms, 3_000);
}

#[test]
fn long_action_starves_equal_class() {
    let mut scheduler = Scheduler::new();
    let trace: Trace = Rc::default();

    let t = trace.clone();
    scheduler
        .schedule_check_task(move |ctx| {
            ctx.block_for(1_000);
            push(&t, "busy");
            Ok(())
        })
        .unwrap();
    let t = trace.clone();
    scheduler
        .schedule_check_task(move |ctx| {
            assert_eq!(ctx.now_ms(), 1_000);
            push(&t, "waiting");
            Ok(())
        })
        .unwrap();

    scheduler.run();
    assert_eq!(*trace.borrow(), vec!["busy", "waiting"]);
}

#[test]
fn run_is_idempotent_when_idle() {
    let mut scheduler = Scheduler::new();
    scheduler.schedule_microtask(|_| Ok(())).unwrap();
    assert_eq!(scheduler.run().len(), 1);

    let cycle = scheduler.cycle();
    let now = scheduler.now_ms();
    assert!(scheduler.run().is_empty());
    assert_eq!(scheduler.cycle(), cycle);
    assert_eq!(scheduler.now_ms(), now);
}

#[test]
fn faulted_microtask_does_not_block_the_phase() {
    let mut scheduler = Scheduler::new();
    scheduler
        .submit(TaskSpec::immediate_microtask(|_| Err("first".into())).labeled("bad"))
        .unwrap();
    scheduler
        .submit(TaskSpec::immediate_microtask(|_| Ok(())).labeled("next-tick"))
        .unwrap();
    scheduler
        .submit(TaskSpec::microtask(|_| Ok(())).labeled("promise"))
        .unwrap();

    let log = scheduler.run();
    assert_eq!(log.names(), vec!["bad", "next-tick", "promise"]);
    assert_eq!(log.faults().count(), 1);
    assert!(log.iter().all(|r| r.cycle == 1));
}

#[test]
fn pending_counts_per_class() {
    let mut scheduler = Scheduler::new();
    scheduler.schedule_timer(|_| Ok(()), 10).unwrap();
    scheduler.schedule_timer(|_| Ok(()), 20).unwrap();
    scheduler.schedule_check_task(|_| Ok(())).unwrap();

    assert_eq!(scheduler.pending(TaskClass::Timer), 2);
    assert_eq!(scheduler.pending(TaskClass::Check), 1);
    assert_eq!(scheduler.pending(TaskClass::Io), 0);

    let summary = scheduler.run_until_idle();
    assert_eq!(summary.executed, 3);
    assert_eq!(summary.faulted, 0);
    assert_eq!(summary.stalled_io, 0);
    assert!(scheduler.is_idle());
}
