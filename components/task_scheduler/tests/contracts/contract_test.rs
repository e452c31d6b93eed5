//! Contract tests for task_scheduler component
//!
//! These tests pin the public surface: constructor shapes, scheduling return
//! types and the execution log record layout.

use task_scheduler::{
    CancelOutcome, CompletionRecord, CompletionStatus, ExecutionLog, IoReadiness, RunSummary,
    Schedule, Scheduler, SchedulerConfig, SchedulerResult, TaskClass, TaskId, TaskSpec,
    VirtualClock,
};

mod scheduler_contract {
    use super::*;

    #[test]
    fn scheduler_new_returns_self() {
        let scheduler = Scheduler::new();
        // Scheduler::new() returns Self
        let _ = scheduler;
    }

    #[test]
    fn scheduler_accepts_virtual_clock() {
        let scheduler = Scheduler::new().with_clock(VirtualClock::new(10));
        assert_eq!(scheduler.now_ms(), 10);
    }

    #[test]
    fn scheduler_with_config_returns_result() {
        let result: SchedulerResult<Scheduler> = Scheduler::with_config(SchedulerConfig::default());
        assert!(result.is_ok());
    }

    #[test]
    fn every_schedule_call_returns_task_id() {
        let mut scheduler = Scheduler::new();
        let ids: Vec<TaskId> = vec![
            scheduler.schedule_immediate_microtask(|_| Ok(())).unwrap(),
            scheduler.schedule_microtask(|_| Ok(())).unwrap(),
            scheduler.schedule_timer(|_| Ok(()), 0).unwrap(),
            scheduler.schedule_check_task(|_| Ok(())).unwrap(),
            scheduler
                .schedule_io_callback(|_| Ok(()), IoReadiness::Ready)
                .unwrap(),
        ];
        // Identifiers are unique and increase with registration order
        assert!(ids.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn run_returns_execution_log() {
        let mut scheduler = Scheduler::new();
        let log: ExecutionLog = scheduler.run();
        assert!(log.is_empty());
    }

    #[test]
    fn run_until_idle_returns_summary() {
        let mut scheduler = Scheduler::new();
        let summary: RunSummary = scheduler.run_until_idle();
        assert_eq!(summary, RunSummary::default());
    }

    #[test]
    fn cancel_returns_outcome() {
        let mut scheduler = Scheduler::new();
        let id = scheduler.schedule_microtask(|_| Ok(())).unwrap();
        let outcome: CancelOutcome = scheduler.cancel(id);
        assert_eq!(outcome, CancelOutcome::Cancelled);
    }
}

mod record_contract {
    use super::*;

    #[test]
    fn record_carries_id_class_and_status() {
        let mut scheduler = Scheduler::new();
        let id = scheduler
            .submit(TaskSpec::check(|_| Ok(())).labeled("D"))
            .unwrap();

        let log = scheduler.run();
        let record: &CompletionRecord = &log.records()[0];
        assert_eq!(record.id, id);
        assert_eq!(record.class, TaskClass::Check);
        assert_eq!(record.status, CompletionStatus::Completed);
        assert_eq!(record.label.as_deref(), Some("D"));
        assert_eq!(record.cycle, 1);
    }

    #[test]
    fn log_serializes_to_json_array() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule_microtask(|_| Ok(())).unwrap();
        scheduler
            .schedule_microtask(|_| Err("broken".into()))
            .unwrap();

        let json = serde_json::to_value(scheduler.run()).unwrap();
        let records = json.as_array().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0]["status"], "completed");
        assert_eq!(records[1]["status"], "faulted");
        assert_eq!(records[1]["fault"]["kind"], "error");
    }
}
