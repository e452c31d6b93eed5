//! Unit tests for ActionFault, SchedulerError and CancellationMiss

use core_types::{ActionFault, CancellationMiss, FaultKind, SchedulerError, TaskId};

mod action_fault_tests {
    use super::*;

    #[test]
    fn error_constructor_sets_kind() {
        let fault = ActionFault::error("disk full");
        assert_eq!(fault.kind, FaultKind::Error);
        assert_eq!(fault.message, "disk full");
    }

    #[test]
    fn panic_constructor_sets_kind() {
        let fault = ActionFault::panic("index out of bounds");
        assert_eq!(fault.kind, FaultKind::Panic);
    }

    #[test]
    fn fault_from_string() {
        let fault = ActionFault::from(String::from("timeout"));
        assert_eq!(fault, ActionFault::error("timeout"));
    }

    #[test]
    fn fault_is_std_error() {
        let err: Box<dyn std::error::Error> = Box::new(ActionFault::error("x"));
        assert_eq!(err.to_string(), "action failed: x");
    }

    #[test]
    fn fault_serializes_with_kind() {
        let json = serde_json::to_value(ActionFault::panic("boom")).unwrap();
        assert_eq!(json["kind"], "panic");
        assert_eq!(json["message"], "boom");
    }
}

mod scheduler_error_tests {
    use super::*;

    #[test]
    fn closed_message() {
        assert!(SchedulerError::Closed.to_string().contains("closed"));
    }

    #[test]
    fn unknown_task_names_the_id() {
        let err = SchedulerError::UnknownTask(TaskId::new(9));
        assert_eq!(err.to_string(), "no pending task #9");
    }

    #[test]
    fn not_io_task_names_the_id() {
        let err = SchedulerError::NotIoTask(TaskId::new(2));
        assert_eq!(err.to_string(), "task #2 is not an I/O callback");
    }

    #[test]
    fn config_error_carries_reason() {
        let err = SchedulerError::Config("max_cycles must be positive".to_string());
        assert!(err.to_string().ends_with("max_cycles must be positive"));
    }
}

#[test]
fn cancellation_miss_serializes_kebab_case() {
    let json = serde_json::to_string(&CancellationMiss::AlreadyRan).unwrap();
    assert_eq!(json, "\"already-ran\"");
}
