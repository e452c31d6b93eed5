//! Unit tests for TaskClass

use core_types::TaskClass;

#[test]
fn immediate_microtask_has_highest_priority() {
    let highest = TaskClass::ALL.iter().min().copied();
    assert_eq!(highest, Some(TaskClass::ImmediateMicrotask));
}

#[test]
fn microtask_classes_are_flagged() {
    assert!(TaskClass::ImmediateMicrotask.is_microtask());
    assert!(TaskClass::Microtask.is_microtask());
    assert!(!TaskClass::Timer.is_microtask());
    assert!(!TaskClass::Io.is_microtask());
    assert!(!TaskClass::Check.is_microtask());
}

#[test]
fn io_phase_precedes_check_phase() {
    assert!(TaskClass::Timer < TaskClass::Io);
    assert!(TaskClass::Io < TaskClass::Check);
}

#[test]
fn parses_from_kebab_case_name() {
    assert_eq!("io".parse::<TaskClass>(), Ok(TaskClass::Io));
    assert_eq!(
        "immediate-microtask".parse::<TaskClass>(),
        Ok(TaskClass::ImmediateMicrotask)
    );
    let err = "macrotask".parse::<TaskClass>().unwrap_err();
    assert!(err.contains("unknown task class"));
}

#[test]
fn serde_uses_kebab_case_names() {
    let json = serde_json::to_string(&TaskClass::ImmediateMicrotask).unwrap();
    assert_eq!(json, "\"immediate-microtask\"");

    let class: TaskClass = serde_json::from_str("\"check\"").unwrap();
    assert_eq!(class, TaskClass::Check);
}

#[test]
fn display_matches_serde_name() {
    for class in TaskClass::ALL {
        let json = serde_json::to_string(&class).unwrap();
        assert_eq!(json, format!("\"{}\"", class));
    }
}
