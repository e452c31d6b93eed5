//! Unit test suite for task_scheduler

mod ordering_test;
