//! Contract test suite for task_scheduler

mod contract_test;
