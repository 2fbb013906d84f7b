pub mod concurrency_tests;
pub mod idempotency_tests;
pub mod wager_flow_tests;
