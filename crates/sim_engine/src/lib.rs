pub mod actor;
pub mod clock;
pub mod config;
pub mod error;
pub mod event;
pub mod rng;
pub mod scheduler;
pub mod simulation;
pub mod stats;
pub mod time;
pub mod time_table;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers;
