#![allow(dead_code)]

use sim_engine::config::SimConfig;
use sim_engine::event::EventKind;
use sim_engine::test_helpers::DispatchRecord;
use sim_engine::time::{SimDuration, SimTime};

pub const WAKE: EventKind = EventKind(1);
pub const EAT: EventKind = EventKind(2);
pub const WORK: EventKind = EventKind(3);

/// Config used by most integration tests: 10 min slots, 1 h buckets, seed 42.
pub fn test_config() -> SimConfig {
    SimConfig::default()
        .with_slot_width_minutes(10)
        .with_stats_bucket_minutes(60)
        .with_seed(42)
}

pub fn at_secs(secs: u64) -> SimTime {
    SimTime::from_secs(secs)
}

/// Absolute time `days` days and `minute_of_day` minutes after start.
pub fn day_minute(days: u64, minute_of_day: u64) -> SimTime {
    SimTime::ZERO + SimDuration::from_days(days) + SimDuration::from_mins(minute_of_day)
}

pub fn times(records: &[DispatchRecord]) -> Vec<SimTime> {
    records.iter().map(|r| r.at).collect()
}

pub fn kinds(records: &[DispatchRecord]) -> Vec<EventKind> {
    records.iter().map(|r| r.kind).collect()
}
