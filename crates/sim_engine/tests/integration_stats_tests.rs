mod support;

use sim_engine::event::EventKind;
use sim_engine::stats::EventStats;
use sim_engine::test_helpers::{scripted_simulation, Reaction, RecordingActor};
use sim_engine::time::{SimDuration, SimTime};

use support::{test_config, EAT, WAKE};

const RUN_SECS: u64 = 10 * 3600 + 1800;

/// One actor ticking every 7 minutes plus a daily table entry at 06:00,
/// run to `horizon_secs`. Returns the dispatch count and the statistics.
fn run_ticking(horizon_secs: u64) -> (u64, EventStats) {
    let mut sim = scripted_simulation(test_config(), |sched, actors, log| {
        let a = actors.spawn(RecordingActor::new(log).on(
            WAKE,
            Reaction::Schedule {
                delay: SimDuration::from_mins(7),
                kind: WAKE,
            },
        ));
        sched.push(SimDuration::ZERO, a, WAKE);
        sched.time_table().add_event(a, 360, EAT);
        Ok(())
    })
    .unwrap();
    let summary = sim.run(horizon_secs).unwrap();
    (summary.events_dispatched, sim.scheduler().stats().clone())
}

#[test]
fn sealed_bucket_count_is_ceil_of_run_length() {
    let (dispatched, mut stats) = run_ticking(RUN_SECS);
    stats.seal_through(SimTime::from_secs(RUN_SECS));

    // 10.5 h in 1 h buckets.
    assert_eq!(stats.bucket_count(), 11);
    assert_eq!(stats.total(), dispatched);
    let sealed_sum: u64 = stats.buckets().iter().map(|b| b.total()).sum();
    assert_eq!(sealed_sum, dispatched);
}

#[test]
fn series_reports_zero_for_absent_buckets() {
    let (_, mut stats) = run_ticking(RUN_SECS);
    stats.seal_through(SimTime::from_secs(RUN_SECS));

    let eat = stats.series_for(EAT);
    assert_eq!(eat.len(), 11);
    assert_eq!(eat.iter().sum::<u64>(), 1);
    assert_eq!(eat[6], 1);

    assert!(stats.series_for(EventKind(77)).iter().all(|&n| n == 0));

    // Ticks every 7 minutes starting at 0 → 9 in the first hour (0, 7, ..., 56).
    assert_eq!(stats.series_for(WAKE)[0], 9);
}

#[test]
fn bucket_boundaries_are_multiples_of_width() {
    let (_, stats) = run_ticking(RUN_SECS);

    for (i, bucket) in stats.buckets().iter().enumerate() {
        assert_eq!(
            bucket.start,
            SimTime::ZERO + SimDuration::from_hours(i as u64)
        );
    }
}

#[test]
fn stats_serialize_to_json() {
    let (_, mut stats) = run_ticking(3600);
    stats.flush();

    let json = serde_json::to_value(&stats).expect("serializable");
    let buckets = json["history"].as_array().expect("history array");
    assert_eq!(buckets.len(), 1);
    assert_eq!(buckets[0]["counts"]["1"], 9);
}
