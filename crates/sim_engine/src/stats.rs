//! Event statistics: per-kind dispatch counts in fixed-width time buckets.
//!
//! Buckets start at multiples of the bucket width from simulation start. The
//! open bucket is sealed into history the first time a recorded timestamp lands
//! past its window; every window skipped entirely is sealed as an empty bucket,
//! so the sealed bucket count always equals the open window's index.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::debug;

use crate::event::EventKind;
use crate::time::{SimDuration, SimTime};

/// Counts for one time window.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StatsBucket {
    pub start: SimTime,
    pub counts: BTreeMap<EventKind, u64>,
}

impl StatsBucket {
    fn starting_at(start: SimTime) -> Self {
        Self {
            start,
            counts: BTreeMap::new(),
        }
    }

    pub fn count(&self, kind: EventKind) -> u64 {
        self.counts.get(&kind).copied().unwrap_or(0)
    }

    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct EventStats {
    bucket_width: SimDuration,
    open: StatsBucket,
    history: Vec<StatsBucket>,
}

impl EventStats {
    /// `bucket_width` must be non-zero; [crate::config::SimConfig] validates it.
    pub fn new(bucket_width: SimDuration) -> Self {
        debug_assert!(bucket_width > SimDuration::ZERO, "bucket width must be non-zero");
        Self {
            bucket_width,
            open: StatsBucket::starting_at(SimTime::ZERO),
            history: Vec::new(),
        }
    }

    pub fn bucket_width(&self) -> SimDuration {
        self.bucket_width
    }

    pub fn record(&mut self, kind: EventKind, at: SimTime) {
        let sealed = self.roll_to(at);
        if sealed > 0 {
            debug!(sealed, bucket_start = %self.open.start, "stats buckets sealed");
        }
        *self.open.counts.entry(kind).or_insert(0) += 1;
    }

    /// Seal the open window, even if empty, and open the next one.
    ///
    /// The last window representable in [SimTime] is never sealed.
    pub fn flush(&mut self) {
        self.seal_open();
    }

    /// Seal every window that starts before `end`.
    pub fn seal_through(&mut self, end: SimTime) {
        while self.open.start < end && self.seal_open() {}
    }

    pub fn bucket_count(&self) -> usize {
        self.history.len()
    }

    pub fn buckets(&self) -> &[StatsBucket] {
        &self.history
    }

    pub fn open_bucket(&self) -> &StatsBucket {
        &self.open
    }

    /// Count of `kind` per sealed bucket, oldest first; zero where absent.
    pub fn series_for(&self, kind: EventKind) -> Vec<u64> {
        self.history.iter().map(|bucket| bucket.count(kind)).collect()
    }

    /// Everything recorded so far, sealed and open.
    pub fn total(&self) -> u64 {
        self.history.iter().map(StatsBucket::total).sum::<u64>() + self.open.total()
    }

    fn seal_open(&mut self) -> bool {
        let Some(next_start) = self
            .open
            .start
            .as_ticks()
            .checked_add(self.bucket_width.as_ticks())
        else {
            return false;
        };
        let next = StatsBucket::starting_at(SimTime::from_ticks(next_start));
        self.history.push(std::mem::replace(&mut self.open, next));
        true
    }

    /// Seal windows until the open one contains `at`. The open window's
    /// index always equals the sealed count.
    fn roll_to(&mut self, at: SimTime) -> usize {
        let target = at.as_ticks() / self.bucket_width.as_ticks();
        let mut sealed = 0;
        while (self.history.len() as u64) < target && self.seal_open() {
            sealed += 1;
        }
        sealed
    }
}
