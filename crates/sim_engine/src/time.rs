//! Virtual time: fixed-point ticks since simulation start.
//!
//! One tick is one microsecond. Simulation start (tick 0) is midnight of day 0,
//! so calendar helpers such as [SimTime::minute_of_day] need no epoch.

use std::fmt;
use std::ops::{Add, AddAssign};

use serde::{Deserialize, Serialize};

pub const TICKS_PER_SECOND: u64 = 1_000_000;
pub const TICKS_PER_MINUTE: u64 = 60 * TICKS_PER_SECOND;
pub const TICKS_PER_HOUR: u64 = 60 * TICKS_PER_MINUTE;
pub const TICKS_PER_DAY: u64 = 24 * TICKS_PER_HOUR;

pub const MINUTES_PER_DAY: u32 = 24 * 60;

/// Minute of day for a wall-clock style `hh:mm`.
pub fn minutes_hhmm(hour: u32, minute: u32) -> u32 {
    60 * hour + minute
}

/// A point in simulated time.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct SimTime(u64);

/// A non-negative span of simulated time.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct SimDuration(u64);

impl SimTime {
    pub const ZERO: SimTime = SimTime(0);

    pub const fn from_ticks(ticks: u64) -> Self {
        Self(ticks)
    }

    pub const fn from_secs(secs: u64) -> Self {
        Self(secs.saturating_mul(TICKS_PER_SECOND))
    }

    pub const fn as_ticks(self) -> u64 {
        self.0
    }

    /// Whole seconds since simulation start.
    pub const fn as_secs(self) -> u64 {
        self.0 / TICKS_PER_SECOND
    }

    /// Zero-based day number.
    pub const fn day(self) -> u64 {
        self.0 / TICKS_PER_DAY
    }

    /// Midnight of the day containing this instant.
    pub const fn start_of_day(self) -> SimTime {
        SimTime(self.day() * TICKS_PER_DAY)
    }

    pub const fn minute_of_day(self) -> u32 {
        ((self.0 % TICKS_PER_DAY) / TICKS_PER_MINUTE) as u32
    }

    pub const fn hour_of_day(self) -> u32 {
        ((self.0 % TICKS_PER_DAY) / TICKS_PER_HOUR) as u32
    }

    /// Elapsed time since `earlier`, or zero if `earlier` is in the future.
    pub const fn duration_since(self, earlier: SimTime) -> SimDuration {
        SimDuration(self.0.saturating_sub(earlier.0))
    }
}

impl SimDuration {
    pub const ZERO: SimDuration = SimDuration(0);

    pub const fn from_ticks(ticks: u64) -> Self {
        Self(ticks)
    }

    pub const fn from_secs(secs: u64) -> Self {
        Self(secs.saturating_mul(TICKS_PER_SECOND))
    }

    pub const fn from_mins(mins: u64) -> Self {
        Self(mins.saturating_mul(TICKS_PER_MINUTE))
    }

    pub const fn from_hours(hours: u64) -> Self {
        Self(hours.saturating_mul(TICKS_PER_HOUR))
    }

    pub const fn from_days(days: u64) -> Self {
        Self(days.saturating_mul(TICKS_PER_DAY))
    }

    pub const fn as_ticks(self) -> u64 {
        self.0
    }

    pub const fn as_secs(self) -> u64 {
        self.0 / TICKS_PER_SECOND
    }
}

impl Add<SimDuration> for SimTime {
    type Output = SimTime;

    fn add(self, rhs: SimDuration) -> SimTime {
        SimTime(self.0.saturating_add(rhs.0))
    }
}

impl AddAssign<SimDuration> for SimTime {
    fn add_assign(&mut self, rhs: SimDuration) {
        *self = *self + rhs;
    }
}

impl Add for SimDuration {
    type Output = SimDuration;

    fn add(self, rhs: SimDuration) -> SimDuration {
        SimDuration(self.0.saturating_add(rhs.0))
    }
}

impl fmt::Display for SimTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let micros = self.0 % TICKS_PER_SECOND;
        let secs = self.0 / TICKS_PER_SECOND;
        write!(
            f,
            "{}d {:02}:{:02}:{:02}.{:06}",
            secs / 86_400,
            (secs / 3600) % 24,
            (secs / 60) % 60,
            secs % 60,
            micros
        )
    }
}
