//! Per-run virtual clock.
//!
//! Each [crate::scheduler::Scheduler] owns exactly one clock; there is no
//! process-wide instance. Only the engine moves it, and only forward.

use crate::time::{SimDuration, SimTime};

#[derive(Debug, Default, Clone)]
pub struct SimClock {
    now: SimTime,
}

impl SimClock {
    pub fn now(&self) -> SimTime {
        self.now
    }

    /// Reset to simulation start. Called by the driver before every run.
    pub fn init(&mut self) {
        self.now = SimTime::ZERO;
    }

    pub(crate) fn advance(&mut self, delta: SimDuration) {
        self.now += delta;
    }

    /// Pin the clock to an event's activation time.
    pub(crate) fn set(&mut self, time: SimTime) {
        debug_assert!(time >= self.now, "clock must never move backwards");
        self.advance(time.duration_since(self.now));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_moves_forward_and_resets() {
        let mut clock = SimClock::default();
        assert_eq!(clock.now(), SimTime::ZERO);

        clock.advance(SimDuration::from_secs(5));
        assert_eq!(clock.now(), SimTime::from_secs(5));

        clock.set(SimTime::from_secs(20));
        assert_eq!(clock.now(), SimTime::from_secs(20));

        clock.init();
        assert_eq!(clock.now(), SimTime::ZERO);
    }
}
