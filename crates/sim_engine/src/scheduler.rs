//! Scheduler: the per-run simulation context.
//!
//! Owns the clock, the event queue, the daily time table, event statistics
//! and the random source. Nothing here is shared between runs, and nothing
//! is locked; a scheduler must stay on the thread that drives it.

use tracing::{debug, trace, warn};

use crate::actor::{Actor, ActorArena, ActorId, Dispatch};
use crate::clock::SimClock;
use crate::config::SimConfig;
use crate::error::{ConfigError, ScheduleError};
use crate::event::{EventKind, EventQueue, Target};
use crate::rng::SimRng;
use crate::stats::EventStats;
use crate::time::{SimDuration, SimTime};
use crate::time_table::{DailyTimeTable, TableEntry};

#[derive(Debug)]
pub struct Scheduler {
    clock: SimClock,
    queue: EventQueue,
    time_table: DailyTimeTable,
    stats: EventStats,
    rng: SimRng,
    dispatched: u64,
}

impl Scheduler {
    pub fn new(config: &SimConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            clock: SimClock::default(),
            queue: EventQueue::default(),
            time_table: DailyTimeTable::new(config.slot_width_minutes)?,
            stats: EventStats::new(config.stats_bucket_width()),
            rng: SimRng::seed_from_u64(config.seed),
            dispatched: 0,
        })
    }

    /// Replace the seeded random source.
    pub fn with_rng(mut self, rng: SimRng) -> Self {
        self.rng = rng;
        self
    }

    pub fn now(&self) -> SimTime {
        self.clock.now()
    }

    pub fn hour_of_day(&self) -> u32 {
        self.clock.now().hour_of_day()
    }

    /// Schedule `kind` for `target`, `delay` from now.
    pub fn push(&mut self, delay: SimDuration, target: ActorId, kind: EventKind) {
        let now = self.clock.now();
        self.queue.push(now + delay, now, Target::Actor(target), kind);
    }

    /// Schedule `kind` for `target` at an absolute time.
    pub fn push_at(
        &mut self,
        at: SimTime,
        target: ActorId,
        kind: EventKind,
    ) -> Result<(), ScheduleError> {
        let now = self.clock.now();
        if at < now {
            return Err(ScheduleError::InPast { at, now });
        }
        self.queue.push(at, now, Target::Actor(target), kind);
        Ok(())
    }

    /// Handle for registering and cancelling daily recurring dispatches.
    pub fn time_table(&mut self) -> TimeTableMut<'_> {
        TimeTableMut { sched: self }
    }

    pub fn daily_time_table(&self) -> &DailyTimeTable {
        &self.time_table
    }

    pub fn stats(&self) -> &EventStats {
        &self.stats
    }

    pub fn stats_mut(&mut self) -> &mut EventStats {
        &mut self.stats
    }

    pub fn rng(&mut self) -> &mut SimRng {
        &mut self.rng
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn next_event_time(&self) -> Option<SimTime> {
        self.queue.peek_time()
    }

    /// Actor dispatches so far, direct and table-driven.
    pub fn dispatch_count(&self) -> u64 {
        self.dispatched
    }

    /// Pop the earliest event, advance the clock to it and dispatch it.
    /// Returns `false` if the queue was empty.
    pub fn pop_and_dispatch<A: Actor>(&mut self, actors: &mut ActorArena<A>) -> bool {
        let Some(event) = self.queue.pop() else {
            return false;
        };
        self.clock.set(event.activation_time);
        match event.target {
            Target::Actor(id) => {
                self.dispatch_to(actors, id, event.birth_time, event.kind);
            }
            Target::TimeTable => self.fire_slot(actors, event.kind, event.birth_time),
        }
        true
    }

    pub(crate) fn init_clock(&mut self) {
        self.clock.init();
    }

    pub(crate) fn discard_pending(&mut self) -> usize {
        self.queue.clear()
    }

    fn dispatch_to<A: Actor>(
        &mut self,
        actors: &mut ActorArena<A>,
        id: ActorId,
        birth_time: SimTime,
        kind: EventKind,
    ) -> bool {
        let Some(actor) = actors.get_mut(id) else {
            warn!(actor = %id, kind = kind.0, now = %self.now(), "dropping event for despawned actor");
            return false;
        };
        trace!(now = %self.now(), actor = %id, kind = kind.0, "dispatch");
        actor.on_event(
            self,
            Dispatch {
                actor: id,
                birth_time,
                kind,
            },
        );
        self.dispatched += 1;
        self.stats.record(kind, self.clock.now());
        true
    }

    fn fire_slot<A: Actor>(
        &mut self,
        actors: &mut ActorArena<A>,
        kind: EventKind,
        birth_time: SimTime,
    ) {
        let slot = kind.0 as usize;
        if slot >= self.time_table.slot_count() {
            warn!(slot, "time table event for unknown slot");
            return;
        }
        let now = self.clock.now();
        let Some(firing) = self.time_table.fire(slot, now) else {
            debug!(slot, "time table slot went idle");
            return;
        };
        for &TableEntry { actor, kind } in &firing.entries {
            // An earlier dispatch in this firing may have removed the actor.
            if self.time_table.removed_since_fire(actor) {
                continue;
            }
            if !self.dispatch_to(actors, actor, birth_time, kind) {
                self.time_table.remove_actor(actor);
            }
        }
        self.queue
            .push(firing.rearm_at, now, Target::TimeTable, EventKind(slot as u32));
        trace!(slot, rearm_at = %firing.rearm_at, "time table slot re-armed");
    }
}

/// Couples [DailyTimeTable] registration to the scheduler's queue.
pub struct TimeTableMut<'a> {
    sched: &'a mut Scheduler,
}

impl TimeTableMut<'_> {
    /// Dispatch `kind` to `actor` every day in the slot containing
    /// `minute_of_day`, starting with the next occurrence.
    pub fn add_event(&mut self, actor: ActorId, minute_of_day: u32, kind: EventKind) {
        let now = self.sched.clock.now();
        let table = &mut self.sched.time_table;
        let slot = table.slot_of(minute_of_day);
        if let Some(at) = table.add_event(actor, minute_of_day, kind, now) {
            debug!(slot, at = %at, "time table slot armed");
            self.sched
                .queue
                .push(at, now, Target::TimeTable, EventKind(slot as u32));
        }
    }

    /// Cancel every table-driven dispatch to `actor`, including ones already
    /// armed for the current day. Idempotent.
    pub fn remove_actor(&mut self, actor: ActorId) -> usize {
        let removed = self.sched.time_table.remove_actor(actor);
        if removed > 0 {
            debug!(actor = %actor, removed, "removed actor from time table");
        }
        removed
    }

    pub fn table(&self) -> &DailyTimeTable {
        &self.sched.time_table
    }
}
