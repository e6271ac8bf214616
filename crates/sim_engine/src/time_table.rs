//! Daily time table: calendar-periodic dispatch in fixed-width slots.
//!
//! The table is a per-slot state machine that knows nothing about the event
//! queue. Operations return the time at which the caller must arm (or re-arm)
//! a queue event for the slot; [crate::scheduler::Scheduler] does the arming.
//!
//! Slot transitions:
//!
//! | state   | input                     | next state         | output            |
//! |---------|---------------------------|--------------------|-------------------|
//! | `Idle`  | `add_event`               | `Armed(next slot)` | arm at next slot  |
//! | `Armed` | `add_event`               | `Armed` unchanged  | nothing           |
//! | `Armed` | `fire`, entries present   | `Armed(now + 24h)` | entries, re-arm   |
//! | `Armed` | `fire`, no entries        | `Idle`             | nothing           |
//!
//! At most one arming event per slot is ever pending.

use crate::actor::ActorId;
use crate::error::ConfigError;
use crate::event::EventKind;
use crate::time::{SimDuration, SimTime, MINUTES_PER_DAY};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableEntry {
    pub actor: ActorId,
    pub kind: EventKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SlotState {
    /// No arming event is pending for the slot.
    #[default]
    Idle,
    /// An arming event is pending at `at`.
    Armed { at: SimTime },
}

/// Result of a slot's arming event firing with entries present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotFiring {
    pub slot: usize,
    /// Entries in registration order, as of the moment the slot fired.
    pub entries: Vec<TableEntry>,
    pub rearm_at: SimTime,
}

#[derive(Debug, Default, Clone)]
struct Slot {
    state: SlotState,
    entries: Vec<TableEntry>,
}

#[derive(Debug, Clone)]
pub struct DailyTimeTable {
    slot_width_minutes: u32,
    slots: Vec<Slot>,
    /// Actors removed since the most recent firing began.
    removed_since_fire: Vec<ActorId>,
}

impl DailyTimeTable {
    /// The slot width must be non-zero and divide a day evenly.
    pub fn new(slot_width_minutes: u32) -> Result<Self, ConfigError> {
        if slot_width_minutes == 0 {
            return Err(ConfigError::ZeroSlotWidth);
        }
        if MINUTES_PER_DAY % slot_width_minutes != 0 {
            return Err(ConfigError::SlotWidthNotDivisor(slot_width_minutes));
        }
        let slot_count = (MINUTES_PER_DAY / slot_width_minutes) as usize;
        Ok(Self {
            slot_width_minutes,
            slots: vec![Slot::default(); slot_count],
            removed_since_fire: Vec::new(),
        })
    }

    pub fn slot_width_minutes(&self) -> u32 {
        self.slot_width_minutes
    }

    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// Slot index for a minute of day. Minutes past midnight wrap.
    pub fn slot_of(&self, minute_of_day: u32) -> usize {
        ((minute_of_day % MINUTES_PER_DAY) / self.slot_width_minutes) as usize
    }

    /// Offset of a slot's start from midnight.
    pub fn slot_offset(&self, slot: usize) -> SimDuration {
        SimDuration::from_mins(slot as u64 * self.slot_width_minutes as u64)
    }

    pub fn slot_state(&self, slot: usize) -> Option<SlotState> {
        self.slots.get(slot).map(|s| s.state)
    }

    pub fn entries(&self, slot: usize) -> &[TableEntry] {
        self.slots
            .get(slot)
            .map(|s| s.entries.as_slice())
            .unwrap_or(&[])
    }

    pub fn entry_count(&self) -> usize {
        self.slots.iter().map(|s| s.entries.len()).sum()
    }

    /// Whether `actor` was removed after the most recent [Self::fire]. Entries
    /// of such an actor in that firing's snapshot must not be dispatched.
    pub fn removed_since_fire(&self, actor: ActorId) -> bool {
        self.removed_since_fire.contains(&actor)
    }

    /// Register `actor` to receive `kind` every day in the slot containing
    /// `minute_of_day`. Returns the arming time when the slot was idle.
    ///
    /// A slot whose start has already passed today is armed for tomorrow.
    pub fn add_event(
        &mut self,
        actor: ActorId,
        minute_of_day: u32,
        kind: EventKind,
        now: SimTime,
    ) -> Option<SimTime> {
        let slot = self.slot_of(minute_of_day);
        let arm_at = self.next_occurrence(slot, now);
        let entry = &mut self.slots[slot];
        entry.entries.push(TableEntry { actor, kind });
        match entry.state {
            SlotState::Armed { .. } => None,
            SlotState::Idle => {
                entry.state = SlotState::Armed { at: arm_at };
                Some(arm_at)
            }
        }
    }

    /// Erase every entry registered for `actor`. Returns how many were removed.
    pub fn remove_actor(&mut self, actor: ActorId) -> usize {
        let mut removed = 0;
        for slot in &mut self.slots {
            let before = slot.entries.len();
            slot.entries.retain(|entry| entry.actor != actor);
            removed += before - slot.entries.len();
        }
        if removed > 0 {
            self.removed_since_fire.push(actor);
        }
        removed
    }

    /// The slot's arming event fired at `now`.
    ///
    /// Returns `None` for an unknown or idle slot, and for a slot with no
    /// entries left (which then goes idle).
    pub fn fire(&mut self, slot: usize, now: SimTime) -> Option<SlotFiring> {
        self.removed_since_fire.clear();
        let entry = self.slots.get_mut(slot)?;
        if entry.state == SlotState::Idle {
            return None;
        }
        if entry.entries.is_empty() {
            entry.state = SlotState::Idle;
            return None;
        }
        let rearm_at = now + SimDuration::from_days(1);
        entry.state = SlotState::Armed { at: rearm_at };
        Some(SlotFiring {
            slot,
            entries: entry.entries.clone(),
            rearm_at,
        })
    }

    fn next_occurrence(&self, slot: usize, now: SimTime) -> SimTime {
        let today = now.start_of_day() + self.slot_offset(slot);
        if today < now {
            today + SimDuration::from_days(1)
        } else {
            today
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::ActorArena;
    use crate::time::minutes_hhmm;

    fn two_actors() -> (ActorId, ActorId) {
        let mut arena = ActorArena::new();
        (arena.spawn(()), arena.spawn(()))
    }

    #[test]
    fn rejects_widths_that_do_not_divide_a_day() {
        assert!(matches!(
            DailyTimeTable::new(0),
            Err(ConfigError::ZeroSlotWidth)
        ));
        assert!(matches!(
            DailyTimeTable::new(7),
            Err(ConfigError::SlotWidthNotDivisor(7))
        ));
        assert_eq!(DailyTimeTable::new(10).unwrap().slot_count(), 144);
    }

    #[test]
    fn first_registration_arms_todays_slot() {
        let (a, _) = two_actors();
        let mut table = DailyTimeTable::new(10).unwrap();

        let armed = table.add_event(a, 485, EventKind(1), SimTime::ZERO);
        assert_eq!(armed, Some(SimTime::ZERO + SimDuration::from_mins(480)));
        assert_eq!(table.slot_of(485), 48);
        assert_eq!(
            table.slot_state(48),
            Some(SlotState::Armed {
                at: SimTime::ZERO + SimDuration::from_mins(480)
            })
        );
    }

    #[test]
    fn passed_slot_is_armed_for_tomorrow() {
        let (a, _) = two_actors();
        let mut table = DailyTimeTable::new(10).unwrap();
        let now = SimTime::ZERO + SimDuration::from_days(3) + SimDuration::from_hours(9);

        let armed = table.add_event(a, minutes_hhmm(8, 0), EventKind(1), now);
        let expected = SimTime::ZERO + SimDuration::from_days(4) + SimDuration::from_hours(8);
        assert_eq!(armed, Some(expected));
    }

    #[test]
    fn second_registration_does_not_rearm() {
        let (a, b) = two_actors();
        let mut table = DailyTimeTable::new(10).unwrap();

        assert!(table.add_event(a, 480, EventKind(1), SimTime::ZERO).is_some());
        assert!(table.add_event(b, 489, EventKind(2), SimTime::ZERO).is_none());
        assert_eq!(
            table.entries(48),
            &[
                TableEntry { actor: a, kind: EventKind(1) },
                TableEntry { actor: b, kind: EventKind(2) },
            ]
        );
    }

    #[test]
    fn firing_rearms_one_day_later() {
        let (a, _) = two_actors();
        let mut table = DailyTimeTable::new(10).unwrap();
        let at = table.add_event(a, 480, EventKind(1), SimTime::ZERO).unwrap();

        let firing = table.fire(48, at).expect("slot has entries");
        assert_eq!(firing.rearm_at, at + SimDuration::from_days(1));
        assert_eq!(firing.entries.len(), 1);
        assert_eq!(
            table.slot_state(48),
            Some(SlotState::Armed { at: firing.rearm_at })
        );
    }

    #[test]
    fn empty_slot_goes_idle_and_can_be_rearmed() {
        let (a, _) = two_actors();
        let mut table = DailyTimeTable::new(10).unwrap();
        let at = table.add_event(a, 480, EventKind(1), SimTime::ZERO).unwrap();

        assert_eq!(table.remove_actor(a), 1);
        assert_eq!(table.fire(48, at), None);
        assert_eq!(table.slot_state(48), Some(SlotState::Idle));

        let later = at + SimDuration::from_hours(1);
        let rearmed = table.add_event(a, 480, EventKind(1), later);
        assert_eq!(rearmed, Some(at + SimDuration::from_days(1)));
    }

    #[test]
    fn refilled_slot_reuses_pending_arming() {
        let (a, b) = two_actors();
        let mut table = DailyTimeTable::new(10).unwrap();
        table.add_event(a, 480, EventKind(1), SimTime::ZERO);
        table.remove_actor(a);

        assert_eq!(table.add_event(b, 480, EventKind(2), SimTime::ZERO), None);
    }

    #[test]
    fn remove_actor_erases_all_slots_and_is_idempotent() {
        let (a, b) = two_actors();
        let mut table = DailyTimeTable::new(30).unwrap();
        table.add_event(a, 60, EventKind(1), SimTime::ZERO);
        table.add_event(b, 60, EventKind(1), SimTime::ZERO);
        table.add_event(a, 720, EventKind(2), SimTime::ZERO);

        assert_eq!(table.remove_actor(a), 2);
        assert_eq!(table.remove_actor(a), 0);
        assert_eq!(table.entry_count(), 1);
        assert_eq!(table.entries(2)[0].actor, b);
    }

    #[test]
    fn minutes_past_midnight_wrap_to_the_same_slot() {
        let (a, _) = two_actors();
        let mut table = DailyTimeTable::new(10).unwrap();

        assert_eq!(table.slot_of(MINUTES_PER_DAY + 485), 48);
        let armed = table.add_event(a, MINUTES_PER_DAY + 485, EventKind(1), SimTime::ZERO);
        assert_eq!(armed, Some(SimTime::ZERO + SimDuration::from_mins(480)));
        assert_eq!(table.entries(48).len(), 1);
    }

    #[test]
    fn removals_are_tracked_until_the_next_firing() {
        let (a, b) = two_actors();
        let mut table = DailyTimeTable::new(10).unwrap();
        let at = table.add_event(a, 480, EventKind(1), SimTime::ZERO).unwrap();
        table.add_event(b, 480, EventKind(1), SimTime::ZERO);

        assert_eq!(table.remove_actor(b), 1);
        assert_eq!(table.remove_actor(b), 0);
        assert!(table.removed_since_fire(b));

        let firing = table.fire(48, at).expect("a is still registered");
        assert_eq!(firing.entries.len(), 1);
        assert!(!table.removed_since_fire(b));

        assert_eq!(table.remove_actor(a), 1);
        assert!(table.removed_since_fire(a));
        assert!(!table.removed_since_fire(b));
    }

    #[test]
    fn unknown_slot_fires_nothing() {
        let mut table = DailyTimeTable::new(60).unwrap();
        assert_eq!(table.fire(24, SimTime::ZERO), None);
        assert_eq!(table.fire(3, SimTime::ZERO), None);
    }
}
