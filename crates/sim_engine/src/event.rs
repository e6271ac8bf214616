//! Events and the time-ordered event queue.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use serde::{Deserialize, Serialize};

use crate::actor::ActorId;
use crate::time::SimTime;

/// Opaque event identifier. Only the receiving actor gives it meaning.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct EventKind(pub u32);

impl From<u32> for EventKind {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

/// Who receives an event when it fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Actor(ActorId),
    /// Self-armed daily time table event; the kind carries the slot index.
    TimeTable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Event {
    pub activation_time: SimTime,
    pub birth_time: SimTime,
    pub target: Target,
    pub kind: EventKind,
    /// Insertion order within the owning queue; breaks timestamp ties FIFO.
    seq: u64,
}

impl Ord for Event {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering to make BinaryHeap a min-heap by (time, seq).
        other
            .activation_time
            .cmp(&self.activation_time)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for Event {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[derive(Debug, Default)]
pub struct EventQueue {
    events: BinaryHeap<Event>,
    next_seq: u64,
}

impl EventQueue {
    pub fn push(
        &mut self,
        activation_time: SimTime,
        birth_time: SimTime,
        target: Target,
        kind: EventKind,
    ) {
        debug_assert!(
            activation_time >= birth_time,
            "activation time must be >= birth time"
        );
        let seq = self.next_seq;
        self.next_seq += 1;
        self.events.push(Event {
            activation_time,
            birth_time,
            target,
            kind,
            seq,
        });
    }

    pub fn pop(&mut self) -> Option<Event> {
        self.events.pop()
    }

    pub fn peek_time(&self) -> Option<SimTime> {
        self.events.peek().map(|e| e.activation_time)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Drop every pending event, returning how many were discarded.
    pub fn clear(&mut self) -> usize {
        let discarded = self.events.len();
        self.events.clear();
        discarded
    }
}
