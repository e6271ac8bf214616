//! Actor contract and the generational arena scenarios keep their actors in.
//!
//! The engine never holds references to actors. Events carry an [ActorId]
//! handle, and the scenario lends its [ActorArena] to the scheduler for each
//! dispatch. A handle whose actor was despawned no longer resolves, even if
//! its slot has since been reused.

use std::fmt;

use crate::event::EventKind;
use crate::scheduler::Scheduler;
use crate::time::SimTime;

/// Stable handle to an actor in an [ActorArena].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ActorId {
    index: u32,
    generation: u32,
}

impl ActorId {
    pub fn index(self) -> usize {
        self.index as usize
    }

    pub fn generation(self) -> u32 {
        self.generation
    }
}

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}v{}", self.index, self.generation)
    }
}

/// What an actor receives when one of its events fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dispatch {
    /// The receiving actor, so it can schedule events for itself.
    pub actor: ActorId,
    /// When the event was scheduled. `sched.now() - birth_time` is the wait.
    pub birth_time: SimTime,
    pub kind: EventKind,
}

/// A simulation participant.
///
/// `on_event` runs to completion; later work is expressed by scheduling new
/// events through `sched`. Actors should treat kinds they do not recognise as
/// a defect (panic), the engine does not validate them.
pub trait Actor {
    fn on_event(&mut self, sched: &mut Scheduler, dispatch: Dispatch);
}

impl<A: Actor + ?Sized> Actor for Box<A> {
    fn on_event(&mut self, sched: &mut Scheduler, dispatch: Dispatch) {
        (**self).on_event(sched, dispatch);
    }
}

#[derive(Debug)]
struct Slot<A> {
    generation: u32,
    actor: Option<A>,
}

/// Generational arena of actors, owned by the scenario.
#[derive(Debug)]
pub struct ActorArena<A> {
    slots: Vec<Slot<A>>,
    free: Vec<u32>,
    len: usize,
}

impl<A> Default for ActorArena<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A> ActorArena<A> {
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            len: 0,
        }
    }

    pub fn spawn(&mut self, actor: A) -> ActorId {
        self.len += 1;
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.actor = Some(actor);
            return ActorId {
                index,
                generation: slot.generation,
            };
        }
        let index = self.slots.len() as u32;
        self.slots.push(Slot {
            generation: 0,
            actor: Some(actor),
        });
        ActorId {
            index,
            generation: 0,
        }
    }

    /// Remove an actor. Its handle, and every copy of it, stops resolving.
    ///
    /// Table-driven dispatches should be cancelled first with
    /// `time_table().remove_actor(id)`; directly queued events for a
    /// despawned actor are dropped when they fire.
    pub fn despawn(&mut self, id: ActorId) -> Option<A> {
        let slot = self.slots.get_mut(id.index())?;
        if slot.generation != id.generation {
            return None;
        }
        let actor = slot.actor.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(id.index);
        self.len -= 1;
        Some(actor)
    }

    pub fn get(&self, id: ActorId) -> Option<&A> {
        self.slots
            .get(id.index())
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.actor.as_ref())
    }

    pub fn get_mut(&mut self, id: ActorId) -> Option<&mut A> {
        self.slots
            .get_mut(id.index())
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.actor.as_mut())
    }

    pub fn contains(&self, id: ActorId) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = (ActorId, &A)> {
        self.slots.iter().enumerate().filter_map(|(index, slot)| {
            slot.actor.as_ref().map(|actor| {
                (
                    ActorId {
                        index: index as u32,
                        generation: slot.generation,
                    },
                    actor,
                )
            })
        })
    }
}
