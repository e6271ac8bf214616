//! Test helpers for common test setup and utilities.
//!
//! A recording actor with scripted reactions and a closure-primed scenario,
//! shared by unit tests, integration tests and benchmarks.

use std::cell::RefCell;
use std::rc::Rc;

use crate::actor::{Actor, ActorArena, ActorId, Dispatch};
use crate::config::SimConfig;
use crate::error::{ConfigError, PrimeError};
use crate::event::EventKind;
use crate::scheduler::Scheduler;
use crate::simulation::{Scenario, Simulation};
use crate::time::{SimDuration, SimTime};

/// One observed dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchRecord {
    pub at: SimTime,
    pub actor: ActorId,
    pub kind: EventKind,
    pub birth_time: SimTime,
}

/// Dispatch log shared by every recording actor in a scenario.
pub type DispatchLog = Rc<RefCell<Vec<DispatchRecord>>>;

/// What a [RecordingActor] does when it receives a given kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reaction {
    /// Schedule `kind` for itself after `delay`.
    Schedule { delay: SimDuration, kind: EventKind },
    /// Register itself in the time table.
    JoinTimeTable { minute_of_day: u32, kind: EventKind },
    /// Remove `actor` from the time table.
    RemoveFromTimeTable(ActorId),
    /// Remove itself from the time table.
    LeaveTimeTable,
}

#[derive(Debug)]
pub struct RecordingActor {
    log: DispatchLog,
    reactions: Vec<(EventKind, Reaction)>,
}

impl RecordingActor {
    pub fn new(log: &DispatchLog) -> Self {
        Self {
            log: Rc::clone(log),
            reactions: Vec::new(),
        }
    }

    pub fn on(mut self, kind: EventKind, reaction: Reaction) -> Self {
        self.reactions.push((kind, reaction));
        self
    }
}

impl Actor for RecordingActor {
    fn on_event(&mut self, sched: &mut Scheduler, dispatch: Dispatch) {
        self.log.borrow_mut().push(DispatchRecord {
            at: sched.now(),
            actor: dispatch.actor,
            kind: dispatch.kind,
            birth_time: dispatch.birth_time,
        });
        for (on, reaction) in &self.reactions {
            if *on != dispatch.kind {
                continue;
            }
            match *reaction {
                Reaction::Schedule { delay, kind } => sched.push(delay, dispatch.actor, kind),
                Reaction::JoinTimeTable {
                    minute_of_day,
                    kind,
                } => sched
                    .time_table()
                    .add_event(dispatch.actor, minute_of_day, kind),
                Reaction::RemoveFromTimeTable(other) => {
                    sched.time_table().remove_actor(other);
                }
                Reaction::LeaveTimeTable => {
                    sched.time_table().remove_actor(dispatch.actor);
                }
            }
        }
    }
}

/// Scenario whose priming step is a closure.
pub struct ScriptedScenario<F> {
    actors: ActorArena<RecordingActor>,
    log: DispatchLog,
    prime_fn: F,
}

impl<F> ScriptedScenario<F>
where
    F: FnMut(&mut Scheduler, &mut ActorArena<RecordingActor>, &DispatchLog) -> Result<(), PrimeError>,
{
    pub fn new(prime_fn: F) -> Self {
        Self {
            actors: ActorArena::new(),
            log: DispatchLog::default(),
            prime_fn,
        }
    }

    pub fn records(&self) -> Vec<DispatchRecord> {
        self.log.borrow().clone()
    }

    pub fn actors(&self) -> &ActorArena<RecordingActor> {
        &self.actors
    }
}

impl<F> Scenario for ScriptedScenario<F>
where
    F: FnMut(&mut Scheduler, &mut ActorArena<RecordingActor>, &DispatchLog) -> Result<(), PrimeError>,
{
    type Actor = RecordingActor;

    fn prime(&mut self, sched: &mut Scheduler) -> Result<(), PrimeError> {
        (self.prime_fn)(sched, &mut self.actors, &self.log)
    }

    fn actors_mut(&mut self) -> &mut ActorArena<RecordingActor> {
        &mut self.actors
    }
}

/// Build a simulation around a [ScriptedScenario].
pub fn scripted_simulation<F>(
    config: SimConfig,
    prime_fn: F,
) -> Result<Simulation<ScriptedScenario<F>>, ConfigError>
where
    F: FnMut(&mut Scheduler, &mut ActorArena<RecordingActor>, &DispatchLog) -> Result<(), PrimeError>,
{
    Simulation::new(config, ScriptedScenario::new(prime_fn))
}
