//! Simulation driver: primes a scenario, then runs the queue to a horizon.
//!
//! A [Simulation] is single-shot. `run` primes the scenario once, then pops
//! and dispatches events until the queue drains or the next event lies past
//! the horizon. Events still queued past the horizon are discarded.

use std::time::{Duration, Instant};

use tracing::{debug, error, info};

use crate::actor::{Actor, ActorArena};
use crate::config::SimConfig;
use crate::error::{ConfigError, PrimeError, SimError};
use crate::rng::SimRng;
use crate::scheduler::Scheduler;
use crate::time::SimTime;

/// A concrete model: owns its actors and seeds the initial events.
pub trait Scenario {
    type Actor: Actor;

    /// Seed the initial event set. An error aborts the run before any dispatch.
    fn prime(&mut self, sched: &mut Scheduler) -> Result<(), PrimeError>;

    fn actors_mut(&mut self) -> &mut ActorArena<Self::Actor>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Idle,
    Priming,
    Running,
    Finished,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    QueueDrained,
    HorizonReached,
}

#[derive(Debug, Clone, Copy)]
pub struct RunSummary {
    pub events_dispatched: u64,
    pub final_time: SimTime,
    pub termination: Termination,
    /// Events left in the queue past the horizon, dropped unexecuted.
    pub discarded: usize,
    /// Wall-clock time spent in the run loop.
    pub wall_time: Duration,
}

impl RunSummary {
    /// Dispatch throughput in events per wall-clock second.
    pub fn events_per_second(&self) -> f64 {
        let elapsed = self.wall_time.as_secs_f64();
        if elapsed > 0.0 {
            self.events_dispatched as f64 / elapsed
        } else {
            0.0
        }
    }
}

pub struct Simulation<S: Scenario> {
    config: SimConfig,
    sched: Scheduler,
    scenario: S,
    state: RunState,
}

impl<S: Scenario> Simulation<S> {
    pub fn new(config: SimConfig, scenario: S) -> Result<Self, ConfigError> {
        let sched = Scheduler::new(&config)?;
        Ok(Self {
            config,
            sched,
            scenario,
            state: RunState::Idle,
        })
    }

    /// Replace the random source seeded from the config.
    pub fn with_rng(mut self, rng: SimRng) -> Self {
        self.sched = self.sched.with_rng(rng);
        self
    }

    /// Run with the horizon from [SimConfig::max_simulated_seconds].
    pub fn run_configured(&mut self) -> Result<RunSummary, SimError> {
        self.run(self.config.max_simulated_seconds)
    }

    pub fn run(&mut self, max_simulated_seconds: u64) -> Result<RunSummary, SimError> {
        if self.state != RunState::Idle {
            return Err(SimError::AlreadyRun);
        }
        let horizon = SimTime::from_secs(max_simulated_seconds);
        self.sched.init_clock();

        self.state = RunState::Priming;
        if let Err(err) = self.scenario.prime(&mut self.sched) {
            error!(code = err.code, reason = %err.reason, "priming sim failed");
            self.state = RunState::Finished;
            return Err(err.into());
        }
        debug!(pending = self.sched.pending(), "simulation primed");

        self.state = RunState::Running;
        info!(horizon = %horizon, "simulation started");
        let start = Instant::now();
        let termination = loop {
            match self.sched.next_event_time() {
                None => break Termination::QueueDrained,
                Some(next) if next > horizon => break Termination::HorizonReached,
                Some(_) => {
                    self.sched.pop_and_dispatch(self.scenario.actors_mut());
                }
            }
        };
        let wall_time = start.elapsed();
        let discarded = self.sched.discard_pending();
        self.state = RunState::Finished;

        let summary = RunSummary {
            events_dispatched: self.sched.dispatch_count(),
            final_time: self.sched.now(),
            termination,
            discarded,
            wall_time,
        };
        info!(
            dispatched = summary.events_dispatched,
            final_time = %summary.final_time,
            discarded,
            ?termination,
            "simulation finished"
        );
        Ok(summary)
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.sched
    }

    pub fn scheduler_mut(&mut self) -> &mut Scheduler {
        &mut self.sched
    }

    pub fn scenario(&self) -> &S {
        &self.scenario
    }

    pub fn scenario_mut(&mut self) -> &mut S {
        &mut self.scenario
    }
}
