//! Simulate a small population going through daily routines and print the
//! hourly event histogram.
//!
//! Run with: RUST_LOG=info cargo run -p sim_engine --example daily_routine

use sim_engine::actor::{Actor, ActorArena, Dispatch};
use sim_engine::config::SimConfig;
use sim_engine::error::PrimeError;
use sim_engine::event::EventKind;
use sim_engine::scheduler::Scheduler;
use sim_engine::simulation::{Scenario, Simulation};
use sim_engine::time::{minutes_hhmm, SimDuration, SimTime};
use tracing_subscriber::EnvFilter;

const WAKE: EventKind = EventKind(0);
const EAT: EventKind = EventKind(1);
const WORK: EventKind = EventKind(2);
const RELAX: EventKind = EventKind(3);
const SLEEP: EventKind = EventKind(4);

const KINDS: [(EventKind, &str); 5] = [
    (WAKE, "wake"),
    (EAT, "eat"),
    (WORK, "work"),
    (RELAX, "relax"),
    (SLEEP, "sleep"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Sleeping,
    Awake,
    Eating,
    Working,
    Relaxing,
    Dead,
}

impl State {
    /// Calories burned per hour spent in this state.
    fn burn_per_hour(self) -> i64 {
        match self {
            State::Sleeping => 60,
            State::Awake | State::Relaxing => 90,
            State::Eating => 70,
            State::Working => 140,
            State::Dead => 0,
        }
    }
}

#[derive(Debug)]
struct Person {
    age_years: i64,
    weight_lbs: i64,
    /// Calories in reserve.
    energy: i64,
    state: State,
    prev: State,
    meals: u32,
}

impl Person {
    fn new(sched: &mut Scheduler) -> Self {
        let weight_lbs = sched.rng().uniform_int(90, 220);
        Self {
            age_years: sched.rng().uniform_int(20, 90),
            weight_lbs,
            energy: 2 * weight_lbs * 13,
            state: State::Sleeping,
            prev: State::Sleeping,
            meals: 0,
        }
    }

    fn enter(&mut self, state: State) {
        self.prev = self.state;
        self.state = state;
    }
}

impl Actor for Person {
    fn on_event(&mut self, sched: &mut Scheduler, dispatch: Dispatch) {
        if self.state == State::Dead {
            return;
        }
        let waited = sched.now().duration_since(dispatch.birth_time);
        let hours = waited.as_secs() as i64 / 3600;
        self.energy -= self.state.burn_per_hour() * hours;
        // Older people burn a little more between events.
        self.energy -= self.age_years / 10;

        if self.energy <= 0 {
            self.enter(State::Dead);
            sched.time_table().remove_actor(dispatch.actor);
            tracing::info!(person = %dispatch.actor, at = %sched.now(), "person died");
            return;
        }

        match dispatch.kind {
            WAKE => {
                self.enter(State::Awake);
                sched.push(SimDuration::from_hours(1), dispatch.actor, WORK);
            }
            EAT => {
                // A meal interrupts work; pick it back up afterwards.
                let resume = if self.state == State::Working {
                    WORK
                } else {
                    RELAX
                };
                self.enter(State::Eating);
                self.meals += 1;
                self.energy += 8 * self.weight_lbs;
                sched.push(SimDuration::from_mins(45), dispatch.actor, resume);
            }
            WORK => {
                if self.state == State::Sleeping {
                    return;
                }
                let shift = if self.prev == State::Eating { 4 } else { 8 };
                self.enter(State::Working);
                sched.push(SimDuration::from_hours(shift), dispatch.actor, RELAX);
            }
            RELAX => {
                if self.state != State::Sleeping {
                    self.enter(State::Relaxing);
                }
            }
            SLEEP => self.enter(State::Sleeping),
            other => panic!("person received unknown event kind {other:?}"),
        }
    }
}

struct Town {
    people: ActorArena<Person>,
    population: usize,
}

impl Scenario for Town {
    type Actor = Person;

    fn prime(&mut self, sched: &mut Scheduler) -> Result<(), PrimeError> {
        if self.population == 0 {
            return Err(PrimeError::new(1, "town has no population"));
        }
        for _ in 0..self.population {
            let person = Person::new(sched);
            let id = self.people.spawn(person);
            let wake_minute = sched.rng().uniform_int(4 * 60, 8 * 60) as u32;
            let mut table = sched.time_table();
            table.add_event(id, wake_minute, WAKE);
            table.add_event(id, minutes_hhmm(12, 30), EAT);
            table.add_event(id, minutes_hhmm(19, 0), EAT);
            table.add_event(id, minutes_hhmm(22, 30), SLEEP);
        }
        Ok(())
    }

    fn actors_mut(&mut self) -> &mut ActorArena<Person> {
        &mut self.people
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn,daily_routine=info")),
        )
        .init();

    const POPULATION: usize = 100;
    const DAYS: u64 = 7;

    let config = SimConfig::default()
        .with_seed(123)
        .with_slot_width_minutes(10)
        .with_stats_bucket_minutes(60)
        .with_max_simulated_hours(DAYS * 24);

    let town = Town {
        people: ActorArena::new(),
        population: POPULATION,
    };
    let mut sim = match Simulation::new(config, town) {
        Ok(sim) => sim,
        Err(err) => {
            eprintln!("invalid config: {err}");
            std::process::exit(2);
        }
    };

    let summary = match sim.run_configured() {
        Ok(summary) => summary,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(err.exit_code());
        }
    };
    let horizon = SimTime::from_secs(sim.config().max_simulated_seconds);
    sim.scheduler_mut().stats_mut().seal_through(horizon);

    println!("--- Daily routine ({POPULATION} people, {DAYS} days, seed 123) ---");
    println!("Events dispatched: {}", summary.events_dispatched);
    println!("Final time: {}", summary.final_time);
    println!("Termination: {:?} ({} discarded)", summary.termination, summary.discarded);
    println!("Throughput: {:.0} events/sec", summary.events_per_second());

    let people = &sim.scenario().people;
    let alive = people.iter().filter(|(_, p)| p.state != State::Dead).count();
    let meals: u32 = people.iter().map(|(_, p)| p.meals).sum();
    println!("Alive: {alive}/{POPULATION}, meals eaten: {meals}");

    let stats = sim.scheduler().stats();
    let series: serde_json::Map<String, serde_json::Value> = KINDS
        .iter()
        .map(|(kind, name)| (name.to_string(), serde_json::json!(stats.series_for(*kind))))
        .collect();
    match serde_json::to_string_pretty(&series) {
        Ok(json) => println!("\nHourly events by kind:\n{json}"),
        Err(err) => eprintln!("failed to encode series: {err}"),
    }
}
