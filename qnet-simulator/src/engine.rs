//! Discrete-event engine executing one run per seed.
//!
//! The engine owns a fresh set of [`QueueNode`]s built from a
//! [`NetworkDefinition`]. Each call to [`SimulationEngine::run`] seeds a new
//! [`Lcg48`], replays the first arrivals and processes events until the
//! random-number budget is spent, then snapshots a report and resets every
//! node so the engine can be reused for the next seed.
//!
//! Budget accounting: an arrival costs one draw for the next inter-arrival
//! time; every scheduled departure costs one draw for the service time plus
//! one more when the station routes to more than one destination. The budget
//! is checked before each event, so the event that exhausts it is always
//! processed in full.

use qnet_core::network::{FirstArrival, NetworkDefinition};
use qnet_core::node::{QueueNode, TimeRange};
use qnet_core::report::{QueueReport, SimulationReport};
use qnet_core::rng::Lcg48;
use qnet_core::routing::{Destination, NodeId};
use qnet_core::schedule::{Event, EventSchedule};
use tracing::{debug, trace, warn};

use crate::virtual_clock::VirtualClock;

/// Result of a single seeded run.
#[derive(Debug, Clone, PartialEq)]
pub struct SeedRun {
    pub seed: i64,
    /// Number of events popped from the schedule.
    pub events: u64,
    pub report: SimulationReport,
}

pub struct SimulationEngine {
    nodes: Vec<QueueNode>,
    first_arrivals: Vec<FirstArrival>,
    budget: u64,
    schedule: EventSchedule,
    clock: VirtualClock,
}

impl SimulationEngine {
    pub fn new(definition: &NetworkDefinition) -> Self {
        Self {
            nodes: definition
                .stations()
                .iter()
                .cloned()
                .map(QueueNode::new)
                .collect(),
            first_arrivals: definition.first_arrivals().to_vec(),
            budget: definition.random_budget(),
            schedule: EventSchedule::new(),
            clock: VirtualClock::new(),
        }
    }

    pub fn nodes(&self) -> &[QueueNode] {
        &self.nodes
    }

    pub fn run(&mut self, seed: i64) -> SeedRun {
        // Negative seeds keep their two's-complement bits.
        let mut rng = Lcg48::new(seed as u64);
        let mut remaining = self.budget;
        let mut events = 0u64;

        for arrival in &self.first_arrivals {
            self.schedule
                .schedule(arrival.time, Event::Arrival { node: arrival.node });
        }
        debug!(seed, budget = remaining, "starting run");

        while remaining > 0 {
            let Some(next) = self.schedule.pop_earliest() else {
                warn!(seed, remaining, "event schedule drained before the random budget");
                break;
            };

            let delta = self.clock.advance_to(next.time());
            for node in &mut self.nodes {
                node.accumulate(delta);
            }
            events += 1;
            let now = self.clock.now();
            trace!(time = now, event = ?next.event(), remaining, "processing event");

            let used = match next.event() {
                Event::Arrival { node } => self.on_arrival(node, now, &mut rng),
                Event::Passage {
                    origin,
                    destination,
                } => self.on_passage(origin, destination, now, &mut rng),
                Event::Departure { origin } => self.on_departure(origin, now, &mut rng),
            };
            remaining = remaining.saturating_sub(used);
        }

        let report = self.snapshot();
        debug!(
            seed,
            events,
            total_time = report.total_time,
            "run finished"
        );
        self.reset();

        SeedRun {
            seed,
            events,
            report,
        }
    }

    fn on_arrival(&mut self, node: NodeId, now: f64, rng: &mut Lcg48) -> u64 {
        self.admit(node, now, rng) + self.schedule_arrival(node, now, rng)
    }

    fn on_passage(&mut self, origin: NodeId, destination: NodeId, now: f64, rng: &mut Lcg48) -> u64 {
        self.release(origin, now, rng) + self.admit(destination, now, rng)
    }

    fn on_departure(&mut self, origin: NodeId, now: f64, rng: &mut Lcg48) -> u64 {
        self.release(origin, now, rng)
    }

    /// Lets a client into `node`, or counts it as lost when the node is full.
    fn admit(&mut self, node: NodeId, now: f64, rng: &mut Lcg48) -> u64 {
        let station = &mut self.nodes[node.index()];
        if station.is_full() {
            station.record_loss();
            return 0;
        }
        station.add_client();
        if station.can_serve_on_arrival() {
            self.schedule_departure(node, now, rng)
        } else {
            0
        }
    }

    /// Removes the served client from `node` and starts serving the next one.
    fn release(&mut self, node: NodeId, now: f64, rng: &mut Lcg48) -> u64 {
        let station = &mut self.nodes[node.index()];
        station.remove_client();
        if station.can_serve_on_departure() {
            self.schedule_departure(node, now, rng)
        } else {
            0
        }
    }

    fn schedule_arrival(&mut self, node: NodeId, now: f64, rng: &mut Lcg48) -> u64 {
        let station = &self.nodes[node.index()];
        let Some(range) = station.spec().arrival else {
            warn!(station = station.name(), "arrival at a station without arrival range");
            return 0;
        };
        let time = draw_time(now, range, rng);
        self.schedule.schedule(time, Event::Arrival { node });
        1
    }

    fn schedule_departure(&mut self, origin: NodeId, now: f64, rng: &mut Lcg48) -> u64 {
        let spec = self.nodes[origin.index()].spec();
        let time = draw_time(now, spec.service, rng);
        let event = match spec.routing.choose(rng) {
            Destination::Exit => Event::Departure { origin },
            Destination::Node(destination) => Event::Passage {
                origin,
                destination,
            },
        };
        let draws = 1 + spec.routing.draws_per_choice();
        self.schedule.schedule(time, event);
        draws
    }

    fn snapshot(&self) -> SimulationReport {
        SimulationReport {
            queues: self
                .nodes
                .iter()
                .map(|node| QueueReport {
                    id: node.name().to_string(),
                    times_in_state: node.times_in_state().to_vec(),
                    clients_lost: node.lost() as f64,
                })
                .collect(),
            total_time: self.clock.now(),
        }
    }

    fn reset(&mut self) {
        for node in &mut self.nodes {
            node.reset();
        }
        self.schedule.clear();
        self.clock.reset();
    }
}

/// Absolute time of an event `range` after `now`; one draw.
#[inline]
fn draw_time(now: f64, range: TimeRange, rng: &mut Lcg48) -> f64 {
    now + (range.max - range.min) * rng.next_f64() + range.min
}
