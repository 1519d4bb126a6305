//! ## qnet-core::node
//! **Per-station state machine**
//!
//! A [`QueueNode`] pairs the immutable [`StationSpec`] of a station with the
//! runtime state of the run in progress: occupancy, cumulative time spent at
//! each occupancy level, and the number of clients turned away.
//!
//! The times-in-state vector is indexed by occupancy. It starts as `[0.0]`,
//! grows by one slot the first time a new level is reached and never shrinks
//! within a run, so the current occupancy is always a valid index.

use std::fmt;

use crate::routing::RoutingTable;

/// Maximum number of clients a station holds (waiting plus in service).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capacity {
    Finite(usize),
    Unbounded,
}

impl Capacity {
    #[inline]
    pub fn admits(self, occupancy: usize) -> bool {
        match self {
            Capacity::Finite(k) => occupancy < k,
            Capacity::Unbounded => true,
        }
    }
}

impl fmt::Display for Capacity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Capacity::Finite(k) => write!(f, "{k}"),
            Capacity::Unbounded => f.write_str("inf"),
        }
    }
}

/// Closed interval `[min, max]` a uniform time offset is drawn from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeRange {
    pub min: f64,
    pub max: f64,
}

impl TimeRange {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn is_valid(&self) -> bool {
        self.min.is_finite() && self.max.is_finite() && self.min >= 0.0 && self.min <= self.max
    }
}

/// Static description of a station, shared by every run.
#[derive(Debug, Clone, PartialEq)]
pub struct StationSpec {
    pub name: String,
    pub servers: u32,
    pub capacity: Capacity,
    /// External inter-arrival range; only stations fed from outside need one.
    pub arrival: Option<TimeRange>,
    pub service: TimeRange,
    pub routing: RoutingTable,
}

#[derive(Debug, Clone)]
pub struct QueueNode {
    spec: StationSpec,
    occupancy: usize,
    times_in_state: Vec<f64>,
    lost: u64,
}

impl QueueNode {
    pub fn new(spec: StationSpec) -> Self {
        Self {
            spec,
            occupancy: 0,
            times_in_state: vec![0.0],
            lost: 0,
        }
    }

    pub fn spec(&self) -> &StationSpec {
        &self.spec
    }

    pub fn name(&self) -> &str {
        &self.spec.name
    }

    pub fn occupancy(&self) -> usize {
        self.occupancy
    }

    pub fn times_in_state(&self) -> &[f64] {
        &self.times_in_state
    }

    pub fn lost(&self) -> u64 {
        self.lost
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        !self.spec.capacity.admits(self.occupancy)
    }

    /// A client that just arrived can start service right away.
    #[inline]
    pub fn can_serve_on_arrival(&self) -> bool {
        self.occupancy <= self.spec.servers as usize
    }

    /// After a departure, a waiting client can start service.
    #[inline]
    pub fn can_serve_on_departure(&self) -> bool {
        self.occupancy >= self.spec.servers as usize
    }

    pub fn add_client(&mut self) {
        self.occupancy += 1;
        if self.times_in_state.len() <= self.occupancy {
            self.times_in_state.push(0.0);
        }
    }

    pub fn remove_client(&mut self) {
        debug_assert!(self.occupancy > 0, "{} removed a client while empty", self.spec.name);
        self.occupancy = self.occupancy.saturating_sub(1);
    }

    /// Credits `delta` to the current occupancy level. Called before the
    /// event that changes the occupancy is applied.
    #[inline]
    pub fn accumulate(&mut self, delta: f64) {
        self.times_in_state[self.occupancy] += delta;
    }

    pub fn record_loss(&mut self) {
        self.lost += 1;
    }

    pub fn reset(&mut self) {
        self.occupancy = 0;
        self.times_in_state.clear();
        self.times_in_state.push(0.0);
        self.lost = 0;
    }
}
