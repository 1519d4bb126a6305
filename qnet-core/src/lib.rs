//! # qnet-core
//!
//! Model layer for the G/G/c/K queueing-network simulator.
//!
//! ### Key Submodules:
//! - `rng`: 48-bit linear congruential generator, the only source of randomness
//! - `node`: per-station state machine (occupancy, times-in-state, losses)
//! - `routing`: probabilistic destination tables and the `Exit` tag
//! - `schedule`: time-ordered event schedule driving the logical clock
//! - `network`: validated, immutable network definitions and their builder
//! - `report`: per-run snapshots and the multi-run aggregator

pub mod error;
pub mod network;
pub mod node;
pub mod report;
pub mod rng;
pub mod routing;
pub mod schedule;

pub mod prelude {
    pub use crate::error::*;
    pub use crate::network::*;
    pub use crate::node::*;
    pub use crate::report::*;
    pub use crate::rng::*;
    pub use crate::routing::*;
    pub use crate::schedule::*;
}

pub use error::ModelError;
