//! # qnet Engine
//!
//! Coordinates a simulation batch: loading the network description, running
//! each seed sequentially or on tokio's blocking pool, recording telemetry and
//! producing the mean report.

pub mod error;
pub mod runtime;

pub use error::SimulationError;
pub use runtime::{
    default_workers, run_simulation_mode, ExecutionMode, RunOptions, SimulationRuntime,
};
