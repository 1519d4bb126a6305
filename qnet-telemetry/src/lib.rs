//! # qnet Telemetry
//!
//! Logging and metrics for simulation batches.

pub mod logging;
pub mod metrics;

pub use logging::EventLogger;
pub use metrics::MetricsRecorder;
