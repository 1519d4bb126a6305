//! ## qnet-telemetry::logging
//! **Structured logging with tracing and OpenTelemetry attributes**
//!
//! `EventLogger::init` installs the global `fmt` subscriber on stderr, leaving
//! stdout to reports. The level comes from `RUST_LOG` and defaults to `info`.

use opentelemetry::KeyValue;
use tracing::info_span;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Clone)]
pub struct EventLogger;

impl EventLogger {
    /// Installs the global subscriber. Later calls are no-ops.
    pub fn init() {
        let _ = fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
            )
            .with_writer(std::io::stderr)
            .with_thread_names(true)
            .with_span_events(FmtSpan::ENTER)
            .try_init();
    }

    /// Emits a run summary inside a `simulation_run` span.
    pub fn log_run(seed: i64, metadata: Vec<KeyValue>) {
        let span = info_span!("simulation_run", seed = seed, otel.kind = "INTERNAL");
        let _entered = span.enter();
        tracing::info!(metadata = ?metadata, "Simulation run completed");
    }
}
