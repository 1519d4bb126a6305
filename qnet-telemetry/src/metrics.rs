//! ## qnet-telemetry::metrics
//! **Prometheus counters and histograms for simulation batches**
//!
//! Durations are wall-clock measurements of how long a run took to compute;
//! they never influence simulated time.

use std::time::Duration;

use prometheus::{Counter, Histogram, HistogramOpts, IntCounter, Registry};

#[derive(Debug, Clone)]
pub struct MetricsRecorder {
    pub registry: Registry,
    pub runs: IntCounter,
    pub events: IntCounter,
    pub clients_lost: Counter,
    pub run_duration: Histogram,
}

impl MetricsRecorder {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();
        let runs = IntCounter::new("qnet_runs_total", "Completed simulation runs")?;
        let events = IntCounter::new("qnet_events_total", "Events processed across all runs")?;
        let clients_lost = Counter::new(
            "qnet_clients_lost_total",
            "Clients turned away by full stations across all runs",
        )?;
        let run_duration = Histogram::with_opts(
            HistogramOpts::new(
                "qnet_run_duration_seconds",
                "Wall-clock time spent computing one run",
            )
            .buckets(vec![0.001, 0.01, 0.1, 1.0, 10.0]),
        )?;

        registry.register(Box::new(runs.clone()))?;
        registry.register(Box::new(events.clone()))?;
        registry.register(Box::new(clients_lost.clone()))?;
        registry.register(Box::new(run_duration.clone()))?;

        Ok(Self {
            registry,
            runs,
            events,
            clients_lost,
            run_duration,
        })
    }

    pub fn record_run(&self, events: u64, clients_lost: f64, elapsed: Duration) {
        self.runs.inc();
        self.events.inc_by(events);
        self.clients_lost.inc_by(clients_lost);
        self.run_duration.observe(elapsed.as_secs_f64());
    }

    pub fn gather_metrics(&self) -> Result<String, prometheus::Error> {
        use prometheus::Encoder;
        let encoder = prometheus::TextEncoder::new();
        let mut buffer = Vec::<u8>::new();
        encoder.encode(&self.registry.gather(), &mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_run_updates_counters() {
        let metrics = MetricsRecorder::new().unwrap();
        metrics.record_run(100, 3.0, Duration::from_millis(5));
        metrics.record_run(50, 0.0, Duration::from_millis(2));

        assert_eq!(metrics.runs.get(), 2);
        assert_eq!(metrics.events.get(), 150);
        assert_eq!(metrics.clients_lost.get(), 3.0);
        assert_eq!(metrics.run_duration.get_sample_count(), 2);

        let text = metrics.gather_metrics().unwrap();
        assert!(text.contains("qnet_runs_total 2"));
        assert!(text.contains("qnet_run_duration_seconds_bucket"));
    }
}
