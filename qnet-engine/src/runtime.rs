//! Simulation runtime - runs every seed of a network, records telemetry and
//! folds the runs into a mean report.
//!
//! Runs are independent: each one owns its engine, node states and RNG. The
//! parallel mode hands one seed to each blocking task but always reduces the
//! results in seed-declaration order, so its mean is bit-identical to the
//! sequential mean.

use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use opentelemetry::KeyValue;
use qnet_core::network::NetworkDefinition;
use qnet_simulator::{BatchReport, SeedRun, SimulationEngine};
use qnet_telemetry::{EventLogger, MetricsRecorder};
use tokio::sync::Semaphore;
use tokio::task::spawn_blocking;
use tracing::{debug, info, instrument};

use crate::error::SimulationError;

/// How the seeds of a batch are executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionMode {
    Sequential,
    /// At most `workers` runs in flight at once.
    Parallel { workers: usize },
}

/// Per-invocation adjustments applied on top of the loaded description.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    pub seeds: Option<Vec<i64>>,
    pub random_budget: Option<u64>,
}

pub fn default_workers() -> usize {
    num_cpus::get()
}

pub struct SimulationRuntime {
    definition: Arc<NetworkDefinition>,
    metrics: Arc<MetricsRecorder>,
}

impl SimulationRuntime {
    pub fn new(definition: NetworkDefinition, metrics: Arc<MetricsRecorder>) -> Self {
        info!(
            stations = definition.stations().len(),
            seeds = definition.seeds().len(),
            budget = definition.random_budget(),
            "Initializing simulation runtime"
        );
        Self {
            definition: Arc::new(definition),
            metrics,
        }
    }

    /// Loads a description from disk and applies `options`.
    pub fn from_path<P: AsRef<Path>>(
        path: P,
        options: RunOptions,
        metrics: Arc<MetricsRecorder>,
    ) -> Result<Self, SimulationError> {
        let mut definition = qnet_config::load_network(path)?;
        if let Some(seeds) = options.seeds {
            definition = definition.with_seeds(seeds)?;
        }
        if let Some(budget) = options.random_budget {
            definition = definition.with_random_budget(budget)?;
        }
        Ok(Self::new(definition, metrics))
    }

    pub fn metrics(&self) -> &MetricsRecorder {
        &self.metrics
    }

    pub async fn run(&self, mode: ExecutionMode) -> Result<BatchReport, SimulationError> {
        match mode {
            ExecutionMode::Sequential => self.run_sequential(),
            ExecutionMode::Parallel { workers } => self.run_parallel(workers).await,
        }
    }

    #[instrument(skip(self))]
    pub fn run_sequential(&self) -> Result<BatchReport, SimulationError> {
        let mut engine = SimulationEngine::new(&self.definition);
        let mut runs = Vec::with_capacity(self.definition.seeds().len());
        for &seed in self.definition.seeds() {
            let started = Instant::now();
            let run = engine.run(seed);
            self.observe(&run, started.elapsed());
            runs.push(run);
        }
        Ok(BatchReport::from_runs(runs)?)
    }

    #[instrument(skip(self))]
    pub async fn run_parallel(&self, workers: usize) -> Result<BatchReport, SimulationError> {
        let permits = Arc::new(Semaphore::new(workers.max(1)));
        let mut handles = Vec::with_capacity(self.definition.seeds().len());

        for &seed in self.definition.seeds() {
            let permit = permits
                .clone()
                .acquire_owned()
                .await
                .map_err(|e| SimulationError::Processing(e.to_string()))?;
            let definition = self.definition.clone();
            debug!(seed, "spawning run");
            handles.push(spawn_blocking(move || {
                let _permit = permit;
                let started = Instant::now();
                let run = SimulationEngine::new(&definition).run(seed);
                (run, started.elapsed())
            }));
        }

        let mut runs = Vec::with_capacity(handles.len());
        for handle in handles {
            let (run, elapsed) = handle.await?;
            self.observe(&run, elapsed);
            runs.push(run);
        }
        Ok(BatchReport::from_runs(runs)?)
    }

    fn observe(&self, run: &SeedRun, elapsed: Duration) {
        let lost: f64 = run.report.queues.iter().map(|q| q.clients_lost).sum();
        self.metrics.record_run(run.events, lost, elapsed);
        EventLogger::log_run(
            run.seed,
            vec![
                KeyValue::new("events", run.events as i64),
                KeyValue::new("total_time", run.report.total_time),
                KeyValue::new("clients_lost", lost),
            ],
        );
    }
}

/// Loads `path`, runs every seed in `mode` and returns the batch.
pub async fn run_simulation_mode<P: AsRef<Path>>(
    path: P,
    mode: ExecutionMode,
    options: RunOptions,
    metrics: Arc<MetricsRecorder>,
) -> Result<BatchReport, SimulationError> {
    let runtime = SimulationRuntime::from_path(path, options, metrics)?;
    let batch = runtime.run(mode).await?;
    info!(
        runs = batch.runs.len(),
        events = batch.total_events(),
        mean_total_time = batch.mean.total_time,
        "Simulation batch complete"
    );
    Ok(batch)
}
