/*!
# qnet Simulator

Deterministic discrete-event simulation of G/G/c/K queueing networks.

## Key Components:
- **Virtual Clock:** Logical simulation time, advanced event by event.
- **Simulation Engine:** One run per seed, driven by the event schedule and
  bounded by the random-number budget.
- **Simulator:** Runs every seed of a network definition in declaration order
  and folds the per-seed reports into a mean report.
*/

use qnet_core::network::NetworkDefinition;
use qnet_core::report::SimulationReport;
use qnet_core::ModelError;
use tracing::info;

pub mod engine;
pub mod virtual_clock;

pub use engine::{SeedRun, SimulationEngine};
pub use virtual_clock::VirtualClock;

/// Per-seed runs together with their mean.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchReport {
    pub runs: Vec<SeedRun>,
    pub mean: SimulationReport,
}

impl BatchReport {
    /// Averages `runs` in the order given. Callers that need bit-identical
    /// means must pass the runs in seed-declaration order.
    pub fn from_runs(runs: Vec<SeedRun>) -> Result<Self, ModelError> {
        let reports: Vec<SimulationReport> = runs.iter().map(|r| r.report.clone()).collect();
        let mean = SimulationReport::mean_of(&reports)?;
        Ok(Self { runs, mean })
    }

    pub fn total_events(&self) -> u64 {
        self.runs.iter().map(|r| r.events).sum()
    }
}

/// Sequential multi-seed driver around a single reusable engine.
pub struct Simulator {
    engine: SimulationEngine,
    seeds: Vec<i64>,
}

impl Simulator {
    pub fn new(definition: &NetworkDefinition) -> Self {
        Self {
            engine: SimulationEngine::new(definition),
            seeds: definition.seeds().to_vec(),
        }
    }

    /// Runs every configured seed and returns the per-seed and mean reports.
    pub fn run_all(&mut self) -> Result<BatchReport, ModelError> {
        let mut runs = Vec::with_capacity(self.seeds.len());
        for &seed in &self.seeds {
            let run = self.engine.run(seed);
            info!(seed, events = run.events, total_time = run.report.total_time, "seed complete");
            runs.push(run);
        }
        BatchReport::from_runs(runs)
    }
}
