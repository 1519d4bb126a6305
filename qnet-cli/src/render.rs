//! Human-readable and YAML renderings of a batch.

use std::fmt::Write;

use qnet_core::report::SimulationReport;
use qnet_simulator::BatchReport;
use serde::Serialize;

const SEPARATOR: &str = "---------------------------";

#[derive(Serialize)]
struct RunView<'a> {
    seed: i64,
    events: u64,
    report: &'a SimulationReport,
}

#[derive(Serialize)]
struct BatchView<'a> {
    runs: usize,
    fingerprint: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    per_seed: Vec<RunView<'a>>,
    mean: &'a SimulationReport,
}

pub fn report_text(report: &SimulationReport) -> String {
    let mut out = String::new();
    for (i, queue) in report.queues.iter().enumerate() {
        let _ = writeln!(out, "Queue {}:", queue.id);
        for (state, time) in queue.times_in_state.iter().enumerate() {
            let probability = report.probability(i, state).unwrap_or(0.0) * 100.0;
            let _ = writeln!(
                out,
                "State: {state}  time: {time:.2}  probability: {probability:.2}%"
            );
        }
        let _ = writeln!(out, "Clients Lost: {:.2}", queue.clients_lost);
        let _ = writeln!(out, "{SEPARATOR}");
    }
    let _ = write!(out, "Total simulation time: {:.2}", report.total_time);
    out
}

pub fn text(batch: &BatchReport, per_seed: bool) -> String {
    let mut out = String::new();
    if per_seed {
        for run in &batch.runs {
            let _ = writeln!(out, "Seed {} ({} events):", run.seed, run.events);
            let _ = writeln!(out, "{}\n", report_text(&run.report));
        }
    }
    let _ = writeln!(
        out,
        "Printing average results of {} simulations:",
        batch.runs.len()
    );
    out.push_str(&report_text(&batch.mean));
    out
}

pub fn yaml(batch: &BatchReport, per_seed: bool) -> Result<String, serde_yaml::Error> {
    let view = BatchView {
        runs: batch.runs.len(),
        fingerprint: batch.mean.fingerprint(),
        per_seed: if per_seed {
            batch
                .runs
                .iter()
                .map(|r| RunView {
                    seed: r.seed,
                    events: r.events,
                    report: &r.report,
                })
                .collect()
        } else {
            Vec::new()
        },
        mean: &batch.mean,
    };
    serde_yaml::to_string(&view)
}
