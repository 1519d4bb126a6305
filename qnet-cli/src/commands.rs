use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand, ValueEnum};
use qnet_engine::{default_workers, run_simulation_mode, ExecutionMode, RunOptions};
use qnet_telemetry::MetricsRecorder;
use tracing::{debug, info};

use crate::render;

#[derive(Parser)]
#[command(version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run every seed of a network and print the mean report
    Simulate(SimulateArgs),
    /// Validate a network description without simulating it
    Check(CheckArgs),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Yaml,
}

#[derive(Args, Debug, Clone)]
pub struct SimulateArgs {
    /// Network description (`.yaml`/`.yml`, otherwise the line format)
    pub network: PathBuf,
    /// Run seeds concurrently on the blocking pool
    #[arg(long)]
    pub parallel: bool,
    /// Concurrent runs when `--parallel` is set (defaults to the CPU count)
    #[arg(long)]
    pub workers: Option<usize>,
    /// Replace the seeds from the description
    #[arg(long, value_delimiter = ',', allow_negative_numbers = true)]
    pub seeds: Option<Vec<i64>>,
    /// Replace the random-number budget from the description
    #[arg(long)]
    pub budget: Option<u64>,
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
    /// Write the report to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
    /// Also print each seed's report
    #[arg(long)]
    pub per_seed: bool,
    /// Fail unless the mean report's fingerprint equals this hex digest
    #[arg(long)]
    pub validate_hash: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct CheckArgs {
    pub network: PathBuf,
}

pub async fn simulate(args: SimulateArgs, metrics: Arc<MetricsRecorder>) -> anyhow::Result<()> {
    let mode = if args.parallel {
        ExecutionMode::Parallel {
            workers: args.workers.unwrap_or_else(default_workers),
        }
    } else {
        ExecutionMode::Sequential
    };
    let options = RunOptions {
        seeds: args.seeds.clone(),
        random_budget: args.budget,
    };

    let batch = run_simulation_mode(&args.network, mode, options, metrics.clone())
        .await
        .with_context(|| format!("simulating {}", args.network.display()))?;

    let rendered = match args.format {
        OutputFormat::Text => render::text(&batch, args.per_seed),
        OutputFormat::Yaml => render::yaml(&batch, args.per_seed)?,
    };
    match &args.output {
        Some(path) => {
            std::fs::write(path, &rendered)
                .with_context(|| format!("writing report to {}", path.display()))?;
            info!(path = %path.display(), "Report written");
        }
        None => println!("{rendered}"),
    }
    let exposition = metrics.gather_metrics()?;
    debug!(metrics = %exposition, "Batch metrics");

    let fingerprint = batch.mean.fingerprint();
    if let Some(expected) = &args.validate_hash {
        if !expected.eq_ignore_ascii_case(&fingerprint) {
            bail!("report fingerprint mismatch: expected {expected}, got {fingerprint}");
        }
        info!(%fingerprint, "Report fingerprint validated");
    } else {
        info!(%fingerprint, "Report fingerprint");
    }
    Ok(())
}

pub fn check(args: CheckArgs) -> anyhow::Result<()> {
    let definition = qnet_config::load_network(&args.network)
        .with_context(|| format!("checking {}", args.network.display()))?;
    println!(
        "{}: {} stations, {} seeds, random budget {}",
        args.network.display(),
        definition.stations().len(),
        definition.seeds().len(),
        definition.random_budget()
    );
    Ok(())
}
