//! ## qnet-cli
//! **Command-line front end for the queueing-network simulator**
//!
//! `qnet simulate` loads a network description, runs every seed and prints the
//! mean report; `qnet check` only validates the description.

use std::sync::Arc;

use clap::Parser;
use qnet_telemetry::{EventLogger, MetricsRecorder};

mod commands;
mod render;

use commands::{Cli, Commands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    EventLogger::init();
    let metrics = Arc::new(MetricsRecorder::new()?);
    let cli = Cli::parse();

    match cli.command {
        Commands::Simulate(args) => commands::simulate(args, metrics).await,
        Commands::Check(args) => commands::check(args),
    }
}
