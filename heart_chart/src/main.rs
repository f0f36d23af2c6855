//! # Heart Chart Replay Binary
//!
//! Drives one heart-cycle chart through a recorded tick trace, the way a
//! simulation host would, and prints a JSON summary of the run.
//!
//! # Usage
//!
//! ```bash
//! # Replay a trace with default chart options
//! heart_chart --trace demos/pacing_cycle.toml
//!
//! # Resume from the configured snapshot, replay, and save again
//! heart_chart --config config/heart_chart.toml --trace demos/pacing_cycle.toml --resume --save
//!
//! # Verbose JSON logs, per-tick records in the summary
//! heart_chart --trace demos/pacing_cycle.toml -v --json --ticks
//! ```

#![deny(warnings)]

use std::path::PathBuf;

use clap::Parser;
use heart_chart::config::AppConfig;
use heart_chart::driver::StepDriver;
use heart_chart::error::ChartError;
use heart_chart::snapshot::persist::SnapshotStore;
use heart_chart::trace::{self, TickTrace};
use heart_common::config::ConfigError;
use tracing::{error, info, warn, Level};
use tracing_subscriber::EnvFilter;

/// Heart Chart - replay host tick traces through the cardiac-cycle chart
#[derive(Parser, Debug)]
#[command(name = "heart_chart")]
#[command(version)]
#[command(about = "Replay host tick traces through the cardiac-cycle chart")]
#[command(long_about = None)]
struct Args {
    /// Path to the configuration file. Defaults apply when omitted.
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Tick trace to replay.
    #[arg(short, long, value_name = "FILE")]
    trace: PathBuf,

    /// Restore the chart from the configured snapshot before replaying.
    #[arg(long)]
    resume: bool,

    /// Save a snapshot to the configured path after replaying.
    #[arg(long)]
    save: bool,

    /// Include per-tick records in the printed summary.
    #[arg(long)]
    ticks: bool,

    /// Enable verbose logging (DEBUG level).
    #[arg(short, long)]
    verbose: bool,

    /// Output logs in JSON format.
    #[arg(long)]
    json: bool,
}

fn main() {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => match AppConfig::load_validated(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("heart_chart: {e}");
                std::process::exit(1);
            }
        },
        None => AppConfig::default(),
    };

    setup_tracing(&args, &config);
    info!(
        service = %config.shared.service_name,
        "Heart Chart v{} starting...",
        env!("CARGO_PKG_VERSION")
    );

    if let Err(e) = run(&args, config) {
        error!("FATAL: {e}");
        std::process::exit(1);
    }
}

fn run(args: &Args, config: AppConfig) -> Result<(), ChartError> {
    let store = config.driver.snapshot_path.as_ref().map(SnapshotStore::new);
    if (args.resume || args.save) && store.is_none() {
        return Err(ConfigError::ValidationError(
            "--resume/--save need driver.snapshot_path in the configuration".to_string(),
        )
        .into());
    }

    let trace = TickTrace::load(&args.trace)?;
    info!("Loaded {} ticks from {:?}", trace.len(), args.trace);

    let mut driver = StepDriver::new(config.chart.clone());
    driver.initialize();

    if let (true, Some(store)) = (args.resume, &store) {
        match store.load()? {
            Some(snapshot) => driver.restore(&snapshot)?,
            None => warn!("No snapshot at {:?}, starting fresh", store.path()),
        }
    }

    let mut summary = trace::replay(&mut driver, &trace);
    if !args.ticks {
        summary.records.clear();
    }

    if let (true, Some(store)) = (args.save, &store) {
        store.save(&driver.snapshot())?;
    }

    driver.terminate();

    match serde_json::to_string_pretty(&summary) {
        Ok(json) => println!("{json}"),
        Err(e) => error!("Failed to render summary: {e}"),
    }
    Ok(())
}

/// Setup tracing subscriber from CLI arguments and the configured log level.
fn setup_tracing(args: &Args, config: &AppConfig) {
    let filter = if args.verbose {
        EnvFilter::from_default_env().add_directive(Level::DEBUG.into())
    } else {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(config.shared.log_level.as_directive()))
    };

    if args.json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }
}
