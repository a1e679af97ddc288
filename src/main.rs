//! Parking occupancy - running facility occupancy from RFID gate events
//!
//! Joins gate events with the tag registry, orders them chronologically and
//! writes one row per event annotated with vehicle identity and occupancy.
//!
//! Module structure:
//! - `domain/` - Record types (GateEvent, EnrichedEvent, Registry)
//! - `io/` - CSV/JSONL storage
//! - `services/` - Pipeline stages, simulator, vision hook
//! - `infra/` - Config and run summary

use anyhow::Context;
use clap::Parser;
use parking_occupancy::infra::Config;
use parking_occupancy::services::{run_pipeline, InvalidTimestampPolicy, PipelineOptions};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::fmt::time::UtcTime;
use tracing_subscriber::EnvFilter;

const VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), " (", env!("GIT_HASH"), ")");

/// Merge RFID gate events with the tag registry and compute occupancy
#[derive(Parser, Debug)]
#[command(name = "parking-occupancy", version = VERSION, about)]
struct Args {
    /// Path to the registry CSV file (tag_id,vehicle_id)
    #[arg(long)]
    registry: PathBuf,

    /// Path to the gate events CSV file (timestamp,tag_id,event)
    #[arg(long)]
    events: PathBuf,

    /// Path to write the output dataset
    ///
    /// Defaults to <data_dir>/<output_file> from the config (data/occupancy.csv).
    #[arg(long)]
    output: Option<PathBuf>,

    /// Path to TOML configuration file
    ///
    /// Falls back to CONFIG_FILE, then config/dev.toml, then built-in defaults.
    #[arg(short, long)]
    config: Option<String>,

    /// Drop rows with unparseable timestamps (logged) instead of failing the run
    #[arg(long)]
    skip_invalid_timestamps: bool,
}

fn main() -> anyhow::Result<()> {
    // Logs go to stderr; stdout carries only the result line
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_timer(UtcTime::rfc_3339())
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    info!(version = VERSION, "parking_occupancy_starting");

    let config = Config::load(args.config.as_deref());

    let mut options = PipelineOptions::from_config(&config);
    if args.skip_invalid_timestamps {
        options.invalid_timestamps = InvalidTimestampPolicy::Skip;
    }
    let output = args.output.unwrap_or_else(|| config.default_output_path());

    info!(
        config_file = %config.config_file(),
        registry = %args.registry.display(),
        events = %args.events.display(),
        output = %output.display(),
        invalid_timestamps = %options.invalid_timestamps.as_str(),
        duplicate_tags = %options.duplicate_tags.as_str(),
        output_format = %options.output_format.as_str(),
        "config_loaded"
    );

    let summary = run_pipeline(&args.registry, &args.events, &output, &options)
        .with_context(|| format!("occupancy run failed for events {}", args.events.display()))?;

    println!("Wrote occupancy data with {} rows to {}", summary.rows_written, output.display());
    Ok(())
}
