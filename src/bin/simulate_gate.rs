//! Simulate Gate - synthetic registry and gate event generator
//!
//! Writes a tag registry and a time-sorted entry/exit event log in the CSV
//! formats `parking-occupancy` reads.
//!
//! Usage:
//!   simulate-gate --tags 50 --duration 120 --seed 42
//!   simulate-gate --output data/events.csv --registry-output data/registry.csv

use anyhow::Context;
use chrono::Utc;
use clap::Parser;
use parking_occupancy::infra::Config;
use parking_occupancy::io::{write_events, write_registry};
use parking_occupancy::services::simulator::{generate_registry, simulate_events};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::fmt::time::UtcTime;
use tracing_subscriber::EnvFilter;

const VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), " (", env!("GIT_HASH"), ")");

/// Simulate RFID gate events for a parking facility
#[derive(Parser, Debug)]
#[command(name = "simulate-gate", version = VERSION, about, long_about = None)]
struct Args {
    /// Simulation duration in minutes [config default: 120]
    #[arg(long)]
    duration: Option<u32>,

    /// Number of unique tags to simulate [config default: 50]
    #[arg(long)]
    tags: Option<usize>,

    /// Path to write the events CSV [default: <data_dir>/events.csv]
    #[arg(long)]
    output: Option<PathBuf>,

    /// Path to write the registry CSV [default: <data_dir>/registry.csv]
    #[arg(long, alias = "registry_output")]
    registry_output: Option<PathBuf>,

    /// Random seed for reproducible datasets
    #[arg(long)]
    seed: Option<u64>,

    /// Path to TOML configuration file
    #[arg(short, long)]
    config: Option<String>,
}

fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_timer(UtcTime::rfc_3339())
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = Config::load(args.config.as_deref());

    let tags = args.tags.unwrap_or_else(|| config.sim_tags());
    let duration = args.duration.unwrap_or_else(|| config.sim_duration_minutes());
    let seed = args.seed.or_else(|| config.sim_seed());
    let events_path = args.output.unwrap_or_else(|| config.default_events_path());
    let registry_path = args.registry_output.unwrap_or_else(|| config.default_registry_path());

    info!(
        version = VERSION,
        config_file = %config.config_file(),
        tags = tags,
        duration_minutes = duration,
        seed = ?seed,
        "simulation_starting"
    );

    let registry = generate_registry(tags, seed);
    write_registry(&registry, &registry_path)
        .with_context(|| format!("failed to write registry {}", registry_path.display()))?;

    let events = simulate_events(tags, duration, seed, Utc::now());
    write_events(&events, &events_path)
        .with_context(|| format!("failed to write events {}", events_path.display()))?;

    println!("Generated registry with {} tags and {} events.", registry.len(), events.len());
    Ok(())
}
