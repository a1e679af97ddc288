//! Occupancy pipeline orchestration
//!
//! Registry join, chronological ordering and the occupancy fold, run
//! strictly in that order over fully loaded inputs. Any stage failure aborts
//! the run before output is written.

use crate::domain::registry::{DuplicateTagPolicy, Registry};
use crate::domain::types::{EnrichedEvent, GateEvent};
use crate::error::Result;
use crate::infra::config::{Config, OutputFormat};
use crate::infra::metrics::RunSummary;
use crate::io::egress::Egress;
use crate::io::{load_events, load_registry};
use crate::services::join::join_registry;
use crate::services::occupancy::fold_occupancy;
use crate::services::ordering::{order_chronologically, InvalidTimestampPolicy};
use std::path::Path;

/// Policies applied to one run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PipelineOptions {
    pub invalid_timestamps: InvalidTimestampPolicy,
    pub duplicate_tags: DuplicateTagPolicy,
    pub output_format: OutputFormat,
}

impl PipelineOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            invalid_timestamps: config.invalid_timestamps(),
            duplicate_tags: config.duplicate_tags(),
            output_format: config.output_format(),
        }
    }
}

/// In-memory pipeline result
#[derive(Debug, Clone)]
pub struct PipelineRun {
    pub events: Vec<EnrichedEvent>,
    pub summary: RunSummary,
}

/// Join, order and fold in memory
///
/// `summary.rows_written` is left at zero; it is filled in once the events
/// reach storage.
pub fn run_in_memory(
    registry: &Registry,
    events: Vec<GateEvent>,
    invalid_timestamps: InvalidTimestampPolicy,
) -> Result<PipelineRun> {
    let rows_in = events.len();

    let joined = join_registry(registry, events);
    let order = order_chronologically(joined, invalid_timestamps)?;
    let outcome = fold_occupancy(order.events)?;

    // Counted after ordering so skipped rows are not reported twice
    let unmatched_tags = outcome.events.iter().filter(|e| e.vehicle_id.is_none()).count();

    let summary = RunSummary {
        rows_in,
        rows_written: 0,
        unmatched_tags,
        skipped_rows: order.skipped,
        clamped_exits: outcome.counter.clamped_exits(),
        duplicate_tags: registry.duplicates(),
        registry_tags: registry.len(),
        peak_occupancy: outcome.counter.peak(),
        final_occupancy: outcome.counter.current(),
    };

    Ok(PipelineRun { events: outcome.events, summary })
}

/// Run the pipeline in memory and write the result to `output_path`
pub fn run_and_write(
    registry: &Registry,
    events: Vec<GateEvent>,
    output_path: &Path,
    options: &PipelineOptions,
) -> Result<RunSummary> {
    let run = run_in_memory(registry, events, options.invalid_timestamps)?;

    let egress = Egress::new(output_path, options.output_format);
    let rows_written = egress.write_events(&run.events)?;

    let summary = RunSummary { rows_written, ..run.summary };
    summary.log();
    Ok(summary)
}

/// Load registry and events from storage, run the pipeline, write the result
pub fn run_pipeline(
    registry_path: &Path,
    events_path: &Path,
    output_path: &Path,
    options: &PipelineOptions,
) -> Result<RunSummary> {
    let registry = load_registry(registry_path, options.duplicate_tags)?;
    let events = load_events(events_path)?;
    run_and_write(&registry, events, output_path, options)
}
