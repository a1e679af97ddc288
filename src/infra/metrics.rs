//! Per-run pipeline counters and summary reporting
//!
//! A run is single-threaded, so counters are plain integers filled in by the
//! pipeline stages and reported once at the end.

use tracing::info;

/// Counters collected over one pipeline run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Event rows read from the source
    pub rows_in: usize,
    /// Rows written to the output dataset
    pub rows_written: usize,
    /// Rows whose tag had no registry entry
    pub unmatched_tags: usize,
    /// Rows excluded for an unparseable timestamp
    pub skipped_rows: usize,
    /// Exits applied while occupancy was already zero
    pub clamped_exits: usize,
    /// Registry rows ignored as repeats of an earlier tag
    pub duplicate_tags: usize,
    /// Distinct tags in the registry snapshot
    pub registry_tags: usize,
    pub peak_occupancy: u32,
    pub final_occupancy: u32,
}

impl RunSummary {
    /// Fraction of written rows that matched a registry entry
    pub fn match_rate(&self) -> f64 {
        if self.rows_written == 0 {
            return 0.0;
        }
        let matched = self.rows_written.saturating_sub(self.unmatched_tags);
        matched as f64 / self.rows_written as f64
    }

    /// Log summary at INFO level
    pub fn log(&self) {
        info!(
            rows_in = %self.rows_in,
            rows_written = %self.rows_written,
            registry_tags = %self.registry_tags,
            unmatched_tags = %self.unmatched_tags,
            match_rate = format!("{:.3}", self.match_rate()),
            skipped_rows = %self.skipped_rows,
            clamped_exits = %self.clamped_exits,
            duplicate_tags = %self.duplicate_tags,
            peak_occupancy = %self.peak_occupancy,
            final_occupancy = %self.final_occupancy,
            "run_summary"
        );
    }
}
