//! Services - the occupancy pipeline and its collaborators
//!
//! This module contains the core business logic:
//! - `join` - Left join of gate events against the tag registry
//! - `ordering` - Stable chronological ordering with timestamp validation
//! - `occupancy` - Running occupancy fold
//! - `pipeline` - Orchestrates join -> order -> fold -> egress
//! - `simulator` - Synthetic registry and gate event generation
//! - `vision` - Optional camera-based occupancy estimator hook

pub mod join;
pub mod occupancy;
pub mod ordering;
pub mod pipeline;
pub mod simulator;
pub mod vision;

// Re-export commonly used types
pub use ordering::InvalidTimestampPolicy;
pub use pipeline::{run_and_write, run_in_memory, run_pipeline, PipelineOptions, PipelineRun};
pub use vision::{NoEstimate, OccupancyEstimator};
