//! Domain models - core record types for the occupancy pipeline
//!
//! This module contains the canonical data types used throughout the system:
//! - `GateEvent` - a single entry/exit observation at a facility gate
//! - `EnrichedEvent` - a gate event joined with its vehicle and occupancy
//! - `Registry` - the tag to vehicle lookup snapshot
//! - `TagId` / `VehicleId` - identifier newtypes

pub mod registry;
pub mod types;

// Re-export commonly used types at module level
pub use registry::{DuplicateTagPolicy, Registry};
pub use types::{
    EnrichedEvent, EventTime, GateEvent, GateEventKind, RegistryEntry, TagId, VehicleId,
};
