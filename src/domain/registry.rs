//! Tag registry snapshot
//!
//! Maps RFID tag IDs to vehicle IDs for the duration of one pipeline run.
//! A registry is immutable once built; duplicate tags are resolved at build
//! time according to `DuplicateTagPolicy`.

use crate::domain::types::{RegistryEntry, TagId, VehicleId};
use crate::error::{PipelineError, Result};
use rustc_hash::FxHashMap;
use serde::Deserialize;
use tracing::warn;

/// How to treat a tag that appears more than once in the registry
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicateTagPolicy {
    /// Keep the first row for a tag, ignore later ones
    #[default]
    FirstWins,
    /// Fail the run on the first repeated tag
    Reject,
}

impl DuplicateTagPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            DuplicateTagPolicy::FirstWins => "first_wins",
            DuplicateTagPolicy::Reject => "reject",
        }
    }
}

/// Immutable tag -> vehicle lookup
#[derive(Debug, Clone, Default)]
pub struct Registry {
    vehicles: FxHashMap<TagId, VehicleId>,
    duplicates: usize,
}

impl Registry {
    /// Build a registry from rows in input order
    pub fn from_entries<I>(entries: I, policy: DuplicateTagPolicy) -> Result<Self>
    where
        I: IntoIterator<Item = RegistryEntry>,
    {
        let mut registry = Self::default();

        for entry in entries {
            if let Some(kept) = registry.vehicles.get(&entry.tag_id) {
                if policy == DuplicateTagPolicy::Reject {
                    return Err(PipelineError::DuplicateTag { tag_id: entry.tag_id.0 });
                }
                warn!(
                    tag_id = %entry.tag_id,
                    kept_vehicle_id = %kept,
                    ignored_vehicle_id = %entry.vehicle_id,
                    "duplicate_tag_ignored"
                );
                registry.duplicates += 1;
                continue;
            }
            registry.vehicles.insert(entry.tag_id, entry.vehicle_id);
        }

        Ok(registry)
    }

    /// Vehicle registered for a tag, if any
    #[inline]
    pub fn lookup(&self, tag_id: &TagId) -> Option<&VehicleId> {
        self.vehicles.get(tag_id)
    }

    /// Number of distinct tags
    #[inline]
    pub fn len(&self) -> usize {
        self.vehicles.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vehicles.is_empty()
    }

    /// Rows dropped because their tag was already registered
    #[inline]
    pub fn duplicates(&self) -> usize {
        self.duplicates
    }
}
