//! Tag registry storage
//!
//! CSV with a header row and columns `tag_id,vehicle_id`. Extra columns are
//! ignored; surrounding whitespace is trimmed.

use crate::domain::registry::{DuplicateTagPolicy, Registry};
use crate::domain::types::{RegistryEntry, TagId, VehicleId};
use crate::error::{PipelineError, Result};
use crate::io::egress::write_atomically;
use crate::io::missing_column;
use serde::Deserialize;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::info;

const REQUIRED_COLUMNS: [&str; 2] = ["tag_id", "vehicle_id"];

#[derive(Debug, Deserialize)]
struct RegistryRow {
    tag_id: String,
    vehicle_id: String,
}

/// Read registry rows from any reader; `origin` names the source in errors
pub fn read_registry_from<R: Read>(reader: R, origin: &Path) -> Result<Vec<RegistryEntry>> {
    let malformed =
        |reason: String| PipelineError::MalformedRegistry { path: origin.to_path_buf(), reason };

    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let headers = rdr.headers().map_err(|e| PipelineError::csv(origin, e))?.clone();
    if let Some(column) = missing_column(&headers, &REQUIRED_COLUMNS) {
        return Err(malformed(format!("missing required column {column:?}")));
    }

    let mut entries = Vec::new();
    for (idx, record) in rdr.records().enumerate() {
        let row = idx + 1;
        let record = record.map_err(|e| PipelineError::csv(origin, e))?;
        let parsed: RegistryRow =
            record.deserialize(Some(&headers)).map_err(|e| PipelineError::csv(origin, e))?;

        if parsed.tag_id.is_empty() {
            return Err(malformed(format!("empty tag_id at row {row}")));
        }
        if parsed.vehicle_id.is_empty() {
            return Err(malformed(format!("empty vehicle_id for {} at row {row}", parsed.tag_id)));
        }
        entries.push(RegistryEntry {
            tag_id: TagId(parsed.tag_id),
            vehicle_id: VehicleId(parsed.vehicle_id),
        });
    }

    Ok(entries)
}

/// Read registry rows from a CSV file
pub fn read_registry_entries(path: &Path) -> Result<Vec<RegistryEntry>> {
    let file = File::open(path).map_err(|e| PipelineError::storage(path, e))?;
    read_registry_from(file, path)
}

/// Load a registry snapshot from a CSV file
pub fn load_registry(path: &Path, policy: DuplicateTagPolicy) -> Result<Registry> {
    let entries = read_registry_entries(path)?;
    let rows = entries.len();
    let registry = Registry::from_entries(entries, policy)?;

    info!(
        path = %path.display(),
        rows = rows,
        tags = registry.len(),
        duplicates = registry.duplicates(),
        policy = %policy.as_str(),
        "registry_loaded"
    );
    Ok(registry)
}

/// Write registry rows to a CSV file, creating parent directories
pub fn write_registry(entries: &[RegistryEntry], path: &Path) -> Result<()> {
    write_atomically(path, |w| {
        let mut wtr = csv::WriterBuilder::new().has_headers(false).from_writer(w);
        wtr.write_record(REQUIRED_COLUMNS).map_err(|e| PipelineError::csv(path, e))?;
        for entry in entries {
            wtr.serialize(entry).map_err(|e| PipelineError::csv(path, e))?;
        }
        wtr.flush().map_err(|e| PipelineError::storage(path, e))
    })?;

    info!(path = %path.display(), rows = entries.len(), "registry_written");
    Ok(())
}
