//! Occupancy egress - writes the enriched event dataset to file
//!
//! Output goes to a temporary file next to the destination and is renamed
//! over it once fully written, so a failed run never leaves a half-written
//! dataset behind. Missing parent directories are created first.

use crate::domain::types::{format_timestamp, EnrichedEvent};
use crate::error::{PipelineError, Result};
use crate::infra::config::OutputFormat;
use serde::Serialize;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, info};

/// Output dataset header, in column order
pub const OUTPUT_COLUMNS: [&str; 5] = ["timestamp", "tag_id", "event", "vehicle_id", "occupancy"];

/// One output row; `vehicle_id` is empty (CSV) or null (JSONL) when unmatched
#[derive(Debug, Serialize)]
struct OccupancyRow<'a> {
    timestamp: String,
    tag_id: &'a str,
    event: &'a str,
    vehicle_id: Option<&'a str>,
    occupancy: u32,
}

impl<'a> From<&'a EnrichedEvent> for OccupancyRow<'a> {
    fn from(event: &'a EnrichedEvent) -> Self {
        Self {
            timestamp: format_timestamp(&event.timestamp),
            tag_id: event.tag_id.as_str(),
            event: event.kind.as_str(),
            vehicle_id: event.vehicle_id.as_ref().map(|v| v.as_str()),
            occupancy: event.occupancy,
        }
    }
}

/// Create `path`'s parent directories, then write through a temp file and
/// atomically move it into place
pub(crate) fn write_atomically<F>(path: &Path, write: F) -> Result<()>
where
    F: FnOnce(&mut BufWriter<&mut File>) -> Result<()>,
{
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    if !parent.exists() {
        fs::create_dir_all(parent).map_err(|e| PipelineError::storage(parent, e))?;
        debug!(dir = %parent.display(), "output_dir_created");
    }

    let mut tmp = NamedTempFile::new_in(parent).map_err(|e| PipelineError::storage(parent, e))?;
    {
        let mut writer = BufWriter::new(tmp.as_file_mut());
        write(&mut writer)?;
        writer.flush().map_err(|e| PipelineError::storage(path, e))?;
    }
    tmp.as_file().sync_all().map_err(|e| PipelineError::storage(path, e))?;
    tmp.persist(path).map_err(|e| PipelineError::storage(path, e.error))?;

    Ok(())
}

/// Egress writer for the occupancy dataset
pub struct Egress {
    path: PathBuf,
    format: OutputFormat,
}

impl Egress {
    pub fn new(path: impl Into<PathBuf>, format: OutputFormat) -> Self {
        Self { path: path.into(), format }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write all events in order, replacing any existing file
    ///
    /// Returns the number of rows written.
    pub fn write_events(&self, events: &[EnrichedEvent]) -> Result<usize> {
        match self.format {
            OutputFormat::Csv => write_atomically(&self.path, |w| self.write_csv(w, events))?,
            OutputFormat::Jsonl => write_atomically(&self.path, |w| self.write_jsonl(w, events))?,
        }

        info!(
            path = %self.path.display(),
            format = %self.format.as_str(),
            rows = events.len(),
            "occupancy_written"
        );
        Ok(events.len())
    }

    fn write_csv<W: Write>(&self, w: W, events: &[EnrichedEvent]) -> Result<()> {
        // Header written by hand so an empty run still produces one
        let mut wtr = csv::WriterBuilder::new().has_headers(false).from_writer(w);
        wtr.write_record(OUTPUT_COLUMNS).map_err(|e| PipelineError::csv(&self.path, e))?;
        for event in events {
            wtr.serialize(OccupancyRow::from(event))
                .map_err(|e| PipelineError::csv(&self.path, e))?;
        }
        wtr.flush().map_err(|e| PipelineError::storage(&self.path, e))
    }

    fn write_jsonl<W: Write>(&self, mut w: W, events: &[EnrichedEvent]) -> Result<()> {
        for event in events {
            serde_json::to_writer(&mut w, &OccupancyRow::from(event)).map_err(|e| {
                PipelineError::Json { path: self.path.clone(), source: e }
            })?;
            w.write_all(b"\n").map_err(|e| PipelineError::storage(&self.path, e))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::{GateEventKind, TagId, VehicleId};
    use chrono::{TimeZone, Utc};
    use tempfile::tempdir;

    fn events() -> Vec<EnrichedEvent> {
        let t0 = Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap();
        vec![
            EnrichedEvent {
                timestamp: t0,
                tag_id: TagId::from("TAG00000"),
                kind: GateEventKind::Entry,
                vehicle_id: Some(VehicleId::from("VEH1")),
                occupancy: 1,
            },
            EnrichedEvent {
                timestamp: t0 + chrono::Duration::seconds(30),
                tag_id: TagId::from("TAG99999"),
                kind: GateEventKind::Exit,
                vehicle_id: None,
                occupancy: 0,
            },
        ]
    }

    #[test]
    fn test_write_csv() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("occupancy.csv");

        let written = Egress::new(&path, OutputFormat::Csv).write_events(&events()).unwrap();
        assert_eq!(written, 2);

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(
            content,
            "timestamp,tag_id,event,vehicle_id,occupancy\n\
             2024-03-01T08:00:00Z,TAG00000,entry,VEH1,1\n\
             2024-03-01T08:00:30Z,TAG99999,exit,,0\n"
        );
    }

    #[test]
    fn test_write_jsonl() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("occupancy.jsonl");

        Egress::new(&path, OutputFormat::Jsonl).write_events(&events()).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);

        let first: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first["vehicle_id"], "VEH1");
        assert_eq!(first["occupancy"], 1);

        let second: serde_json::Value = serde_json::from_str(lines[1]).unwrap();
        assert!(second["vehicle_id"].is_null());
        assert_eq!(second["event"], "exit");
    }

    #[test]
    fn test_empty_run_still_writes_header() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("occupancy.csv");

        let written = Egress::new(&path, OutputFormat::Csv).write_events(&[]).unwrap();
        assert_eq!(written, 0);
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "timestamp,tag_id,event,vehicle_id,occupancy\n"
        );
    }

    #[test]
    fn test_creates_parent_directories() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("nested").join("dir").join("occupancy.csv");

        Egress::new(&nested, OutputFormat::Csv).write_events(&events()).unwrap();
        assert!(nested.exists());
    }

    #[test]
    fn test_replaces_existing_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("occupancy.csv");
        fs::write(&path, "stale\n").unwrap();

        Egress::new(&path, OutputFormat::Csv).write_events(&events()).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(!content.contains("stale"));
        assert_eq!(content.lines().count(), 3);
    }

    #[test]
    fn test_failed_write_leaves_no_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("occupancy.csv");

        let result = write_atomically(&path, |_| {
            Err(PipelineError::UnrecognizedEventKind { row: 1, value: "park".to_string() })
        });

        assert!(result.is_err());
        assert!(!path.exists());
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_unwritable_parent_is_storage_error() {
        let dir = tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "file, not a directory").unwrap();
        let path = blocker.join("occupancy.csv");

        let err = Egress::new(&path, OutputFormat::Csv).write_events(&events()).unwrap_err();
        assert!(matches!(err, PipelineError::Storage { .. }));
    }
}
