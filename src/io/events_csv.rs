//! Gate event storage
//!
//! CSV with a header row and columns `timestamp,tag_id,event`. Rows are
//! loaded verbatim: timestamp and kind validation belongs to the pipeline
//! stages, which report bad values with their row number.

use crate::domain::types::{format_timestamp, EventTime, GateEvent};
use crate::error::{PipelineError, Result};
use crate::io::egress::write_atomically;
use crate::io::missing_column;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::info;

const REQUIRED_COLUMNS: [&str; 3] = ["timestamp", "tag_id", "event"];

#[derive(Debug, Deserialize, Serialize)]
struct EventRow<'a> {
    #[serde(borrow)]
    timestamp: Cow<'a, str>,
    #[serde(borrow)]
    tag_id: Cow<'a, str>,
    #[serde(borrow)]
    event: Cow<'a, str>,
}

/// Read gate events from any reader; `origin` names the source in errors
pub fn read_events_from<R: Read>(reader: R, origin: &Path) -> Result<Vec<GateEvent>> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let headers = rdr.headers().map_err(|e| PipelineError::csv(origin, e))?.clone();
    if let Some(column) = missing_column(&headers, &REQUIRED_COLUMNS) {
        return Err(PipelineError::MalformedEvents {
            path: origin.to_path_buf(),
            reason: format!("missing required column {column:?}"),
        });
    }

    let mut events = Vec::new();
    let mut record = csv::StringRecord::new();
    while rdr.read_record(&mut record).map_err(|e| PipelineError::csv(origin, e))? {
        let row: EventRow =
            record.deserialize(Some(&headers)).map_err(|e| PipelineError::csv(origin, e))?;
        events.push(GateEvent::from_raw(&row.timestamp, &row.tag_id, &row.event));
    }

    Ok(events)
}

/// Load gate events from a CSV file
pub fn load_events(path: &Path) -> Result<Vec<GateEvent>> {
    let file = File::open(path).map_err(|e| PipelineError::storage(path, e))?;
    let events = read_events_from(file, path)?;

    info!(path = %path.display(), rows = events.len(), "events_loaded");
    Ok(events)
}

/// Write gate events to a CSV file in the given order, creating parent directories
pub fn write_events(events: &[GateEvent], path: &Path) -> Result<()> {
    write_atomically(path, |w| {
        let mut wtr = csv::WriterBuilder::new().has_headers(false).from_writer(w);
        wtr.write_record(REQUIRED_COLUMNS).map_err(|e| PipelineError::csv(path, e))?;
        for event in events {
            let timestamp: Cow<'_, str> = match &event.timestamp {
                EventTime::Parsed(dt) => format_timestamp(dt).into(),
                EventTime::Unparseable(raw) => raw.as_str().into(),
            };
            let row = EventRow {
                timestamp,
                tag_id: event.tag_id.as_str().into(),
                event: event.kind.as_str().into(),
            };
            wtr.serialize(row).map_err(|e| PipelineError::csv(path, e))?;
        }
        wtr.flush().map_err(|e| PipelineError::storage(path, e))
    })?;

    info!(path = %path.display(), rows = events.len(), "events_written");
    Ok(())
}
