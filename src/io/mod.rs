//! IO modules - dataset storage
//!
//! This module contains all file IO operations:
//! - `registry_csv` - tag registry load/store (CSV)
//! - `events_csv` - gate event load/store (CSV)
//! - `egress` - occupancy dataset output (CSV or JSONL)

pub mod egress;
pub mod events_csv;
pub mod registry_csv;

// Re-export commonly used types
pub use egress::Egress;
pub use events_csv::{load_events, write_events};
pub use registry_csv::{load_registry, read_registry_entries, write_registry};

use csv::StringRecord;

/// First required column missing from a header row, if any
pub(crate) fn missing_column<'a>(headers: &StringRecord, required: &[&'a str]) -> Option<&'a str> {
    required.iter().copied().find(|column| !headers.iter().any(|h| h == *column))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_column() {
        let headers = StringRecord::from(vec!["tag_id", "extra"]);
        assert_eq!(missing_column(&headers, &["tag_id", "vehicle_id"]), Some("vehicle_id"));
        assert_eq!(missing_column(&headers, &["tag_id"]), None);
    }
}
