//! Error types for occupancy pipeline runs.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, PipelineError>;

/// Errors that abort a pipeline run.
///
/// Row numbers are 1-based positions among the data rows (header excluded).
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Registry file is structurally unusable.
    #[error("malformed registry {}: {reason}", path.display())]
    MalformedRegistry {
        /// Registry file that failed validation.
        path: PathBuf,
        /// What was wrong with it.
        reason: String,
    },

    /// Registry snapshot maps one tag to more than one row.
    #[error("malformed registry: duplicate tag_id {tag_id}")]
    DuplicateTag {
        /// The repeated tag.
        tag_id: String,
    },

    /// Event file is structurally unusable.
    #[error("malformed events {}: {reason}", path.display())]
    MalformedEvents {
        /// Event file that failed validation.
        path: PathBuf,
        /// What was wrong with it.
        reason: String,
    },

    /// Event timestamp could not be parsed.
    #[error("unparseable timestamp {value:?} at event row {row}")]
    UnparseableTimestamp {
        /// Input row of the event.
        row: usize,
        /// Raw timestamp text.
        value: String,
    },

    /// Event kind is neither `entry` nor `exit`.
    #[error("unrecognized event kind {value:?} at event row {row}")]
    UnrecognizedEventKind {
        /// Input row of the event.
        row: usize,
        /// Raw event kind text.
        value: String,
    },

    /// Filesystem read or write failed.
    #[error("storage error at {}: {source}", path.display())]
    Storage {
        /// Path being read or written.
        path: PathBuf,
        /// Underlying IO failure.
        #[source]
        source: std::io::Error,
    },

    /// CSV encoding or decoding failed.
    #[error("csv error at {}: {source}", path.display())]
    Csv {
        /// Path being read or written.
        path: PathBuf,
        /// Underlying CSV failure.
        #[source]
        source: csv::Error,
    },

    /// JSON encoding failed.
    #[error("json error at {}: {source}", path.display())]
    Json {
        /// Path being written.
        path: PathBuf,
        /// Underlying serde_json failure.
        #[source]
        source: serde_json::Error,
    },
}

impl PipelineError {
    pub(crate) fn storage(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Storage { path: path.into(), source }
    }

    pub(crate) fn csv(path: impl Into<PathBuf>, source: csv::Error) -> Self {
        Self::Csv { path: path.into(), source }
    }
}
