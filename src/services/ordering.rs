//! Chronological ordering of joined events
//!
//! Sorts by timestamp with the input row as tie-break, so events sharing an
//! instant keep their input order and the fold is reproducible. Rows whose
//! timestamp failed to parse never get a sort position: depending on
//! `InvalidTimestampPolicy` they abort the run or are dropped with a warning.

use crate::domain::types::EventTime;
use crate::error::{PipelineError, Result};
use crate::services::join::JoinedEvent;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::warn;

/// What to do with an event whose timestamp cannot be parsed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvalidTimestampPolicy {
    /// Abort the run
    #[default]
    Fail,
    /// Exclude the row from the fold and log it
    Skip,
}

impl InvalidTimestampPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            InvalidTimestampPolicy::Fail => "fail",
            InvalidTimestampPolicy::Skip => "skip",
        }
    }
}

/// Joined event with a validated timestamp
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderedEvent {
    pub timestamp: DateTime<Utc>,
    pub joined: JoinedEvent,
}

/// Result of ordering: the sorted events plus rows left out
#[derive(Debug, Clone, Default)]
pub struct ChronologicalOrder {
    pub events: Vec<OrderedEvent>,
    pub skipped: usize,
}

/// Validate timestamps and sort by `(timestamp, row)`
pub fn order_chronologically(
    joined: Vec<JoinedEvent>,
    policy: InvalidTimestampPolicy,
) -> Result<ChronologicalOrder> {
    let mut order = ChronologicalOrder { events: Vec::with_capacity(joined.len()), skipped: 0 };

    for j in joined {
        let timestamp = match &j.event.timestamp {
            EventTime::Parsed(dt) => *dt,
            EventTime::Unparseable(raw) => match policy {
                InvalidTimestampPolicy::Fail => {
                    return Err(PipelineError::UnparseableTimestamp {
                        row: j.row,
                        value: raw.clone(),
                    });
                }
                InvalidTimestampPolicy::Skip => {
                    warn!(row = j.row, tag_id = %j.event.tag_id, value = %raw, "timestamp_skipped");
                    order.skipped += 1;
                    continue;
                }
            },
        };
        order.events.push(OrderedEvent { timestamp, joined: j });
    }

    order.events.sort_by_key(|e| (e.timestamp, e.joined.row));
    Ok(order)
}
