//! Facility occupancy fold
//!
//! Walks chronologically ordered events and keeps a running vehicle count.
//!
//! Key behaviors:
//! - Entry increments the count
//! - Exit decrements it, clamped at zero (exits without an observed entry)
//! - Any other event kind aborts the fold; occupancy after a bad step would
//!   be wrong for every later row

use crate::domain::types::{EnrichedEvent, GateEventKind};
use crate::error::{PipelineError, Result};
use crate::services::ordering::OrderedEvent;
use tracing::debug;

/// Running occupancy state machine
#[derive(Debug, Clone, Default)]
pub struct OccupancyCounter {
    current: u32,
    peak: u32,
    clamped_exits: usize,
}

impl OccupancyCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one event and return the occupancy after it
    pub fn apply(&mut self, kind: &GateEventKind, row: usize) -> Result<u32> {
        match kind {
            GateEventKind::Entry => {
                self.current += 1;
                self.peak = self.peak.max(self.current);
            }
            GateEventKind::Exit => {
                if self.current == 0 {
                    debug!(row = row, "exit_clamped_at_zero");
                    self.clamped_exits += 1;
                } else {
                    self.current -= 1;
                }
            }
            GateEventKind::Unknown(value) => {
                return Err(PipelineError::UnrecognizedEventKind { row, value: value.clone() });
            }
        }
        Ok(self.current)
    }

    #[inline]
    pub fn current(&self) -> u32 {
        self.current
    }

    /// Highest occupancy seen so far
    #[inline]
    pub fn peak(&self) -> u32 {
        self.peak
    }

    /// Exits applied while the facility was already empty
    #[inline]
    pub fn clamped_exits(&self) -> usize {
        self.clamped_exits
    }
}

/// Fold output: enriched events plus the counter's final state
#[derive(Debug, Clone)]
pub struct FoldOutcome {
    pub events: Vec<EnrichedEvent>,
    pub counter: OccupancyCounter,
}

/// Annotate each ordered event with the occupancy after it
pub fn fold_occupancy(ordered: Vec<OrderedEvent>) -> Result<FoldOutcome> {
    let mut counter = OccupancyCounter::new();
    let mut events = Vec::with_capacity(ordered.len());

    for OrderedEvent { timestamp, joined } in ordered {
        let occupancy = counter.apply(&joined.event.kind, joined.row)?;
        events.push(EnrichedEvent {
            timestamp,
            tag_id: joined.event.tag_id,
            kind: joined.event.kind,
            vehicle_id: joined.vehicle_id,
            occupancy,
        });
    }

    Ok(FoldOutcome { events, counter })
}
