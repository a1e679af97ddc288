//! Registry join - attaches vehicle identity to gate events
//!
//! Left join on `tag_id`: every event comes out exactly once, in input
//! order, whether or not its tag is registered.

use crate::domain::registry::Registry;
use crate::domain::types::{GateEvent, VehicleId};
use tracing::debug;

/// Gate event with its registry match and input position
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinedEvent {
    /// 1-based input row, used for tie-breaks and error reporting
    pub row: usize,
    pub event: GateEvent,
    /// None when the tag is not in the registry
    pub vehicle_id: Option<VehicleId>,
}

impl JoinedEvent {
    #[inline]
    pub fn is_matched(&self) -> bool {
        self.vehicle_id.is_some()
    }
}

/// Join events against the registry, preserving length and order
pub fn join_registry(registry: &Registry, events: Vec<GateEvent>) -> Vec<JoinedEvent> {
    events
        .into_iter()
        .enumerate()
        .map(|(idx, event)| {
            let vehicle_id = registry.lookup(&event.tag_id).cloned();
            if vehicle_id.is_none() {
                debug!(row = idx + 1, tag_id = %event.tag_id, "unmatched_tag");
            }
            JoinedEvent { row: idx + 1, event, vehicle_id }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::registry::DuplicateTagPolicy;
    use crate::domain::types::{RegistryEntry, TagId};

    fn registry() -> Registry {
        Registry::from_entries(
            vec![RegistryEntry::new("TAG00000", "VEH1"), RegistryEntry::new("TAG00001", "VEH2")],
            DuplicateTagPolicy::FirstWins,
        )
        .unwrap()
    }

    #[test]
    fn test_join_preserves_length_and_order() {
        let events = vec![
            GateEvent::from_raw("2024-03-01T08:00:02Z", "TAG00001", "entry"),
            GateEvent::from_raw("2024-03-01T08:00:01Z", "TAG99999", "entry"),
            GateEvent::from_raw("2024-03-01T08:00:00Z", "TAG00000", "exit"),
        ];

        let joined = join_registry(&registry(), events.clone());

        assert_eq!(joined.len(), 3);
        for (idx, (j, original)) in joined.iter().zip(&events).enumerate() {
            assert_eq!(j.row, idx + 1);
            assert_eq!(&j.event, original);
        }
    }

    #[test]
    fn test_join_attaches_vehicle_or_none() {
        let events = vec![
            GateEvent::from_raw("2024-03-01T08:00:00Z", "TAG00000", "entry"),
            GateEvent::from_raw("2024-03-01T08:00:01Z", "TAG99999", "entry"),
        ];

        let joined = join_registry(&registry(), events);

        assert_eq!(joined[0].vehicle_id, Some(VehicleId::from("VEH1")));
        assert!(joined[0].is_matched());
        assert_eq!(joined[1].event.tag_id, TagId::from("TAG99999"));
        assert!(joined[1].vehicle_id.is_none());
    }

    #[test]
    fn test_join_keeps_invalid_rows_for_later_stages() {
        let events = vec![GateEvent::from_raw("garbage", "TAG00000", "park")];
        let joined = join_registry(&registry(), events);
        assert_eq!(joined.len(), 1);
        assert!(joined[0].event.timestamp.as_datetime().is_none());
    }

    #[test]
    fn test_join_empty_events() {
        assert!(join_registry(&registry(), Vec::new()).is_empty());
    }
}
