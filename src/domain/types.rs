//! Shared record types for the occupancy pipeline

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Newtype wrapper for RFID tag IDs to provide type safety
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TagId(pub String);

impl TagId {
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TagId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TagId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Newtype wrapper for vehicle IDs to provide type safety
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VehicleId(pub String);

impl VehicleId {
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for VehicleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for VehicleId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// One row of the tag registry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryEntry {
    pub tag_id: TagId,
    pub vehicle_id: VehicleId,
}

impl RegistryEntry {
    pub fn new(tag_id: &str, vehicle_id: &str) -> Self {
        Self { tag_id: TagId::from(tag_id), vehicle_id: VehicleId::from(vehicle_id) }
    }
}

/// Event timestamp as read from the source
///
/// Invalid values are kept verbatim so the ordering stage can report them
/// with their row instead of sorting them as some arbitrary instant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventTime {
    Parsed(DateTime<Utc>),
    Unparseable(String),
}

impl EventTime {
    /// Parse an RFC 3339 timestamp, normalizing any offset to UTC
    pub fn parse(raw: &str) -> Self {
        match DateTime::parse_from_rfc3339(raw.trim()) {
            Ok(dt) => EventTime::Parsed(dt.with_timezone(&Utc)),
            Err(_) => EventTime::Unparseable(raw.to_string()),
        }
    }

    #[inline]
    pub fn as_datetime(&self) -> Option<DateTime<Utc>> {
        match self {
            EventTime::Parsed(dt) => Some(*dt),
            EventTime::Unparseable(_) => None,
        }
    }
}

impl From<DateTime<Utc>> for EventTime {
    fn from(dt: DateTime<Utc>) -> Self {
        EventTime::Parsed(dt)
    }
}

/// Render a timestamp the way the storage formats expect it (`Z`-suffixed UTC)
pub fn format_timestamp(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

/// Gate event classification
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateEventKind {
    Entry,
    Exit,
    Unknown(String),
}

impl std::str::FromStr for GateEventKind {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "entry" => GateEventKind::Entry,
            "exit" => GateEventKind::Exit,
            other => GateEventKind::Unknown(other.to_string()),
        })
    }
}

impl GateEventKind {
    pub fn as_str(&self) -> &str {
        match self {
            GateEventKind::Entry => "entry",
            GateEventKind::Exit => "exit",
            GateEventKind::Unknown(s) => s,
        }
    }
}

impl std::fmt::Display for GateEventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single gate observation, as loaded or simulated
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GateEvent {
    pub timestamp: EventTime,
    pub tag_id: TagId,
    pub kind: GateEventKind,
}

impl GateEvent {
    #[inline]
    pub fn new(timestamp: EventTime, tag_id: TagId, kind: GateEventKind) -> Self {
        Self { timestamp, tag_id, kind }
    }

    /// Build an event from its raw storage fields
    pub fn from_raw(timestamp: &str, tag_id: &str, kind: &str) -> Self {
        let kind = match kind.parse::<GateEventKind>() {
            Ok(kind) => kind,
            Err(never) => match never {},
        };
        Self::new(EventTime::parse(timestamp), TagId::from(tag_id), kind)
    }
}

/// Gate event joined with its vehicle and annotated with occupancy
///
/// `occupancy` is the facility-wide count immediately after this event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrichedEvent {
    pub timestamp: DateTime<Utc>,
    pub tag_id: TagId,
    pub kind: GateEventKind,
    pub vehicle_id: Option<VehicleId>,
    pub occupancy: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_event_kind_from_str() {
        assert_eq!("entry".parse::<GateEventKind>().unwrap(), GateEventKind::Entry);
        assert_eq!("exit".parse::<GateEventKind>().unwrap(), GateEventKind::Exit);
        assert!(matches!(
            "EXIT".parse::<GateEventKind>().unwrap(),
            GateEventKind::Unknown(ref s) if s == "EXIT"
        ));
    }

    #[test]
    fn test_event_time_parses_zulu() {
        let parsed = EventTime::parse("2024-03-01T08:15:30Z");
        let expected = Utc.with_ymd_and_hms(2024, 3, 1, 8, 15, 30).unwrap();
        assert_eq!(parsed.as_datetime(), Some(expected));
    }

    #[test]
    fn test_event_time_normalizes_offset() {
        let parsed = EventTime::parse("2024-03-01T10:15:30+02:00");
        let expected = Utc.with_ymd_and_hms(2024, 3, 1, 8, 15, 30).unwrap();
        assert_eq!(parsed.as_datetime(), Some(expected));
    }

    #[test]
    fn test_event_time_keeps_unparseable_value() {
        assert_eq!(
            EventTime::parse("not-a-time"),
            EventTime::Unparseable("not-a-time".to_string())
        );
        assert!(EventTime::parse("").as_datetime().is_none());
    }

    #[test]
    fn test_format_timestamp_second_precision() {
        let dt = Utc.with_ymd_and_hms(2024, 3, 1, 8, 15, 30).unwrap();
        assert_eq!(format_timestamp(&dt), "2024-03-01T08:15:30Z");
    }

    #[test]
    fn test_gate_event_from_raw() {
        let event = GateEvent::from_raw("2024-03-01T08:15:30Z", "TAG00001", "exit");
        assert_eq!(event.tag_id, TagId::from("TAG00001"));
        assert_eq!(event.kind, GateEventKind::Exit);
        assert!(event.timestamp.as_datetime().is_some());
    }
}
