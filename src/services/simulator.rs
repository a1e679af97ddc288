//! Synthetic registry and gate event generation
//!
//! Produces datasets shaped like real gate traffic for demos and tests:
//! - Tags are `TAG00000..`, each mapped to a random `VEHnnnnn` vehicle
//! - Each tag makes 0-2 visits inside the simulation window
//! - A visit lasts 5-30 minutes; exits past the window end are clipped to it
//! - Timestamps are whole seconds, events come out sorted by time
//!
//! Seeded runs are reproducible.

use crate::domain::types::{GateEvent, GateEventKind, RegistryEntry, TagId, VehicleId};
use chrono::{DateTime, Duration, Timelike, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const MAX_VISITS_PER_TAG: u32 = 2;
const MIN_STAY_SECS: f64 = 300.0;
const MAX_STAY_SECS: f64 = 1800.0;
const VEHICLE_ID_SPACE: u32 = 99_999;

fn rng_for(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

/// Tag identifier for the i-th simulated tag
#[inline]
pub fn tag_id(index: usize) -> TagId {
    TagId(format!("TAG{index:05}"))
}

/// Generate a registry mapping `num_tags` tags to random vehicle IDs
pub fn generate_registry(num_tags: usize, seed: Option<u64>) -> Vec<RegistryEntry> {
    let mut rng = rng_for(seed);
    (0..num_tags)
        .map(|i| RegistryEntry {
            tag_id: tag_id(i),
            vehicle_id: VehicleId(format!("VEH{:05}", rng.gen_range(0..VEHICLE_ID_SPACE))),
        })
        .collect()
}

/// Simulate entry/exit events for `num_tags` tags over a window starting at `start`
pub fn simulate_events(
    num_tags: usize,
    duration_minutes: u32,
    seed: Option<u64>,
    start: DateTime<Utc>,
) -> Vec<GateEvent> {
    let mut rng = rng_for(seed);
    let start = start.with_nanosecond(0).unwrap_or(start);
    let window_secs = f64::from(duration_minutes) * 60.0;
    let at = |offset_secs: f64| start + Duration::seconds(offset_secs.floor() as i64);

    let mut timed: Vec<(DateTime<Utc>, GateEvent)> = Vec::new();
    for i in 0..num_tags {
        let tag = tag_id(i);
        let visits = rng.gen_range(0..=MAX_VISITS_PER_TAG);
        for _ in 0..visits {
            let entry_offset =
                if window_secs > 0.0 { rng.gen_range(0.0..window_secs) } else { 0.0 };
            let exit_offset =
                (entry_offset + rng.gen_range(MIN_STAY_SECS..MAX_STAY_SECS)).min(window_secs);

            for (when, kind) in
                [(at(entry_offset), GateEventKind::Entry), (at(exit_offset), GateEventKind::Exit)]
            {
                timed.push((when, GateEvent::new(when.into(), tag.clone(), kind)));
            }
        }
    }

    timed.sort_by_key(|(when, _)| *when);
    timed.into_iter().map(|(_, event)| event).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::EventTime;
    use chrono::TimeZone;
    use std::collections::HashMap;

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap()
    }

    #[test]
    fn test_generate_registry_shape() {
        let registry = generate_registry(10, Some(0));
        assert_eq!(registry.len(), 10);
        for (i, entry) in registry.iter().enumerate() {
            assert_eq!(entry.tag_id.as_str(), format!("TAG{i:05}"));
            assert!(entry.vehicle_id.as_str().starts_with("VEH"));
            assert_eq!(entry.vehicle_id.as_str().len(), 8);
        }
    }

    #[test]
    fn test_generate_registry_seeded_is_reproducible() {
        assert_eq!(generate_registry(20, Some(7)), generate_registry(20, Some(7)));
    }

    #[test]
    fn test_simulate_events_sorted_and_paired() {
        let events = simulate_events(25, 60, Some(1), start());

        let times: Vec<_> = events.iter().map(|e| e.timestamp.as_datetime().unwrap()).collect();
        let mut sorted = times.clone();
        sorted.sort();
        assert_eq!(times, sorted);

        assert_eq!(events.len() % 2, 0);

        let mut per_tag: HashMap<&str, (u32, u32)> = HashMap::new();
        for event in &events {
            let counts = per_tag.entry(event.tag_id.as_str()).or_default();
            match event.kind {
                GateEventKind::Entry => counts.0 += 1,
                GateEventKind::Exit => counts.1 += 1,
                GateEventKind::Unknown(_) => panic!("simulator produced unknown kind"),
            }
        }
        for (entries, exits) in per_tag.values() {
            assert_eq!(entries, exits);
            assert!(*entries <= MAX_VISITS_PER_TAG);
        }
    }

    #[test]
    fn test_simulate_events_inside_window() {
        let window_end = start() + Duration::minutes(10);
        let events = simulate_events(30, 10, Some(3), start());

        for event in &events {
            let when = event.timestamp.as_datetime().unwrap();
            assert!(when >= start());
            assert!(when <= window_end);
            assert_eq!(when.nanosecond(), 0);
        }
    }

    #[test]
    fn test_simulate_events_seeded_is_reproducible() {
        assert_eq!(
            simulate_events(15, 30, Some(42), start()),
            simulate_events(15, 30, Some(42), start())
        );
    }

    #[test]
    fn test_zero_duration_window() {
        let events = simulate_events(5, 0, Some(9), start());
        assert!(events.iter().all(|e| e.timestamp == EventTime::Parsed(start())));
    }
}
