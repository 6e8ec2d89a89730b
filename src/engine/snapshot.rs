//! Delay measurement types.

use serde::Serialize;
use std::collections::HashMap;

/// One node's delay at snapshot time. Created fresh on every fetch, never
/// mutated, discarded after one decision cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProxyMeasurement {
    pub name: String,
    pub delay_ms: u32,
}

/// An ordered set of measurements, ascending by delay. Ties keep discovery
/// order; duplicate names collapse to the last value seen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DelaySnapshot {
    entries: Vec<ProxyMeasurement>,
}

impl DelaySnapshot {
    pub fn from_measurements(measurements: Vec<ProxyMeasurement>) -> Self {
        let mut entries: Vec<ProxyMeasurement> = Vec::with_capacity(measurements.len());
        let mut seen: HashMap<String, usize> = HashMap::with_capacity(measurements.len());
        for measurement in measurements {
            match seen.get(&measurement.name) {
                Some(&i) => entries[i].delay_ms = measurement.delay_ms,
                None => {
                    seen.insert(measurement.name.clone(), entries.len());
                    entries.push(measurement);
                }
            }
        }
        // sort_by_key is stable, so equal delays keep discovery order
        entries.sort_by_key(|m| m.delay_ms);
        Self { entries }
    }

    /// All measurements, fastest first.
    pub fn entries(&self) -> &[ProxyMeasurement] {
        &self.entries
    }

    /// The fastest measurement, if any.
    pub fn best(&self) -> Option<&ProxyMeasurement> {
        self.entries.first()
    }

    /// Delay of a node by name.
    pub fn delay_of(&self, name: &str) -> Option<u32> {
        self.entries
            .iter()
            .find(|m| m.name == name)
            .map(|m| m.delay_ms)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn m(name: &str, delay_ms: u32) -> ProxyMeasurement {
        ProxyMeasurement {
            name: name.to_string(),
            delay_ms,
        }
    }

    #[test]
    fn test_sorted_ascending_by_delay() {
        let snapshot =
            DelaySnapshot::from_measurements(vec![m("slow", 800), m("fast", 100), m("mid", 300)]);
        let names: Vec<&str> = snapshot.entries().iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["fast", "mid", "slow"]);
    }

    #[test]
    fn test_ties_keep_discovery_order() {
        let snapshot =
            DelaySnapshot::from_measurements(vec![m("b", 100), m("a", 100), m("c", 100)]);
        let names: Vec<&str> = snapshot.entries().iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["b", "a", "c"]);
    }

    #[test]
    fn test_duplicate_names_last_writer_wins() {
        let snapshot =
            DelaySnapshot::from_measurements(vec![m("a", 500), m("b", 200), m("a", 50)]);
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot.delay_of("a"), Some(50));
        assert_eq!(snapshot.best().unwrap().name, "a");
    }

    #[test]
    fn test_delay_of_missing_name() {
        let snapshot = DelaySnapshot::from_measurements(vec![m("a", 100)]);
        assert_eq!(snapshot.delay_of("z"), None);
    }

    #[test]
    fn test_empty_snapshot() {
        let snapshot = DelaySnapshot::default();
        assert!(snapshot.is_empty());
        assert!(snapshot.best().is_none());
    }
}
