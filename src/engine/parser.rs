//! Delay payload normalization.
//!
//! The controller answers delay queries in one of four shapes depending on
//! version and endpoint. The parser tries them in fixed precedence order and
//! normalizes whatever it finds into a [`DelaySnapshot`]:
//!
//! 1. a `"delays"` object mapping node name to delay — authoritative when
//!    present, even if every entry is filtered or unparseable
//! 2. a flat top-level map from node name to delay
//! 3. a `"proxies"` array of `{name, delay}` objects
//! 4. a single top-level `{name, delay}` object
//!
//! Entries with negative or non-numeric delay are dropped, never defaulted.

use super::snapshot::{DelaySnapshot, ProxyMeasurement};
use serde_json::{Map, Value};

// Keys that discriminate the non-flat shapes; the flat pass skips them so a
// single-measurement or proxies-list payload is never misread as a flat map.
const RESERVED_KEYS: [&str; 3] = ["proxies", "name", "delay"];

/// Coerce a JSON delay value to whole milliseconds. Integers pass through,
/// floats truncate, numeric strings parse; anything else is `None`.
pub fn coerce_delay(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s.parse::<i64>().ok(),
        _ => None,
    }
}

/// Normalize a raw delay payload, dropping entries the exclusion predicate
/// rejects. An unrecognized shape yields an empty snapshot; that is
/// recoverable (the next cycle retries), so it is logged rather than raised.
pub fn parse_group_delays(payload: &Value, exclude: impl Fn(&str) -> bool) -> DelaySnapshot {
    let Some(root) = payload.as_object() else {
        tracing::warn!("unexpected delay payload shape");
        return DelaySnapshot::default();
    };

    if let Some(delays) = root.get("delays").and_then(Value::as_object) {
        return DelaySnapshot::from_measurements(collect_map(delays, &exclude, &[]));
    }

    let flat = collect_map(root, &exclude, &RESERVED_KEYS);
    if !flat.is_empty() {
        return DelaySnapshot::from_measurements(flat);
    }

    if let Some(proxies) = root.get("proxies").and_then(Value::as_array) {
        let measurements = proxies
            .iter()
            .filter_map(|item| {
                let obj = item.as_object()?;
                let name = obj.get("name")?.as_str()?;
                accept(name, obj.get("delay")?, &exclude)
            })
            .collect();
        return DelaySnapshot::from_measurements(measurements);
    }

    if let (Some(name), Some(delay)) = (root.get("name").and_then(Value::as_str), root.get("delay"))
    {
        return DelaySnapshot::from_measurements(accept(name, delay, &exclude).into_iter().collect());
    }

    tracing::warn!("unexpected delay payload shape");
    DelaySnapshot::default()
}

fn collect_map(
    map: &Map<String, Value>,
    exclude: &impl Fn(&str) -> bool,
    skip_keys: &[&str],
) -> Vec<ProxyMeasurement> {
    map.iter()
        .filter(|(name, _)| !skip_keys.contains(&name.as_str()))
        .filter_map(|(name, delay)| accept(name, delay, exclude))
        .collect()
}

fn accept(name: &str, delay: &Value, exclude: &impl Fn(&str) -> bool) -> Option<ProxyMeasurement> {
    if exclude(name) {
        return None;
    }
    let delay_ms = u32::try_from(coerce_delay(delay)?).ok()?;
    Some(ProxyMeasurement {
        name: name.to_string(),
        delay_ms,
    })
}

#[cfg(test)]
mod tests {
    use super::super::filter;
    use super::*;
    use serde_json::json;

    fn no_filter(_: &str) -> bool {
        false
    }

    #[test]
    fn test_parse_delays_object() {
        let payload = json!({"delays": {"a": 120, "b": 80}});
        let snapshot = parse_group_delays(&payload, no_filter);
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot.best().unwrap().name, "b");
    }

    #[test]
    fn test_parse_flat_map() {
        let payload = json!({"a": 120, "b": 80});
        let snapshot = parse_group_delays(&payload, no_filter);
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot.delay_of("a"), Some(120));
    }

    #[test]
    fn test_parse_proxies_list() {
        let payload = json!({"proxies": [
            {"name": "a", "delay": 120},
            {"name": "b", "delay": 80},
        ]});
        let snapshot = parse_group_delays(&payload, no_filter);
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot.best().unwrap().name, "b");
    }

    #[test]
    fn test_parse_single_measurement() {
        let payload = json!({"name": "a", "delay": 120});
        let snapshot = parse_group_delays(&payload, no_filter);
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot.delay_of("a"), Some(120));
    }

    #[test]
    fn test_coercion_accepts_strings_and_floats() {
        let payload = json!({"delays": {"a": "150", "b": 99.9}});
        let snapshot = parse_group_delays(&payload, no_filter);
        assert_eq!(snapshot.delay_of("a"), Some(150));
        assert_eq!(snapshot.delay_of("b"), Some(99)); // truncated
    }

    #[test]
    fn test_negative_delays_dropped() {
        let payload = json!({"delays": {"a": -1, "b": 80, "c": "-5"}});
        let snapshot = parse_group_delays(&payload, no_filter);
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot.delay_of("b"), Some(80));
    }

    #[test]
    fn test_non_numeric_delays_dropped() {
        let payload = json!({"delays": {"a": "fast", "b": null, "c": [1], "d": 80}});
        let snapshot = parse_group_delays(&payload, no_filter);
        assert_eq!(snapshot.len(), 1);
    }

    #[test]
    fn test_delays_object_is_authoritative_even_when_empty() {
        // A present "delays" object never falls through to the flat map.
        let payload = json!({"delays": {"a": -1}, "b": 80});
        let snapshot = parse_group_delays(&payload, no_filter);
        assert!(snapshot.is_empty());
    }

    #[test]
    fn test_empty_flat_result_falls_through_to_proxies() {
        let payload = json!({"proxies": [{"name": "a", "delay": 120}]});
        let snapshot = parse_group_delays(&payload, no_filter);
        assert_eq!(snapshot.len(), 1);
    }

    #[test]
    fn test_filter_applied_to_proxies_list() {
        // One entry excluded by the regional candidate filter
        let payload = json!({"proxies": [
            {"name": "HK-1", "delay": 30},
            {"name": "Tokyo", "delay": 120},
            {"name": "Osaka", "delay": 80},
        ]});
        let snapshot = parse_group_delays(&payload, filter::is_excluded);
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot.delay_of("HK-1"), None);
        assert_eq!(snapshot.best().unwrap().name, "Osaka");
    }

    #[test]
    fn test_filtered_is_subset_of_unfiltered() {
        let payload = json!({"delays": {"HK-1": 30, "Tokyo": 120, "香港 02": 40}});
        let unfiltered = parse_group_delays(&payload, no_filter);
        let filtered = parse_group_delays(&payload, filter::is_excluded);
        assert_eq!(unfiltered.len(), 3);
        assert_eq!(filtered.len(), 1);
        for m in filtered.entries() {
            assert_eq!(unfiltered.delay_of(&m.name), Some(m.delay_ms));
        }
    }

    #[test]
    fn test_unrecognized_shape_yields_empty() {
        assert!(parse_group_delays(&json!([1, 2, 3]), no_filter).is_empty());
        assert!(parse_group_delays(&json!({"unrelated": true}), no_filter).is_empty());
        assert!(parse_group_delays(&json!(null), no_filter).is_empty());
    }

    #[test]
    fn test_malformed_proxies_entries_skipped() {
        let payload = json!({"proxies": [
            {"name": "a"},
            {"delay": 10},
            "junk",
            {"name": "b", "delay": 90},
        ]});
        let snapshot = parse_group_delays(&payload, no_filter);
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot.delay_of("b"), Some(90));
    }
}
