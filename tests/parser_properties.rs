//! Property tests for the delay payload parser.

use helmsman::engine::{filter, parse_group_delays};
use proptest::prelude::*;
use serde_json::{json, Value};

fn name_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-z0-9 ]{1,10}",
        Just("香港 01".to_string()),
        Just("HK-2".to_string()),
        Just("Hong Kong 3".to_string()),
        Just("Tokyo IPLC".to_string()),
    ]
}

fn delay_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        (-5_000i64..5_000).prop_map(|n| json!(n)),
        (-5_000.0f64..5_000.0).prop_map(|f| json!(f)),
        (-5_000i64..5_000).prop_map(|n| json!(n.to_string())),
        Just(json!("not a number")),
        Just(json!(null)),
        Just(json!([12])),
    ]
}

proptest! {
    #[test]
    fn filtered_snapshot_is_clean_subset(
        entries in proptest::collection::vec((name_strategy(), delay_strategy()), 0..16)
    ) {
        let mut delays = serde_json::Map::new();
        for (name, delay) in entries {
            delays.insert(name, delay);
        }
        let payload = json!({ "delays": delays });

        let unfiltered = parse_group_delays(&payload, |_| false);
        let filtered = parse_group_delays(&payload, filter::is_excluded);

        // Filtering is monotonic: every filtered entry exists unfiltered
        // with the same delay, and no excluded name survives.
        prop_assert!(filtered.len() <= unfiltered.len());
        for m in filtered.entries() {
            prop_assert_eq!(unfiltered.delay_of(&m.name), Some(m.delay_ms));
            prop_assert!(!filter::is_excluded(&m.name));
        }

        // Sorted ascending; the measurement type is unsigned, so negative
        // inputs can only have been dropped, never defaulted.
        for window in unfiltered.entries().windows(2) {
            prop_assert!(window[0].delay_ms <= window[1].delay_ms);
        }
    }

    #[test]
    fn parser_never_panics_on_arbitrary_json(
        payload in proptest::arbitrary::any::<i64>().prop_map(|n| json!({"delays": n}))
    ) {
        let snapshot = parse_group_delays(&payload, |_| false);
        // "delays" must be an object to be authoritative; a scalar falls
        // through to the flat-map shape and coerces as a single entry.
        prop_assert!(snapshot.len() <= 1);
    }
}
