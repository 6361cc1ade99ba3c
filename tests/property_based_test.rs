//! Property-based tests using proptest
//!
//! Tests that verify encoding invariants hold for arbitrary inputs.

use eseries_exporter::collectors::drives::DRIVE_STATUSES;
use eseries_exporter::collectors::storage_systems::STORAGE_SYSTEM_STATUSES;
use eseries_exporter::metrics::{
    gauge_vec, parse_capacity, render, set_one_hot, utilization_ratio, UNKNOWN,
};
use prometheus::{GaugeVec, Registry};
use proptest::prelude::*;

fn drive_status() -> GaugeVec {
    gauge_vec("drive", "status", "Drive status", &["tray", "slot", "status"])
        .expect("Failed to create gauge")
}

/// Sum of the one-hot series of one drive
fn one_hot_sum(metric: &GaugeVec, tray: &str, slot: &str, states: &[&str]) -> f64 {
    states
        .iter()
        .chain([UNKNOWN].iter())
        .map(|state| metric.with_label_values(&[tray, slot, *state]).get())
        .sum()
}

/// Any status string, biased towards the known enumeration
fn any_status() -> impl Strategy<Value = String> {
    prop_oneof![
        prop::sample::select(DRIVE_STATUSES).prop_map(str::to_string),
        "\\PC*",
    ]
}

proptest! {
    #[test]
    fn test_drive_one_hot_sums_to_one(status in any_status()) {
        // Given: A drive with an arbitrary status
        let metric = drive_status();

        // When: Encoding it
        set_one_hot(&metric, &["0", "1"], DRIVE_STATUSES, &status);

        // Then: Exactly one series is 1
        prop_assert_eq!(one_hot_sum(&metric, "0", "1", DRIVE_STATUSES), 1.0);
    }

    #[test]
    fn test_unknown_status_sets_only_unknown(status in "[a-z]{1,12}X") {
        // Given: A status outside the enumeration (enumerated values have no trailing X)
        let metric = drive_status();

        // When: Encoding it
        set_one_hot(&metric, &["0", "1"], DRIVE_STATUSES, &status);

        // Then: Only the unknown label is 1
        prop_assert_eq!(metric.with_label_values(&["0", "1", UNKNOWN]).get(), 1.0);
        for state in DRIVE_STATUSES {
            prop_assert_eq!(metric.with_label_values(&["0", "1", *state]).get(), 0.0);
        }
    }

    #[test]
    fn test_storage_system_one_hot_sums_to_one(status in "\\PC*") {
        let metric = gauge_vec("storage_system", "status", "status", &["status"])
            .expect("Failed to create gauge");

        set_one_hot(&metric, &[], STORAGE_SYSTEM_STATUSES, &status);

        let sum: f64 = STORAGE_SYSTEM_STATUSES
            .iter()
            .chain([UNKNOWN].iter())
            .map(|state| metric.with_label_values(&[*state]).get())
            .sum();
        prop_assert_eq!(sum, 1.0);
    }

    #[test]
    fn test_utilization_is_always_finite(
        used in -1e18f64..1e18,
        total in prop_oneof![Just(0.0), Just(-0.0), -1e18f64..0.0, 1.0f64..1e18],
    ) {
        // Given: Any used space and a total that may be zero or negative
        // When: Computing the ratio
        let ratio = utilization_ratio(used, total);

        // Then: Never NaN or infinite, and 0 for an empty pool
        prop_assert!(ratio.is_finite());
        if total <= 0.0 {
            prop_assert_eq!(ratio, 0.0);
        }
    }

    #[test]
    fn test_parse_capacity_reads_byte_counts(bytes in 0u64..1_000_000_000_000_000) {
        prop_assert_eq!(parse_capacity(&bytes.to_string()), bytes as f64);
        prop_assert_eq!(parse_capacity(&format!(" {} ", bytes)), bytes as f64);
    }

    #[test]
    fn test_parse_capacity_garbage_is_zero(raw in "[a-zA-Z /]{1,20}") {
        prop_assume!(raw.trim().parse::<f64>().is_err());
        prop_assert_eq!(parse_capacity(&raw), 0.0);
    }

    #[test]
    fn test_any_label_value_renders(tray in "\\PC*", slot in "\\PC*") {
        // Given: Arbitrary label values
        let registry = Registry::new();
        let metric = drive_status();
        registry.register(Box::new(metric.clone())).expect("Failed to register");

        // When: Encoding and rendering
        set_one_hot(&metric, &[tray.as_str(), slot.as_str()], DRIVE_STATUSES, "optimal");

        // Then: Rendering should not fail
        prop_assert!(render(&registry).is_ok());
    }
}
