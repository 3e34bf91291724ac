//! Property-based tests for the statistical primitives

use datascope_core::numeric::{compute_numeric_stats, percentile};
use datascope_core::Value;
use proptest::prelude::*;

fn finite_values() -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(-1e6f64..1e6f64, 1..200)
}

proptest! {
    #[test]
    fn variance_is_non_negative(values in finite_values()) {
        let owned: Vec<Value> = values.iter().map(|&n| Value::Number(n)).collect();
        let refs: Vec<&Value> = owned.iter().collect();
        let stats = compute_numeric_stats(&refs).stats.unwrap();

        prop_assert!(stats.variance >= 0.0);
        prop_assert!((stats.std_dev - stats.variance.sqrt()).abs() < 1e-9);
    }

    #[test]
    fn median_is_bounded(values in finite_values()) {
        let owned: Vec<Value> = values.iter().map(|&n| Value::Number(n)).collect();
        let refs: Vec<&Value> = owned.iter().collect();
        let stats = compute_numeric_stats(&refs).stats.unwrap();

        prop_assert!(stats.min <= stats.median);
        prop_assert!(stats.median <= stats.max);
    }

    #[test]
    fn percentile_hits_endpoints(values in finite_values()) {
        let mut sorted = values.clone();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap());

        prop_assert_eq!(percentile(&sorted, 0.0), sorted[0]);
        prop_assert_eq!(percentile(&sorted, 1.0), sorted[sorted.len() - 1]);
    }

    #[test]
    fn percentile_is_monotonic(values in finite_values(), a in 0.0f64..1.0, b in 0.0f64..1.0) {
        let mut sorted = values.clone();
        sorted.sort_by(|x, y| x.partial_cmp(y).unwrap());

        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(percentile(&sorted, lo) <= percentile(&sorted, hi));
    }

    #[test]
    fn distribution_counts_cover_all_rows(values in prop::collection::vec("[a-e]{1,2}", 1..100)) {
        let rows: Vec<datascope_core::Row> = values
            .iter()
            .map(|s| {
                let mut row = datascope_core::Row::new();
                row.insert("f".to_string(), Value::Text(s.clone()));
                row
            })
            .collect();
        let ds = datascope_core::Dataset::new(rows);
        let report = datascope_core::profile(&ds, &["f".to_string()]);
        let dist = &report.fields[0].distribution;

        let sum: u64 = dist.entries.iter().map(|e| e.count).sum();
        prop_assert_eq!(sum, dist.total_rows);
        prop_assert_eq!(dist.total_rows, values.len() as u64);
    }
}
