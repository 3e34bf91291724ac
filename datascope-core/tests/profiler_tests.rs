//! Integration tests for the profiling engine

use datascope_core::{
    dataset_from_json_records, profile, profile_all, Dataset, FieldKind, Profiler, ProfilerConfig,
    TrendDirection,
};
use serde_json::json;

fn sample_dataset() -> Dataset {
    let records = vec![
        json!({"id": "A-1", "amount": 10.0, "email": "ann@example.com", "signup": "2024-01-01", "active": true}),
        json!({"id": "A-2", "amount": 20.0, "email": "bob@example.com", "signup": "2024-01-02", "active": false}),
        json!({"id": "A-3", "amount": 20.0, "email": "not-an-email", "signup": "2024-01-10", "active": true}),
        json!({"id": "A-4", "amount": 40.0, "email": null, "signup": "2024-01-11", "active": true}),
    ];
    dataset_from_json_records(&records)
}

#[test]
fn test_empty_dataset() {
    let report = profile(&Dataset::default(), &["anything".to_string()]);
    assert_eq!(report.error.as_deref(), Some("No data available for analysis"));
    assert!(report.fields.is_empty());
}

#[test]
fn test_kind_dispatch_across_fields() {
    let ds = sample_dataset();
    let report = profile_all(&ds);
    assert!(report.error.is_none());

    let kind_of = |name: &str| {
        report
            .fields
            .iter()
            .find(|f| f.name == name)
            .map(|f| f.kind)
            .unwrap()
    };

    assert_eq!(kind_of("amount"), FieldKind::Numeric);
    assert_eq!(kind_of("id"), FieldKind::String);
    assert_eq!(kind_of("signup"), FieldKind::Date);
    assert_eq!(kind_of("email"), FieldKind::String);
}

#[test]
fn test_numeric_block() {
    let ds = sample_dataset();
    let report = profile(&ds, &["amount".to_string()]);
    let stats = report.fields[0]
        .numeric
        .as_ref()
        .unwrap()
        .stats
        .as_ref()
        .unwrap();

    assert_eq!(stats.min, 10.0);
    assert_eq!(stats.max, 40.0);
    assert_eq!(stats.sum, 90.0);
    assert_eq!(stats.mode, vec![20.0]);
    assert!(stats.min <= stats.median && stats.median <= stats.max);
    assert!(stats.variance >= 0.0);
    assert_eq!(stats.std_dev, stats.variance.sqrt());
}

#[test]
fn test_email_detection_through_profile() {
    let ds = sample_dataset();
    let report = profile(&ds, &["email".to_string()]);
    let field = &report.fields[0];
    let stats = field.string.as_ref().unwrap().stats.as_ref().unwrap();

    assert_eq!(stats.formats.email.count, 2);
    // 3 analyzed values, 2 emails
    assert_eq!(stats.formats.email.percentage, 66.67);
    assert_eq!(field.quality.completeness.missing_count, 1);
}

#[test]
fn test_temporal_gaps_through_profile() {
    let ds = sample_dataset();
    let report = profile(&ds, &["signup".to_string()]);
    let stats = report.fields[0]
        .temporal
        .as_ref()
        .unwrap()
        .stats
        .as_ref()
        .unwrap();

    assert_eq!(stats.gaps.gap_count, 1);
    assert_eq!(stats.gaps.largest.as_ref().unwrap().days, 8);
    assert_eq!(stats.range.span_days, 10);
}

#[test]
fn test_distribution_sums_and_null_entry() {
    let ds = sample_dataset();
    let report = profile_all(&ds);

    for field in &report.fields {
        let dist = &field.distribution;
        if !dist.truncated {
            let sum: u64 = dist.entries.iter().map(|e| e.count).sum();
            assert_eq!(sum, dist.total_rows, "field {}", field.name);
        }
    }

    let email = report.fields.iter().find(|f| f.name == "email").unwrap();
    let last = email.distribution.entries.last().unwrap();
    assert_eq!(last.value, "(NULL/Empty)");
    assert_eq!(last.count, 1);
}

#[test]
fn test_boolean_field_is_low_cardinality() {
    let ds = sample_dataset();
    let report = profile(&ds, &["active".to_string()]);
    let field = &report.fields[0];

    assert_eq!(field.quality.cardinality.unique_count, 2);
    assert_eq!(
        field.quality.cardinality.tier,
        datascope_core::quality::CardinalityTier::Low
    );
}

#[test]
fn test_report_is_deterministic() {
    let ds = sample_dataset();
    let names: Vec<String> = ds.field_names();
    let profiler = Profiler::default();

    let a = serde_json::to_string(&profiler.profile(&ds, &names)).unwrap();
    let b = serde_json::to_string(&profiler.profile(&ds, &names)).unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_growth_trend_classification() {
    // Strictly increasing daily counts over 40 days
    let mut records = Vec::new();
    for day in 1..=40u32 {
        let date = if day <= 31 {
            format!("2024-03-{:02}", day)
        } else {
            format!("2024-04-{:02}", day - 31)
        };
        for _ in 0..day {
            records.push(json!({ "seen": date }));
        }
    }
    let ds = dataset_from_json_records(&records);
    let report = profile(&ds, &["seen".to_string()]);
    let trend = &report.fields[0]
        .temporal
        .as_ref()
        .unwrap()
        .stats
        .as_ref()
        .unwrap()
        .trend;

    assert!(matches!(
        trend.direction,
        TrendDirection::StrongGrowth | TrendDirection::ModerateGrowth
    ));
}

#[test]
fn test_truncation_keeps_aggregates_exact() {
    let mut records = Vec::new();
    for i in 0..50 {
        records.push(json!({ "code": format!("code-{}", i) }));
    }
    let ds = dataset_from_json_records(&records);
    let profiler = Profiler::new(ProfilerConfig {
        max_unique_values: 10,
        ..ProfilerConfig::default()
    });
    let report = profiler.profile(&ds, &["code".to_string()]);
    let field = &report.fields[0];

    assert!(field.distribution.truncated);
    assert_eq!(field.distribution.entries.len(), 10);
    assert_eq!(field.distribution.distinct_values, 50);
    assert_eq!(field.quality.cardinality.unique_count, 50);
    assert_eq!(field.quality.completeness.total_rows, 50);
}
