//! Basic usage example for the DataScope library

use datascope_core::{dataset_from_json_records, FieldKind, Profiler, ProfilerConfig};
use serde_json::json;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    let records = vec![
        json!({"order_id": "ORD-1001", "amount": 129.99, "placed": "2024-01-03", "email": "ann@example.com"}),
        json!({"order_id": "ORD-1002", "amount": 59.50, "placed": "2024-01-04", "email": "bob@example.com"}),
        json!({"order_id": "ORD-1003", "amount": 59.50, "placed": "2024-01-12", "email": null}),
        json!({"order_id": "ORD-1004", "amount": 310.00, "placed": "2024-01-13", "email": "cara@example.com"}),
    ];
    let dataset = dataset_from_json_records(&records);

    let profiler = Profiler::new(ProfilerConfig::default());
    let report = profiler.profile_all(&dataset);

    for field in &report.fields {
        println!("=== {} ({}) ===", field.name, field.kind.as_str());
        println!(
            "quality score: {:.0}/100, unique values: {}",
            field.quality.assessment.score, field.quality.cardinality.unique_count
        );

        match field.kind {
            FieldKind::Numeric => {
                let stats = field.numeric.as_ref().and_then(|a| a.stats.as_ref());
                if let Some(stats) = stats {
                    println!(
                        "min {} / median {} / max {}, mean {:.2}",
                        stats.min, stats.median, stats.max, stats.mean
                    );
                }
            }
            FieldKind::Date => {
                let stats = field.temporal.as_ref().and_then(|a| a.stats.as_ref());
                if let Some(stats) = stats {
                    println!(
                        "{} to {} ({}), {} gap(s)",
                        stats.range.earliest,
                        stats.range.latest,
                        stats.range.span_text,
                        stats.gaps.gap_count
                    );
                }
            }
            FieldKind::String => {
                let stats = field.string.as_ref().and_then(|a| a.stats.as_ref());
                if let Some(stats) = stats {
                    println!(
                        "lengths {}..{}, {} email(s) detected",
                        stats.length.min, stats.length.max, stats.formats.email.count
                    );
                }
            }
            FieldKind::None => {}
        }

        for entry in field.distribution.entries.iter().take(3) {
            println!("  {} x{} ({:.2}%)", entry.value, entry.count, entry.percentage);
        }
        println!();
    }

    Ok(())
}
