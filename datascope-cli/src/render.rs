//! Plain-text summary rendering of a profile report

use datascope_core::{FieldKind, FieldProfile, ProfileReport};
use std::fmt::Write;

const TOP_VALUES_SHOWN: usize = 5;

pub fn render_summary(report: &ProfileReport) -> String {
    let mut out = String::new();

    if let Some(error) = &report.error {
        let _ = writeln!(out, "error: {}", error);
        return out;
    }

    let _ = writeln!(
        out,
        "{} rows, {} field(s) profiled",
        report.total_rows,
        report.fields.len()
    );

    for field in &report.fields {
        let _ = writeln!(out);
        render_field(&mut out, field);
    }
    out
}

fn render_field(out: &mut String, field: &FieldProfile) {
    let _ = writeln!(out, "== {} ({}) ==", field.name, field.kind.as_str());

    let q = &field.quality;
    let _ = writeln!(
        out,
        "quality: {:.0}/100 ({:?}) | non-null {:.2}% | unique {} | {}",
        q.assessment.score,
        q.assessment.level,
        q.completeness.non_null_pct,
        q.cardinality.unique_count,
        q.evenness.skew_label
    );
    for issue in &q.assessment.issues {
        let _ = writeln!(out, "  issue: {}", issue);
    }
    for warning in &q.assessment.warnings {
        let _ = writeln!(out, "  warning: {}", warning);
    }

    match field.kind {
        FieldKind::Numeric => render_numeric(out, field),
        FieldKind::String => render_string(out, field),
        FieldKind::Date => render_temporal(out, field),
        FieldKind::None => {}
    }

    let dist = &field.distribution;
    let shown = dist.entries.len().min(TOP_VALUES_SHOWN);
    let _ = writeln!(out, "top values:");
    for entry in dist.entries.iter().take(shown) {
        let _ = writeln!(out, "  {} x{} ({:.2}%)", entry.value, entry.count, entry.percentage);
    }
    if dist.truncated {
        let _ = writeln!(out, "  (distribution truncated)");
    }
}

fn render_numeric(out: &mut String, field: &FieldProfile) {
    let Some(analysis) = &field.numeric else { return };
    let Some(stats) = &analysis.stats else { return };
    let _ = writeln!(
        out,
        "numeric: min {} | median {} | max {} | mean {:.4} | stddev {:.4}",
        stats.min, stats.median, stats.max, stats.mean, stats.std_dev
    );
    if let Some(skew) = stats.skewness {
        let _ = writeln!(out, "shape: skewness {:.4}", skew);
    }
}

fn render_string(out: &mut String, field: &FieldProfile) {
    let Some(analysis) = &field.string else { return };
    let Some(stats) = &analysis.stats else { return };
    let _ = writeln!(
        out,
        "lengths: min {} | mean {:.2} | max {}",
        stats.length.min, stats.length.mean, stats.length.max
    );
    let formats = [
        ("email", &stats.formats.email),
        ("url", &stats.formats.url),
        ("phone", &stats.formats.phone),
        ("identifier", &stats.formats.identifier),
        ("date-like", &stats.formats.date_like),
    ];
    for (label, detected) in formats {
        if detected.count > 0 {
            let _ = writeln!(
                out,
                "format {}: {} ({:.2}%)",
                label, detected.count, detected.percentage
            );
        }
    }
}

fn render_temporal(out: &mut String, field: &FieldProfile) {
    let Some(analysis) = &field.temporal else { return };
    let Some(stats) = &analysis.stats else { return };
    let _ = writeln!(
        out,
        "dates: {} to {} ({})",
        stats.range.earliest, stats.range.latest, stats.range.span_text
    );
    let _ = writeln!(
        out,
        "gaps: {} | coverage {:.2}% | trend {:?}",
        stats.gaps.gap_count, stats.gaps.coverage_pct, stats.trend.direction
    );
}
