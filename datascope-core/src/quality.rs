//! Completeness, cardinality, uniqueness, and evenness scoring

use crate::frequency::ValueCounts;
use crate::util::percentage;
use serde::{Deserialize, Serialize};

/// Quality block, computed for every field regardless of detected kind.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QualityMetrics {
    pub completeness: Completeness,
    pub cardinality: Cardinality,
    pub uniqueness: Uniqueness,
    pub evenness: DistributionEvenness,
    pub assessment: OverallAssessment,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Completeness {
    pub total_rows: u64,
    pub non_null_count: u64,
    pub non_null_pct: f64,
    /// Present and not blank.
    pub filled_count: u64,
    pub fill_rate_pct: f64,
    pub missing_count: u64,
    pub missing_pct: f64,
    pub empty_count: u64,
    pub empty_pct: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CardinalityTier {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cardinality {
    pub unique_count: u64,
    pub ratio: f64,
    pub tier: CardinalityTier,
    pub recommendation: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DuplicatedValue {
    pub value: String,
    pub count: u64,
    pub percentage: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Uniqueness {
    pub unique_count: u64,
    pub unique_pct: f64,
    /// Occurrences beyond the first of any value.
    pub duplicate_count: u64,
    /// Distinct values that occur more than once.
    pub duplicated_value_count: u64,
    pub top_duplicates: Vec<DuplicatedValue>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DistributionEvenness {
    pub entropy: f64,
    pub max_entropy: f64,
    /// Pielou's index: entropy / max entropy, 0 with one distinct value.
    pub evenness: f64,
    pub skew_label: String,
    pub is_skewed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QualityLevel {
    Good,
    Fair,
    Poor,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OverallAssessment {
    pub score: f64,
    pub level: QualityLevel,
    pub color: String,
    pub issues: Vec<String>,
    pub warnings: Vec<String>,
}

const TOP_DUPLICATES: usize = 10;

/// Unique-count at or below this is always low cardinality: binary and
/// ternary fields are dimensions no matter the ratio.
const LOW_UNIQUE_CUTOFF: u64 = 3;
const HIGH_CARDINALITY_RATIO: f64 = 0.8;
const LOW_CARDINALITY_RATIO: f64 = 0.05;

pub fn compute_quality(counts: &ValueCounts) -> QualityMetrics {
    let completeness = compute_completeness(counts);
    let cardinality = compute_cardinality(counts);
    let uniqueness = compute_uniqueness(counts);
    let evenness = compute_evenness(counts);
    let assessment = assess(&completeness, &evenness);

    QualityMetrics {
        completeness,
        cardinality,
        uniqueness,
        evenness,
        assessment,
    }
}

fn compute_completeness(counts: &ValueCounts) -> Completeness {
    let total = counts.total_rows();
    let non_null = total - counts.null_count();
    let filled = counts.present_count();

    Completeness {
        total_rows: total,
        non_null_count: non_null,
        non_null_pct: percentage(non_null, total),
        filled_count: filled,
        fill_rate_pct: percentage(filled, total),
        missing_count: counts.null_count(),
        missing_pct: percentage(counts.null_count(), total),
        empty_count: counts.empty_count(),
        empty_pct: percentage(counts.empty_count(), total),
    }
}

fn compute_cardinality(counts: &ValueCounts) -> Cardinality {
    let unique = counts.unique_count();
    let total = counts.total_rows();
    let ratio = if total == 0 {
        0.0
    } else {
        unique as f64 / total as f64
    };

    let tier = if unique <= LOW_UNIQUE_CUTOFF {
        CardinalityTier::Low
    } else if ratio > HIGH_CARDINALITY_RATIO {
        CardinalityTier::High
    } else if ratio < LOW_CARDINALITY_RATIO {
        CardinalityTier::Low
    } else {
        CardinalityTier::Medium
    };

    let recommendation = match tier {
        CardinalityTier::Low => {
            "Low cardinality: works well as a grouping dimension or categorical encoding"
        }
        CardinalityTier::Medium => {
            "Medium cardinality: suitable for grouping and aggregation"
        }
        CardinalityTier::High => {
            "High cardinality: likely an identifier; exclude from grouping and aggregation"
        }
    };

    Cardinality {
        unique_count: unique,
        ratio,
        tier,
        recommendation: recommendation.to_string(),
    }
}

fn compute_uniqueness(counts: &ValueCounts) -> Uniqueness {
    let unique = counts.unique_count();
    let total = counts.total_rows();
    let present = counts.present_count();
    let duplicate_count = present.saturating_sub(unique);

    let mut duplicates: Vec<DuplicatedValue> = counts
        .sorted_entries()
        .into_iter()
        .filter(|&(_, count)| count > 1)
        .map(|(value, count)| DuplicatedValue {
            value: value.to_string(),
            count,
            percentage: percentage(count, total),
        })
        .collect();
    let duplicated_value_count = duplicates.len() as u64;
    duplicates.truncate(TOP_DUPLICATES);

    Uniqueness {
        unique_count: unique,
        unique_pct: percentage(unique, total),
        duplicate_count,
        duplicated_value_count,
        top_duplicates: duplicates,
    }
}

fn compute_evenness(counts: &ValueCounts) -> DistributionEvenness {
    let tracked_total: u64 = counts.counts().values().sum();
    let distinct = counts.counts().len() as f64;

    let entropy = if tracked_total == 0 {
        0.0
    } else {
        counts
            .sorted_entries()
            .into_iter()
            .map(|(_, c)| {
                let p = c as f64 / tracked_total as f64;
                -p * p.log2()
            })
            .sum()
    };
    let max_entropy = if distinct > 0.0 { distinct.log2() } else { 0.0 };
    let evenness = if max_entropy > 0.0 {
        entropy / max_entropy
    } else {
        0.0
    };

    let skew_label = if evenness >= 0.8 {
        "Very Even"
    } else if evenness >= 0.6 {
        "Fairly Even"
    } else if evenness >= 0.4 {
        "Moderately Skewed"
    } else if evenness >= 0.2 {
        "Skewed"
    } else {
        "Highly Skewed"
    };

    DistributionEvenness {
        entropy,
        max_entropy,
        evenness,
        skew_label: skew_label.to_string(),
        is_skewed: evenness < 0.5,
    }
}

/// Fixed penalty table; reimplementations must match on score exactly.
fn assess(completeness: &Completeness, evenness: &DistributionEvenness) -> OverallAssessment {
    let mut score: f64 = 100.0;
    let mut issues = Vec::new();
    let mut warnings = Vec::new();

    if completeness.non_null_pct < 50.0 {
        score -= 30.0;
        issues.push("Severe missing data: less than half of rows have a value".to_string());
    } else if completeness.non_null_pct < 90.0 {
        score -= 10.0;
        warnings.push("Notable missing data".to_string());
    }

    if completeness.fill_rate_pct < 50.0 {
        score -= 20.0;
        issues.push("More than half of present values are blank".to_string());
    } else if completeness.fill_rate_pct < 80.0 {
        score -= 10.0;
        warnings.push("Many blank values".to_string());
    }

    if evenness.evenness < 0.3 {
        score -= 10.0;
        warnings.push("Highly concentrated value distribution".to_string());
    }

    let score = score.clamp(0.0, 100.0);
    let (level, color) = if score >= 80.0 {
        (QualityLevel::Good, "green")
    } else if score >= 50.0 {
        (QualityLevel::Fair, "yellow")
    } else {
        (QualityLevel::Poor, "red")
    };

    OverallAssessment {
        score,
        level,
        color: color.to_string(),
        issues,
        warnings,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Value;

    fn counts_from(values: &[Option<&str>]) -> ValueCounts {
        let mut counts = ValueCounts::new(1000);
        for v in values {
            match v {
                Some(s) => counts.add(&Value::Text(s.to_string())),
                None => counts.add(&Value::Null),
            }
        }
        counts
    }

    #[test]
    fn test_binary_field_is_low_cardinality() {
        // 2 unique over 1000 rows: ratio 0.002, low by the unique cutoff too
        let values: Vec<Option<&str>> = (0..1000)
            .map(|i| if i % 2 == 0 { Some("yes") } else { Some("no") })
            .collect();
        let quality = compute_quality(&counts_from(&values));
        assert_eq!(quality.cardinality.tier, CardinalityTier::Low);
    }

    #[test]
    fn test_identifier_field_is_high_cardinality() {
        let owned: Vec<String> = (0..1000)
            .map(|i| if i < 950 { format!("id-{}", i) } else { "id-0".to_string() })
            .collect();
        let mut counts = ValueCounts::new(2000);
        for s in &owned {
            counts.add(&Value::Text(s.clone()));
        }
        let quality = compute_quality(&counts);
        assert_eq!(quality.cardinality.tier, CardinalityTier::High);
    }

    #[test]
    fn test_uniform_distribution_is_even() {
        let values = vec![Some("a"), Some("b"), Some("c"), Some("d")];
        let quality = compute_quality(&counts_from(&values));
        assert!((quality.evenness.evenness - 1.0).abs() < 1e-9);
        assert_eq!(quality.evenness.skew_label, "Very Even");
        assert!(!quality.evenness.is_skewed);
    }

    #[test]
    fn test_constant_field_is_fully_skewed() {
        let values = vec![Some("x"); 10];
        let quality = compute_quality(&counts_from(&values));
        assert_eq!(quality.evenness.evenness, 0.0);
        assert_eq!(quality.evenness.max_entropy, 0.0);
        assert_eq!(quality.evenness.skew_label, "Highly Skewed");
        assert!(quality.evenness.is_skewed);
    }

    #[test]
    fn test_completeness_split() {
        let mut counts = ValueCounts::new(1000);
        counts.add(&Value::Text("a".into()));
        counts.add(&Value::Text("".into()));
        counts.add(&Value::Null);
        counts.add(&Value::Null);

        let quality = compute_quality(&counts);
        let c = &quality.completeness;
        assert_eq!(c.non_null_count, 2);
        assert_eq!(c.non_null_pct, 50.0);
        assert_eq!(c.filled_count, 1);
        assert_eq!(c.fill_rate_pct, 25.0);
        assert_eq!(c.empty_count, 1);
        assert_eq!(c.missing_count, 2);
    }

    #[test]
    fn test_duplicates() {
        let values = vec![Some("a"), Some("a"), Some("a"), Some("b"), Some("b"), Some("c")];
        let quality = compute_quality(&counts_from(&values));
        let u = &quality.uniqueness;
        assert_eq!(u.unique_count, 3);
        assert_eq!(u.duplicate_count, 3);
        assert_eq!(u.duplicated_value_count, 2);
        assert_eq!(u.top_duplicates[0].value, "a");
        assert_eq!(u.top_duplicates[0].count, 3);
        assert_eq!(u.top_duplicates[0].percentage, 50.0);
    }

    #[test]
    fn test_score_penalties() {
        // Clean column: full score
        let quality = compute_quality(&counts_from(&[Some("a"), Some("b"), Some("c"), Some("d")]));
        assert_eq!(quality.assessment.score, 100.0);
        assert_eq!(quality.assessment.level, QualityLevel::Good);

        // Mostly null: non-null < 50 (-30) and fill rate < 50 (-20),
        // single distinct value keeps evenness at 0 (-10)
        let values = vec![Some("x"), None, None, None];
        let quality = compute_quality(&counts_from(&values));
        assert_eq!(quality.assessment.score, 40.0);
        assert_eq!(quality.assessment.level, QualityLevel::Poor);
        assert_eq!(quality.assessment.issues.len(), 2);
        assert_eq!(quality.assessment.warnings.len(), 1);
    }

    #[test]
    fn test_empty_column() {
        let counts = ValueCounts::new(1000);
        let quality = compute_quality(&counts);
        assert_eq!(quality.completeness.total_rows, 0);
        assert_eq!(quality.cardinality.unique_count, 0);
        assert_eq!(quality.evenness.evenness, 0.0);
    }
}
