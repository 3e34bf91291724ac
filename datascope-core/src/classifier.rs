//! Threshold-based field type detection

use crate::dataset::Value;
use crate::temporal::is_date_value;
use serde::{Deserialize, Serialize};

/// Share of sampled non-null values that must convert to a finite number.
pub const NUMERIC_THRESHOLD: f64 = 0.9;

/// Share of sampled non-null values that must be non-numeric text.
pub const STRING_THRESHOLD: f64 = 0.8;

/// Share of sampled non-null values that must parse as dates. The source
/// system used two different values on two code paths; the profiling entry
/// point's 0.6 is the one kept.
pub const DATE_THRESHOLD: f64 = 0.6;

/// Detection samples at most this many values per field.
pub const SAMPLE_LIMIT: usize = 1000;

/// Detected field kind. `None` means no kind cleared its threshold; the
/// field still gets quality metrics and a distribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    Numeric,
    String,
    Date,
    None,
}

impl FieldKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldKind::Numeric => "numeric",
            FieldKind::String => "string",
            FieldKind::Date => "date",
            FieldKind::None => "none",
        }
    }
}

/// Classification thresholds, kept as explicit values so call sites never
/// hardcode them.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Thresholds {
    pub numeric: f64,
    pub string: f64,
    pub date: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            numeric: NUMERIC_THRESHOLD,
            string: STRING_THRESHOLD,
            date: DATE_THRESHOLD,
        }
    }
}

/// True when the value converts to a finite number.
pub fn is_numeric_value(value: &Value) -> bool {
    value.as_number().is_some()
}

/// True for present text that is not a pure numeric representation.
pub fn is_string_value(value: &Value) -> bool {
    !value.is_null() && !is_numeric_value(value)
}

/// Fixed-stride sample of up to `SAMPLE_LIMIT` indices, so detection cost
/// stays bounded on very large columns.
pub fn sample_indices(len: usize) -> Vec<usize> {
    if len == 0 {
        return Vec::new();
    }
    let step = std::cmp::max(1, len / SAMPLE_LIMIT);
    (0..len)
        .step_by(step)
        .take(SAMPLE_LIMIT)
        .collect()
}

/// Classify a column by sampling values against the per-kind predicates.
/// Numeric wins over date wins over string; a column of all nulls is
/// `None`.
pub fn classify(values: &[&Value], thresholds: &Thresholds) -> FieldKind {
    let mut non_null = 0u64;
    let mut numeric = 0u64;
    let mut date = 0u64;
    let mut string = 0u64;

    for &i in &sample_indices(values.len()) {
        let value = values[i];
        if value.is_null() || value.is_empty_text() {
            continue;
        }
        non_null += 1;
        if is_numeric_value(value) {
            numeric += 1;
        } else {
            string += 1;
        }
        if is_date_value(value) {
            date += 1;
        }
    }

    if non_null == 0 {
        return FieldKind::None;
    }

    let ratio = |count: u64| count as f64 / non_null as f64;
    if ratio(numeric) >= thresholds.numeric {
        FieldKind::Numeric
    } else if ratio(date) >= thresholds.date {
        FieldKind::Date
    } else if ratio(string) >= thresholds.string {
        FieldKind::String
    } else {
        FieldKind::None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(values: &[&str]) -> Vec<Value> {
        values.iter().map(|s| Value::Text(s.to_string())).collect()
    }

    fn classify_owned(values: &[Value]) -> FieldKind {
        let refs: Vec<&Value> = values.iter().collect();
        classify(&refs, &Thresholds::default())
    }

    #[test]
    fn test_numeric_column() {
        let values = texts(&["1", "2.5", "-3", "4e2", "100"]);
        assert_eq!(classify_owned(&values), FieldKind::Numeric);
    }

    #[test]
    fn test_string_column() {
        let values = texts(&["alpha", "beta", "gamma", "delta"]);
        assert_eq!(classify_owned(&values), FieldKind::String);
    }

    #[test]
    fn test_date_column() {
        let values = texts(&["2024-01-01", "2024-02-15", "03/20/2024", "not a date", "2024-05-01"]);
        // 4 of 5 parse: above the 0.6 date threshold
        assert_eq!(classify_owned(&values), FieldKind::Date);
    }

    #[test]
    fn test_numeric_wins_over_string() {
        // 9 numbers + 1 word: 0.9 numeric ratio clears the numeric bar
        let mut raw: Vec<&str> = vec!["1"; 9];
        raw.push("oops");
        let values = texts(&raw);
        assert_eq!(classify_owned(&values), FieldKind::Numeric);
    }

    #[test]
    fn test_mixed_column_is_none() {
        let values = texts(&["1", "2", "apple", "3", "pear", "4"]);
        // numeric 4/6 and string 2/6: nothing clears its threshold
        assert_eq!(classify_owned(&values), FieldKind::None);
    }

    #[test]
    fn test_all_null_is_none() {
        let values = vec![Value::Null, Value::Null, Value::Text(String::new())];
        assert_eq!(classify_owned(&values), FieldKind::None);
    }

    #[test]
    fn test_nulls_excluded_from_denominator() {
        let mut values = texts(&["10", "20", "30"]);
        values.push(Value::Null);
        values.push(Value::Null);
        assert_eq!(classify_owned(&values), FieldKind::Numeric);
    }

    #[test]
    fn test_numeric_text_is_not_string_typed() {
        assert!(!is_string_value(&Value::Text("42.5".into())));
        assert!(is_string_value(&Value::Text("42x".into())));
        assert!(!is_string_value(&Value::Null));
    }

    #[test]
    fn test_sample_stride() {
        assert_eq!(sample_indices(10).len(), 10);
        let sampled = sample_indices(5000);
        assert!(sampled.len() <= SAMPLE_LIMIT);
        assert_eq!(sampled[0], 0);
        assert_eq!(sampled[1], 5);
    }
}
