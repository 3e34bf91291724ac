//! Descriptive, spread, and shape statistics for numeric fields

use crate::dataset::Value;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Numeric profile of one field. `stats` is absent when nothing converts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NumericAnalysis {
    pub is_numeric: bool,
    pub total_rows: usize,
    pub null_count: usize,
    pub non_numeric_count: usize,
    pub stats: Option<NumericStats>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NumericStats {
    pub count: usize,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub median: f64,
    pub sum: f64,
    pub range: f64,
    /// Values at maximal frequency; empty when every value is distinct.
    pub mode: Vec<f64>,
    pub variance: f64,
    pub std_dev: f64,
    pub percentiles: Percentiles,
    /// Bias-corrected third standardized moment; absent for n < 3 or zero
    /// spread.
    pub skewness: Option<f64>,
    /// Bias-corrected excess kurtosis; absent for n < 4 or zero spread.
    pub kurtosis: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Percentiles {
    pub p10: f64,
    pub p25: f64,
    pub p50: f64,
    pub p75: f64,
    pub p90: f64,
    pub iqr: f64,
}

/// Linear-interpolation percentile (R-7): position `(n-1)*p` into the
/// sorted slice, interpolated between the floor/ceil neighbors.
pub fn percentile(sorted: &[f64], p: f64) -> f64 {
    if sorted.is_empty() {
        return f64::NAN;
    }
    if sorted.len() == 1 {
        return sorted[0];
    }
    let p = p.clamp(0.0, 1.0);
    let position = (sorted.len() - 1) as f64 * p;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    if lower == upper {
        sorted[lower]
    } else {
        let weight = position - lower as f64;
        sorted[lower] + (sorted[upper] - sorted[lower]) * weight
    }
}

/// Profile a column classified as numeric. Non-convertible values are
/// counted and excluded, never an error.
pub fn compute_numeric_stats(values: &[&Value]) -> NumericAnalysis {
    let total_rows = values.len();
    let mut null_count = 0usize;
    let mut non_numeric_count = 0usize;
    let mut numbers: Vec<f64> = Vec::new();

    for value in values {
        if value.is_null() || value.is_empty_text() {
            null_count += 1;
        } else if let Some(n) = value.as_number() {
            numbers.push(n);
        } else {
            non_numeric_count += 1;
        }
    }

    if numbers.is_empty() {
        return NumericAnalysis {
            is_numeric: false,
            total_rows,
            null_count,
            non_numeric_count,
            stats: None,
        };
    }

    let n = numbers.len();
    let mut sorted = numbers.clone();
    sorted.sort_by(|a, b| a.partial_cmp(b).expect("finite values"));

    let min = sorted[0];
    let max = sorted[n - 1];
    let sum: f64 = numbers.iter().sum();
    let mean = sum / n as f64;
    let median = percentile(&sorted, 0.5);

    let variance = if n > 1 {
        numbers.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1) as f64
    } else {
        0.0
    };
    let std_dev = variance.sqrt();

    let p25 = percentile(&sorted, 0.25);
    let p75 = percentile(&sorted, 0.75);
    let percentiles = Percentiles {
        p10: percentile(&sorted, 0.10),
        p25,
        p50: median,
        p75,
        p90: percentile(&sorted, 0.90),
        iqr: p75 - p25,
    };

    let stats = NumericStats {
        count: n,
        min,
        max,
        mean,
        median,
        sum,
        range: max - min,
        mode: compute_mode(&numbers),
        variance,
        std_dev,
        percentiles,
        skewness: compute_skewness(&numbers, mean, std_dev),
        kurtosis: compute_kurtosis(&numbers, mean, std_dev),
    };

    NumericAnalysis {
        is_numeric: true,
        total_rows,
        null_count,
        non_numeric_count,
        stats: Some(stats),
    }
}

/// Values at maximal frequency. All distinct means no mode at all, not
/// every value.
fn compute_mode(numbers: &[f64]) -> Vec<f64> {
    let mut counts: HashMap<u64, (f64, usize)> = HashMap::new();
    for &x in numbers {
        let entry = counts.entry(x.to_bits()).or_insert((x, 0));
        entry.1 += 1;
    }
    let max_count = counts.values().map(|&(_, c)| c).max().unwrap_or(0);
    if max_count <= 1 {
        return Vec::new();
    }
    let mut mode: Vec<f64> = counts
        .values()
        .filter(|&&(_, c)| c == max_count)
        .map(|&(x, _)| x)
        .collect();
    mode.sort_by(|a, b| a.partial_cmp(b).expect("finite values"));
    mode
}

/// Sample skewness with the `n/((n-1)(n-2))` bias correction.
fn compute_skewness(numbers: &[f64], mean: f64, std_dev: f64) -> Option<f64> {
    let n = numbers.len();
    if n < 3 || std_dev == 0.0 {
        return None;
    }
    let nf = n as f64;
    let m3: f64 = numbers.iter().map(|x| ((x - mean) / std_dev).powi(3)).sum();
    Some(nf / ((nf - 1.0) * (nf - 2.0)) * m3)
}

/// Sample excess kurtosis with the standard finite-sample correction.
fn compute_kurtosis(numbers: &[f64], mean: f64, std_dev: f64) -> Option<f64> {
    let n = numbers.len();
    if n < 4 || std_dev == 0.0 {
        return None;
    }
    let nf = n as f64;
    let m4: f64 = numbers.iter().map(|x| ((x - mean) / std_dev).powi(4)).sum();
    let lead = nf * (nf + 1.0) / ((nf - 1.0) * (nf - 2.0) * (nf - 3.0));
    let tail = 3.0 * (nf - 1.0).powi(2) / ((nf - 2.0) * (nf - 3.0));
    Some(lead * m4 - tail)
}
