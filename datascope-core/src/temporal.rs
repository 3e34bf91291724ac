//! Temporal analysis: date parsing, calendar distribution, gaps, trend

use crate::dataset::Value;
use crate::util::round2;
use chrono::{Datelike, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// How many raw values the format detector samples.
const FORMAT_SAMPLE_LIMIT: usize = 100;

/// Expected cadence between consecutive dates, in days.
const EXPECTED_INTERVAL_DAYS: f64 = 1.0;

/// A gap is flagged when it exceeds this multiple of the expected cadence.
const GAP_FACTOR: f64 = 1.5;

/// At most this many individual gaps are reported.
const MAX_REPORTED_GAPS: usize = 10;

/// Years accepted from the loose fallback formats.
const FALLBACK_YEAR_RANGE: std::ops::RangeInclusive<i32> = 1900..=2100;

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

const WEEKDAY_NAMES: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

/// The date grammars the parse chain recognizes, in the order they are
/// tried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateGrammar {
    IsoDateTime,
    IsoDate,
    EpochMillis,
    EpochSeconds,
    CompactYmd,
    UsSlash,
    EuDot,
    Other,
}

impl fmt::Display for DateGrammar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            DateGrammar::IsoDateTime => "ISO 8601 date-time",
            DateGrammar::IsoDate => "ISO 8601 date",
            DateGrammar::EpochMillis => "epoch milliseconds",
            DateGrammar::EpochSeconds => "epoch seconds",
            DateGrammar::CompactYmd => "compact YYYYMMDD",
            DateGrammar::UsSlash => "US month/day/year",
            DateGrammar::EuDot => "EU day.month.year",
            DateGrammar::Other => "other",
        };
        write!(f, "{}", label)
    }
}

/// Parse a raw value through the grammar chain, first match wins.
pub fn parse_date(raw: &str) -> Option<(NaiveDate, DateGrammar)> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(s) {
        return Some((dt.date_naive(), DateGrammar::IsoDateTime));
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some((dt.date(), DateGrammar::IsoDateTime));
        }
    }
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some((d, DateGrammar::IsoDate));
    }

    if s.len() == 13 && s.bytes().all(|b| b.is_ascii_digit()) {
        if let Some(d) = s
            .parse::<i64>()
            .ok()
            .and_then(chrono::DateTime::from_timestamp_millis)
        {
            return Some((d.date_naive(), DateGrammar::EpochMillis));
        }
    }
    if s.len() == 10 && s.bytes().all(|b| b.is_ascii_digit()) {
        if let Some(d) = s
            .parse::<i64>()
            .ok()
            .and_then(|secs| chrono::DateTime::from_timestamp(secs, 0))
        {
            return Some((d.date_naive(), DateGrammar::EpochSeconds));
        }
    }
    if s.len() == 8 && s.bytes().all(|b| b.is_ascii_digit()) {
        if let Ok(d) = NaiveDate::parse_from_str(s, "%Y%m%d") {
            return Some((d, DateGrammar::CompactYmd));
        }
    }

    if let Ok(d) = NaiveDate::parse_from_str(s, "%m/%d/%Y") {
        return Some((d, DateGrammar::UsSlash));
    }
    if let Ok(d) = NaiveDate::parse_from_str(s, "%d.%m.%Y") {
        return Some((d, DateGrammar::EuDot));
    }

    // Loose fallbacks, accepted only for plausible years
    for fmt in [
        "%Y/%m/%d",
        "%m-%d-%Y",
        "%B %d, %Y",
        "%B %d %Y",
        "%d %B %Y",
        "%b %d, %Y",
        "%b %d %Y",
        "%d %b %Y",
    ] {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            if FALLBACK_YEAR_RANGE.contains(&d.year()) {
                return Some((d, DateGrammar::Other));
            }
        }
    }

    None
}

/// True if the value parses through the grammar chain.
pub fn is_date_value(value: &Value) -> bool {
    value
        .string_form()
        .map(|s| parse_date(&s).is_some())
        .unwrap_or(false)
}

/// Temporal profile of one field. `stats` is absent when nothing parsed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemporalAnalysis {
    pub is_temporal: bool,
    pub total_rows: usize,
    pub null_count: usize,
    pub invalid_count: usize,
    pub parsed_count: usize,
    pub stats: Option<TemporalStats>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemporalStats {
    pub format: FormatDetection,
    pub range: DateRange,
    pub by_year: Vec<BucketCount>,
    pub by_month: Vec<BucketCount>,
    pub by_weekday: Vec<BucketCount>,
    pub by_quarter: Vec<BucketCount>,
    pub gaps: GapAnalysis,
    pub trend: TrendAnalysis,
}

/// Dominant grammar over a bounded sample of raw values.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormatDetection {
    pub dominant: Option<DateGrammar>,
    pub confidence: f64,
    pub sampled: usize,
    pub breakdown: Vec<GrammarCount>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GrammarCount {
    pub grammar: DateGrammar,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DateRange {
    pub earliest: NaiveDate,
    pub latest: NaiveDate,
    pub span_days: i64,
    pub span_text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BucketCount {
    pub label: String,
    pub count: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DateGap {
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub days: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GapAnalysis {
    pub expected_interval_days: f64,
    pub gap_count: usize,
    pub largest: Option<DateGap>,
    pub gaps: Vec<DateGap>,
    /// unique dates / expected dates over the span, as a percentage
    pub coverage_pct: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendDirection {
    InsufficientData,
    Constant,
    ModerateGrowth,
    StrongGrowth,
    ModerateDecline,
    StrongDecline,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendBucketing {
    Daily,
    Weekly,
    Monthly,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendAnalysis {
    pub direction: TrendDirection,
    pub bucketing: Option<TrendBucketing>,
    pub slope: Option<f64>,
    pub bucket_count: usize,
}

/// Profile a column classified as date-like.
pub fn compute_temporal_stats(values: &[&Value]) -> TemporalAnalysis {
    let total_rows = values.len();
    let mut null_count = 0usize;
    let mut invalid_count = 0usize;
    let mut dates: Vec<NaiveDate> = Vec::new();
    let mut raw_sample: Vec<String> = Vec::new();

    for value in values {
        if value.is_null() || value.is_empty_text() {
            null_count += 1;
            continue;
        }
        let raw = match value.string_form() {
            Some(s) => s,
            None => {
                null_count += 1;
                continue;
            }
        };
        if raw_sample.len() < FORMAT_SAMPLE_LIMIT {
            raw_sample.push(raw.clone());
        }
        match parse_date(&raw) {
            Some((date, _)) => dates.push(date),
            None => invalid_count += 1,
        }
    }

    if dates.is_empty() {
        return TemporalAnalysis {
            is_temporal: false,
            total_rows,
            null_count,
            invalid_count,
            parsed_count: 0,
            stats: None,
        };
    }

    let parsed_count = dates.len();
    let format = detect_format(&raw_sample);
    let mut sorted = dates.clone();
    sorted.sort();
    let earliest = sorted[0];
    let latest = sorted[sorted.len() - 1];
    let span_days = (latest - earliest).num_days();

    let range = DateRange {
        earliest,
        latest,
        span_days,
        span_text: span_description(span_days),
    };

    let stats = TemporalStats {
        format,
        range,
        by_year: year_distribution(&sorted),
        by_month: month_distribution(&sorted),
        by_weekday: weekday_distribution(&sorted),
        by_quarter: quarter_distribution(&sorted),
        gaps: detect_gaps(&sorted),
        trend: analyze_trend(&sorted),
    };

    TemporalAnalysis {
        is_temporal: true,
        total_rows,
        null_count,
        invalid_count,
        parsed_count,
        stats: Some(stats),
    }
}

fn detect_format(raw_sample: &[String]) -> FormatDetection {
    let mut counts: HashMap<DateGrammar, usize> = HashMap::new();
    for raw in raw_sample {
        if let Some((_, grammar)) = parse_date(raw) {
            *counts.entry(grammar).or_insert(0) += 1;
        }
    }

    let mut breakdown: Vec<GrammarCount> = counts
        .into_iter()
        .map(|(grammar, count)| GrammarCount { grammar, count })
        .collect();
    breakdown.sort_by(|a, b| b.count.cmp(&a.count).then(a.grammar.cmp(&b.grammar)));

    let sampled = raw_sample.len();
    let (dominant, confidence) = match breakdown.first() {
        Some(top) if sampled > 0 => (
            Some(top.grammar),
            round2(top.count as f64 / sampled as f64),
        ),
        _ => (None, 0.0),
    };

    FormatDetection {
        dominant,
        confidence,
        sampled,
        breakdown,
    }
}

/// Human span text using fixed approximations (7/30/365), not calendar math.
fn span_description(days: i64) -> String {
    fn unit(n: i64, name: &str) -> String {
        if n == 1 {
            format!("1 {}", name)
        } else {
            format!("{} {}s", n, name)
        }
    }

    if days >= 365 {
        let years = days / 365;
        let months = (days % 365) / 30;
        if months > 0 {
            format!("{}, {}", unit(years, "year"), unit(months, "month"))
        } else {
            unit(years, "year")
        }
    } else if days >= 30 {
        let months = days / 30;
        let rest = days % 30;
        if rest > 0 {
            format!("{}, {}", unit(months, "month"), unit(rest, "day"))
        } else {
            unit(months, "month")
        }
    } else if days >= 7 {
        let weeks = days / 7;
        let rest = days % 7;
        if rest > 0 {
            format!("{}, {}", unit(weeks, "week"), unit(rest, "day"))
        } else {
            unit(weeks, "week")
        }
    } else {
        unit(days, "day")
    }
}

fn year_distribution(sorted: &[NaiveDate]) -> Vec<BucketCount> {
    let mut counts: HashMap<i32, u64> = HashMap::new();
    for d in sorted {
        *counts.entry(d.year()).or_insert(0) += 1;
    }
    let mut years: Vec<(i32, u64)> = counts.into_iter().collect();
    years.sort_by_key(|(year, _)| *year);
    years
        .into_iter()
        .map(|(year, count)| BucketCount {
            label: year.to_string(),
            count,
        })
        .collect()
}

fn month_distribution(sorted: &[NaiveDate]) -> Vec<BucketCount> {
    let mut counts = [0u64; 12];
    for d in sorted {
        counts[(d.month0()) as usize] += 1;
    }
    counts
        .iter()
        .enumerate()
        .filter(|(_, &count)| count > 0)
        .map(|(i, &count)| BucketCount {
            label: MONTH_NAMES[i].to_string(),
            count,
        })
        .collect()
}

fn weekday_distribution(sorted: &[NaiveDate]) -> Vec<BucketCount> {
    let mut counts = [0u64; 7];
    for d in sorted {
        counts[d.weekday().num_days_from_monday() as usize] += 1;
    }
    counts
        .iter()
        .enumerate()
        .filter(|(_, &count)| count > 0)
        .map(|(i, &count)| BucketCount {
            label: WEEKDAY_NAMES[i].to_string(),
            count,
        })
        .collect()
}

fn quarter_distribution(sorted: &[NaiveDate]) -> Vec<BucketCount> {
    let mut counts: HashMap<(i32, u32), u64> = HashMap::new();
    for d in sorted {
        let quarter = d.month0() / 3 + 1;
        *counts.entry((d.year(), quarter)).or_insert(0) += 1;
    }
    let mut quarters: Vec<((i32, u32), u64)> = counts.into_iter().collect();
    quarters.sort_by_key(|(key, _)| *key);
    quarters
        .into_iter()
        .map(|((year, quarter), count)| BucketCount {
            label: format!("Q{} {}", quarter, year),
            count,
        })
        .collect()
}

/// Scan sorted dates for intervals above `GAP_FACTOR` times the expected
/// cadence. Consecutive duplicates collapse to a zero-day interval and can
/// never flag.
fn detect_gaps(sorted: &[NaiveDate]) -> GapAnalysis {
    let mut gap_count = 0usize;
    let mut gaps: Vec<DateGap> = Vec::new();
    let mut largest: Option<DateGap> = None;

    for pair in sorted.windows(2) {
        let days = (pair[1] - pair[0]).num_days();
        if days as f64 > GAP_FACTOR * EXPECTED_INTERVAL_DAYS {
            gap_count += 1;
            let gap = DateGap {
                from: pair[0],
                to: pair[1],
                days,
            };
            if largest.as_ref().map_or(true, |g| days > g.days) {
                largest = Some(gap.clone());
            }
            if gaps.len() < MAX_REPORTED_GAPS {
                gaps.push(gap);
            }
        }
    }

    let span_days = (sorted[sorted.len() - 1] - sorted[0]).num_days();
    let expected_dates = span_days + 1;
    let mut unique = sorted.to_vec();
    unique.dedup();
    let coverage = if expected_dates > 0 {
        (unique.len() as f64 / expected_dates as f64 * 100.0).min(100.0)
    } else {
        100.0
    };

    GapAnalysis {
        expected_interval_days: EXPECTED_INTERVAL_DAYS,
        gap_count,
        largest,
        gaps,
        coverage_pct: round2(coverage),
    }
}

fn analyze_trend(sorted: &[NaiveDate]) -> TrendAnalysis {
    let earliest = sorted[0];
    let latest = sorted[sorted.len() - 1];
    let span_days = (latest - earliest).num_days();

    let bucketing = if span_days <= 31 {
        TrendBucketing::Daily
    } else if span_days <= 365 {
        TrendBucketing::Weekly
    } else {
        TrendBucketing::Monthly
    };

    let index_of = |d: &NaiveDate| -> usize {
        match bucketing {
            TrendBucketing::Daily => (*d - earliest).num_days() as usize,
            TrendBucketing::Weekly => {
                let start = |x: &NaiveDate| {
                    *x - chrono::Duration::days(x.weekday().num_days_from_monday() as i64)
                };
                ((start(d) - start(&earliest)).num_days() / 7) as usize
            }
            TrendBucketing::Monthly => {
                let months = |x: &NaiveDate| x.year() as i64 * 12 + x.month0() as i64;
                (months(d) - months(&earliest)) as usize
            }
        }
    };

    let bucket_count = index_of(&latest) + 1;
    let mut counts = vec![0u64; bucket_count];
    for d in sorted {
        counts[index_of(d)] += 1;
    }
    let non_empty = counts.iter().filter(|&&c| c > 0).count();

    if sorted.len() < 3 || non_empty < 2 {
        return TrendAnalysis {
            direction: TrendDirection::InsufficientData,
            bucketing: Some(bucketing),
            slope: None,
            bucket_count,
        };
    }

    let n = counts.len() as f64;
    let sum_x: f64 = (0..counts.len()).map(|i| i as f64).sum();
    let sum_y: f64 = counts.iter().map(|&c| c as f64).sum();
    let sum_xy: f64 = counts.iter().enumerate().map(|(i, &c)| i as f64 * c as f64).sum();
    let sum_x2: f64 = (0..counts.len()).map(|i| (i * i) as f64).sum();
    let denom = n * sum_x2 - sum_x * sum_x;
    let slope = if denom == 0.0 {
        0.0
    } else {
        (n * sum_xy - sum_x * sum_y) / denom
    };

    let mean_count = sum_y / n;
    let relative = if mean_count > 0.0 {
        slope.abs() / mean_count
    } else {
        0.0
    };

    let direction = if relative < 0.05 {
        TrendDirection::Constant
    } else if slope > 0.0 {
        if relative >= 0.2 {
            TrendDirection::StrongGrowth
        } else {
            TrendDirection::ModerateGrowth
        }
    } else if relative >= 0.2 {
        TrendDirection::StrongDecline
    } else {
        TrendDirection::ModerateDecline
    };

    TrendAnalysis {
        direction,
        bucketing: Some(bucketing),
        slope: Some(slope),
        bucket_count,
    }
}
