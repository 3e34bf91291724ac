//! String pattern analysis: lengths, affixes, composition, formats

use crate::dataset::Value;
use crate::util::{percentage, round2};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

const TOP_AFFIXES: usize = 10;
const MAX_AFFIX_LEN: usize = 10;
const FORMAT_SAMPLE_LIMIT: usize = 5;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$").expect("email regex")
});

static URL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:https?|ftp)://[^\s/$.?#]\S*$").expect("url regex")
});

/// Country-specific phone grammars, tried in order. Checked before the
/// identifier grammars so a dashed number is never counted twice.
static PHONE_PATTERNS: Lazy<Vec<(&'static str, Regex)>> = Lazy::new(|| {
    vec![
        (
            "US",
            Regex::new(r"^\+?1?[-. ]?\(?\d{3}\)?[-. ]?\d{3}[-. ]?\d{4}$").expect("US phone"),
        ),
        (
            "UK",
            Regex::new(r"^(?:\+44[-. ]?|0)\d{4}[-. ]?\d{6}$").expect("UK phone"),
        ),
        (
            "DE",
            Regex::new(r"^(?:\+49[-. ]?|0)\d{3,5}[-. ]?\d{4,8}$").expect("DE phone"),
        ),
        (
            "FR",
            Regex::new(r"^(?:\+33[-. ]?|0)[1-9](?:[-. ]?\d{2}){4}$").expect("FR phone"),
        ),
    ]
});

/// National identifier grammars, tried in order after the phone check.
static IDENTIFIER_PATTERNS: Lazy<Vec<(&'static str, Regex)>> = Lazy::new(|| {
    vec![
        ("US SSN", Regex::new(r"^\d{3}-\d{2}-\d{4}$").expect("SSN")),
        ("US EIN", Regex::new(r"^\d{2}-\d{7}$").expect("EIN")),
        (
            "UK NINO",
            Regex::new(r"^[A-CEGHJ-PR-TW-Z]{2}\s?\d{2}\s?\d{2}\s?\d{2}\s?[A-D]$").expect("NINO"),
        ),
    ]
});

static DATE_LIKE_PATTERNS: Lazy<Vec<(&'static str, Regex)>> = Lazy::new(|| {
    let month = r"(?:jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec)[a-z]*";
    vec![
        (
            "ISO 8601",
            Regex::new(r"^\d{4}-\d{2}-\d{2}(?:[T ].+)?$").expect("ISO date"),
        ),
        (
            "US slash",
            Regex::new(r"^\d{1,2}/\d{1,2}/\d{2,4}$").expect("US date"),
        ),
        (
            "EU dot",
            Regex::new(r"^\d{1,2}\.\d{1,2}\.\d{2,4}$").expect("EU date"),
        ),
        (
            "long form",
            Regex::new(&format!(
                r"(?i)^(?:{m} \d{{1,2}},? \d{{4}}|\d{{1,2}} {m},? \d{{4}})$",
                m = month
            ))
            .expect("long-form date"),
        ),
    ]
});

/// String profile of one field. `stats` is absent when no values exist.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StringAnalysis {
    pub total_rows: usize,
    pub null_count: usize,
    /// Present values that were analyzed (blanks included, at length 0).
    pub analyzed_count: usize,
    pub stats: Option<StringStats>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StringStats {
    pub length: LengthStats,
    pub prefixes: Vec<AffixCount>,
    pub suffixes: Vec<AffixCount>,
    pub characters: CharacterComposition,
    pub casing: CaseAnalysis,
    pub formats: FormatAnalysis,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LengthStats {
    pub min: usize,
    pub max: usize,
    pub mean: f64,
    pub most_common_length: usize,
    pub most_common_count: u64,
    pub histogram: Vec<LengthBucket>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LengthBucket {
    pub length: usize,
    pub count: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AffixCount {
    pub value: String,
    pub count: u64,
    pub percentage: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CharacterComposition {
    pub total_chars: u64,
    pub alphabetic_count: u64,
    pub alphabetic_pct: f64,
    pub numeric_count: u64,
    pub numeric_pct: f64,
    pub alphanumeric_pct: f64,
    pub whitespace_count: u64,
    pub whitespace_pct: f64,
    pub special_count: u64,
    pub special_pct: f64,
    pub non_ascii_count: u64,
    pub non_ascii_pct: f64,
    pub leading_whitespace_values: u64,
    pub trailing_whitespace_values: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseAnalysis {
    /// Values containing at least one letter; the others are not cased.
    pub lettered_count: u64,
    pub upper_count: u64,
    pub lower_count: u64,
    pub mixed_count: u64,
    /// Mixed values where every word is capitalized-first, lowercase-rest.
    pub title_case_count: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormatAnalysis {
    pub email: FormatMatch,
    pub url: FormatMatch,
    pub phone: FormatMatch,
    pub identifier: FormatMatch,
    pub date_like: FormatMatch,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormatMatch {
    pub count: u64,
    pub percentage: f64,
    pub samples: Vec<String>,
    /// Per-country or per-grammar counts; empty for single-grammar
    /// detectors.
    pub breakdown: Vec<BreakdownCount>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BreakdownCount {
    pub label: String,
    pub count: u64,
}

/// Profile a column classified as string (or explicitly requested).
pub fn compute_string_stats(values: &[&Value]) -> StringAnalysis {
    let total_rows = values.len();
    let mut null_count = 0usize;
    let mut analyzed: Vec<String> = Vec::new();

    for value in values {
        match value.string_form() {
            Some(s) => analyzed.push(s),
            None => null_count += 1,
        }
    }

    if analyzed.is_empty() {
        return StringAnalysis {
            total_rows,
            null_count,
            analyzed_count: 0,
            stats: None,
        };
    }

    let analyzed_count = analyzed.len();
    let stats = StringStats {
        length: length_stats(&analyzed),
        prefixes: mine_affixes(&analyzed, Affix::Prefix),
        suffixes: mine_affixes(&analyzed, Affix::Suffix),
        characters: character_composition(&analyzed),
        casing: case_analysis(&analyzed),
        formats: detect_formats(&analyzed),
    };

    StringAnalysis {
        total_rows,
        null_count,
        analyzed_count,
        stats: Some(stats),
    }
}

fn length_stats(values: &[String]) -> LengthStats {
    let lengths: Vec<usize> = values.iter().map(|v| v.chars().count()).collect();
    let min = *lengths.iter().min().expect("non-empty");
    let max = *lengths.iter().max().expect("non-empty");
    let mean = round2(lengths.iter().sum::<usize>() as f64 / lengths.len() as f64);

    let mut histogram: HashMap<usize, u64> = HashMap::new();
    for &len in &lengths {
        *histogram.entry(len).or_insert(0) += 1;
    }
    let mut buckets: Vec<LengthBucket> = histogram
        .into_iter()
        .map(|(length, count)| LengthBucket { length, count })
        .collect();
    buckets.sort_by_key(|b| b.length);

    let most_common = buckets
        .iter()
        .max_by(|a, b| a.count.cmp(&b.count).then(b.length.cmp(&a.length)))
        .expect("non-empty");

    LengthStats {
        min,
        max,
        mean,
        most_common_length: most_common.length,
        most_common_count: most_common.count,
        histogram: buckets,
    }
}

#[derive(Clone, Copy)]
enum Affix {
    Prefix,
    Suffix,
}

/// Register every prefix (or suffix) of length 2..=min(len, 10) and keep
/// the ten most frequent that occur at least twice.
fn mine_affixes(values: &[String], which: Affix) -> Vec<AffixCount> {
    let mut counts: HashMap<String, u64> = HashMap::new();

    for value in values {
        let chars: Vec<char> = value.chars().collect();
        if chars.len() < 2 {
            continue;
        }
        let limit = chars.len().min(MAX_AFFIX_LEN);
        for k in 2..=limit {
            let affix: String = match which {
                Affix::Prefix => chars[..k].iter().collect(),
                Affix::Suffix => chars[chars.len() - k..].iter().collect(),
            };
            *counts.entry(affix).or_insert(0) += 1;
        }
    }

    let mut frequent: Vec<(String, u64)> = counts
        .into_iter()
        .filter(|&(_, count)| count >= 2)
        .collect();
    frequent.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    frequent.truncate(TOP_AFFIXES);

    let total = values.len() as u64;
    frequent
        .into_iter()
        .map(|(value, count)| AffixCount {
            percentage: percentage(count, total),
            value,
            count,
        })
        .collect()
}

fn character_composition(values: &[String]) -> CharacterComposition {
    let mut total = 0u64;
    let mut alphabetic = 0u64;
    let mut numeric = 0u64;
    let mut whitespace = 0u64;
    let mut special = 0u64;
    let mut non_ascii = 0u64;
    let mut leading_ws = 0u64;
    let mut trailing_ws = 0u64;

    for value in values {
        if value.starts_with(char::is_whitespace) {
            leading_ws += 1;
        }
        if value.ends_with(char::is_whitespace) {
            trailing_ws += 1;
        }
        for ch in value.chars() {
            total += 1;
            if !ch.is_ascii() {
                non_ascii += 1;
            } else if ch.is_ascii_alphabetic() {
                alphabetic += 1;
            } else if ch.is_ascii_digit() {
                numeric += 1;
            } else if ch.is_whitespace() {
                whitespace += 1;
            } else {
                special += 1;
            }
        }
    }

    CharacterComposition {
        total_chars: total,
        alphabetic_count: alphabetic,
        alphabetic_pct: percentage(alphabetic, total),
        numeric_count: numeric,
        numeric_pct: percentage(numeric, total),
        alphanumeric_pct: percentage(alphabetic + numeric, total),
        whitespace_count: whitespace,
        whitespace_pct: percentage(whitespace, total),
        special_count: special,
        special_pct: percentage(special, total),
        non_ascii_count: non_ascii,
        non_ascii_pct: percentage(non_ascii, total),
        leading_whitespace_values: leading_ws,
        trailing_whitespace_values: trailing_ws,
    }
}

fn case_analysis(values: &[String]) -> CaseAnalysis {
    let mut lettered = 0u64;
    let mut upper = 0u64;
    let mut lower = 0u64;
    let mut mixed = 0u64;
    let mut title = 0u64;

    for value in values {
        if !value.chars().any(char::is_alphabetic) {
            continue;
        }
        lettered += 1;
        let has_upper = value.chars().any(char::is_uppercase);
        let has_lower = value.chars().any(char::is_lowercase);
        if has_upper && !has_lower {
            upper += 1;
        } else if has_lower && !has_upper {
            lower += 1;
        } else {
            mixed += 1;
            if is_title_case(value) {
                title += 1;
            }
        }
    }

    CaseAnalysis {
        lettered_count: lettered,
        upper_count: upper,
        lower_count: lower,
        mixed_count: mixed,
        title_case_count: title,
    }
}

/// Every whitespace-delimited word with letters reads capitalized-first,
/// lowercase-rest.
fn is_title_case(value: &str) -> bool {
    let mut saw_word = false;
    for word in value.split_whitespace() {
        if !word.chars().any(char::is_alphabetic) {
            continue;
        }
        saw_word = true;
        let mut seen_first = false;
        for ch in word.chars() {
            if !ch.is_alphabetic() {
                continue;
            }
            if !seen_first {
                if !ch.is_uppercase() {
                    return false;
                }
                seen_first = true;
            } else if !ch.is_lowercase() {
                return false;
            }
        }
    }
    saw_word
}

fn detect_formats(values: &[String]) -> FormatAnalysis {
    let total = values.len() as u64;
    let mut email = FormatAccumulator::default();
    let mut url = FormatAccumulator::default();
    let mut phone = FormatAccumulator::default();
    let mut identifier = FormatAccumulator::default();
    let mut date_like = FormatAccumulator::default();

    for value in values {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            continue;
        }

        if EMAIL_RE.is_match(trimmed) {
            email.record(trimmed, None);
        }
        if URL_RE.is_match(trimmed) {
            url.record(trimmed, None);
        }

        // Phone before identifier: a dashed number counts once
        let phone_country = PHONE_PATTERNS
            .iter()
            .find(|(_, re)| re.is_match(trimmed))
            .map(|(country, _)| *country);
        if let Some(country) = phone_country {
            phone.record(trimmed, Some(country));
        } else if let Some(&(kind, _)) = IDENTIFIER_PATTERNS
            .iter()
            .find(|(_, re)| re.is_match(trimmed))
        {
            identifier.record(trimmed, Some(kind));
        }

        if let Some(&(grammar, _)) = DATE_LIKE_PATTERNS
            .iter()
            .find(|(_, re)| re.is_match(trimmed))
        {
            date_like.record(trimmed, Some(grammar));
        }
    }

    FormatAnalysis {
        email: email.finish(total),
        url: url.finish(total),
        phone: phone.finish(total),
        identifier: identifier.finish(total),
        date_like: date_like.finish(total),
    }
}

#[derive(Default)]
struct FormatAccumulator {
    count: u64,
    samples: Vec<String>,
    breakdown: HashMap<&'static str, u64>,
}

impl FormatAccumulator {
    fn record(&mut self, value: &str, label: Option<&'static str>) {
        self.count += 1;
        if self.samples.len() < FORMAT_SAMPLE_LIMIT {
            self.samples.push(value.to_string());
        }
        if let Some(label) = label {
            *self.breakdown.entry(label).or_insert(0) += 1;
        }
    }

    fn finish(self, total: u64) -> FormatMatch {
        let mut breakdown: Vec<BreakdownCount> = self
            .breakdown
            .into_iter()
            .map(|(label, count)| BreakdownCount {
                label: label.to_string(),
                count,
            })
            .collect();
        breakdown.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.label.cmp(&b.label)));

        FormatMatch {
            count: self.count,
            percentage: percentage(self.count, total),
            samples: self.samples,
            breakdown,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn analyze(values: &[&str]) -> StringStats {
        let owned: Vec<Value> = values.iter().map(|s| Value::Text(s.to_string())).collect();
        let refs: Vec<&Value> = owned.iter().collect();
        compute_string_stats(&refs).stats.unwrap()
    }

    #[test]
    fn test_length_stats() {
        let stats = analyze(&["ab", "abcd", "ab", "xyz"]);
        assert_eq!(stats.length.min, 2);
        assert_eq!(stats.length.max, 4);
        assert_eq!(stats.length.mean, 2.75);
        assert_eq!(stats.length.most_common_length, 2);
        assert_eq!(stats.length.most_common_count, 2);
        let lengths: Vec<usize> = stats.length.histogram.iter().map(|b| b.length).collect();
        assert_eq!(lengths, vec![2, 3, 4]);
    }

    #[test]
    fn test_prefix_mining() {
        let stats = analyze(&["ORD-1001", "ORD-1002", "ORD-2001", "misc"]);
        let top = &stats.prefixes[0];
        assert_eq!(top.count, 3);
        assert_eq!(top.percentage, 75.0);
        assert!(top.value.starts_with("OR"));
        // Singleton affixes are dropped
        assert!(stats.prefixes.iter().all(|a| a.count >= 2));
    }

    #[test]
    fn test_suffix_mining() {
        let stats = analyze(&["report.csv", "data.csv", "image.png"]);
        assert!(stats
            .suffixes
            .iter()
            .any(|a| a.value == ".csv" && a.count == 2));
    }

    #[test]
    fn test_email_detection_percentage() {
        let stats = analyze(&["user@example.com", "not-an-email"]);
        assert_eq!(stats.formats.email.count, 1);
        assert_eq!(stats.formats.email.percentage, 50.0);
        assert_eq!(stats.formats.email.samples, vec!["user@example.com"]);
    }

    #[test]
    fn test_url_detection() {
        let stats = analyze(&["https://example.com/a", "http://test.org", "ftp://files", "plain"]);
        assert_eq!(stats.formats.url.count, 3);
    }

    #[test]
    fn test_phone_checked_before_identifier() {
        // SSN-shaped and phone-shaped values must not double count
        let stats = analyze(&["555-123-4567", "123-45-6789", "+44 1632 960123"]);
        assert_eq!(stats.formats.phone.count, 2);
        assert_eq!(stats.formats.identifier.count, 1);
        let ssn = &stats.formats.identifier.breakdown[0];
        assert_eq!(ssn.label, "US SSN");
        assert_eq!(ssn.count, 1);
        assert!(stats
            .formats
            .phone
            .breakdown
            .iter()
            .any(|b| b.label == "UK"));
    }

    #[test]
    fn test_date_like_breakdown() {
        let stats = analyze(&["2024-01-05", "1/15/2024", "15.1.2024", "January 15, 2024", "x"]);
        assert_eq!(stats.formats.date_like.count, 4);
        let labels: Vec<&str> = stats
            .formats
            .date_like
            .breakdown
            .iter()
            .map(|b| b.label.as_str())
            .collect();
        assert!(labels.contains(&"ISO 8601"));
        assert!(labels.contains(&"long form"));
    }

    #[test]
    fn test_case_analysis() {
        let stats = analyze(&["HELLO", "world", "Mixed Case", "Title Case Here", "1234"]);
        let casing = &stats.casing;
        assert_eq!(casing.lettered_count, 4);
        assert_eq!(casing.upper_count, 1);
        assert_eq!(casing.lower_count, 1);
        assert_eq!(casing.mixed_count, 2);
        assert_eq!(casing.title_case_count, 2);
    }

    #[test]
    fn test_character_composition() {
        let stats = analyze(&["ab1 !", " x"]);
        let chars = &stats.characters;
        assert_eq!(chars.total_chars, 7);
        assert_eq!(chars.alphabetic_count, 3);
        assert_eq!(chars.numeric_count, 1);
        assert_eq!(chars.whitespace_count, 2);
        assert_eq!(chars.special_count, 1);
        assert_eq!(chars.leading_whitespace_values, 1);
        assert_eq!(chars.trailing_whitespace_values, 0);
    }

    #[test]
    fn test_non_ascii() {
        let stats = analyze(&["héllo"]);
        assert_eq!(stats.characters.non_ascii_count, 1);
        assert_eq!(stats.characters.alphabetic_count, 4);
    }

    #[test]
    fn test_no_values() {
        let values = vec![Value::Null];
        let refs: Vec<&Value> = values.iter().collect();
        let analysis = compute_string_stats(&refs);
        assert!(analysis.stats.is_none());
        assert_eq!(analysis.null_count, 1);
    }
}
