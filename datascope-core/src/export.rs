//! Inline-table script export of value distributions

use crate::profiler::FieldProfile;
use serde::{Deserialize, Serialize};
use std::fmt::Write;

/// Column separator for the exported inline table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Delimiter {
    Tab,
    Pipe,
    Comma,
    Semicolon,
}

impl Delimiter {
    pub fn as_char(&self) -> char {
        match self {
            Delimiter::Tab => '\t',
            Delimiter::Pipe => '|',
            Delimiter::Comma => ',',
            Delimiter::Semicolon => ';',
        }
    }
}

impl std::str::FromStr for Delimiter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "tab" => Ok(Delimiter::Tab),
            "pipe" => Ok(Delimiter::Pipe),
            "comma" => Ok(Delimiter::Comma),
            "semicolon" => Ok(Delimiter::Semicolon),
            other => Err(format!("unknown delimiter: {}", other)),
        }
    }
}

/// Render one field's distribution as a delimited inline-table text block:
/// a comment header, a `Value/Count/Percentage` header row, and one data
/// row per entry. `max_rows` caps the emitted rows independently of the
/// profiling cap.
pub fn write_inline_table(
    profile: &FieldProfile,
    delimiter: Delimiter,
    max_rows: Option<usize>,
) -> String {
    let d = delimiter.as_char();
    let dist = &profile.distribution;
    let mut out = String::new();

    let _ = writeln!(out, "# Field: {}", profile.name);
    let _ = writeln!(out, "# Total rows: {}", dist.total_rows);
    let _ = writeln!(out, "# Unique values: {}", dist.distinct_values);
    if dist.truncated {
        let _ = writeln!(
            out,
            "# NOTE: distribution truncated; not all distinct values are listed"
        );
    }

    let _ = writeln!(out, "Value{}Count{}Percentage", d, d);

    let limit = max_rows.unwrap_or(dist.entries.len());
    for entry in dist.entries.iter().take(limit) {
        let _ = writeln!(
            out,
            "{}{}{}{}{:.2}",
            sanitize(&entry.value, d),
            d,
            entry.count,
            d,
            entry.percentage
        );
    }

    out
}

/// Render inline tables for every field of a report, separated by blank
/// lines.
pub fn write_inline_tables(
    profiles: &[FieldProfile],
    delimiter: Delimiter,
    max_rows: Option<usize>,
) -> String {
    profiles
        .iter()
        .map(|p| write_inline_table(p, delimiter, max_rows))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Delimiter-unsafe characters become a single space; newlines are
/// stripped so one entry stays one row.
fn sanitize(value: &str, delimiter: char) -> String {
    value
        .replace(['\r', '\n'], "")
        .replace(delimiter, " ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{Dataset, Row, Value};
    use crate::profiler::Profiler;

    fn sample_profile(values: &[&str]) -> FieldProfile {
        let rows: Vec<Row> = values
            .iter()
            .map(|s| {
                let mut row = Row::new();
                row.insert("field".to_string(), Value::Text(s.to_string()));
                row
            })
            .collect();
        let report = Profiler::default().profile(&Dataset::new(rows), &["field".to_string()]);
        report.fields.into_iter().next().unwrap()
    }

    #[test]
    fn test_inline_table_layout() {
        let profile = sample_profile(&["a", "a", "b"]);
        let table = write_inline_table(&profile, Delimiter::Pipe, None);
        let lines: Vec<&str> = table.lines().collect();

        assert_eq!(lines[0], "# Field: field");
        assert_eq!(lines[1], "# Total rows: 3");
        assert_eq!(lines[2], "# Unique values: 2");
        assert_eq!(lines[3], "Value|Count|Percentage");
        assert_eq!(lines[4], "a|2|66.67");
        assert_eq!(lines[5], "b|1|33.33");
    }

    #[test]
    fn test_delimiter_sanitized() {
        let profile = sample_profile(&["x|y\nz"]);
        let table = write_inline_table(&profile, Delimiter::Pipe, None);
        assert!(table.lines().any(|l| l == "x yz|1|100.00"));
    }

    #[test]
    fn test_row_cap() {
        let profile = sample_profile(&["a", "b", "c", "d"]);
        let table = write_inline_table(&profile, Delimiter::Tab, Some(2));
        // 3 header lines + column header + 2 data rows
        assert_eq!(table.lines().count(), 6);
    }

    #[test]
    fn test_delimiter_parse() {
        assert_eq!("tab".parse::<Delimiter>().unwrap(), Delimiter::Tab);
        assert_eq!("PIPE".parse::<Delimiter>().unwrap(), Delimiter::Pipe);
        assert!("dash".parse::<Delimiter>().is_err());
    }
}
