//! In-memory dataset model: rows of field->value mappings

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// A single cell value. The engine never guesses at runtime types; every
/// value carries an explicit tag and classification is a pure function
/// over this union.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Number(f64),
    Text(String),
    Bool(bool),
    /// Text the producer already knows to be date-like (e.g. a decoded
    /// date column). Profiled identically to `Text`.
    DateText(String),
}

static NULL_VALUE: Value = Value::Null;

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// True for a present-but-blank value: text that is empty after
    /// trimming. Distinct from `Null`, which means the value is missing.
    pub fn is_empty_text(&self) -> bool {
        match self {
            Value::Text(s) | Value::DateText(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// The canonical string form used for frequency tables and
    /// distribution entries. `None` for missing values.
    pub fn string_form(&self) -> Option<String> {
        match self {
            Value::Null => None,
            Value::Number(n) => Some(format_number(*n)),
            Value::Text(s) | Value::DateText(s) => Some(s.clone()),
            Value::Bool(b) => Some(b.to_string()),
        }
    }

    /// Numeric interpretation: a number, or text that parses to a finite
    /// float. Booleans and blanks do not convert.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) if n.is_finite() => Some(*n),
            Value::Text(s) | Value::DateText(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    return None;
                }
                trimmed.parse::<f64>().ok().filter(|n| n.is_finite())
            }
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.string_form() {
            Some(s) => write!(f, "{}", s),
            None => write!(f, "(null)"),
        }
    }
}

impl From<&serde_json::Value> for Value {
    fn from(v: &serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(*b),
            serde_json::Value::Number(n) => match n.as_f64() {
                Some(f) => Value::Number(f),
                None => Value::Text(n.to_string()),
            },
            serde_json::Value::String(s) => Value::Text(s.clone()),
            other => Value::Text(other.to_string()),
        }
    }
}

/// Numbers with no fractional part print without one, so "42" typed as a
/// number and "42" typed as text land in the same frequency bucket.
pub fn format_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

/// One row: field name -> value.
pub type Row = HashMap<String, Value>;

/// An ordered sequence of rows, fully materialized in memory. Row order is
/// preserved from the source but carries no meaning for the engine.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Dataset {
    rows: Vec<Row>,
}

impl Dataset {
    pub fn new(rows: Vec<Row>) -> Self {
        Self { rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Field names present in the first row, sorted for stable output.
    pub fn field_names(&self) -> Vec<String> {
        let mut names: Vec<String> = match self.rows.first() {
            Some(row) => row.keys().cloned().collect(),
            None => Vec::new(),
        };
        names.sort();
        names
    }

    /// The column for `field`, one value per row. A row without the key
    /// contributes a null, it is not an error.
    pub fn column(&self, field: &str) -> Vec<&Value> {
        self.rows
            .iter()
            .map(|row| row.get(field).unwrap_or(&NULL_VALUE))
            .collect()
    }
}
