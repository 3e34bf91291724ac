//! Capped value-frequency accumulation

use crate::dataset::Value;
use std::collections::{HashMap, HashSet};

/// Single-pass frequency table for one field.
///
/// At most `max_tracked` distinct string forms get a counter, chosen by
/// first-seen order. Values first observed after the cap is reached set the
/// `truncated` flag and are invisible in the table, but they still count
/// toward every aggregate total: row count, null/empty counts, and the
/// exact distinct count (kept in a side set).
#[derive(Debug, Clone)]
pub struct ValueCounts {
    max_tracked: usize,
    counts: HashMap<String, u64>,
    overflow: HashSet<String>,
    total_rows: u64,
    null_count: u64,
    empty_count: u64,
    truncated: bool,
}

impl ValueCounts {
    pub fn new(max_tracked: usize) -> Self {
        Self {
            max_tracked,
            counts: HashMap::new(),
            overflow: HashSet::new(),
            total_rows: 0,
            null_count: 0,
            empty_count: 0,
            truncated: false,
        }
    }

    pub fn add(&mut self, value: &Value) {
        self.total_rows += 1;
        if value.is_null() {
            self.null_count += 1;
            return;
        }
        if value.is_empty_text() {
            self.empty_count += 1;
            return;
        }
        let form = match value.string_form() {
            Some(s) => s,
            None => {
                self.null_count += 1;
                return;
            }
        };
        if let Some(count) = self.counts.get_mut(&form) {
            *count += 1;
        } else if self.counts.len() < self.max_tracked {
            self.counts.insert(form, 1);
        } else {
            self.truncated = true;
            self.overflow.insert(form);
        }
    }

    pub fn total_rows(&self) -> u64 {
        self.total_rows
    }

    pub fn null_count(&self) -> u64 {
        self.null_count
    }

    pub fn empty_count(&self) -> u64 {
        self.empty_count
    }

    /// Rows with a present, non-blank value.
    pub fn present_count(&self) -> u64 {
        self.total_rows - self.null_count - self.empty_count
    }

    /// Exact distinct count, including values past the cap.
    pub fn unique_count(&self) -> u64 {
        (self.counts.len() + self.overflow.len()) as u64
    }

    pub fn truncated(&self) -> bool {
        self.truncated
    }

    pub fn counts(&self) -> &HashMap<String, u64> {
        &self.counts
    }

    /// Tracked entries ordered by descending count, ties broken by value,
    /// so downstream output is deterministic.
    pub fn sorted_entries(&self) -> Vec<(&str, u64)> {
        let mut entries: Vec<(&str, u64)> = self
            .counts
            .iter()
            .map(|(value, &count)| (value.as_str(), count))
            .collect();
        entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        entries
    }
}
