//! Profiling orchestrator: one FieldProfile per requested field

use crate::classifier::{self, FieldKind, Thresholds};
use crate::dataset::Dataset;
use crate::frequency::ValueCounts;
use crate::numeric::{self, NumericAnalysis};
use crate::quality::{self, QualityMetrics};
use crate::strings::{self, StringAnalysis};
use crate::temporal::{self, TemporalAnalysis};
use crate::util::percentage;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Default cap on distinct values tracked per field.
pub const DEFAULT_MAX_UNIQUE_VALUES: usize = 1000;

/// Callers are expected to confirm with the user before profiling datasets
/// larger than this; the engine itself runs uninterruptible.
pub const LARGE_DATASET_THRESHOLD: usize = 100_000;

/// Label of the synthetic distribution entry for missing and blank values.
pub const NULL_ENTRY_LABEL: &str = "(NULL/Empty)";

/// Engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfilerConfig {
    /// Distinct values tracked per field, first-seen order.
    pub max_unique_values: usize,
    /// Classification thresholds.
    pub thresholds: Thresholds,
    /// Row count above which front ends should ask before profiling.
    pub large_dataset_threshold: usize,
}

impl Default for ProfilerConfig {
    fn default() -> Self {
        Self {
            max_unique_values: DEFAULT_MAX_UNIQUE_VALUES,
            thresholds: Thresholds::default(),
            large_dataset_threshold: LARGE_DATASET_THRESHOLD,
        }
    }
}

/// One entry of the capped value-frequency table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistributionEntry {
    pub value: String,
    pub count: u64,
    pub percentage: f64,
}

/// Value-frequency table for one field, ordered by descending count with
/// the synthetic null entry appended last.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValueDistribution {
    pub entries: Vec<DistributionEntry>,
    pub truncated: bool,
    /// Exact distinct count, including values invisible in `entries`.
    pub distinct_values: u64,
    pub total_rows: u64,
}

/// The profiling result for one field. Immutable once built; downstream
/// consumers only read it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldProfile {
    pub name: String,
    pub kind: FieldKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub numeric: Option<NumericAnalysis>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub string: Option<StringAnalysis>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temporal: Option<TemporalAnalysis>,
    pub quality: QualityMetrics,
    pub distribution: ValueDistribution,
}

/// Top-level profiling result, suitable for direct serialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileReport {
    pub error: Option<String>,
    pub total_rows: usize,
    pub fields: Vec<FieldProfile>,
}

/// The profiling engine. Pure and synchronous: every call builds its own
/// frequency tables, and identical input yields identical output.
#[derive(Debug, Clone, Default)]
pub struct Profiler {
    config: ProfilerConfig,
}

impl Profiler {
    pub fn new(config: ProfilerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ProfilerConfig {
        &self.config
    }

    /// Profile the named fields of a dataset. An empty dataset is the only
    /// top-level error; each field otherwise gets a profile no matter how
    /// degenerate its values are.
    pub fn profile(&self, dataset: &Dataset, field_names: &[String]) -> ProfileReport {
        if dataset.is_empty() {
            return ProfileReport {
                error: Some("No data available for analysis".to_string()),
                total_rows: 0,
                fields: Vec::new(),
            };
        }

        let fields: Vec<FieldProfile> = field_names
            .iter()
            .map(|name| self.profile_field(dataset, name))
            .collect();

        info!(
            rows = dataset.len(),
            fields = fields.len(),
            "profiling complete"
        );

        ProfileReport {
            error: None,
            total_rows: dataset.len(),
            fields,
        }
    }

    /// Profile every field present in the dataset.
    pub fn profile_all(&self, dataset: &Dataset) -> ProfileReport {
        let names = dataset.field_names();
        self.profile(dataset, &names)
    }

    fn profile_field(&self, dataset: &Dataset, name: &str) -> FieldProfile {
        let values = dataset.column(name);

        let mut counts = ValueCounts::new(self.config.max_unique_values);
        for value in &values {
            counts.add(value);
        }
        if counts.truncated() {
            warn!(field = name, cap = self.config.max_unique_values, "distribution truncated");
        }

        let quality = quality::compute_quality(&counts);
        let kind = classifier::classify(&values, &self.config.thresholds);
        debug!(field = name, kind = kind.as_str(), "field classified");

        let mut numeric = None;
        let mut string = None;
        let mut temporal = None;
        match kind {
            FieldKind::Numeric => numeric = Some(numeric::compute_numeric_stats(&values)),
            FieldKind::String => string = Some(strings::compute_string_stats(&values)),
            FieldKind::Date => temporal = Some(temporal::compute_temporal_stats(&values)),
            FieldKind::None => {}
        }

        FieldProfile {
            name: name.to_string(),
            kind,
            numeric,
            string,
            temporal,
            quality,
            distribution: build_distribution(&counts),
        }
    }
}

/// Assemble the frequency-sorted distribution table, appending the
/// synthetic null entry when missing or blank values exist.
fn build_distribution(counts: &ValueCounts) -> ValueDistribution {
    let total = counts.total_rows();
    let mut entries: Vec<DistributionEntry> = counts
        .sorted_entries()
        .into_iter()
        .map(|(value, count)| DistributionEntry {
            value: value.to_string(),
            count,
            percentage: percentage(count, total),
        })
        .collect();

    let absent = counts.null_count() + counts.empty_count();
    if absent > 0 {
        entries.push(DistributionEntry {
            value: NULL_ENTRY_LABEL.to_string(),
            count: absent,
            percentage: percentage(absent, total),
        });
    }

    ValueDistribution {
        entries,
        truncated: counts.truncated(),
        distinct_values: counts.unique_count(),
        total_rows: total,
    }
}
