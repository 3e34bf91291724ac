//! DataScope: field profiling and statistical analysis engine
//!
//! Given a dataset already materialized in memory (rows as field->value
//! mappings), DataScope computes per-field descriptive statistics, data
//! quality indicators, string pattern analysis, and temporal distribution
//! and trend analysis. The engine is synchronous, pure, and deterministic:
//! every call builds its own frequency tables and identical input yields
//! identical output.

pub mod classifier;
pub mod dataset;
pub mod errors;
pub mod export;
pub mod frequency;
pub mod numeric;
pub mod profiler;
pub mod quality;
pub mod source;
pub mod strings;
pub mod temporal;

mod util;

// Re-exports
pub use classifier::{FieldKind, Thresholds, DATE_THRESHOLD, NUMERIC_THRESHOLD, STRING_THRESHOLD};
pub use dataset::{Dataset, Row, Value};
pub use errors::{DataScopeError, Result};
pub use export::{write_inline_table, write_inline_tables, Delimiter};
pub use numeric::{NumericAnalysis, NumericStats};
pub use profiler::{
    DistributionEntry, FieldProfile, ProfileReport, Profiler, ProfilerConfig, ValueDistribution,
    DEFAULT_MAX_UNIQUE_VALUES, LARGE_DATASET_THRESHOLD,
};
pub use quality::QualityMetrics;
pub use source::{dataset_from_csv_path, dataset_from_csv_reader, dataset_from_json_records};
pub use strings::{StringAnalysis, StringStats};
pub use temporal::{TemporalAnalysis, TemporalStats, TrendDirection};

/// Profile the named fields with default configuration.
pub fn profile(dataset: &Dataset, field_names: &[String]) -> ProfileReport {
    Profiler::default().profile(dataset, field_names)
}

/// Profile every field with default configuration.
pub fn profile_all(dataset: &Dataset) -> ProfileReport {
    Profiler::default().profile_all(dataset)
}
