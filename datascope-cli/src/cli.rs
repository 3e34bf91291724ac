use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use datascope_core::{
    dataset_from_csv_path, write_inline_tables, Dataset, Delimiter, Profiler, ProfilerConfig,
};
use std::io::{BufRead, Write};
use std::path::PathBuf;
use tracing::warn;

use crate::render;

#[derive(Parser)]
#[command(name = "datascope-cli")]
#[command(about = "Profile columns of delimited data files")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum OutputFormat {
    Json,
    Summary,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Profile fields of a CSV file
    Profile {
        /// Input CSV file (with header row)
        #[arg(short, long)]
        file: PathBuf,
        /// Comma-separated field names; all fields when omitted
        #[arg(long)]
        fields: Option<String>,
        /// Distinct values tracked per field
        #[arg(long, default_value_t = datascope_core::DEFAULT_MAX_UNIQUE_VALUES)]
        max_unique: usize,
        /// Input column separator
        #[arg(long, default_value = ",")]
        csv_delimiter: char,
        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,
        /// Write output to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Skip the large-dataset confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Emit per-field value distributions as delimited inline tables
    ExportScript {
        /// Input CSV file (with header row)
        #[arg(short, long)]
        file: PathBuf,
        /// Comma-separated field names; all fields when omitted
        #[arg(long)]
        fields: Option<String>,
        /// Distinct values tracked per field
        #[arg(long, default_value_t = datascope_core::DEFAULT_MAX_UNIQUE_VALUES)]
        max_unique: usize,
        /// Input column separator
        #[arg(long, default_value = ",")]
        csv_delimiter: char,
        /// Inline-table separator
        #[arg(long, default_value = "tab")]
        delimiter: Delimiter,
        /// Row cap per field table
        #[arg(long)]
        max_rows: Option<usize>,
        /// Write output to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Skip the large-dataset confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

pub fn profile_command(
    file: PathBuf,
    fields: Option<String>,
    max_unique: usize,
    csv_delimiter: char,
    format: OutputFormat,
    output: Option<PathBuf>,
    yes: bool,
) -> Result<()> {
    let (dataset, profiler) = load_and_confirm(&file, csv_delimiter, max_unique, yes)?;
    let names = resolve_fields(&dataset, fields);
    let report = profiler.profile(&dataset, &names);

    let text = match format {
        OutputFormat::Json => serde_json::to_string_pretty(&report)?,
        OutputFormat::Summary => render::render_summary(&report),
    };
    emit(&text, output)
}

#[allow(clippy::too_many_arguments)]
pub fn export_script_command(
    file: PathBuf,
    fields: Option<String>,
    max_unique: usize,
    csv_delimiter: char,
    delimiter: Delimiter,
    max_rows: Option<usize>,
    output: Option<PathBuf>,
    yes: bool,
) -> Result<()> {
    let (dataset, profiler) = load_and_confirm(&file, csv_delimiter, max_unique, yes)?;
    let names = resolve_fields(&dataset, fields);
    let report = profiler.profile(&dataset, &names);

    if let Some(error) = report.error {
        bail!(error);
    }
    let text = write_inline_tables(&report.fields, delimiter, max_rows);
    emit(&text, output)
}

fn load_and_confirm(
    file: &PathBuf,
    csv_delimiter: char,
    max_unique: usize,
    yes: bool,
) -> Result<(Dataset, Profiler)> {
    if !csv_delimiter.is_ascii() {
        bail!("CSV delimiter must be an ASCII character");
    }
    let dataset = dataset_from_csv_path(file, csv_delimiter as u8)
        .with_context(|| format!("failed to read {}", file.display()))?;

    let config = ProfilerConfig {
        max_unique_values: max_unique,
        ..ProfilerConfig::default()
    };

    // Profiling is synchronous and uninterruptible; ask before committing
    // to a very large run.
    if dataset.len() > config.large_dataset_threshold && !yes {
        warn!(rows = dataset.len(), "large dataset");
        if !confirm(&format!(
            "Dataset has {} rows; profiling runs in one uninterruptible pass. Continue? [y/N] ",
            dataset.len()
        ))? {
            bail!("aborted by user");
        }
    }

    Ok((dataset, Profiler::new(config)))
}

fn resolve_fields(dataset: &Dataset, fields: Option<String>) -> Vec<String> {
    match fields {
        Some(list) => list
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect(),
        None => dataset.field_names(),
    }
}

fn confirm(prompt: &str) -> Result<bool> {
    print!("{}", prompt);
    std::io::stdout().flush()?;
    let mut answer = String::new();
    std::io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim(), "y" | "Y" | "yes" | "YES"))
}

fn emit(text: &str, output: Option<PathBuf>) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(&path, text)
                .with_context(|| format!("failed to write {}", path.display()))?;
        }
        None => println!("{}", text),
    }
    Ok(())
}
