mod cli;
mod render;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Profile {
            file,
            fields,
            max_unique,
            csv_delimiter,
            format,
            output,
            yes,
        } => cli::profile_command(file, fields, max_unique, csv_delimiter, format, output, yes),
        Commands::ExportScript {
            file,
            fields,
            max_unique,
            csv_delimiter,
            delimiter,
            max_rows,
            output,
            yes,
        } => cli::export_script_command(
            file,
            fields,
            max_unique,
            csv_delimiter,
            delimiter,
            max_rows,
            output,
            yes,
        ),
    }
}
