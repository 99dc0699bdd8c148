//! Binary entry point for dreamport.
//!
//! This binary provides the CLI for both pipeline stages.

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(missing_docs)]
// Allow print_stderr in main binary for CLI output
#![allow(clippy::print_stderr)]
#![allow(clippy::print_stdout)]
// Allow needless_pass_by_value for command functions
#![allow(clippy::needless_pass_by_value)]
// Allow multiple crate versions from transitive dependencies
#![allow(clippy::multiple_crate_versions)]

mod commands;

use clap::{Parser, Subcommand};
use dreamport::config::DreamportConfig;
use dreamport::observability::{self, InitOptions};
use std::path::PathBuf;
use std::process::ExitCode;

/// Dreamport - moves dream journals between journaling apps.
#[derive(Parser)]
#[command(name = "dreamport")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to configuration file.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand)]
enum Commands {
    /// Build an importable collection from a delimited journal export.
    Import {
        /// Delimited journal export.
        #[arg(long)]
        entries: Option<PathBuf>,

        /// Label list, one label per line.
        #[arg(long)]
        labels: Option<PathBuf>,

        /// Existing collection to take document templates from.
        #[arg(long)]
        sample: Option<PathBuf>,

        /// Where to write the generated collection.
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Field and record delimiter.
        #[arg(short, long)]
        delimiter: Option<String>,

        /// Do not echo generated documents to standard output.
        #[arg(short, long)]
        quiet: bool,
    },

    /// Flatten a collection into base64 rows.
    Export {
        /// Collection exported from the journaling app.
        collection: PathBuf,

        /// Write rows to a file instead of standard output.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Decode exported rows into JSON lines.
    Decode {
        /// Rows written by `export`.
        rows: PathBuf,
    },
}

/// Main entry point.
fn main() -> ExitCode {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    let config = match DreamportConfig::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            return ExitCode::FAILURE;
        },
    };

    if let Err(e) = observability::init_from_config(
        &config.logging,
        InitOptions {
            verbose: cli.verbose,
        },
    ) {
        eprintln!("Failed to initialize logging: {e}");
        return ExitCode::FAILURE;
    }

    match run_command(cli.command, config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        },
    }
}

/// Runs the selected command.
fn run_command(command: Commands, config: DreamportConfig) -> anyhow::Result<()> {
    match command {
        Commands::Import {
            entries,
            labels,
            sample,
            output,
            delimiter,
            quiet,
        } => {
            let mut settings = config.import;
            if let Some(v) = entries {
                settings.entries = v;
            }
            if let Some(v) = labels {
                settings.labels = v;
            }
            if let Some(v) = sample {
                settings.sample = v;
            }
            if let Some(v) = output {
                settings.output = v;
            }
            if let Some(v) = delimiter {
                settings.delimiter = v;
            }
            commands::cmd_import(&settings, quiet)
        },

        Commands::Export { collection, output } => {
            commands::cmd_export(&config.export, &collection, output.as_deref())
        },

        Commands::Decode { rows } => commands::cmd_decode(&config.export, &rows),
    }
}
