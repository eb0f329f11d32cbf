//! CLI argument parsing for muslix
//!
//! Uses clap for argument parsing. Global flags: --store, --format,
//! --quiet, --verbose, --log-level, --log-json.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use muslix_core::error::MuslixError;
pub use muslix_core::format::OutputFormat;
use muslix_core::similarity::Algorithm;

/// Muslix - note similarity and location enrichment CLI
#[derive(Parser, Debug)]
#[command(name = "muslix")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Root directory of the note store (defaults to the working directory)
    #[arg(long, global = true)]
    pub store: Option<PathBuf>,

    /// Output format
    #[arg(long, global = true, value_parser = parse_format, default_value = "human")]
    pub format: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, short, global = true)]
    pub quiet: bool,

    /// Verbose logging
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Explicit log level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compare two text files for similarity
    Similar {
        /// Reference document
        file_a: PathBuf,

        /// Candidate document
        file_b: PathBuf,

        /// Similarity algorithm
        #[arg(long, short, value_parser = parse_algorithm, default_value = "jaccard")]
        algorithm: Algorithm,

        /// Report every algorithm instead of a single one
        #[arg(long)]
        all: bool,
    },

    /// Analyze and apply location data embedded in marker lines
    Locations {
        #[command(subcommand)]
        command: LocationCommands,
    },
}

#[derive(Subcommand, Debug)]
pub enum LocationCommands {
    /// Inspect notes and report what would change
    Analyze {
        /// Note ids to analyze (defaults to every note in the store)
        ids: Vec<String>,
    },

    /// Analyze notes and write approved changes back
    Apply {
        /// Note ids to process (defaults to every note in the store)
        ids: Vec<String>,

        /// Resolve an ambiguous row by candidate index (repeatable)
        #[arg(long, value_name = "ROW=CANDIDATE")]
        choose: Vec<String>,

        /// Analyze and print only; write nothing
        #[arg(long)]
        dry_run: bool,
    },
}

fn parse_format(s: &str) -> Result<OutputFormat, String> {
    s.parse().map_err(|e: MuslixError| e.to_string())
}

fn parse_algorithm(s: &str) -> Result<Algorithm, String> {
    s.parse().map_err(|e: MuslixError| e.to_string())
}
