//! Muslix - note similarity and location enrichment CLI
//!
//! A command-line companion for markdown note stores: compares notes
//! with interchangeable similarity algorithms and enriches embedded
//! location marker lines via postal-code and city-name lookups.

mod cli;
mod commands;

use std::process::ExitCode;

use clap::Parser;

use cli::Cli;
use muslix_core::format::OutputFormat;
use muslix_core::logging;

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(err) = logging::init_tracing(cli.verbose, cli.log_level.as_deref(), cli.log_json) {
        eprintln!("failed to initialize logging: {}", err);
    }

    match commands::run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            match cli.format {
                OutputFormat::Json => eprintln!("{}", err.to_json()),
                OutputFormat::Human => eprintln!("error: {}", err),
            }
            ExitCode::from(i32::from(err.exit_code()) as u8)
        }
    }
}
