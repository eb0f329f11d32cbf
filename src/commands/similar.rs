//! `muslix similar` command - compare two text documents

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use muslix_core::config::Config;
use muslix_core::error::Result;
use muslix_core::format::OutputFormat;
use muslix_core::similarity::{compare_percent, Algorithm, ALGORITHMS};

use crate::cli::Cli;

/// Execute the similar command
pub fn execute(
    cli: &Cli,
    file_a: &Path,
    file_b: &Path,
    algorithm: Algorithm,
    all: bool,
) -> Result<()> {
    let config_dir = cli
        .store
        .clone()
        .or_else(|| env::current_dir().ok())
        .unwrap_or_else(|| PathBuf::from("."));
    let config = Config::load_or_default(&config_dir)?;

    let text_a = fs::read_to_string(file_a)?;
    let text_b = fs::read_to_string(file_b)?;
    debug!(?file_a, ?file_b, "compare_documents");

    let algorithms: &[Algorithm] = if all { &ALGORITHMS } else { std::slice::from_ref(&algorithm) };
    let scores: Vec<(Algorithm, f64)> = algorithms
        .iter()
        .map(|&alg| (alg, compare_percent(&text_a, &text_b, alg, &config.similarity)))
        .collect();

    match cli.format {
        OutputFormat::Json => {
            let output: serde_json::Map<String, serde_json::Value> = scores
                .iter()
                .map(|(alg, score)| (alg.to_string(), serde_json::json!(score)))
                .collect();
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Human => {
            for (alg, score) in &scores {
                println!("{}: {:.2}%", alg, score);
            }
        }
    }

    Ok(())
}
