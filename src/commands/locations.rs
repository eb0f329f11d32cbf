//! `muslix locations` commands - analyze and apply marker-line location data
//!
//! `analyze` reports per-note outcomes without touching anything.
//! `apply` re-analyzes, resolves ambiguous rows via `--choose
//! ROW=CANDIDATE`, and writes the applicable changes back.

use std::env;
use std::path::PathBuf;

use tracing::debug;

use muslix_core::apply::apply_changes;
use muslix_core::config::Config;
use muslix_core::error::{MuslixError, Result};
use muslix_core::format::OutputFormat;
use muslix_core::geodata::OpenPlzClient;
use muslix_core::location::{
    analyze_notes, select_candidate, Outcome, OutcomeKind, MAX_BATCH_NOTES,
};
use muslix_core::store::{FsStore, NoteStore};

use crate::cli::Cli;

/// Execute the analyze subcommand
pub fn analyze(cli: &Cli, ids: &[String]) -> Result<()> {
    let store = open_store(cli)?;
    let outcomes = run_analysis(cli, &store, ids)?;
    print_outcomes(cli, &outcomes)
}

/// Execute the apply subcommand
pub fn apply(cli: &Cli, ids: &[String], choose: &[String], dry_run: bool) -> Result<()> {
    let mut store = open_store(cli)?;
    let mut outcomes = run_analysis(cli, &store, ids)?;

    for (row, candidate) in parse_choices(choose)? {
        let outcome = outcomes
            .get_mut(row)
            .ok_or_else(|| MuslixError::invalid_value("row index", row))?;
        select_candidate(outcome, candidate)?;
    }

    print_outcomes(cli, &outcomes)?;

    if dry_run {
        if !cli.quiet && cli.format == OutputFormat::Human {
            println!("dry run, nothing written");
        }
        return Ok(());
    }

    let report = apply_changes(&mut store, &outcomes)?;
    match cli.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Human => println!(
            "{} note(s) updated, {} tag(s) created, {} tag link(s) added, {} line(s) missing",
            report.notes_updated, report.tags_created, report.tags_linked, report.lines_missing
        ),
    }
    Ok(())
}

fn open_store(cli: &Cli) -> Result<FsStore> {
    let root = cli
        .store
        .clone()
        .or_else(|| env::current_dir().ok())
        .unwrap_or_else(|| PathBuf::from("."));
    FsStore::open(&root)
}

fn run_analysis(cli: &Cli, store: &FsStore, ids: &[String]) -> Result<Vec<Outcome>> {
    let config = Config::load_or_default(store.root())?;
    let client = OpenPlzClient::new(&config.geodata);

    let ids = if ids.is_empty() {
        store.note_ids()?
    } else {
        ids.to_vec()
    };
    debug!(notes = ids.len(), "analyze_locations");

    if ids.len() > MAX_BATCH_NOTES && !cli.quiet {
        eprintln!(
            "warning: {} notes selected, only the first {} will be processed",
            ids.len(),
            MAX_BATCH_NOTES
        );
    }

    Ok(analyze_notes(store, &client, &ids))
}

/// Parse repeatable `ROW=CANDIDATE` selections
fn parse_choices(choose: &[String]) -> Result<Vec<(usize, usize)>> {
    choose
        .iter()
        .map(|spec| {
            spec.split_once('=')
                .and_then(|(row, candidate)| {
                    Some((row.parse().ok()?, candidate.parse().ok()?))
                })
                .ok_or_else(|| {
                    MuslixError::UsageError(format!(
                        "invalid --choose value '{}' (expected ROW=CANDIDATE)",
                        spec
                    ))
                })
        })
        .collect()
}

fn print_outcomes(cli: &Cli, outcomes: &[Outcome]) -> Result<()> {
    match cli.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(outcomes)?),
        OutputFormat::Human => {
            if outcomes.is_empty() {
                if !cli.quiet {
                    println!("no marker lines with work to do");
                }
                return Ok(());
            }
            for (index, outcome) in outcomes.iter().enumerate() {
                print_outcome_row(index, outcome);
            }
        }
    }
    Ok(())
}

fn print_outcome_row(index: usize, outcome: &Outcome) {
    println!(
        "[{}] {} ({})",
        index,
        outcome.note_title,
        outcome.change_type()
    );
    match &outcome.kind {
        OutcomeKind::Error { message } => println!("    error: {}", message),
        OutcomeKind::MultipleMatches { candidates } => {
            for (c_index, candidate) in candidates.iter().enumerate() {
                println!(
                    "    [{}] {}, {} {}",
                    c_index, candidate.city, candidate.state, candidate.postal_code
                );
            }
        }
        _ => {
            println!(
                "    {}; {}; {} -> {}; {}; {}",
                outcome.before.city,
                outcome.before.postal_code,
                outcome.before.state,
                outcome.after.city,
                outcome.after.postal_code,
                outcome.after.state
            );
            if !outcome.tags.is_empty() {
                println!("    tags: {}", outcome.tags.join(", "));
            }
        }
    }
}
