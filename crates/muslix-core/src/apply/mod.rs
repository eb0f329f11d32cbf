//! Change application
//!
//! Takes approved outcomes and writes them back: marker lines are
//! replaced in place, tags are resolved once per batch and linked
//! idempotently. Notes are processed strictly in order; a storage
//! failure aborts the batch naming the failing note, because later
//! notes' tag linkage assumes earlier ones landed.

use std::collections::{BTreeSet, HashMap, HashSet};

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::{MuslixError, Result};
use crate::location::Outcome;
use crate::store::NoteStore;

/// Summary of one apply batch
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct ApplyReport {
    pub notes_updated: usize,
    pub tags_created: usize,
    pub tags_linked: usize,
    /// Notes whose original marker line was no longer present in the
    /// body (concurrently edited); their body was left untouched
    pub lines_missing: usize,
}

/// Apply a batch of outcomes. Outcomes that are not applicable (errors,
/// unresolved ambiguities) are skipped; everything else is written back
/// in order.
pub fn apply_changes(store: &mut dyn NoteStore, outcomes: &[Outcome]) -> Result<ApplyReport> {
    let applicable: Vec<&Outcome> = outcomes.iter().filter(|o| o.applicable()).collect();
    if applicable.len() < outcomes.len() {
        debug!(
            skipped = outcomes.len() - applicable.len(),
            "non_applicable_outcomes_skipped"
        );
    }

    let mut report = ApplyReport::default();
    let tag_ids = resolve_tags(store, &applicable, &mut report)?;

    for outcome in applicable {
        apply_one(store, outcome, &tag_ids, &mut report)
            .map_err(|err| MuslixError::apply_failed(&outcome.note_title, err))?;
    }

    info!(
        notes = report.notes_updated,
        tags_created = report.tags_created,
        tags_linked = report.tags_linked,
        lines_missing = report.lines_missing,
        "apply_complete"
    );
    Ok(report)
}

/// One bulk tag-name→id resolution pass for the whole batch. Missing
/// tags are created exactly once each; if creation fails, the list is
/// re-checked before giving up, since another writer may have created
/// the tag in between.
fn resolve_tags(
    store: &mut dyn NoteStore,
    outcomes: &[&Outcome],
    report: &mut ApplyReport,
) -> Result<HashMap<String, String>> {
    let wanted: BTreeSet<String> = outcomes
        .iter()
        .flat_map(|o| o.tags.iter().cloned())
        .collect();

    let mut existing: HashMap<String, String> = store
        .tags()?
        .into_iter()
        .map(|tag| (tag.title, tag.id))
        .collect();

    let mut resolved = HashMap::new();
    for name in wanted {
        if let Some(id) = existing.remove(&name) {
            resolved.insert(name, id);
            continue;
        }
        match store.create_tag(&name) {
            Ok(tag) => {
                report.tags_created += 1;
                resolved.insert(name, tag.id);
            }
            Err(create_err) => {
                let raced = store.tags()?.into_iter().find(|tag| tag.title == name);
                match raced {
                    Some(tag) => {
                        debug!(tag = %name, "tag_created_concurrently");
                        resolved.insert(name, tag.id);
                    }
                    None => {
                        return Err(MuslixError::failed(
                            &format!("create tag '{}'", name),
                            create_err,
                        ))
                    }
                }
            }
        }
    }
    Ok(resolved)
}

fn apply_one(
    store: &mut dyn NoteStore,
    outcome: &Outcome,
    tag_ids: &HashMap<String, String>,
    report: &mut ApplyReport,
) -> Result<()> {
    let note = store.note(&outcome.note_id)?;

    if note.body.contains(&outcome.original_line) {
        let updated = note.body.replacen(&outcome.original_line, &outcome.new_line, 1);
        store.update_note_body(&outcome.note_id, &updated)?;
        report.notes_updated += 1;
    } else {
        // The note was edited since analysis; not fatal, but visible
        warn!(note_id = %outcome.note_id, "marker_line_no_longer_present");
        report.lines_missing += 1;
    }

    let carried: HashSet<String> = store
        .note_tags(&outcome.note_id)?
        .into_iter()
        .map(|tag| tag.id)
        .collect();

    for tag in &outcome.tags {
        if let Some(tag_id) = tag_ids.get(tag) {
            if !carried.contains(tag_id) {
                store.link_tag(&outcome.note_id, tag_id)?;
                report.tags_linked += 1;
            }
        }
    }
    Ok(())
}
