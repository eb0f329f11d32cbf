//! Location decision engine
//!
//! Per note, the engine reads the three location fields of the marker
//! record (City, PostalCode, State), consults the geodata resolver where
//! needed and produces an [`Outcome`] describing what should change.
//! Fully populated notes are skipped so reruns never reprocess or re-tag
//! them; ambiguous city names surface a candidate list instead of a
//! guess.

mod states;
mod tags;


pub use states::{canonical_state, GERMAN_STATES};
pub use tags::{location_tags, normalize_tag};

use std::collections::HashSet;

use serde::Serialize;
use tracing::{debug, trace, warn};

use crate::error::{MuslixError, Result};
use crate::geodata::{CityCandidate, GeodataResolver};
use crate::marker::{self, MarkerRecord, CITY_FIELD, MIN_FIELDS, POSTAL_CODE_FIELD, STATE_FIELD};
use crate::store::{Note, NoteStore};

/// Literal City value requesting a postal-code lookup
pub const CITY_PLACEHOLDER: &str = "plz";

/// Upper bound on notes per analysis invocation; the caller warns about
/// anything beyond it
pub const MAX_BATCH_NOTES: usize = 100;

/// The three location fields of a marker record, trimmed
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LocationFields {
    pub city: String,
    pub postal_code: String,
    pub state: String,
}

impl LocationFields {
    fn from_record(record: &MarkerRecord) -> Self {
        let field = |index: usize| {
            record
                .fields
                .get(index)
                .map(|f| f.trim().to_string())
                .unwrap_or_default()
        };
        LocationFields {
            city: field(CITY_FIELD),
            postal_code: field(POSTAL_CODE_FIELD),
            state: field(STATE_FIELD),
        }
    }
}

/// Discriminant of an outcome; only `MultipleMatches` carries candidates,
/// only `Error` carries a message
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "change_type", rename_all = "kebab-case")]
pub enum OutcomeKind {
    /// City (and canonical state spelling) derived from the postal code
    PlzToCity,
    /// State derived from an unambiguous city name
    CityToState,
    /// State derived from the postal code
    PlzToState,
    /// Ambiguous city name; a candidate must be selected before applying
    MultipleMatches { candidates: Vec<CityCandidate> },
    /// Lookup failed or the record is malformed
    Error { message: String },
}

/// What should change for one note
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Outcome {
    pub note_id: String,
    pub note_title: String,
    /// Marker line exactly as present in the body, entities intact
    pub original_line: String,
    /// Reconstructed marker line in decoded, human-readable form
    pub new_line: String,
    pub before: LocationFields,
    pub after: LocationFields,
    /// Normalized tags to associate when the outcome is applied
    pub tags: Vec<String>,
    #[serde(flatten)]
    pub kind: OutcomeKind,
    /// Full decoded field list, kept so candidate selection can rebuild
    /// the line
    #[serde(skip)]
    fields: Vec<String>,
}

impl Outcome {
    fn resolved(
        note: &Note,
        record: MarkerRecord,
        before: LocationFields,
        after: LocationFields,
        tags: Vec<String>,
        kind: OutcomeKind,
    ) -> Self {
        let new_line = rebuild_with(&record.fields, &after);
        Outcome {
            note_id: note.id.clone(),
            note_title: note.title.clone(),
            original_line: record.raw_line.clone(),
            new_line,
            before,
            after,
            tags,
            kind,
            fields: record.fields,
        }
    }

    fn error(note: &Note, record: Option<&MarkerRecord>, message: String) -> Self {
        warn!(note_id = %note.id, %message, "location_error");
        let before = record
            .map(LocationFields::from_record)
            .unwrap_or_default();
        Outcome {
            note_id: note.id.clone(),
            note_title: note.title.clone(),
            original_line: record.map(|r| r.raw_line.clone()).unwrap_or_default(),
            new_line: record
                .map(|r| marker::rebuild_line(&r.fields))
                .unwrap_or_default(),
            after: before.clone(),
            before,
            tags: Vec::new(),
            kind: OutcomeKind::Error { message },
            fields: record.map(|r| r.fields.clone()).unwrap_or_default(),
        }
    }

    /// Whether this outcome can be applied as-is. Errors never can;
    /// `MultipleMatches` only after [`select_candidate`] converted it.
    pub fn applicable(&self) -> bool {
        matches!(
            self.kind,
            OutcomeKind::PlzToCity | OutcomeKind::CityToState | OutcomeKind::PlzToState
        )
    }

    /// Stable identifier of the change type for display and JSON output
    pub fn change_type(&self) -> &'static str {
        match self.kind {
            OutcomeKind::PlzToCity => "plz-to-city",
            OutcomeKind::CityToState => "city-to-state",
            OutcomeKind::PlzToState => "plz-to-state",
            OutcomeKind::MultipleMatches { .. } => "multiple-matches",
            OutcomeKind::Error { .. } => "error",
        }
    }
}

fn rebuild_with(fields: &[String], after: &LocationFields) -> String {
    let mut fields = fields.to_vec();
    fields[CITY_FIELD] = after.city.clone();
    fields[POSTAL_CODE_FIELD] = after.postal_code.clone();
    fields[STATE_FIELD] = after.state.clone();
    marker::rebuild_line(&fields)
}

/// Analyze a batch of notes, strictly in order, at most
/// [`MAX_BATCH_NOTES`] of them. Per-note problems become `Error`
/// outcomes; notes without a marker line or with nothing to do are
/// omitted entirely.
pub fn analyze_notes(
    store: &dyn NoteStore,
    resolver: &dyn GeodataResolver,
    note_ids: &[String],
) -> Vec<Outcome> {
    let capped = &note_ids[..note_ids.len().min(MAX_BATCH_NOTES)];
    if capped.len() < note_ids.len() {
        warn!(
            selected = note_ids.len(),
            processed = capped.len(),
            "batch_cap_reached"
        );
    }

    let mut outcomes = Vec::new();
    for id in capped {
        match store.note(id) {
            Ok(note) => {
                if let Some(outcome) = analyze_note(&note, resolver) {
                    outcomes.push(outcome);
                }
            }
            Err(err) => {
                let placeholder = Note {
                    id: id.clone(),
                    title: id.clone(),
                    body: String::new(),
                    parent_id: None,
                };
                outcomes.push(Outcome::error(
                    &placeholder,
                    None,
                    format!("could not load note: {}", err),
                ));
            }
        }
    }
    outcomes
}

/// Analyze a single note. `None` means there is nothing to report: no
/// marker line, already complete, or not actionable.
pub fn analyze_note(note: &Note, resolver: &dyn GeodataResolver) -> Option<Outcome> {
    let record = match marker::parse(&note.body) {
        Some(record) => record,
        None => {
            trace!(note_id = %note.id, "no_marker_line");
            return None;
        }
    };

    if !record.has_min_fields() {
        return Some(Outcome::error(
            note,
            Some(&record),
            format!(
                "marker line has {} fields, expected at least {}",
                record.fields.len(),
                MIN_FIELDS
            ),
        ));
    }

    let before = LocationFields::from_record(&record);
    decide(note, record, before, resolver)
}

fn decide(
    note: &Note,
    record: MarkerRecord,
    before: LocationFields,
    resolver: &dyn GeodataResolver,
) -> Option<Outcome> {
    let is_placeholder = before.city.eq_ignore_ascii_case(CITY_PLACEHOLDER);
    let has_city = !before.city.is_empty() && !is_placeholder;
    let has_postal_code = !before.postal_code.is_empty();
    let has_state = !before.state.is_empty();

    if has_city && has_postal_code && has_state {
        debug!(note_id = %note.id, "already_complete");
        return None;
    }
    if is_placeholder {
        return Some(resolve_placeholder(note, record, before, resolver));
    }
    if has_city && has_postal_code && !has_state {
        return Some(resolve_state_from_postal_code(
            note, record, before, resolver,
        ));
    }
    if has_city && !has_postal_code && !has_state {
        return Some(resolve_from_city_name(note, record, before, resolver));
    }

    trace!(note_id = %note.id, "not_actionable");
    None
}

/// Placeholder City: the postal code is authoritative, the state must
/// already be present and valid
fn resolve_placeholder(
    note: &Note,
    record: MarkerRecord,
    before: LocationFields,
    resolver: &dyn GeodataResolver,
) -> Outcome {
    if before.postal_code.is_empty() {
        return Outcome::error(
            note,
            Some(&record),
            "postal code is missing for placeholder resolution".to_string(),
        );
    }
    let state = match canonical_state(&before.state) {
        Some(state) => state,
        None => {
            return Outcome::error(
                note,
                Some(&record),
                format!("missing or unknown federal state: '{}'", before.state),
            )
        }
    };

    match resolver.lookup_by_postal_code(&before.postal_code) {
        Err(err) => Outcome::error(note, Some(&record), err.to_string()),
        Ok(None) => Outcome::error(
            note,
            Some(&record),
            format!("no data for postal code {}", before.postal_code),
        ),
        Ok(Some(place)) => {
            debug!(note_id = %note.id, city = %place.city, "plz_to_city");
            let after = LocationFields {
                city: place.city.clone(),
                postal_code: before.postal_code.clone(),
                state: state.to_string(),
            };
            let tags = location_tags(&place.city, state);
            Outcome::resolved(note, record, before, after, tags, OutcomeKind::PlzToCity)
        }
    }
}

/// City and postal code present, state missing: the postal code is
/// unambiguous, so it wins over a city-name lookup
fn resolve_state_from_postal_code(
    note: &Note,
    record: MarkerRecord,
    before: LocationFields,
    resolver: &dyn GeodataResolver,
) -> Outcome {
    match resolver.lookup_by_postal_code(&before.postal_code) {
        Err(err) => Outcome::error(note, Some(&record), err.to_string()),
        Ok(None) => Outcome::error(
            note,
            Some(&record),
            format!("no data for postal code {}", before.postal_code),
        ),
        Ok(Some(place)) => {
            debug!(note_id = %note.id, state = %place.state, "plz_to_state");
            let after = LocationFields {
                city: before.city.clone(),
                postal_code: before.postal_code.clone(),
                state: place.state.clone(),
            };
            let tags = location_tags(&before.city, &place.state);
            Outcome::resolved(note, record, before, after, tags, OutcomeKind::PlzToState)
        }
    }
}

/// Only the city is present: resolve by name. Exact case-insensitive
/// matches only; anything ambiguous is surfaced, never guessed.
fn resolve_from_city_name(
    note: &Note,
    record: MarkerRecord,
    before: LocationFields,
    resolver: &dyn GeodataResolver,
) -> Outcome {
    let candidates = match resolver.lookup_by_city_name(&before.city) {
        Err(err) => return Outcome::error(note, Some(&record), err.to_string()),
        Ok(candidates) => candidates,
    };

    let wanted = before.city.to_lowercase();
    let exact: Vec<CityCandidate> = candidates
        .into_iter()
        .filter(|candidate| candidate.city.to_lowercase() == wanted)
        .collect();

    if exact.is_empty() {
        return Outcome::error(
            note,
            Some(&record),
            format!("no exact match for city '{}'", before.city),
        );
    }

    let mut deduped = dedupe_by_state(exact);
    if deduped.len() == 1 {
        let chosen = deduped.remove(0);
        debug!(note_id = %note.id, state = %chosen.state, "city_to_state");
        let after = LocationFields {
            city: chosen.city.clone(),
            postal_code: chosen.postal_code.clone(),
            state: chosen.state.clone(),
        };
        let tags = location_tags(&chosen.city, &chosen.state);
        Outcome::resolved(note, record, before, after, tags, OutcomeKind::CityToState)
    } else {
        debug!(note_id = %note.id, candidates = deduped.len(), "multiple_matches");
        let after = before.clone();
        Outcome::resolved(
            note,
            record,
            before,
            after,
            Vec::new(),
            OutcomeKind::MultipleMatches {
                candidates: deduped,
            },
        )
    }
}

/// One candidate per distinct state value, order preserved
fn dedupe_by_state(candidates: Vec<CityCandidate>) -> Vec<CityCandidate> {
    let mut seen = HashSet::new();
    candidates
        .into_iter()
        .filter(|candidate| seen.insert(candidate.state.clone()))
        .collect()
}

/// Resolve a `MultipleMatches` outcome with the user's chosen candidate.
/// This is the only permitted mutation of an outcome after creation: the
/// fields take the candidate's values, tags are recomputed, and the
/// outcome becomes `CityToState`.
pub fn select_candidate(outcome: &mut Outcome, candidate_index: usize) -> Result<()> {
    let candidates = match &outcome.kind {
        OutcomeKind::MultipleMatches { candidates } => candidates,
        _ => {
            return Err(MuslixError::invalid_value(
                "selection target",
                outcome.change_type(),
            ))
        }
    };
    let chosen = candidates
        .get(candidate_index)
        .ok_or_else(|| MuslixError::invalid_value("candidate index", candidate_index))?
        .clone();

    outcome.after = LocationFields {
        city: chosen.city.clone(),
        postal_code: chosen.postal_code.clone(),
        state: chosen.state.clone(),
    };
    outcome.tags = location_tags(&chosen.city, &chosen.state);
    outcome.new_line = rebuild_with(&outcome.fields, &outcome.after);
    outcome.kind = OutcomeKind::CityToState;
    Ok(())
}
