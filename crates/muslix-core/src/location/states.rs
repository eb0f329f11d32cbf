//! The fixed enumeration of German federal states
//!
//! State values arriving in marker records are only trusted when they
//! match this list; everything else is user error surfaced per note.

/// All 16 federal states, canonical spelling
pub const GERMAN_STATES: [&str; 16] = [
    "Baden-Württemberg",
    "Bayern",
    "Berlin",
    "Brandenburg",
    "Bremen",
    "Hamburg",
    "Hessen",
    "Mecklenburg-Vorpommern",
    "Niedersachsen",
    "Nordrhein-Westfalen",
    "Rheinland-Pfalz",
    "Saarland",
    "Sachsen",
    "Sachsen-Anhalt",
    "Schleswig-Holstein",
    "Thüringen",
];

/// Look up the canonical spelling for a state name, case-insensitively.
/// Returns `None` for anything outside the enumeration.
pub fn canonical_state(name: &str) -> Option<&'static str> {
    let wanted = name.trim().to_lowercase();
    GERMAN_STATES
        .iter()
        .find(|state| state.to_lowercase() == wanted)
        .copied()
}
