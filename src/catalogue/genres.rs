//! Static Steam genre taxonomy.
//!
//! The map is many-to-one: several ids share a label (e.g. four ids are all
//! "Indie"). Filter controls work on labels, records carry ids.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use super::GameRecord;

/// Genre id → human label.
pub static STEAM_GENRES: &[(&str, &str)] = &[
    ("0", "Unknown Genre"),
    ("1", "Action"),
    ("2", "Strategy"),
    ("3", "RPG"),
    ("4", "Casual"),
    ("5", "Strategy"),
    ("9", "Racing"),
    ("10", "MMO"),
    ("11", "FPS"),
    ("12", "Puzzle"),
    ("18", "Sports"),
    ("23", "Indie"),
    ("25", "Adventure"),
    ("28", "Simulation"),
    ("29", "Massively Multiplayer"),
    ("33", "Indie"),
    ("34", "Indie"),
    ("37", "Free To Play"),
    ("50", "Indie"),
    ("51", "Animation & Modeling"),
    ("52", "Music"),
    ("53", "Software & Tools"),
    ("54", "Education"),
    ("55", "Software & Tools"),
    ("57", "Software & Tools"),
    ("58", "Software & Tools"),
    ("59", "Software & Tools"),
    ("60", "Software & Tools"),
    ("70", "Early Access"),
    ("71", "Sexual Content"),
    ("72", "Sexual Content"),
    ("73", "Adventure"),
    ("74", "Gore"),
];

/// Label for a genre id, if the taxonomy knows it.
pub fn label_for(id: &str) -> Option<&'static str> {
    STEAM_GENRES
        .iter()
        .find(|(genre_id, _)| *genre_id == id)
        .map(|(_, label)| *label)
}

/// Label of a record's normalized genre id.
pub fn record_label(record: &GameRecord) -> Option<&'static str> {
    label_for(record.genre_id())
}

/// A genre label together with every id that maps to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenreSelection {
    pub label: String,
    pub ids: BTreeSet<String>,
}

impl GenreSelection {
    /// Selection for a label, matched case-insensitively. `None` when the
    /// taxonomy has no such label.
    pub fn for_label(label: &str) -> Option<Self> {
        let wanted = label.trim();
        genre_groups()
            .into_iter()
            .find(|group| group.label.eq_ignore_ascii_case(wanted))
    }

    pub fn contains(&self, genre_id: &str) -> bool {
        self.ids.contains(genre_id)
    }
}

/// Reverse grouping label → ids, sorted by label ignoring case.
pub fn genre_groups() -> Vec<GenreSelection> {
    let mut by_label: BTreeMap<&'static str, BTreeSet<String>> = BTreeMap::new();
    for (id, label) in STEAM_GENRES {
        by_label.entry(*label).or_default().insert((*id).to_string());
    }

    let mut groups: Vec<GenreSelection> = by_label
        .into_iter()
        .map(|(label, ids)| GenreSelection {
            label: label.to_string(),
            ids,
        })
        .collect();
    groups.sort_by_key(|group| group.label.to_lowercase());
    groups
}

/// Labels that at least one record resolves to.
pub fn present_labels(records: &[GameRecord]) -> BTreeSet<&'static str> {
    records.iter().filter_map(record_label).collect()
}
