//! Comment block serialization
//!
//! Each catalog record becomes a block of `"\n <name><value>"` lines that is
//! appended to the file's existing comment. Name and value are concatenated
//! without a separator so new blocks line up with the ones earlier runs
//! already left in users' files.

use crate::types::{CatalogRecord, FeatureValue, TagPayload};
use std::fmt::Write;

/// Audio features in the order they are written
///
/// Features the catalog adds later follow these, sorted by name.
pub const FEATURE_ORDER: &[&str] = &[
    "danceability",
    "energy",
    "loudness",
    "mode",
    "speechiness",
    "acousticness",
    "instrumentalness",
    "liveness",
    "valence",
    "tempo",
    "duration_ms",
    "time_signature",
];

/// Field name the Camelot label is written under
pub const HARMONIC_KEY_FIELD: &str = "key";

/// Separator between genres in the genre tag
pub const GENRE_SEPARATOR: &str = "; ";

/// Serialize a record into an appendable comment block
///
/// Field order is fixed: track_id, popularity, genres, track_name, the audio
/// features (see [`FEATURE_ORDER`]), then the harmonic key.
pub fn serialize_record(record: &CatalogRecord) -> String {
    let mut block = String::new();

    push_line(&mut block, "track_id", &record.track_id);
    push_line(&mut block, "popularity", record.popularity);
    push_line(&mut block, "genres", render_list(&record.genres));
    push_line(&mut block, "track_name", &record.track_name);

    for (name, value) in ordered_features(record) {
        push_line(&mut block, name, value);
    }

    push_line(&mut block, HARMONIC_KEY_FIELD, record.harmonic_key);

    block
}

/// Build everything written to the tag container for one record
pub fn build_payload(record: &CatalogRecord) -> TagPayload {
    TagPayload {
        title: record.track_name.clone(),
        genre: record.genres.join(GENRE_SEPARATOR),
        comment_block: serialize_record(record),
    }
}

fn push_line(block: &mut String, name: &str, value: impl std::fmt::Display) {
    // Writing to a String cannot fail
    let _ = write!(block, "\n {}{}", name, value);
}

fn ordered_features(record: &CatalogRecord) -> Vec<(&str, FeatureValue)> {
    let features = &record.audio_features;

    let known = FEATURE_ORDER
        .iter()
        .filter_map(|name| features.get(*name).map(|value| (*name, *value)));

    // BTreeMap iteration is sorted by name
    let extra = features
        .iter()
        .filter(|(name, _)| {
            name.as_str() != HARMONIC_KEY_FIELD && !FEATURE_ORDER.contains(&name.as_str())
        })
        .map(|(name, value)| (name.as_str(), *value));

    known.chain(extra).collect()
}

/// Render a list of strings as `['a', 'b']`
fn render_list(items: &[String]) -> String {
    let quoted: Vec<String> = items.iter().map(|item| quote(item)).collect();
    format!("[{}]", quoted.join(", "))
}

fn quote(item: &str) -> String {
    let escaped = item.replace('\\', "\\\\");
    if escaped.contains('\'') && !escaped.contains('"') {
        format!("\"{}\"", escaped)
    } else {
        format!("'{}'", escaped.replace('\'', "\\'"))
    }
}
