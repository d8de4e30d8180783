use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::text::{TextMapping, TextMatch};

/// OCR results below this confidence are mostly noise.
pub const DEFAULT_MIN_CONFIDENCE: f32 = 50.0;

/// Drop blank matches and those below `min_confidence`.
pub fn filter_confident(matches: &[TextMatch], min_confidence: f32) -> Vec<TextMatch> {
    matches
        .iter()
        .filter(|m| !m.text.trim().is_empty() && m.confidence >= min_confidence)
        .cloned()
        .collect()
}

/// Matches whose text contains `query`.
pub fn find_text<'a>(matches: &'a [TextMatch], query: &str) -> Vec<&'a TextMatch> {
    matches.iter().filter(|m| m.text.contains(query)).collect()
}

/// Tiles holding any match whose text contains `query`.
pub fn tiles_containing(mappings: &[TextMapping], query: &str) -> BTreeSet<u32> {
    mappings
        .iter()
        .filter(|m| m.text_match.text.contains(query))
        .flat_map(|m| m.tiles.iter().copied())
        .collect()
}

/// Top to bottom, then left to right, by box centre.
pub fn sort_reading_order(matches: &mut [TextMatch]) {
    matches.sort_by_key(|m| {
        let (x, y) = m.center();
        (y, x)
    });
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextChanges {
    pub added: BTreeSet<String>,
    pub removed: BTreeSet<String>,
}

impl TextChanges {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

/// Strings that appeared or disappeared between two captures.
pub fn text_changes(older: &[TextMatch], newer: &[TextMatch]) -> TextChanges {
    let older: BTreeSet<String> = older.iter().map(|m| m.text.clone()).collect();
    let newer: BTreeSet<String> = newer.iter().map(|m| m.text.clone()).collect();
    TextChanges {
        added: newer.difference(&older).cloned().collect(),
        removed: older.difference(&newer).cloned().collect(),
    }
}
