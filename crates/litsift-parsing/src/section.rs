use once_cell::sync::Lazy;
use regex::Regex;

use litsift_core::Entry;

use crate::config::ParsingConfig;

static AUTHOR_LINE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^Author:").unwrap());

/// Alternative boundary: any line starting with an uppercase letter followed
/// by at least five more characters.
pub const CAPITALIZED_LINE_BOUNDARY: &str = r"(?m)^[A-Z].{5,}";

/// Split a document's full text into candidate entries.
///
/// A new entry starts at every line beginning with `Author:`. Segments are
/// trimmed and kept only when longer than 300 characters.
pub fn segment_entries(text: &str) -> Vec<Entry> {
    segment_entries_with_config(text, &ParsingConfig::default())
}

/// Config-aware version of [`segment_entries`].
pub(crate) fn segment_entries_with_config(text: &str, config: &ParsingConfig) -> Vec<Entry> {
    let boundary_re = config.boundary_re.as_ref().unwrap_or(&AUTHOR_LINE_RE);

    let mut entries = Vec::new();
    let mut start = 0;
    for cut in split_points(text, boundary_re).into_iter().chain([text.len()]) {
        let segment = text[start..cut].trim();
        if segment.chars().count() > config.min_entry_len {
            entries.push(Entry::new(segment, entries.len()));
        }
        start = cut;
    }

    tracing::info!(
        text_len = text.len(),
        entries = entries.len(),
        "segmented document"
    );
    entries
}

/// Byte offsets of boundary matches that open a line, excluding offset 0.
fn split_points(text: &str, boundary_re: &Regex) -> Vec<usize> {
    let bytes = text.as_bytes();
    let mut points: Vec<usize> = boundary_re
        .find_iter(text)
        .map(|m| m.start())
        .filter(|&s| s > 0 && bytes[s - 1] == b'\n')
        .collect();
    points.dedup();
    points
}
