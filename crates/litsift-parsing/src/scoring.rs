use litsift_core::{Entry, Lexicon};

/// Counts lexicon keyword occurrences in entry text.
///
/// Matching is plain substring counting on the lower-cased text: `"he"`
/// inside `"the"` counts. Occurrences of one keyword do not overlap.
#[derive(Debug, Clone, Default)]
pub struct Scorer {
    lexicon: Lexicon,
}

impl Scorer {
    pub fn new(lexicon: Lexicon) -> Self {
        Self { lexicon }
    }

    pub fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }

    pub fn score(&self, text: &str) -> usize {
        let lower = text.to_lowercase();
        self.lexicon
            .entries()
            .iter()
            .map(|(keyword, weight)| lower.matches(keyword.as_str()).count() * weight)
            .sum()
    }

    /// Score `entry` unless it already carries a score.
    pub fn score_entry(&self, entry: &mut Entry) -> usize {
        *entry.score.get_or_insert_with(|| self.score(&entry.text))
    }
}

/// Sort entries by score, highest first, and keep the first `top_n`.
///
/// Entries are scored at most once. Equal scores keep segmentation order.
pub fn rank(mut entries: Vec<Entry>, scorer: &Scorer, top_n: usize) -> Vec<Entry> {
    for entry in &mut entries {
        scorer.score_entry(entry);
    }
    // `sort_by` is stable
    entries.sort_by(|a, b| b.score.unwrap_or(0).cmp(&a.score.unwrap_or(0)));
    entries.truncate(top_n);
    entries
}
