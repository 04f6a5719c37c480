//! Locating ranked records inside a second document.
//!
//! Matching runs in two phases. The exact phase looks for the record's
//! identifier on each page and takes the first page that contains it. Records
//! without an identifier, or whose identifier appears nowhere, fall through to
//! the fuzzy phase, which scores every page on the first author's surname
//! (+1) and a title fragment taken from the description (+2) and keeps the
//! best page if it reaches the threshold.
//!
//! Both phases are pure functions returning a [`MatchPartition`]; the
//! unmatched half of the exact phase is the input of the fuzzy phase.

use crate::text_utils::{first_author_surname, title_fragment};
use crate::{MatchMethod, MatchedArticle, MetadataRecord, RawDocument};

/// Tunables for the fuzzy phase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchConfig {
    /// Minimum page score for a fuzzy match. The default of 2 means the
    /// title fragment must be present; the surname alone is not enough.
    pub fuzzy_threshold: usize,
    /// Separator between authors in the authors field.
    pub author_separator: char,
    /// Number of alphabetic description tokens forming the title fragment.
    pub title_words: usize,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            fuzzy_threshold: 2,
            author_separator: ';',
            title_words: 5,
        }
    }
}

/// Weight of the surname signal in the fuzzy page score.
pub const SURNAME_WEIGHT: usize = 1;
/// Weight of the title-fragment signal in the fuzzy page score.
pub const TITLE_WEIGHT: usize = 2;

/// Result of one matching phase. Indices refer to the caller's record list.
#[derive(Debug, Clone, Default)]
pub struct MatchPartition {
    pub matched: Vec<(usize, MatchedArticle)>,
    pub unmatched: Vec<(usize, MetadataRecord)>,
}

/// Result of both phases, in input order.
#[derive(Debug, Clone, Default)]
pub struct MatchOutcome {
    pub matched: Vec<MatchedArticle>,
    pub unmatched: Vec<MetadataRecord>,
}

fn lowercase_pages(pages: &[String]) -> Vec<String> {
    pages.iter().map(|p| p.to_lowercase()).collect()
}

/// Exact phase: the first page containing the record's identifier
/// (case-insensitive) wins. Records without an identifier are passed through
/// as unmatched.
pub fn match_exact(pending: Vec<(usize, MetadataRecord)>, pages: &[String]) -> MatchPartition {
    let lowered = lowercase_pages(pages);
    let mut partition = MatchPartition::default();

    for (idx, record) in pending {
        if !record.has_identifier() {
            partition.unmatched.push((idx, record));
            continue;
        }

        let needle = record.identifier.to_lowercase();
        match lowered.iter().position(|page| page.contains(&needle)) {
            Some(page_index) => {
                tracing::debug!(doi = %record.identifier, page_index, "matched by identifier");
                partition.matched.push((
                    idx,
                    MatchedArticle {
                        text: pages[page_index].clone(),
                        page_index,
                        method: MatchMethod::Exact,
                        record,
                    },
                ));
            }
            None => {
                tracing::debug!(doi = %record.identifier, "identifier not found in any page");
                partition.unmatched.push((idx, record));
            }
        }
    }

    partition
}

/// Score one lower-cased page against a lower-cased surname and title
/// fragment. Empty signals never score.
pub fn fuzzy_page_score(page: &str, surname: &str, fragment: &str) -> usize {
    let mut score = 0;
    if !surname.is_empty() && page.contains(surname) {
        score += SURNAME_WEIGHT;
    }
    if !fragment.is_empty() && page.contains(fragment) {
        score += TITLE_WEIGHT;
    }
    score
}

/// Best-scoring page for `record` as `(page_index, score)`.
///
/// The earliest page wins ties; pages scoring zero are never returned.
pub fn best_fuzzy_page(
    record: &MetadataRecord,
    lowered_pages: &[String],
    config: &MatchConfig,
) -> Option<(usize, usize)> {
    let surname = first_author_surname(&record.authors, config.author_separator).to_lowercase();
    let fragment = title_fragment(&record.description, config.title_words).to_lowercase();

    let mut best: Option<(usize, usize)> = None;
    for (page_index, page) in lowered_pages.iter().enumerate() {
        let score = fuzzy_page_score(page, &surname, &fragment);
        if score > best.map_or(0, |(_, s)| s) {
            best = Some((page_index, score));
        }
    }
    best
}

/// Fuzzy phase: pick the strictly best page per record and keep it when its
/// score reaches `config.fuzzy_threshold`.
pub fn match_fuzzy(
    pending: Vec<(usize, MetadataRecord)>,
    pages: &[String],
    config: &MatchConfig,
) -> MatchPartition {
    let lowered = lowercase_pages(pages);
    let mut partition = MatchPartition::default();

    for (idx, record) in pending {
        match best_fuzzy_page(&record, &lowered, config) {
            Some((page_index, score)) if score >= config.fuzzy_threshold => {
                tracing::debug!(authors = %record.authors, page_index, score, "matched by author/title");
                partition.matched.push((
                    idx,
                    MatchedArticle {
                        text: pages[page_index].clone(),
                        page_index,
                        method: MatchMethod::Fuzzy { score },
                        record,
                    },
                ));
            }
            best => {
                tracing::debug!(
                    authors = %record.authors,
                    best_score = best.map_or(0, |(_, s)| s),
                    "could not match record"
                );
                partition.unmatched.push((idx, record));
            }
        }
    }

    partition
}

/// Run both phases and return matched articles and dropped records, each in
/// input order.
pub fn match_all(
    records: &[MetadataRecord],
    document: &RawDocument,
    config: &MatchConfig,
) -> MatchOutcome {
    let pending: Vec<_> = records.iter().cloned().enumerate().collect();

    let exact = match_exact(pending, document.pages());
    let fuzzy = match_fuzzy(exact.unmatched, document.pages(), config);

    let mut matched: Vec<_> = exact.matched.into_iter().chain(fuzzy.matched).collect();
    matched.sort_by_key(|(idx, _)| *idx);

    let outcome = MatchOutcome {
        matched: matched.into_iter().map(|(_, a)| a).collect(),
        unmatched: fuzzy.unmatched.into_iter().map(|(_, r)| r).collect(),
    };

    tracing::info!(
        loaded = records.len(),
        matched = outcome.matched.len(),
        unmatched = outcome.unmatched.len(),
        "matched records against document"
    );

    outcome
}
