use std::fmt;

use serde::Serialize;

pub mod backend;
pub mod config_file;
pub mod derive;
pub mod enrich;
pub mod lexicon;
pub mod matching;
pub mod text_utils;

// Re-export for convenience
pub use backend::{BackendError, DocumentBackend};
pub use derive::{
    Accuracy, ComplianceSet, ComplianceTag, DerivationConfig, DeriveError, DerivedFieldExtractor,
    DerivedFields, NumericPattern, TechniqueSet, TechniqueTag,
};
pub use enrich::{AnalysisStats, Enricher, EnrichmentRun, PrivacyAccuracyPoint};
pub use lexicon::Lexicon;
pub use matching::{MatchConfig, MatchOutcome, MatchPartition, match_all, match_exact, match_fuzzy};
pub use text_utils::extract_year;

/// Placeholder for any metadata field that could not be extracted.
pub const UNKNOWN: &str = "Unknown";

/// Placeholder for a missing description/abstract.
pub const NO_DESCRIPTION: &str = "No description found";

/// Descriptions are cut to this many characters when persisted.
pub const DESCRIPTION_PERSIST_CHARS: usize = 300;

/// A loaded document: one string per page, in page order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawDocument {
    pages: Vec<String>,
}

impl RawDocument {
    pub fn new(pages: Vec<String>) -> Self {
        Self { pages }
    }

    /// A document with no pages (what a failed load degrades to).
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn pages(&self) -> &[String] {
        &self.pages
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Page texts joined by a newline.
    pub fn full_text(&self) -> String {
        self.pages.join("\n")
    }
}

impl From<Vec<String>> for RawDocument {
    fn from(pages: Vec<String>) -> Self {
        Self::new(pages)
    }
}

/// A candidate bibliographic entry cut from a document by the segmenter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub text: String,
    /// 0-based position in segmentation (document) order.
    pub position: usize,
    /// Keyword score, set once by the scorer.
    pub score: Option<usize>,
}

impl Entry {
    pub fn new(text: impl Into<String>, position: usize) -> Self {
        Self {
            text: text.into(),
            position,
            score: None,
        }
    }
}

/// Where an extracted value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ValueSource {
    /// Index of the pattern in its ordered chain that matched first.
    Pattern(usize),
    /// No pattern matched; the field's default was substituted.
    Default,
}

/// Outcome of one ordered pattern chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldValue {
    pub value: String,
    pub source: ValueSource,
}

impl FieldValue {
    pub fn matched(value: impl Into<String>, pattern: usize) -> Self {
        Self {
            value: value.into(),
            source: ValueSource::Pattern(pattern),
        }
    }

    pub fn default_value(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            source: ValueSource::Default,
        }
    }

    pub fn is_default(&self) -> bool {
        self.source == ValueSource::Default
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

/// Structured projection of one ranked entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetadataRecord {
    /// 1-based position among the top-N after sorting.
    pub rank: usize,
    pub score: usize,
    pub authors: String,
    /// DOI-shaped identifier, or [`UNKNOWN`].
    pub identifier: String,
    pub publisher: String,
    pub year: String,
    pub description: String,
}

impl Default for MetadataRecord {
    fn default() -> Self {
        Self {
            rank: 0,
            score: 0,
            authors: UNKNOWN.to_string(),
            identifier: UNKNOWN.to_string(),
            publisher: UNKNOWN.to_string(),
            year: UNKNOWN.to_string(),
            description: NO_DESCRIPTION.to_string(),
        }
    }
}

impl MetadataRecord {
    /// Whether the record carries an identifier usable as an exact join key.
    pub fn has_identifier(&self) -> bool {
        self.identifier != UNKNOWN
    }
}

/// How a record was located in the second document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MatchMethod {
    /// The page contains the record's identifier.
    Exact,
    /// Author surname / title fragment scoring picked the page.
    Fuzzy { score: usize },
}

impl fmt::Display for MatchMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchMethod::Exact => f.write_str("identifier"),
            MatchMethod::Fuzzy { score } => write!(f, "author/title (score {})", score),
        }
    }
}

/// A loaded record paired with the page text believed to hold its full text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchedArticle {
    pub record: MetadataRecord,
    /// 0-based index of the matched page.
    pub page_index: usize,
    pub text: String,
    pub method: MatchMethod,
}

/// A matched article plus the fields inferred from its full text.
#[derive(Debug, Clone, Serialize)]
pub struct EnrichedRecord {
    pub article: MatchedArticle,
    pub derived: DerivedFields,
}

impl EnrichedRecord {
    pub fn record(&self) -> &MetadataRecord {
        &self.article.record
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_text_joins_pages_with_newline() {
        let doc = RawDocument::new(vec!["first".into(), "second".into()]);
        assert_eq!(doc.full_text(), "first\nsecond");
        assert_eq!(doc.page_count(), 2);
    }

    #[test]
    fn test_empty_document_has_empty_text() {
        let doc = RawDocument::empty();
        assert!(doc.is_empty());
        assert_eq!(doc.full_text(), "");
    }

    #[test]
    fn test_default_record_uses_placeholders() {
        let r = MetadataRecord::default();
        assert_eq!(r.authors, UNKNOWN);
        assert_eq!(r.identifier, UNKNOWN);
        assert_eq!(r.description, NO_DESCRIPTION);
        assert!(!r.has_identifier());
    }
}
