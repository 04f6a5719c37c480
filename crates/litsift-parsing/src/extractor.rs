use std::path::Path;

use litsift_core::{DocumentBackend, Entry, Lexicon, MetadataRecord, RawDocument};

use crate::ParsingError;
use crate::config::ParsingConfig;
use crate::fields::{ExtractedFields, ExtractionReport, FieldExtractor};
use crate::scoring::{self, Scorer};
use crate::section;

/// Output of one ranking run.
#[derive(Debug, Clone, Default)]
pub struct RankingRun {
    /// Top-N records, rank 1 first.
    pub records: Vec<MetadataRecord>,
    /// Entries produced by segmentation, before truncation.
    pub total_entries: usize,
    pub report: ExtractionReport,
}

/// A configurable entry ranking pipeline.
///
/// Holds a [`ParsingConfig`] and a [`Scorer`] and exposes each pipeline step
/// as a method. Use [`EntryExtractor::with_config`] and
/// [`EntryExtractor::with_lexicon`] to override the built-in defaults.
#[derive(Debug, Clone)]
pub struct EntryExtractor {
    config: ParsingConfig,
    scorer: Scorer,
    fields: FieldExtractor,
}

impl Default for EntryExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl EntryExtractor {
    /// Create an extractor with default configuration and lexicon.
    pub fn new() -> Self {
        Self::with_config(ParsingConfig::default())
    }

    /// Create an extractor with a custom configuration.
    pub fn with_config(config: ParsingConfig) -> Self {
        Self {
            fields: FieldExtractor::with_config(&config),
            scorer: Scorer::default(),
            config,
        }
    }

    /// Replace the keyword lexicon.
    pub fn with_lexicon(mut self, lexicon: Lexicon) -> Self {
        self.scorer = Scorer::new(lexicon);
        self
    }

    pub fn config(&self) -> &ParsingConfig {
        &self.config
    }

    pub fn scorer(&self) -> &Scorer {
        &self.scorer
    }

    /// Split full text into candidate entries (step 1).
    pub fn segment(&self, text: &str) -> Vec<Entry> {
        section::segment_entries_with_config(text, &self.config)
    }

    /// Keyword score of one entry's text (step 2).
    pub fn score(&self, text: &str) -> usize {
        self.scorer.score(text)
    }

    /// Score, sort and truncate entries (step 3).
    pub fn rank(&self, entries: Vec<Entry>, top_n: usize) -> Vec<Entry> {
        scoring::rank(entries, &self.scorer, top_n)
    }

    /// Pull metadata fields out of one entry (step 4).
    pub fn extract_fields(&self, text: &str) -> ExtractedFields {
        self.fields.extract_fields(text)
    }

    /// Run the full pipeline on already-extracted text.
    pub fn rank_text(&self, text: &str, top_n: usize) -> RankingRun {
        let entries = self.segment(text);
        let total_entries = entries.len();
        let ranked = self.rank(entries, top_n);

        let mut report = ExtractionReport::default();
        let records = ranked
            .into_iter()
            .enumerate()
            .map(|(i, entry)| {
                let fields = self.extract_fields(&entry.text);
                report.record(&fields);
                fields.into_record(i + 1, entry.score.unwrap_or(0))
            })
            .collect::<Vec<_>>();

        tracing::info!(
            entries = total_entries,
            ranked = records.len(),
            defaulted_fields = report.total_defaults(),
            "ranked entries"
        );

        RankingRun {
            records,
            total_entries,
            report,
        }
    }

    /// Run the full pipeline on a loaded document.
    pub fn rank_document(&self, document: &RawDocument, top_n: usize) -> RankingRun {
        self.rank_text(&document.full_text(), top_n)
    }

    /// Load `path` through `backend` and run the pipeline.
    pub fn rank_file(
        &self,
        path: &Path,
        backend: &dyn DocumentBackend,
        top_n: usize,
    ) -> Result<RankingRun, ParsingError> {
        let document = backend.load(path)?;
        Ok(self.rank_document(&document, top_n))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ParsingConfigBuilder;
    use crate::fields::Field;
    use litsift_core::{BackendError, UNKNOWN};

    fn lenient() -> EntryExtractor {
        EntryExtractor::with_config(ParsingConfigBuilder::new().min_entry_len(0).build().unwrap())
            .with_lexicon(Lexicon::new(["privacy", "ehr"]))
    }

    const TWO_ENTRIES: &str = "Author: Kim, B.\nDescription: EHR study\n\
        Author: Lee, A.\nDescription: privacy and EHR privacy\nPublisher: ACM";

    #[test]
    fn test_rank_text_assigns_ranks_and_scores() {
        let run = lenient().rank_text(TWO_ENTRIES, 10);
        assert_eq!(run.total_entries, 2);
        assert_eq!(run.records.len(), 2);
        assert_eq!(run.records[0].authors, "Lee, A.");
        assert_eq!(run.records[0].rank, 1);
        assert_eq!(run.records[0].score, 3);
        assert_eq!(run.records[1].authors, "Kim, B.");
        assert_eq!(run.records[1].rank, 2);
        assert_eq!(run.records[1].score, 1);
    }

    #[test]
    fn test_rank_text_reports_defaults() {
        let run = lenient().rank_text(TWO_ENTRIES, 10);
        assert_eq!(run.report.records, 2);
        assert_eq!(run.report.defaults(Field::Publisher), 1);
        assert_eq!(run.report.defaults(Field::Identifier), 2);
        assert_eq!(run.records[1].publisher, UNKNOWN);
    }

    #[test]
    fn test_top_n_truncates() {
        let run = lenient().rank_text(TWO_ENTRIES, 1);
        assert_eq!(run.total_entries, 2);
        assert_eq!(run.records.len(), 1);
    }

    #[test]
    fn test_empty_document() {
        let run = EntryExtractor::new().rank_document(&RawDocument::empty(), 10);
        assert_eq!(run.total_entries, 0);
        assert!(run.records.is_empty());
    }

    struct FixedBackend(Result<Vec<String>, String>);

    impl DocumentBackend for FixedBackend {
        fn extract_pages(&self, _path: &Path) -> Result<Vec<String>, BackendError> {
            self.0.clone().map_err(BackendError::OpenError)
        }
    }

    #[test]
    fn test_rank_file_via_backend() {
        let backend = FixedBackend(Ok(vec![
            "Author: Kim, B.\nDescription: EHR study".into(),
            "Author: Lee, A.\nDescription: privacy".into(),
        ]));
        let run = lenient()
            .rank_file(Path::new("corpus.pdf"), &backend, 10)
            .unwrap();
        assert_eq!(run.records.len(), 2);
    }

    #[test]
    fn test_rank_file_propagates_backend_error() {
        let backend = FixedBackend(Err("bad file".into()));
        let err = lenient()
            .rank_file(Path::new("corpus.pdf"), &backend, 10)
            .unwrap_err();
        assert!(matches!(err, ParsingError::Backend(_)));
    }
}
