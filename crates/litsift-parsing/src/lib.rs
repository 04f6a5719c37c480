use std::path::Path;

use thiserror::Error;

pub mod config;
pub mod extractor;
pub mod fields;
pub mod scoring;
pub mod section;

pub use config::{ListOverride, ParsingConfig, ParsingConfigBuilder};
pub use extractor::{EntryExtractor, RankingRun};
pub use fields::{ExtractedFields, ExtractionReport, Field, FieldExtractor, FieldPattern};
pub use scoring::{Scorer, rank};
pub use section::{CAPITALIZED_LINE_BOUNDARY, segment_entries};
// Re-export domain types from core (canonical definitions live there)
pub use litsift_core::{BackendError, DocumentBackend, Entry, Lexicon, MetadataRecord};

#[derive(Error, Debug)]
pub enum ParsingError {
    #[error("invalid pattern: {0}")]
    InvalidPattern(#[from] regex::Error),
    #[error(transparent)]
    Backend(#[from] BackendError),
}

/// Rank the entries of a document loaded through `backend`, with default
/// configuration and lexicon.
///
/// Pipeline:
/// 1. Extract page text via `backend` and join the pages
/// 2. Segment the text at `Author:` lines, dropping short segments
/// 3. Score each entry against the keyword lexicon
/// 4. Keep the `top_n` highest-scoring entries
/// 5. Extract authors, DOI, publisher, year and description from each
pub fn rank_entries(
    path: &Path,
    backend: &dyn DocumentBackend,
    top_n: usize,
) -> Result<RankingRun, ParsingError> {
    EntryExtractor::new().rank_file(path, backend, top_n)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct PagesBackend(Vec<String>);

    impl DocumentBackend for PagesBackend {
        fn extract_pages(&self, _path: &Path) -> Result<Vec<String>, BackendError> {
            Ok(self.0.clone())
        }
    }

    struct FailingBackend;

    impl DocumentBackend for FailingBackend {
        fn extract_pages(&self, path: &Path) -> Result<Vec<String>, BackendError> {
            Err(BackendError::OpenError(path.display().to_string()))
        }
    }

    #[test]
    fn test_rank_entries_uses_default_configuration() {
        let strong = format!(
            "Author: Lee, A.\nDescription: {}",
            "federated learning with differential privacy ".repeat(8)
        );
        let weak = format!("Author: Kim, B.\nDescription: {}", "x ".repeat(200));
        let short = "Author: Short, C.\nDescription: too short to keep";
        let backend = PagesBackend(vec![weak, short.to_string(), strong]);

        let run = rank_entries(Path::new("export.pdf"), &backend, 1).unwrap();
        assert_eq!(run.total_entries, 2, "short entry dropped at the default length");
        assert_eq!(run.records.len(), 1);
        assert_eq!(run.records[0].authors, "Lee, A.");
        assert_eq!(run.records[0].rank, 1);
    }

    #[test]
    fn test_rank_entries_propagates_backend_error() {
        let err = rank_entries(Path::new("missing.pdf"), &FailingBackend, 10).unwrap_err();
        assert!(matches!(err, ParsingError::Backend(BackendError::OpenError(_))));
    }
}
