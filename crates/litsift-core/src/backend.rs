use std::path::Path;

use thiserror::Error;

use crate::RawDocument;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("failed to open document: {0}")]
    OpenError(String),
    #[error("failed to extract text: {0}")]
    ExtractionError(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Trait for document text extraction backends.
///
/// Implementors only turn a file into per-page text; segmentation, scoring
/// and field extraction live in `litsift_parsing`.
pub trait DocumentBackend: Send + Sync {
    /// Extract the text of every page, in page order.
    fn extract_pages(&self, path: &Path) -> Result<Vec<String>, BackendError>;

    /// Extract the pages and wrap them in a [`RawDocument`].
    fn load(&self, path: &Path) -> Result<RawDocument, BackendError> {
        self.extract_pages(path).map(RawDocument::new)
    }
}
