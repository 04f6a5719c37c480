use std::path::Path;

use thiserror::Error;

pub mod text;

pub use litsift_core::{BackendError, DocumentBackend, RawDocument};
pub use text::TextBackend;

#[derive(Error, Debug)]
pub enum IngestError {
    #[error("could not read {path}: {source}")]
    Backend {
        path: String,
        #[source]
        source: BackendError,
    },
    #[cfg(not(feature = "pdf"))]
    #[error("PDF support not compiled in (enable the `pdf` feature of litsift-ingest)")]
    NoPdfSupport,
}

/// Load a document as per-page text.
///
/// Dispatches on file extension:
/// - `.txt` / `.text` → [`TextBackend`] (pages split on form feed)
/// - anything else → PDF via MuPDF (requires the `pdf` feature)
pub fn load_document(path: &Path) -> Result<RawDocument, IngestError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    let document = match ext.as_str() {
        "txt" | "text" => load_with(path, &TextBackend),
        _ => load_pdf(path),
    }?;

    tracing::info!(
        path = %path.display(),
        pages = document.page_count(),
        "loaded document"
    );
    Ok(document)
}

/// Like [`load_document`], but a failure is logged and yields an empty
/// document, so downstream stages see no entries instead of an error.
pub fn load_document_or_empty(path: &Path) -> RawDocument {
    load_document(path).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "document load failed; continuing with empty text");
        RawDocument::empty()
    })
}

fn load_with(path: &Path, backend: &dyn DocumentBackend) -> Result<RawDocument, IngestError> {
    backend.load(path).map_err(|source| IngestError::Backend {
        path: path.display().to_string(),
        source,
    })
}

#[cfg(feature = "pdf")]
fn load_pdf(path: &Path) -> Result<RawDocument, IngestError> {
    load_with(path, &litsift_pdf_mupdf::MupdfBackend::default())
}

#[cfg(not(feature = "pdf"))]
fn load_pdf(_path: &Path) -> Result<RawDocument, IngestError> {
    Err(IngestError::NoPdfSupport)
}
