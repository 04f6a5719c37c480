use std::path::Path;

use mupdf::{Document, TextPageFlags};

use litsift_core::{BackendError, DocumentBackend};

/// MuPDF-based implementation of [`DocumentBackend`].
///
/// Keeps the AGPL mupdf dependency out of every other crate. Each page is
/// read block by block and line by line, one output line per text line.
///
/// Catalogue exports carry no running headers, so header and footer
/// exclusion are off by default. Use [`with_header_exclusion`] and
/// [`with_footer_exclusion`] for scanned journals that repeat a page banner.
///
/// [`with_header_exclusion`]: MupdfBackend::with_header_exclusion
/// [`with_footer_exclusion`]: MupdfBackend::with_footer_exclusion
#[derive(Debug, Clone, Default)]
pub struct MupdfBackend {
    /// Fraction of page height from the bottom to drop. `None` keeps it.
    footer_exclusion_ratio: Option<f32>,
    /// Fraction of page height from the top to drop. `None` keeps it.
    header_exclusion_ratio: Option<f32>,
}

impl MupdfBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the footer exclusion ratio. Pass `0.0` to disable.
    pub fn with_footer_exclusion(mut self, ratio: f32) -> Self {
        self.footer_exclusion_ratio = (ratio > 0.0).then_some(ratio);
        self
    }

    /// Set the header exclusion ratio. Pass `0.0` to disable.
    pub fn with_header_exclusion(mut self, ratio: f32) -> Self {
        self.header_exclusion_ratio = (ratio > 0.0).then_some(ratio);
        self
    }

    fn page_text(&self, page: &mupdf::Page) -> Result<String, BackendError> {
        let text_page = page
            .to_text_page(TextPageFlags::empty())
            .map_err(|e| BackendError::ExtractionError(e.to_string()))?;

        let bounds = page
            .bounds()
            .map_err(|e| BackendError::ExtractionError(e.to_string()))?;
        let height = bounds.y1 - bounds.y0;
        let header_limit = self.header_exclusion_ratio.map(|r| bounds.y0 + height * r);
        let footer_limit = self.footer_exclusion_ratio.map(|r| bounds.y1 - height * r);

        let mut text = String::new();
        for block in text_page.blocks() {
            let block_bounds = block.bounds();
            if header_limit.is_some_and(|limit| block_bounds.y1 <= limit) {
                continue;
            }
            if footer_limit.is_some_and(|limit| block_bounds.y0 >= limit) {
                continue;
            }

            for line in block.lines() {
                text.extend(line.chars().map(|c| c.char().unwrap_or('\u{FFFD}')));
                text.push('\n');
            }
        }
        Ok(text)
    }
}

impl DocumentBackend for MupdfBackend {
    fn extract_pages(&self, path: &Path) -> Result<Vec<String>, BackendError> {
        let path_str = path
            .to_str()
            .ok_or_else(|| BackendError::OpenError("invalid path encoding".into()))?;

        let document =
            Document::open(path_str).map_err(|e| BackendError::OpenError(e.to_string()))?;

        let mut pages = Vec::new();
        for page in document
            .pages()
            .map_err(|e| BackendError::ExtractionError(e.to_string()))?
        {
            let page = page.map_err(|e| BackendError::ExtractionError(e.to_string()))?;
            pages.push(self.page_text(&page)?);
        }

        tracing::debug!(path = %path.display(), pages = pages.len(), "extracted PDF pages");
        Ok(pages)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exclusion_disabled_by_default() {
        let backend = MupdfBackend::new();
        assert!(backend.header_exclusion_ratio.is_none());
        assert!(backend.footer_exclusion_ratio.is_none());
    }

    #[test]
    fn test_zero_ratio_disables_exclusion() {
        let backend = MupdfBackend::new()
            .with_header_exclusion(0.04)
            .with_footer_exclusion(0.05)
            .with_header_exclusion(0.0);
        assert!(backend.header_exclusion_ratio.is_none());
        assert_eq!(backend.footer_exclusion_ratio, Some(0.05));
    }

    #[test]
    fn test_missing_file_is_open_error() {
        let err = MupdfBackend::new()
            .extract_pages(Path::new("/nonexistent/corpus.pdf"))
            .unwrap_err();
        assert!(matches!(err, BackendError::OpenError(_)), "got {err:?}");
    }
}
