use std::path::Path;

use litsift_core::{BackendError, DocumentBackend};

/// Page separator in plain-text exports (`pdftotext` writes one per page).
pub const PAGE_BREAK: char = '\x0c';

/// Plain-text [`DocumentBackend`]: pages are separated by form feeds.
///
/// A trailing form feed does not create an extra empty page.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextBackend;

impl TextBackend {
    pub fn new() -> Self {
        Self
    }

    pub fn split_pages(text: &str) -> Vec<String> {
        if text.is_empty() {
            return Vec::new();
        }
        let text = text.strip_suffix(PAGE_BREAK).unwrap_or(text);
        text.split(PAGE_BREAK).map(str::to_string).collect()
    }
}

impl DocumentBackend for TextBackend {
    fn extract_pages(&self, path: &Path) -> Result<Vec<String>, BackendError> {
        let bytes = std::fs::read(path)?;
        let text = String::from_utf8_lossy(&bytes);
        Ok(Self::split_pages(&text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_splits_on_form_feed() {
        assert_eq!(
            TextBackend::split_pages("one\x0ctwo\x0cthree"),
            vec!["one", "two", "three"]
        );
    }

    #[test]
    fn test_trailing_form_feed_is_not_a_page() {
        assert_eq!(TextBackend::split_pages("one\x0ctwo\x0c"), vec!["one", "two"]);
    }

    #[test]
    fn test_no_form_feed_is_one_page() {
        assert_eq!(TextBackend::split_pages("just text\n"), vec!["just text\n"]);
        assert!(TextBackend::split_pages("").is_empty());
    }

    #[test]
    fn test_reads_file_lossily() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"caf\xe9\x0cpage two").unwrap();
        let pages = TextBackend.extract_pages(file.path()).unwrap();
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0], "caf\u{FFFD}");
        assert_eq!(pages[1], "page two");
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = TextBackend
            .extract_pages(Path::new("/nonexistent/export.txt"))
            .unwrap_err();
        assert!(matches!(err, BackendError::Io(_)));
    }
}
