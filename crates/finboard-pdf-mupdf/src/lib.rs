use std::path::Path;

use mupdf::{Document, TextPageFlags};

use finboard_core::{BackendError, PdfBackend};

/// Number of leading pages read by default. Annual reports put the
/// shareholder letter with the headline figures up front.
pub const DEFAULT_MAX_PAGES: usize = 2;

/// MuPDF-based implementation of [`PdfBackend`].
///
/// This crate isolates the mupdf dependency (which is AGPL-3.0) so that the
/// extraction rules and the dashboard do not transitively depend on it.
///
/// Only the first [`DEFAULT_MAX_PAGES`] pages are read unless configured
/// otherwise. Pages are joined with a single space; lines within a page are
/// separated by newlines. The MuPDF document is dropped before
/// [`extract_text`](PdfBackend::extract_text) returns, on error paths too.
#[derive(Debug, Clone)]
pub struct MupdfBackend {
    /// Maximum number of pages to read from the front of the document.
    /// `None` reads every page.
    max_pages: Option<usize>,
}

impl Default for MupdfBackend {
    fn default() -> Self {
        Self {
            max_pages: Some(DEFAULT_MAX_PAGES),
        }
    }
}

impl MupdfBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the page limit. Pass `0` to read the whole document.
    pub fn with_max_pages(mut self, pages: usize) -> Self {
        self.max_pages = if pages > 0 { Some(pages) } else { None };
        self
    }

    pub fn max_pages(&self) -> Option<usize> {
        self.max_pages
    }
}

impl PdfBackend for MupdfBackend {
    fn extract_text(&self, path: &Path) -> Result<String, BackendError> {
        let path_str = path
            .to_str()
            .ok_or_else(|| BackendError::OpenError("invalid path encoding".into()))?;

        let document =
            Document::open(path_str).map_err(|e| BackendError::OpenError(e.to_string()))?;

        let limit = self.max_pages.unwrap_or(usize::MAX);
        let mut pages_text = Vec::new();

        for page_result in document
            .pages()
            .map_err(|e| BackendError::ExtractionError(e.to_string()))?
            .take(limit)
        {
            let page = page_result.map_err(|e| BackendError::ExtractionError(e.to_string()))?;
            let text_page = page
                .to_text_page(TextPageFlags::empty())
                .map_err(|e| BackendError::ExtractionError(e.to_string()))?;

            let mut page_text = String::new();
            for block in text_page.blocks() {
                for line in block.lines() {
                    let line_text: String = line
                        .chars()
                        .map(|c| c.char().unwrap_or('\u{FFFD}'))
                        .collect();
                    page_text.push_str(&line_text);
                    page_text.push('\n');
                }
            }
            pages_text.push(page_text);
        }

        tracing::debug!(
            path = %path.display(),
            pages = pages_text.len(),
            "extracted report text"
        );

        Ok(pages_text.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use finboard_core::mock::write_text_pdf;

    use super::*;

    #[test]
    fn default_reads_two_pages() {
        assert_eq!(MupdfBackend::new().max_pages(), Some(2));
    }

    #[test]
    fn zero_means_every_page() {
        assert_eq!(MupdfBackend::new().with_max_pages(0).max_pages(), None);
        assert_eq!(MupdfBackend::new().with_max_pages(5).max_pages(), Some(5));
    }

    fn three_page_report(dir: &tempfile::TempDir) -> std::path::PathBuf {
        let path = dir.path().join("report.pdf");
        let pages: [&[&str]; 3] = [
            &["FIRSTLINE", "SECONDLINE"],
            &["PAGETWO"],
            &["PAGETHREE"],
        ];
        write_text_pdf(&path, &pages).unwrap();
        path
    }

    #[test]
    fn default_limit_skips_later_pages() {
        let dir = tempfile::tempdir().unwrap();
        let text = MupdfBackend::new()
            .extract_text(&three_page_report(&dir))
            .unwrap();
        assert!(text.contains("FIRSTLINE"));
        assert!(text.contains("PAGETWO"));
        assert!(!text.contains("PAGETHREE"));
    }

    #[test]
    fn zero_limit_reads_every_page() {
        let dir = tempfile::tempdir().unwrap();
        let text = MupdfBackend::new()
            .with_max_pages(0)
            .extract_text(&three_page_report(&dir))
            .unwrap();
        assert!(text.contains("PAGETHREE"));
    }

    #[test]
    fn lines_end_in_newlines_and_pages_join_with_a_space() {
        let dir = tempfile::tempdir().unwrap();
        let text = MupdfBackend::new()
            .extract_text(&three_page_report(&dir))
            .unwrap();
        assert!(text.contains("FIRSTLINE\nSECONDLINE\n"));
        assert!(text.contains("SECONDLINE\n PAGETWO"));
    }

    #[test]
    fn missing_file_is_an_open_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = MupdfBackend::new().extract_text(&dir.path().join("absent.pdf"));
        assert!(matches!(result, Err(BackendError::OpenError(_))));
    }
}
