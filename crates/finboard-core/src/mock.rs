//! Mock text backend and fixture helpers for testing.

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::{BackendError, PdfBackend};

/// A hand-rolled mock implementing [`PdfBackend`] for tests.
///
/// Returns a fixed text (or a fixed open failure) for every path and counts
/// how many times it was asked.
#[derive(Debug)]
pub struct MockBackend {
    response: Result<String, String>,
    call_count: AtomicUsize,
}

impl MockBackend {
    /// A backend whose every document contains `text`.
    pub fn with_text(text: impl Into<String>) -> Self {
        Self {
            response: Ok(text.into()),
            call_count: AtomicUsize::new(0),
        }
    }

    /// A backend that fails to open every document with `message`.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            response: Err(message.into()),
            call_count: AtomicUsize::new(0),
        }
    }

    /// How many times [`PdfBackend::extract_text`] was called.
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }
}

impl PdfBackend for MockBackend {
    fn extract_text(&self, _path: &Path) -> Result<String, BackendError> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        self.response.clone().map_err(BackendError::OpenError)
    }
}

/// Write a minimal PDF with one page per entry of `pages`, each line of a
/// page drawn in Helvetica one below the other.
///
/// Only ASCII text is supported. Object offsets in the cross-reference table
/// are computed, so the file opens without repair.
pub fn write_text_pdf(path: &Path, pages: &[&[&str]]) -> std::io::Result<()> {
    let kids: Vec<String> = (0..pages.len())
        .map(|i| format!("{} 0 R", 4 + 2 * i))
        .collect();

    let mut objects = vec![
        "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
        format!(
            "<< /Type /Pages /Kids [{}] /Count {} >>",
            kids.join(" "),
            pages.len()
        ),
        "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica >>".to_string(),
    ];

    for (i, lines) in pages.iter().enumerate() {
        let mut content = String::from("BT\n/F1 12 Tf\n72 720 Td\n");
        for (j, line) in lines.iter().enumerate() {
            if j > 0 {
                content.push_str("0 -24 Td\n");
            }
            content.push_str(&format!("({}) Tj\n", escape_pdf_string(line)));
        }
        content.push_str("ET\n");

        objects.push(format!(
            "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] \
             /Resources << /Font << /F1 3 0 R >> >> /Contents {} 0 R >>",
            5 + 2 * i
        ));
        objects.push(format!(
            "<< /Length {} >>\nstream\n{}endstream",
            content.len(),
            content
        ));
    }

    let mut out = String::from("%PDF-1.4\n");
    let mut offsets = Vec::with_capacity(objects.len());
    for (i, object) in objects.iter().enumerate() {
        offsets.push(out.len());
        out.push_str(&format!("{} 0 obj\n{}\nendobj\n", i + 1, object));
    }

    let xref_offset = out.len();
    out.push_str(&format!("xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1));
    for offset in offsets {
        out.push_str(&format!("{:010} 00000 n \n", offset));
    }
    out.push_str(&format!(
        "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{}\n%%EOF\n",
        objects.len() + 1,
        xref_offset
    ));

    std::fs::write(path, out)
}

fn escape_pdf_string(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('(', "\\(")
        .replace(')', "\\)")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixture_pdf_has_a_valid_xref() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fixture.pdf");
        let pages: [&[&str]; 2] = [&["Revenue was $1 (approx)"], &["second"]];
        write_text_pdf(&path, &pages).unwrap();

        let bytes = std::fs::read_to_string(&path).unwrap();
        assert!(bytes.starts_with("%PDF-1.4\n"));
        assert!(bytes.contains("/Count 2"));
        assert!(bytes.contains("(Revenue was $1 \\(approx\\)) Tj"));

        // Every xref entry points at the start of its object.
        let xref = bytes.rfind("xref\n").unwrap();
        let entries = bytes[xref..].lines().skip(3).take(7);
        for (i, entry) in entries.enumerate() {
            let offset: usize = entry[..10].parse().unwrap();
            assert!(bytes[offset..].starts_with(&format!("{} 0 obj", i + 1)));
        }
    }

    #[test]
    fn mock_counts_calls() {
        let backend = MockBackend::failing("nope");
        assert!(backend.extract_text(Path::new("x.pdf")).is_err());
        assert!(backend.extract_text(Path::new("y.pdf")).is_err());
        assert_eq!(backend.call_count(), 2);
    }
}
