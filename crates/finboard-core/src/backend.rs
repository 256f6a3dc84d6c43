use std::path::Path;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("failed to open PDF: {0}")]
    OpenError(String),
    #[error("failed to extract text: {0}")]
    ExtractionError(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Trait for document text extraction backends.
///
/// Implementors provide the low-level text step only; locating figures in
/// the text lives in `finboard_parsing::MetricsExtractor`. Any handle a
/// backend opens must be released before `extract_text` returns, whether it
/// succeeds or not.
pub trait PdfBackend: Send + Sync {
    /// Extract the plain text of a document.
    fn extract_text(&self, path: &Path) -> Result<String, BackendError>;
}
