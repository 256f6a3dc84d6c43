use std::path::{Path, PathBuf};

use thiserror::Error;

use finboard_core::config_file::ConfigFile;
use finboard_core::{BackendError, ExtractionError, LoadOutcome, MetricsCache, PdfBackend};
use finboard_parsing::{ExtractionConfigBuilder, MetricsExtractor, RuleError};

// Re-export domain types for convenience
pub use finboard_core::MetricsRecord;
pub use finboard_parsing::Extraction;

/// File name looked up next to the executable when no report path is given.
pub const DEFAULT_REPORT_FILE: &str = "2025_AnnualReport1.pdf";

#[derive(Error, Debug)]
pub enum IngestError {
    #[error("extraction rules: {0}")]
    Rules(#[from] RuleError),
}

/// Where to look for the report when the caller did not name one: the
/// directory holding the running executable.
pub fn default_report_path() -> Option<PathBuf> {
    let exe = std::env::current_exe().ok()?;
    Some(exe.parent()?.join(DEFAULT_REPORT_FILE))
}

/// Reads plain-text renditions of a report (`.txt`), mostly useful for
/// reports already converted by another tool.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTextBackend;

impl PdfBackend for PlainTextBackend {
    fn extract_text(&self, path: &Path) -> Result<String, BackendError> {
        Ok(std::fs::read_to_string(path)?)
    }
}

/// Loads a report from disk and turns it into a [`MetricsRecord`].
///
/// Dispatches to a text backend based on file extension:
/// - `.txt` → [`PlainTextBackend`]
/// - anything else → MuPDF (requires `pdf` feature)
#[derive(Debug, Clone)]
pub struct ReportLoader {
    extractor: MetricsExtractor,
    max_pages: usize,
}

impl Default for ReportLoader {
    fn default() -> Self {
        Self {
            extractor: MetricsExtractor::new(),
            max_pages: 2,
        }
    }
}

impl ReportLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a loader from the `[source]`, `[rules]` and `[defaults]` tables.
    pub fn from_config_file(config: &ConfigFile) -> Result<Self, IngestError> {
        let extraction = ExtractionConfigBuilder::from_config_file(config).build()?;
        let mut loader = Self {
            extractor: MetricsExtractor::with_config(extraction),
            ..Self::default()
        };
        if let Some(pages) = config.source.as_ref().and_then(|s| s.max_pages) {
            loader.max_pages = pages;
        }
        Ok(loader)
    }

    /// Number of leading PDF pages read; `0` reads the whole document.
    pub fn with_max_pages(mut self, pages: usize) -> Self {
        self.max_pages = pages;
        self
    }

    pub fn extractor(&self) -> &MetricsExtractor {
        &self.extractor
    }

    /// Read the report text with the backend matching its extension.
    pub fn read_text(&self, path: &Path) -> Result<String, ExtractionError> {
        if !path.exists() {
            return Err(ExtractionError::source_pending());
        }
        let backend = self.backend_for(path)?;
        self.extractor.extract_text(path, backend.as_ref())
    }

    /// Load the report and derive its metrics record. Not cached.
    pub fn load(&self, path: &Path) -> Result<MetricsRecord, ExtractionError> {
        self.extract(path).map(|e| e.record)
    }

    /// Load the report, keeping per-rule provenance. Not cached.
    pub fn extract(&self, path: &Path) -> Result<Extraction, ExtractionError> {
        let text = self.read_text(path)?;
        self.extractor.extract_with_provenance(&text)
    }

    /// Load through `cache`, and fold the result into what a dashboard renders.
    pub fn load_cached(&self, cache: &MetricsCache, path: &Path) -> LoadOutcome {
        let outcome = LoadOutcome::from(cache.get_or_compute(path, |p| self.load(p)));
        if let LoadOutcome::Unavailable(msg) = &outcome {
            tracing::warn!(path = %path.display(), error = %msg, "report unavailable");
        }
        outcome
    }

    fn backend_for(&self, path: &Path) -> Result<Box<dyn PdfBackend>, ExtractionError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        match ext.as_str() {
            "txt" => Ok(Box::new(PlainTextBackend)),
            _ => self.pdf_backend(),
        }
    }

    #[cfg(feature = "pdf")]
    fn pdf_backend(&self) -> Result<Box<dyn PdfBackend>, ExtractionError> {
        Ok(Box::new(
            finboard_pdf_mupdf::MupdfBackend::new().with_max_pages(self.max_pages),
        ))
    }

    #[cfg(not(feature = "pdf"))]
    fn pdf_backend(&self) -> Result<Box<dyn PdfBackend>, ExtractionError> {
        Err(ExtractionError::SourceUnavailable(
            "PDF support not compiled in (enable the `pdf` feature of finboard-ingest)".into(),
        ))
    }
}
