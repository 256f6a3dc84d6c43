use std::path::Path;

use finboard_core::{ExtractionError, MetricsRecord, PdfBackend};

use crate::config::ExtractionConfig;
use crate::rules::Figure;

/// A configurable metrics extraction pipeline.
///
/// Holds an [`ExtractionConfig`] and exposes each pipeline step as a method.
/// The default constructor uses the built-in rules; use
/// [`MetricsExtractor::with_config`] to supply custom patterns and defaults.
#[derive(Debug, Clone)]
pub struct MetricsExtractor {
    config: ExtractionConfig,
}

/// A record together with where each of its base figures came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    pub record: MetricsRecord,
    pub revenue: Figure,
    pub income: Figure,
    pub azure: Figure,
}

impl Extraction {
    /// Number of base figures that fell back to their defaults.
    pub fn defaulted(&self) -> usize {
        [&self.revenue, &self.income, &self.azure]
            .into_iter()
            .filter(|f| f.is_default())
            .count()
    }
}

impl Default for MetricsExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricsExtractor {
    /// Create an extractor with the built-in rules.
    pub fn new() -> Self {
        Self {
            config: ExtractionConfig::default(),
        }
    }

    /// Create an extractor with a custom configuration.
    pub fn with_config(config: ExtractionConfig) -> Self {
        Self { config }
    }

    /// Get a reference to the current config.
    pub fn config(&self) -> &ExtractionConfig {
        &self.config
    }

    /// Read the report text through `backend` (step 1).
    ///
    /// A path that does not exist is reported as `Data Source Pending`
    /// without calling the backend.
    pub fn extract_text(
        &self,
        path: &Path,
        backend: &dyn PdfBackend,
    ) -> Result<String, ExtractionError> {
        if !path.exists() {
            tracing::info!(path = %path.display(), "report not found");
            return Err(ExtractionError::source_pending());
        }
        Ok(backend.extract_text(path)?)
    }

    /// Locate the three base figures and derive the record (step 2).
    pub fn extract(&self, text: &str) -> Result<MetricsRecord, ExtractionError> {
        self.extract_with_provenance(text).map(|e| e.record)
    }

    /// Like [`extract`](Self::extract), but also reports which rules matched.
    pub fn extract_with_provenance(&self, text: &str) -> Result<Extraction, ExtractionError> {
        let revenue = self.config.revenue.apply(text)?;
        let income = self.config.income.apply(text)?;
        let azure = self.config.azure.apply(text)?;

        let record = MetricsRecord::derive(revenue.value, income.value, azure.value)?;

        let extraction = Extraction {
            record,
            revenue,
            income,
            azure,
        };
        tracing::info!(
            revenue = %extraction.record.revenue(),
            income = %extraction.record.income(),
            azure = %extraction.record.azure(),
            defaulted = extraction.defaulted(),
            "metrics extracted"
        );
        Ok(extraction)
    }

    /// Run the full pipeline on a report file.
    pub fn extract_metrics_via_backend(
        &self,
        path: &Path,
        backend: &dyn PdfBackend,
    ) -> Result<MetricsRecord, ExtractionError> {
        let text = self.extract_text(path, backend)?;
        self.extract(&text)
    }
}
