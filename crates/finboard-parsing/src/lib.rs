use std::path::Path;

pub mod config;
pub mod extractor;
pub mod rules;

pub use config::{ExtractionConfig, ExtractionConfigBuilder, RuleError};
pub use extractor::{Extraction, MetricsExtractor};
pub use rules::{ExtractionRule, Figure, FigureSource};
// Re-export domain types from core (canonical definitions live there)
pub use finboard_core::{BackendError, ExtractionError, MetricsRecord, PdfBackend};

/// Extract the headline metrics from a report using the given backend for
/// text extraction.
///
/// Pipeline:
/// 1. Report `Data Source Pending` if `report_path` does not exist
/// 2. Extract text via `backend`
/// 3. Apply the revenue, operating income and Azure rules, defaulting misses
/// 4. Derive margin, cloud mix and non-Azure revenue
pub fn extract_metrics(
    report_path: &Path,
    backend: &dyn PdfBackend,
) -> Result<MetricsRecord, ExtractionError> {
    MetricsExtractor::new().extract_metrics_via_backend(report_path, backend)
}
