use std::sync::Arc;

use thiserror::Error;

pub mod backend;
pub mod cache;
pub mod config_file;
pub mod metrics;
pub mod mock;

// Re-export for convenience
pub use backend::{BackendError, PdfBackend};
pub use cache::{CacheStats, MetricsCache};
pub use metrics::{DEFAULT_AZURE, DEFAULT_INCOME, DEFAULT_REVENUE, MetricsRecord};

/// Message reported when the report file does not exist.
pub const SOURCE_PENDING: &str = "Data Source Pending";

/// Everything that can go wrong between opening a report and holding a
/// [`MetricsRecord`]. There is no partial result: any of these aborts the load.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractionError {
    /// The document could not be opened or its text could not be read.
    #[error("{0}")]
    SourceUnavailable(String),
    /// Revenue is zero, so margin and cloud mix are undefined.
    #[error("{0}")]
    ArithmeticAnomaly(String),
    /// A rule matched but its capture is not a decimal numeral.
    #[error("could not parse {raw:?} captured by rule `{rule}` as a number")]
    InvalidNumber { rule: String, raw: String },
}

impl ExtractionError {
    /// The error for a report path that does not exist.
    pub fn source_pending() -> Self {
        Self::SourceUnavailable(SOURCE_PENDING.to_string())
    }
}

impl From<BackendError> for ExtractionError {
    fn from(err: BackendError) -> Self {
        Self::SourceUnavailable(err.to_string())
    }
}

/// The only two things a dashboard can be handed: a record to draw, or a
/// message explaining why there is nothing to draw.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome {
    Ready(Arc<MetricsRecord>),
    Unavailable(String),
}

impl LoadOutcome {
    pub fn record(&self) -> Option<&MetricsRecord> {
        match self {
            LoadOutcome::Ready(record) => Some(record),
            LoadOutcome::Unavailable(_) => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            LoadOutcome::Ready(_) => None,
            LoadOutcome::Unavailable(msg) => Some(msg),
        }
    }
}

impl From<Result<Arc<MetricsRecord>, ExtractionError>> for LoadOutcome {
    fn from(result: Result<Arc<MetricsRecord>, ExtractionError>) -> Self {
        match result {
            Ok(record) => LoadOutcome::Ready(record),
            Err(e) => LoadOutcome::Unavailable(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_pending_message_is_verbatim() {
        let err = ExtractionError::source_pending();
        assert_eq!(err.to_string(), "Data Source Pending");
        assert_eq!(
            err,
            ExtractionError::SourceUnavailable("Data Source Pending".into())
        );
    }

    #[test]
    fn backend_errors_become_source_unavailable() {
        let err: ExtractionError = BackendError::OpenError("corrupt xref".into()).into();
        assert_eq!(
            err,
            ExtractionError::SourceUnavailable("failed to open PDF: corrupt xref".into())
        );
    }

    #[test]
    fn outcome_from_error_keeps_only_the_message() {
        let outcome = LoadOutcome::from(Err(ExtractionError::source_pending()));
        assert_eq!(outcome.error_message(), Some("Data Source Pending"));
        assert!(outcome.record().is_none());
    }

    #[test]
    fn outcome_from_record() {
        let record = Arc::new(MetricsRecord::with_defaults());
        let outcome = LoadOutcome::from(Ok(Arc::clone(&record)));
        assert_eq!(outcome.record(), Some(record.as_ref()));
        assert!(outcome.error_message().is_none());
    }
}
