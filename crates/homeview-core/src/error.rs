//! Error types for homeview-core
//!
//! Wraps the errors of the lower crates so callers deal with one type:
//! - Input loading and validation
//! - Filter parsing and evaluation
//! - Configuration
//! - Export failures

use crate::config::ConfigError;
use homeview_features::DataValidationError;
use homeview_filter::{EvalError, ParseError};
use homeview_io::IoError;
use thiserror::Error;

/// Main error type for dashboard operations
#[derive(Error, Debug)]
pub enum HomeviewError {
    /// Reading an input failed
    #[error("Failed to load data: {0}")]
    Io(#[from] IoError),

    /// The house dataset is malformed
    #[error("Invalid house data: {0}")]
    Validation(#[from] DataValidationError),

    /// A filter expression did not parse
    #[error("Invalid filter: {0}")]
    FilterSyntax(#[from] ParseError),

    /// A filter referenced something the report does not have
    #[error("Filter failed: {0}")]
    FilterEval(#[from] EvalError),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    /// A recommendation report lacks a required column
    #[error("{report} report is missing column '{column}'")]
    MissingReportColumn { report: String, column: String },

    /// Unknown report kind in a request
    #[error("Unknown report: {0}")]
    UnknownReport(String),

    /// Unknown hypothesis/chart id
    #[error("Unknown chart: {0}")]
    UnknownChart(String),

    /// Export errors
    #[error("Export failed: {0}")]
    Export(String),

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    StdIo(#[from] std::io::Error),
}

impl HomeviewError {
    /// True for errors caused by the request rather than the server state
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            HomeviewError::FilterSyntax(_)
                | HomeviewError::FilterEval(_)
                | HomeviewError::UnknownReport(_)
                | HomeviewError::UnknownChart(_)
        )
    }
}

/// Result type alias for dashboard operations
pub type HomeviewResult<T> = Result<T, HomeviewError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = HomeviewError::MissingReportColumn {
            report: "buy".to_string(),
            column: "zipcode".to_string(),
        };
        assert_eq!(err.to_string(), "buy report is missing column 'zipcode'");
    }

    #[test]
    fn test_validation_error_names_field() {
        let err: HomeviewError = DataValidationError::MissingColumn {
            field: "price".to_string(),
        }
        .into();
        assert!(err.to_string().contains("price"));
        assert!(!err.is_client_error());
    }

    #[test]
    fn test_client_errors() {
        let err: HomeviewError = EvalError::FieldNotFound("bedrooms".to_string()).into();
        assert!(err.is_client_error());
        assert!(HomeviewError::UnknownChart("h42".to_string()).is_client_error());
    }
}
