//! Validation errors raised while building house records

use thiserror::Error;

/// A required input field is absent, empty, or of the wrong type
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DataValidationError {
    /// Required column missing from the table
    #[error("Required column '{field}' is missing")]
    MissingColumn { field: String },

    /// Column present but of an incompatible type
    #[error("Column '{field}' has type {actual}, expected {expected}")]
    WrongType {
        field: String,
        expected: String,
        actual: String,
    },

    /// Required cell is empty
    #[error("Row {row}: required field '{field}' is empty")]
    MissingValue { field: String, row: usize },

    /// Cell present but not usable
    #[error("Row {row}: invalid value '{value}' for '{field}': {reason}")]
    InvalidValue {
        field: String,
        row: usize,
        value: String,
        reason: String,
    },
}

impl DataValidationError {
    /// Name of the offending field
    pub fn field(&self) -> &str {
        match self {
            DataValidationError::MissingColumn { field }
            | DataValidationError::WrongType { field, .. }
            | DataValidationError::MissingValue { field, .. }
            | DataValidationError::InvalidValue { field, .. } => field,
        }
    }
}

/// Result type alias for validation
pub type ValidationResult<T> = Result<T, DataValidationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_names_field() {
        let err = DataValidationError::MissingColumn {
            field: "price".to_string(),
        };
        assert_eq!(err.field(), "price");
        assert!(err.to_string().contains("price"));
    }

    #[test]
    fn test_wrong_type_display() {
        let err = DataValidationError::WrongType {
            field: "yr_built".to_string(),
            expected: "integer".to_string(),
            actual: "string".to_string(),
        };
        assert!(err.to_string().contains("yr_built"));
        assert!(err.to_string().contains("expected integer"));
    }
}
