//! # Centralized Error Handling
//!
//! Unified error types for the crate using `thiserror`.
//!
//! Configuration and input errors are raised while building parameters or
//! environments. `InvalidPossibility` is an internal fault: a correctly
//! configured engine never produces it.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for all-paths scoring
#[derive(Error, Debug)]
pub enum AllPathsError {
    /// I/O errors while reading configuration files
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed configuration document
    #[error("Configuration format error: {0}")]
    ConfigFormat(#[from] serde_json::Error),

    /// Configuration errors (malformed calibration, bad rates, bad settings)
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Invalid input data (read/quality length mismatch, bad base codes)
    #[error("Invalid data: {message}")]
    InvalidData { message: String },

    /// A matrix cell holds a value that is not a valid possibility
    #[error("Internal fault: invalid possibility {value} at row {row}, column {column}")]
    InvalidPossibility { row: usize, column: usize, value: f64 },

    /// File not found errors
    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },
}

/// Type alias for Results using AllPathsError
pub type Result<T> = std::result::Result<T, AllPathsError>;

impl AllPathsError {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create an invalid data error
    pub fn invalid_data(message: impl Into<String>) -> Self {
        Self::InvalidData {
            message: message.into(),
        }
    }

    /// True for defects in the recurrence or arithmetic, as opposed to
    /// problems with the caller's configuration or data.
    pub fn is_internal_fault(&self) -> bool {
        matches!(self, Self::InvalidPossibility { .. })
    }

    /// True for errors raised while validating configuration or calibration.
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config { .. } | Self::ConfigFormat(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_classes_are_distinguishable() {
        let cfg = AllPathsError::config("gap histogram too long");
        let fault = AllPathsError::InvalidPossibility {
            row: 3,
            column: 1,
            value: f64::NAN,
        };
        assert!(cfg.is_config());
        assert!(!cfg.is_internal_fault());
        assert!(fault.is_internal_fault());
        assert!(!fault.is_config());
    }

    #[test]
    fn test_error_messages() {
        let err = AllPathsError::invalid_data("3 bases but 2 qualities");
        assert_eq!(err.to_string(), "Invalid data: 3 bases but 2 qualities");

        let fault = AllPathsError::InvalidPossibility {
            row: 2,
            column: 0,
            value: f64::INFINITY,
        };
        assert_eq!(
            fault.to_string(),
            "Internal fault: invalid possibility inf at row 2, column 0"
        );
    }
}
