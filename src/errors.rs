//! # Application Error Types
//!
//! This module defines the error types used throughout the card orientation tool.
//! Every failure a batch can hit is funnelled into [`AppError`] so the driver can
//! decide whether to stop, skip the file, or fall back to another strategy.

use std::fmt;
use std::path::Path;

/// General application error type for consistent error handling
#[derive(Debug, Clone, PartialEq)]
pub enum AppError {
    /// Configuration validation errors
    Config(String),
    /// Source file is not a readable image
    Decode { path: String, message: String },
    /// A required external engine (Tesseract) is not installed or reachable
    MissingDependency(String),
    /// Persist, move or directory operations failed
    Io {
        operation: String,
        path: String,
        message: String,
    },
    /// The batch source directory does not exist
    SourceMissing(String),
    /// OCR processing errors other than a missing engine
    Ocr(String),
    /// Raster preprocessing errors (invalid crop or resize parameters)
    Preprocessing(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(msg) => write!(f, "[CONFIG] {}", msg),
            AppError::Decode { path, message } => {
                write!(f, "[DECODE] Cannot decode image {}: {}", path, message)
            }
            AppError::MissingDependency(msg) => write!(f, "[MISSING_DEPENDENCY] {}", msg),
            AppError::Io {
                operation,
                path,
                message,
            } => write!(f, "[IO] {} failed for {}: {}", operation, path, message),
            AppError::SourceMissing(path) => {
                write!(f, "[SOURCE] Source directory not found: {}", path)
            }
            AppError::Ocr(msg) => write!(f, "[OCR] {}", msg),
            AppError::Preprocessing(msg) => write!(f, "[PREPROCESSING] {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl AppError {
    /// Build an I/O error carrying the failed operation and the path involved
    pub fn io(operation: &str, path: &Path, err: impl fmt::Display) -> Self {
        AppError::Io {
            operation: operation.to_string(),
            path: path.display().to_string(),
            message: err.to_string(),
        }
    }

    /// Build a decode error for the given source path
    pub fn decode(path: &Path, err: impl fmt::Display) -> Self {
        AppError::Decode {
            path: path.display().to_string(),
            message: err.to_string(),
        }
    }

    /// Whether the error means the OCR engine is unavailable, as opposed to a scoring failure
    pub fn is_missing_dependency(&self) -> bool {
        matches!(self, AppError::MissingDependency(_))
    }

    /// Whether the error only concerns one input file
    pub fn is_per_file(&self) -> bool {
        matches!(self, AppError::Decode { .. })
    }
}

impl From<crate::ocr_errors::OcrError> for AppError {
    fn from(err: crate::ocr_errors::OcrError) -> Self {
        match err {
            crate::ocr_errors::OcrError::MissingDependency(msg) => AppError::MissingDependency(msg),
            other => AppError::Ocr(other.to_string()),
        }
    }
}

impl From<crate::preprocessing::PreprocessingError> for AppError {
    fn from(err: crate::preprocessing::PreprocessingError) -> Self {
        AppError::Preprocessing(err.to_string())
    }
}

/// Result type alias for convenience
pub type AppResult<T> = Result<T, AppError>;

/// Standardized error logging utilities for consistent error reporting across the application
pub mod error_logging {
    use tracing::error;

    /// Log file system errors with path and operation context
    pub fn log_filesystem_error(
        error: &impl std::fmt::Display,
        operation: &str,
        path: Option<&str>,
    ) {
        error!(
            error = %error,
            operation = %operation,
            path = ?path,
            "File system operation failed"
        );
    }

    /// Log orientation scoring errors with strategy context
    pub fn log_scoring_error(
        error: &impl std::fmt::Display,
        strategy: &str,
        file: &str,
        processing_duration: Option<std::time::Duration>,
    ) {
        error!(
            error = %error,
            strategy = %strategy,
            file = %file,
            processing_duration_ms = ?processing_duration.map(|d| d.as_millis()),
            "Orientation scoring failed"
        );
    }

    /// Log configuration errors during startup
    pub fn log_config_error(error: &impl std::fmt::Display, config_key: &str, operation: &str) {
        error!(
            error = %error,
            config_key = %config_key,
            operation = %operation,
            "Configuration error"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ocr_errors::OcrError;

    #[test]
    fn test_display_tags() {
        let err = AppError::SourceMissing("./scanned".to_string());
        assert_eq!(err.to_string(), "[SOURCE] Source directory not found: ./scanned");

        let err = AppError::io("move", Path::new("a.png"), "denied");
        assert_eq!(err.to_string(), "[IO] move failed for a.png: denied");
    }

    #[test]
    fn test_missing_dependency_survives_conversion() {
        let err: AppError = OcrError::MissingDependency("no tessdata".to_string()).into();
        assert!(err.is_missing_dependency());

        let err: AppError = OcrError::Extraction("bad utf8".to_string()).into();
        assert!(!err.is_missing_dependency());
        assert!(matches!(err, AppError::Ocr(_)));
    }

    #[test]
    fn test_decode_is_per_file() {
        let err = AppError::decode(Path::new("broken.png"), "invalid signature");
        assert!(err.is_per_file());
        assert!(!AppError::Config("x".to_string()).is_per_file());
    }
}
