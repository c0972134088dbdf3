//! # OCR Error Types Module
//!
//! Error types raised by the OCR collaborator. A missing engine is kept apart from
//! extraction failures so callers can fall back to the gradient strategy.

/// Custom error types for OCR operations
#[derive(Debug, Clone, PartialEq)]
pub enum OcrError {
    /// Tesseract could not be initialized (not installed, missing language data)
    MissingDependency(String),
    /// Raster could not be handed to the engine
    ImageLoad(String),
    /// Text extraction errors
    Extraction(String),
}

impl std::fmt::Display for OcrError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OcrError::MissingDependency(msg) => {
                write!(f, "[OCR_INIT] OCR engine is unavailable: {}", msg)
            }
            OcrError::ImageLoad(msg) => {
                write!(f, "[IMAGE_LOAD] Failed to load image for OCR processing: {}", msg)
            }
            OcrError::Extraction(msg) => {
                write!(f, "[OCR_EXTRACT] Text extraction from image failed: {}", msg)
            }
        }
    }
}

impl std::error::Error for OcrError {}
