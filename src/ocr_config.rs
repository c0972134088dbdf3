//! # OCR Configuration Module
//!
//! This module defines configuration structures for the OCR scoring strategy:
//! language selection, Tesseract model type, page segmentation and the width the
//! raster is reduced to before recognition.

use serde::{Deserialize, Serialize};

// Constants for OCR configuration
pub const DEFAULT_LANGUAGES: &str = "eng";
pub const DEFAULT_OCR_DOWNSCALE_WIDTH: u32 = 800;

/// Page Segmentation Mode for Tesseract OCR
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum PageSegMode {
    /// Automatic page segmentation, no OSD
    AutoNoOsd = 2,
    /// Fully automatic page segmentation
    #[default]
    Auto = 3,
    /// Assume a single column of text
    SingleColumn = 4,
    /// Assume a single uniform block of text
    SingleBlock = 6,
    /// Find as much text as possible in no particular order
    SparseText = 11,
}

impl PageSegMode {
    /// Convert PSM mode to string value for Tesseract
    pub fn as_str(&self) -> &'static str {
        match self {
            PageSegMode::AutoNoOsd => "2",
            PageSegMode::Auto => "3",
            PageSegMode::SingleColumn => "4",
            PageSegMode::SingleBlock => "6",
            PageSegMode::SparseText => "11",
        }
    }

    /// Parse the numeric Tesseract mode used in environment variables
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "2" => Some(PageSegMode::AutoNoOsd),
            "3" => Some(PageSegMode::Auto),
            "4" => Some(PageSegMode::SingleColumn),
            "6" => Some(PageSegMode::SingleBlock),
            "11" => Some(PageSegMode::SparseText),
            _ => None,
        }
    }
}

/// Tesseract model type for different accuracy/speed trade-offs
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum ModelType {
    /// Fast model (tessdata_fast) - faster processing, lower accuracy
    #[default]
    Fast,
    /// Best model (tessdata_best) - slower processing, higher accuracy
    Best,
}

impl ModelType {
    /// Get the tessdata directory name for this model type
    pub fn tessdata_dir(&self) -> &'static str {
        match self {
            ModelType::Fast => "tessdata_fast",
            ModelType::Best => "tessdata_best",
        }
    }

    /// Parse the model name used in environment variables
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "fast" => Some(ModelType::Fast),
            "best" => Some(ModelType::Best),
            _ => None,
        }
    }
}

/// Configuration structure for OCR scoring
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OcrConfig {
    /// OCR language codes (e.g., "eng", "eng+fra", "deu")
    pub languages: String,
    /// Tesseract model type (Fast vs Best accuracy)
    pub model_type: ModelType,
    /// Page segmentation mode used for every recognition call
    pub psm_mode: PageSegMode,
    /// Width the grayscale raster is resized to before recognition
    pub downscale_width: u32,
    /// Explicit tessdata directory; `None` searches the usual install locations
    pub tessdata_dir: Option<String>,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            languages: DEFAULT_LANGUAGES.to_string(),
            model_type: ModelType::default(),
            psm_mode: PageSegMode::default(),
            downscale_width: DEFAULT_OCR_DOWNSCALE_WIDTH,
            tessdata_dir: None,
        }
    }
}

impl OcrConfig {
    /// Validate OCR configuration parameters
    pub fn validate(&self) -> crate::errors::AppResult<()> {
        if self.languages.trim().is_empty() {
            return Err(crate::errors::AppError::Config(
                "languages cannot be empty".to_string(),
            ));
        }

        if self.downscale_width == 0 {
            return Err(crate::errors::AppError::Config(
                "ocr downscale_width must be greater than 0".to_string(),
            ));
        }

        if let Some(dir) = &self.tessdata_dir {
            if dir.trim().is_empty() {
                return Err(crate::errors::AppError::Config(
                    "tessdata_dir cannot be an empty path".to_string(),
                ));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ocr_config_defaults() {
        let config = OcrConfig::default();
        assert_eq!(config.languages, "eng");
        assert_eq!(config.downscale_width, 800);
        assert_eq!(config.model_type, ModelType::Fast);
        assert_eq!(config.psm_mode, PageSegMode::Auto);
        assert!(config.tessdata_dir.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    #[allow(unused_assignments)]
    fn test_ocr_config_validation() {
        let mut config = OcrConfig::default();

        config.languages = "  ".to_string();
        assert!(config.validate().is_err());
        config.languages = "eng".to_string();

        config.downscale_width = 0;
        assert!(config.validate().is_err());
        config.downscale_width = 800;

        config.tessdata_dir = Some(String::new());
        assert!(config.validate().is_err());
        config.tessdata_dir = None;

        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_model_type_enum_values() {
        assert_eq!(ModelType::Fast.tessdata_dir(), "tessdata_fast");
        assert_eq!(ModelType::Best.tessdata_dir(), "tessdata_best");
        assert_eq!(ModelType::parse("BEST"), Some(ModelType::Best));
        assert_eq!(ModelType::parse(" fast "), Some(ModelType::Fast));
        assert_eq!(ModelType::parse("legacy"), None);
    }

    #[test]
    fn test_psm_as_str() {
        assert_eq!(PageSegMode::Auto.as_str(), "3");
        assert_eq!(PageSegMode::SparseText.as_str(), "11");
    }

    #[test]
    fn test_psm_parse() {
        assert_eq!(PageSegMode::parse(" 11 "), Some(PageSegMode::SparseText));
        assert_eq!(PageSegMode::parse("6"), Some(PageSegMode::SingleBlock));
        assert_eq!(PageSegMode::parse("0"), None);
        assert_eq!(PageSegMode::parse("auto"), None);
    }
}
