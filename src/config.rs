//! # Unified Application Configuration
//!
//! This module consolidates every tunable of the orientation tool into a single
//! [`AppConfig`]. Values come from defaults, then environment variables (a `.env`
//! file is honoured by the binary), then command line overrides. The scanner
//! specific constants (top crop, downscale widths) live here instead of being
//! hard-coded in the algorithms.

use crate::errors::{AppError, AppResult};
use crate::observability_config::{LogFormat, ObservabilityConfig};
use crate::ocr_config::{ModelType, OcrConfig, PageSegMode};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

pub const DEFAULT_SOURCE_DIR: &str = "./scanned";
pub const DEFAULT_CROP_TOP_MARGIN: u32 = 100;
pub const DEFAULT_GRADIENT_DOWNSCALE_WIDTH: u32 = 600;

/// Gradient scorer configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradientConfig {
    /// Width the luminance raster is resized to before differencing
    pub downscale_width: u32,
}

impl Default for GradientConfig {
    fn default() -> Self {
        Self {
            downscale_width: DEFAULT_GRADIENT_DOWNSCALE_WIDTH,
        }
    }
}

impl GradientConfig {
    pub fn validate(&self) -> AppResult<()> {
        if self.downscale_width == 0 {
            return Err(AppError::Config(
                "gradient downscale_width must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Directory scanned for input images
    pub source_dir: PathBuf,
    /// Rows removed from the top of every scan before deciding and rotating
    pub crop_top_margin: u32,
    /// File extensions (case-insensitive, without dot) treated as candidates
    pub extensions: Vec<String>,
    /// Gradient scorer configuration
    pub gradient: GradientConfig,
    /// OCR scorer configuration
    pub ocr: OcrConfig,
    /// Observability configuration
    pub observability: ObservabilityConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            source_dir: PathBuf::from(DEFAULT_SOURCE_DIR),
            crop_top_margin: DEFAULT_CROP_TOP_MARGIN,
            extensions: vec!["png".to_string()],
            gradient: GradientConfig::default(),
            ocr: OcrConfig::default(),
            observability: ObservabilityConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> AppResult<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup, falling back to defaults
    pub fn from_lookup<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(dir) = lookup("CARD_ORIENT_SOURCE_DIR") {
            config.source_dir = PathBuf::from(dir);
        }
        if let Some(value) = lookup("CARD_ORIENT_CROP_TOP") {
            config.crop_top_margin = parse_number(&value, "CARD_ORIENT_CROP_TOP")?;
        }
        if let Some(value) = lookup("CARD_ORIENT_EXTENSIONS") {
            config.extensions = value
                .split(',')
                .map(|ext| ext.trim().trim_start_matches('.').to_ascii_lowercase())
                .filter(|ext| !ext.is_empty())
                .collect();
        }
        if let Some(value) = lookup("CARD_ORIENT_GRADIENT_WIDTH") {
            config.gradient.downscale_width = parse_number(&value, "CARD_ORIENT_GRADIENT_WIDTH")?;
        }

        // OCR section
        if let Some(value) = lookup("CARD_ORIENT_OCR_WIDTH") {
            config.ocr.downscale_width = parse_number(&value, "CARD_ORIENT_OCR_WIDTH")?;
        }
        if let Some(languages) = lookup("CARD_ORIENT_OCR_LANGUAGES") {
            config.ocr.languages = languages;
        }
        if let Some(model) = lookup("CARD_ORIENT_OCR_MODEL") {
            config.ocr.model_type = ModelType::parse(&model).ok_or_else(|| {
                AppError::Config(format!(
                    "CARD_ORIENT_OCR_MODEL must be 'fast' or 'best', got '{}'",
                    model
                ))
            })?;
        }
        if let Some(psm) = lookup("CARD_ORIENT_OCR_PSM") {
            config.ocr.psm_mode = PageSegMode::parse(&psm).ok_or_else(|| {
                AppError::Config(format!(
                    "CARD_ORIENT_OCR_PSM must be one of 2, 3, 4, 6 or 11, got '{}'",
                    psm
                ))
            })?;
        }
        config.ocr.tessdata_dir = lookup("CARD_ORIENT_TESSDATA_DIR");

        // Observability section
        if let Some(level) = lookup("CARD_ORIENT_LOG_LEVEL") {
            config.observability.log_level = level;
        }
        if let Some(format) = lookup("LOG_FORMAT") {
            config.observability.log_format = LogFormat::parse(&format).ok_or_else(|| {
                AppError::Config(format!("LOG_FORMAT must be 'pretty' or 'json', got '{}'", format))
            })?;
        }

        Ok(config)
    }

    /// Validate all configuration sections
    pub fn validate(&self) -> AppResult<()> {
        if self.extensions.is_empty() {
            return Err(AppError::Config(
                "at least one image extension must be configured".to_string(),
            ));
        }
        self.gradient.validate()?;
        self.ocr.validate()?;
        self.observability.validate()?;
        Ok(())
    }

    /// Get a summary of the current configuration for logging
    pub fn summary(&self) -> String {
        format!(
            "Configuration: source_dir={}, crop_top_margin={}, extensions={}, \
             gradient_width={}, ocr_width={}, ocr_languages={}, ocr_model={}, ocr_psm={}",
            self.source_dir.display(),
            self.crop_top_margin,
            self.extensions.join(","),
            self.gradient.downscale_width,
            self.ocr.downscale_width,
            self.ocr.languages,
            self.ocr.model_type.tessdata_dir(),
            self.ocr.psm_mode.as_str()
        )
    }
}

fn parse_number(value: &str, key: &str) -> AppResult<u32> {
    value
        .trim()
        .parse::<u32>()
        .map_err(|_| AppError::Config(format!("{} must be a valid non-negative number", key)))
}
