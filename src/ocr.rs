//! # OCR Collaborator Module
//!
//! This module wraps the Tesseract OCR engine behind the [`TextRecognizer`] trait.
//! The orientation scorer only needs word-level text with a confidence per word, so
//! recognition returns a flat list of [`OcrTextSpan`]s read from Tesseract's TSV
//! output.
//!
//! ## Dependencies
//!
//! - `leptess`: Rust bindings for Tesseract OCR and Leptonica
//! - `image`: PNG encoding of the raster handed to Leptonica

use image::GrayImage;
use leptess::LepTess;
use std::io::Cursor;
use std::sync::Mutex;
use tracing::{debug, info};

use crate::ocr_config::{ModelType, OcrConfig};
use crate::ocr_errors::OcrError;

/// One recognized word.
#[derive(Debug, Clone, PartialEq)]
pub struct OcrTextSpan {
    /// Raw text as returned by the engine
    pub text: String,
    /// Engine confidence in 0..=100; negative means "not recognized",
    /// `None` means the field could not be parsed
    pub confidence: Option<f32>,
}

impl OcrTextSpan {
    pub fn new(text: impl Into<String>, confidence: Option<f32>) -> Self {
        Self {
            text: text.into(),
            confidence,
        }
    }
}

/// Anything able to turn a grayscale raster into recognized text spans.
pub trait TextRecognizer {
    /// Recognize text, returning spans in reading order
    fn recognize(&self, image: &GrayImage) -> Result<Vec<OcrTextSpan>, OcrError>;
}

/// Tesseract-backed recognizer.
///
/// The engine handle is created once and reused for every call; construction
/// fails with [`OcrError::MissingDependency`] when Tesseract or its language data
/// cannot be loaded.
pub struct TesseractRecognizer {
    tess: Mutex<LepTess>,
}

impl TesseractRecognizer {
    pub fn new(config: &OcrConfig) -> Result<Self, OcrError> {
        let tessdata_path = config
            .tessdata_dir
            .clone()
            .or_else(|| get_tessdata_path(config.model_type));

        info!(
            "Creating OCR instance for languages: {} with model: {}",
            config.languages,
            config.model_type.tessdata_dir()
        );

        let mut tess = LepTess::new(tessdata_path.as_deref(), &config.languages).map_err(|e| {
            OcrError::MissingDependency(format!(
                "Failed to initialize Tesseract for '{}': {}. \
                 Is tesseract-ocr installed with this language data?",
                config.languages, e
            ))
        })?;

        tess.set_variable(
            leptess::Variable::TesseditPagesegMode,
            config.psm_mode.as_str(),
        )
        .map_err(|e| OcrError::MissingDependency(format!("Failed to set PSM mode: {}", e)))?;

        Ok(Self {
            tess: Mutex::new(tess),
        })
    }
}

impl TextRecognizer for TesseractRecognizer {
    fn recognize(&self, image: &GrayImage) -> Result<Vec<OcrTextSpan>, OcrError> {
        let mut png_bytes = Vec::new();
        image
            .write_to(&mut Cursor::new(&mut png_bytes), image::ImageFormat::Png)
            .map_err(|e| OcrError::ImageLoad(format!("Failed to encode raster as PNG: {e}")))?;

        let tsv = {
            let mut tess = self
                .tess
                .lock()
                .map_err(|_| OcrError::Extraction("Tesseract instance lock poisoned".to_string()))?;

            tess.set_image_from_mem(&png_bytes).map_err(|e| {
                OcrError::ImageLoad(format!("Failed to load image for OCR: {e}"))
            })?;

            tess.get_tsv_text(0).map_err(|e| {
                OcrError::Extraction(format!("Failed to extract text from image: {e}"))
            })?
        };

        let spans = parse_tsv(&tsv);
        debug!(
            "OCR returned {} word spans for {}x{} raster",
            spans.len(),
            image.width(),
            image.height()
        );
        Ok(spans)
    }
}

/// Parse Tesseract TSV output into word spans.
///
/// Columns are `level page block par line word left top width height conf text`.
/// Only word rows (level 5) carry text; the header row and structural rows are
/// skipped. A confidence column that does not parse yields `None`.
pub fn parse_tsv(tsv: &str) -> Vec<OcrTextSpan> {
    tsv.lines()
        .filter_map(|line| {
            let fields: Vec<&str> = line.splitn(12, '\t').collect();
            if fields.len() < 11 {
                return None;
            }
            let level = fields[0].trim().parse::<u32>().ok()?;
            if level != 5 {
                return None;
            }
            let confidence = fields[10].trim().parse::<f32>().ok();
            let text = fields.get(11).copied().unwrap_or_default();
            Some(OcrTextSpan::new(text, confidence))
        })
        .collect()
}

/// Get the tessdata path for the specified model type
///
/// Falls back to the engine's default lookup when no model specific directory exists.
fn get_tessdata_path(model_type: ModelType) -> Option<String> {
    let possible_paths = match model_type {
        ModelType::Fast => [
            "/usr/share/tesseract-ocr/5/tessdata_fast",
            "/usr/share/tesseract-ocr/4.00/tessdata_fast",
            "/usr/share/tessdata_fast",
            "/usr/local/share/tessdata_fast",
        ],
        ModelType::Best => [
            "/usr/share/tesseract-ocr/5/tessdata_best",
            "/usr/share/tesseract-ocr/4.00/tessdata_best",
            "/usr/share/tessdata_best",
            "/usr/local/share/tessdata_best",
        ],
    };

    for path in possible_paths {
        if std::path::Path::new(path).exists() {
            info!("Using tessdata path: {}", path);
            return Some(path.to_string());
        }
    }

    debug!(
        "No specific tessdata path found for model type {:?}, using default",
        model_type
    );
    None
}
