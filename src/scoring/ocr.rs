//! OCR confidence scorer.
//!
//! Tesseract is trained on upright text and degrades sharply on rotated input,
//! so the orientation that yields the most recognized characters at the highest
//! average confidence is taken as upright.

use image::DynamicImage;
use tracing::debug;

use super::{OrientationScore, OrientationScorer};
use crate::errors::AppResult;
use crate::ocr::{OcrTextSpan, TesseractRecognizer, TextRecognizer};
use crate::ocr_config::OcrConfig;
use crate::preprocessing::ImageScaler;

pub struct OcrScorer<R = TesseractRecognizer> {
    recognizer: R,
    scaler: ImageScaler,
}

impl OcrScorer<TesseractRecognizer> {
    /// Initialize Tesseract and build the scorer.
    ///
    /// # Errors
    ///
    /// `AppError::MissingDependency` when the engine or its language data is
    /// unavailable; `AppError::Preprocessing` for a zero downscale width.
    pub fn from_config(config: &OcrConfig) -> AppResult<Self> {
        let scaler = ImageScaler::with_target_width(config.downscale_width)?;
        let recognizer = TesseractRecognizer::new(config)?;
        Ok(Self { recognizer, scaler })
    }
}

impl<R: TextRecognizer> OcrScorer<R> {
    /// Build a scorer around any recognizer.
    pub fn with_recognizer(recognizer: R, downscale_width: u32) -> AppResult<Self> {
        Ok(Self {
            recognizer,
            scaler: ImageScaler::with_target_width(downscale_width)?,
        })
    }
}

impl<R: TextRecognizer> OrientationScorer for OcrScorer<R> {
    fn name(&self) -> &'static str {
        "ocr"
    }

    fn score(&self, image: &DynamicImage) -> AppResult<OrientationScore> {
        let gray = self.scaler.scale_luma(image)?;
        let spans = self.recognizer.recognize(&gray)?;
        let score = score_spans(&spans);
        debug!(spans = spans.len(), score, "OCR orientation score");
        Ok(score)
    }
}

/// Reduce recognized spans to `total_chars × avg_conf / 100`.
///
/// Spans whose trimmed text is empty, or whose confidence is missing, NaN or
/// negative, are ignored.
pub fn score_spans(spans: &[OcrTextSpan]) -> OrientationScore {
    let mut total_chars = 0usize;
    let mut conf_sum = 0.0f64;
    let mut conf_count = 0usize;

    for span in spans {
        let text = span.text.trim();
        if text.is_empty() {
            continue;
        }
        let confidence = match span.confidence {
            Some(c) if c.is_finite() && c >= 0.0 => f64::from(c),
            _ => continue,
        };
        total_chars += text.chars().count();
        conf_sum += confidence;
        conf_count += 1;
    }

    let avg_conf = if conf_count > 0 {
        conf_sum / conf_count as f64
    } else {
        0.0
    };
    total_chars as f64 * (avg_conf / 100.0)
}
