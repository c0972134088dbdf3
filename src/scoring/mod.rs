//! # Orientation Scoring
//!
//! A scorer reduces a raster to a single "uprightness" number. Scores are only
//! compared between candidates scored by the same scorer, so strategies do not
//! need a common scale.
//!
//! - `gradient`: edge anisotropy from raw pixels, no external engine
//! - `ocr`: recognized text volume weighted by Tesseract confidence

pub mod gradient;
pub mod ocr;

pub use gradient::GradientScorer;
pub use ocr::{score_spans, OcrScorer};

use crate::config::AppConfig;
use crate::errors::AppResult;
use image::DynamicImage;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::warn;

/// Real-valued uprightness score; higher is more upright.
pub type OrientationScore = f64;

/// Capability shared by every scoring strategy.
pub trait OrientationScorer {
    /// Short name used in logs and metrics
    fn name(&self) -> &'static str;

    /// Score a raster without modifying it
    fn score(&self, image: &DynamicImage) -> AppResult<OrientationScore>;
}

impl<S: OrientationScorer + ?Sized> OrientationScorer for Box<S> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn score(&self, image: &DynamicImage) -> AppResult<OrientationScore> {
        (**self).score(image)
    }
}

/// Scoring strategy selectable from the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Strategy {
    /// Gradient anisotropy heuristic
    Gradient,
    /// OCR confidence heuristic
    #[default]
    Ocr,
}

impl Strategy {
    pub fn as_str(self) -> &'static str {
        match self {
            Strategy::Gradient => "gradient",
            Strategy::Ocr => "ocr",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Strategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gradient" | "simple" => Ok(Strategy::Gradient),
            "ocr" => Ok(Strategy::Ocr),
            other => Err(format!(
                "unknown strategy '{}', expected 'gradient' (alias 'simple') or 'ocr'",
                other
            )),
        }
    }
}

/// Build the scorer for `strategy`.
///
/// The OCR scorer initializes Tesseract here, so a missing engine surfaces as
/// `AppError::MissingDependency` before any file is touched. With
/// `fallback_to_gradient` set, that error is logged and the gradient scorer is
/// returned instead.
pub fn build_scorer(
    strategy: Strategy,
    config: &AppConfig,
    fallback_to_gradient: bool,
) -> AppResult<Box<dyn OrientationScorer>> {
    match strategy {
        Strategy::Gradient => Ok(Box::new(GradientScorer::new(&config.gradient)?)),
        Strategy::Ocr => match OcrScorer::from_config(&config.ocr) {
            Ok(scorer) => Ok(Box::new(scorer)),
            Err(err) if fallback_to_gradient && err.is_missing_dependency() => {
                warn!(error = %err, "OCR engine unavailable, falling back to gradient scoring");
                Ok(Box::new(GradientScorer::new(&config.gradient)?))
            }
            Err(err) => Err(err),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strategy_parsing_accepts_simple_alias() {
        assert_eq!("simple".parse::<Strategy>(), Ok(Strategy::Gradient));
        assert_eq!("Gradient".parse::<Strategy>(), Ok(Strategy::Gradient));
        assert_eq!("ocr".parse::<Strategy>(), Ok(Strategy::Ocr));
        assert!("magic".parse::<Strategy>().is_err());
    }

    #[test]
    fn test_default_strategy_is_ocr() {
        assert_eq!(Strategy::default(), Strategy::Ocr);
    }

    #[test]
    fn test_build_gradient_scorer() {
        let scorer = build_scorer(Strategy::Gradient, &AppConfig::default(), false).unwrap();
        assert_eq!(scorer.name(), "gradient");
    }

    #[test]
    fn test_ocr_fallback_never_reports_missing_dependency() {
        let mut config = AppConfig::default();
        config.ocr.languages = "zzz_not_a_language".to_string();

        let scorer = build_scorer(Strategy::Ocr, &config, true).unwrap();
        assert_eq!(scorer.name(), "gradient");

        let err = build_scorer(Strategy::Ocr, &config, false).err().unwrap();
        assert!(err.is_missing_dependency());
    }
}
