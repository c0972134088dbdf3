//! Gradient anisotropy scorer.
//!
//! Upright text scans are dominated by horizontal structure (rows of text, card
//! borders), which shows up as strong differences between rows and weak ones
//! between columns. The score is the mean absolute row difference minus the mean
//! absolute column difference, both taken two pixels apart on a downscaled
//! luminance copy.

use image::{DynamicImage, GrayImage};

use super::{OrientationScore, OrientationScorer};
use crate::config::GradientConfig;
use crate::errors::AppResult;
use crate::preprocessing::ImageScaler;

#[derive(Debug, Clone)]
pub struct GradientScorer {
    scaler: ImageScaler,
}

impl GradientScorer {
    pub fn new(config: &GradientConfig) -> AppResult<Self> {
        Ok(Self {
            scaler: ImageScaler::with_target_width(config.downscale_width)?,
        })
    }
}

impl OrientationScorer for GradientScorer {
    fn name(&self) -> &'static str {
        "gradient"
    }

    fn score(&self, image: &DynamicImage) -> AppResult<OrientationScore> {
        let luma = self.scaler.scale_luma(image)?;
        Ok(anisotropy(&luma))
    }
}

/// mean(|vertical gradient|) − mean(|horizontal gradient|) over a luminance buffer.
pub fn anisotropy(luma: &GrayImage) -> f64 {
    let (width, height) = luma.dimensions();
    let (w, h) = (width as usize, height as usize);
    let pixels = luma.as_raw();

    // Horizontal gradient: columns x and x+2 of the same row.
    let mut gx_sum = 0.0f64;
    let mut gx_count = 0usize;
    if w > 2 {
        for row in pixels.chunks_exact(w) {
            for x in 0..w - 2 {
                gx_sum += (f64::from(row[x + 2]) - f64::from(row[x])).abs();
            }
            gx_count += w - 2;
        }
    }

    // Vertical gradient: rows y and y+2 of the same column.
    let mut gy_sum = 0.0f64;
    let mut gy_count = 0usize;
    if h > 2 {
        for y in 0..h - 2 {
            let upper = &pixels[y * w..(y + 1) * w];
            let lower = &pixels[(y + 2) * w..(y + 3) * w];
            for (a, b) in upper.iter().zip(lower) {
                gy_sum += (f64::from(*b) - f64::from(*a)).abs();
            }
        }
        gy_count = (h - 2) * w;
    }

    mean(gy_sum, gy_count) - mean(gx_sum, gx_count)
}

fn mean(sum: f64, count: usize) -> f64 {
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}
