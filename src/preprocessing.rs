//! # Image Preprocessing Module
//!
//! Raster preparation shared by the scorers and the batch driver: the fixed top
//! margin crop applied to every scan, and the aspect-preserving luminance
//! downscale both scorers run before measuring anything.

use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView, GrayImage};

/// Errors that can occur during image preprocessing operations.
#[derive(Debug, Clone, PartialEq)]
pub enum PreprocessingError {
    /// Invalid target width specified
    InvalidTargetWidth { width: u32 },
    /// The source raster has no pixels
    EmptyImage,
}

impl std::fmt::Display for PreprocessingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PreprocessingError::InvalidTargetWidth { width } => {
                write!(f, "Invalid target width: {}. Must be greater than 0", width)
            }
            PreprocessingError::EmptyImage => write!(f, "Image has zero width or height"),
        }
    }
}

impl std::error::Error for PreprocessingError {}

/// Aspect-preserving grayscale downscaler used ahead of scoring.
#[derive(Debug, Clone)]
pub struct ImageScaler {
    target_width: u32,
    filter: FilterType,
}

impl ImageScaler {
    /// Creates a scaler producing rasters `width` pixels wide.
    ///
    /// # Examples
    ///
    /// ```
    /// use card_orient::preprocessing::ImageScaler;
    ///
    /// let scaler = ImageScaler::with_target_width(600).unwrap();
    /// assert_eq!(scaler.target_width(), 600);
    /// assert!(ImageScaler::with_target_width(0).is_err());
    /// ```
    pub fn with_target_width(width: u32) -> Result<Self, PreprocessingError> {
        if width == 0 {
            return Err(PreprocessingError::InvalidTargetWidth { width });
        }

        Ok(Self {
            target_width: width,
            filter: FilterType::Triangle,
        })
    }

    /// Returns the configured output width.
    pub fn target_width(&self) -> u32 {
        self.target_width
    }

    /// Height matching `target_width` for a `width`×`height` source, truncated, never 0.
    pub fn scaled_height(&self, width: u32, height: u32) -> u32 {
        let scaled = u64::from(self.target_width) * u64::from(height) / u64::from(width.max(1));
        (scaled as u32).max(1)
    }

    /// Converts to luminance and resizes to the target width.
    ///
    /// The input is left untouched; a new buffer is returned.
    pub fn scale_luma(&self, image: &DynamicImage) -> Result<GrayImage, PreprocessingError> {
        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            return Err(PreprocessingError::EmptyImage);
        }

        let gray = image.to_luma8();
        let new_height = self.scaled_height(width, height);

        tracing::trace!(
            target: "card_orient::preprocessing",
            "Downscaling {}x{} to {}x{}",
            width,
            height,
            self.target_width,
            new_height
        );

        Ok(image::imageops::resize(
            &gray,
            self.target_width,
            new_height,
            self.filter,
        ))
    }
}

/// Removes `margin` rows from the top of the raster, keeping its full width.
///
/// A margin taller than the image leaves a single row so the result stays a
/// valid raster.
pub fn crop_top_margin(image: &DynamicImage, margin: u32) -> DynamicImage {
    let (width, height) = image.dimensions();
    let top = margin.min(height.saturating_sub(1));
    image.crop_imm(0, top, width, height - top)
}
