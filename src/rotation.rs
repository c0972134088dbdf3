//! # Quarter-Turn Rotation
//!
//! A scan is always off by exactly one quarter turn, so the correction is one of
//! two values. Degrees follow the usual convention: positive turns
//! counter-clockwise.

use image::DynamicImage;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Correction applied to a scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rotation {
    /// −90°
    Clockwise,
    /// +90°
    CounterClockwise,
}

impl Rotation {
    /// Both candidates, in tie-break order.
    pub const CANDIDATES: [Rotation; 2] = [Rotation::Clockwise, Rotation::CounterClockwise];

    /// Signed angle in degrees.
    pub fn degrees(self) -> i32 {
        match self {
            Rotation::Clockwise => -90,
            Rotation::CounterClockwise => 90,
        }
    }

    pub fn from_degrees(degrees: i32) -> Option<Self> {
        match degrees {
            -90 => Some(Rotation::Clockwise),
            90 => Some(Rotation::CounterClockwise),
            _ => None,
        }
    }

    /// Label used in metrics and logs.
    pub fn as_str(self) -> &'static str {
        match self {
            Rotation::Clockwise => "cw",
            Rotation::CounterClockwise => "ccw",
        }
    }

    /// Returns a rotated copy; width and height swap so no pixel is lost.
    pub fn apply(self, image: &DynamicImage) -> DynamicImage {
        match self {
            Rotation::Clockwise => image.rotate90(),
            Rotation::CounterClockwise => image.rotate270(),
        }
    }
}

impl fmt::Display for Rotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.degrees())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GenericImageView, GrayImage, Luma};

    fn marked(width: u32, height: u32, x: u32, y: u32) -> DynamicImage {
        let mut img = GrayImage::new(width, height);
        img.put_pixel(x, y, Luma([255]));
        DynamicImage::ImageLuma8(img)
    }

    #[test]
    fn test_degrees_round_trip() {
        for rotation in Rotation::CANDIDATES {
            assert_eq!(Rotation::from_degrees(rotation.degrees()), Some(rotation));
        }
        assert_eq!(Rotation::from_degrees(0), None);
        assert_eq!(Rotation::from_degrees(180), None);
    }

    #[test]
    fn test_apply_expands_frame() {
        let img = marked(30, 20, 0, 0);
        for rotation in Rotation::CANDIDATES {
            assert_eq!(rotation.apply(&img).dimensions(), (20, 30));
        }
    }

    #[test]
    fn test_clockwise_moves_bottom_left_to_top_left() {
        let img = marked(30, 20, 0, 19);
        let rotated = Rotation::Clockwise.apply(&img);
        assert_eq!(rotated.get_pixel(0, 0).0[0], 255);
    }

    #[test]
    fn test_counter_clockwise_moves_top_right_to_top_left() {
        let img = marked(30, 20, 29, 0);
        let rotated = Rotation::CounterClockwise.apply(&img);
        assert_eq!(rotated.get_pixel(0, 0).0[0], 255);
    }

    #[test]
    fn test_display_is_signed_degrees() {
        assert_eq!(Rotation::Clockwise.to_string(), "-90");
        assert_eq!(Rotation::CounterClockwise.to_string(), "90");
    }
}
