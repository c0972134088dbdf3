//! # Orientation Decider
//!
//! Rotates a scan both ways, scores each candidate with the configured scorer
//! and keeps the better one. Ties go to the clockwise (−90°) candidate, for
//! every scorer.

use image::DynamicImage;
use serde::Serialize;
use std::time::Instant;
use tracing::debug;

use crate::errors::AppResult;
use crate::rotation::Rotation;
use crate::scoring::{OrientationScore, OrientationScorer};

/// Outcome of a single decision, kept for logging and reporting.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Decision {
    pub rotation: Rotation,
    pub clockwise_score: OrientationScore,
    pub counter_clockwise_score: OrientationScore,
}

/// Pick the rotation that makes `image` upright according to `scorer`.
///
/// # Errors
///
/// Whatever the scorer returns; nothing is retried.
pub fn decide<S>(image: &DynamicImage, scorer: &S) -> AppResult<Decision>
where
    S: OrientationScorer + ?Sized,
{
    let start = Instant::now();

    let clockwise = Rotation::Clockwise.apply(image);
    let clockwise_score = scorer.score(&clockwise)?;
    drop(clockwise);

    let counter_clockwise = Rotation::CounterClockwise.apply(image);
    let counter_clockwise_score = scorer.score(&counter_clockwise)?;

    let rotation = choose(clockwise_score, counter_clockwise_score);

    metrics::histogram!("orientation_score_seconds", "strategy" => scorer.name())
        .record(start.elapsed().as_secs_f64());
    debug!(
        strategy = scorer.name(),
        clockwise_score,
        counter_clockwise_score,
        rotation = rotation.degrees(),
        "Orientation decided"
    );

    Ok(Decision {
        rotation,
        clockwise_score,
        counter_clockwise_score,
    })
}

/// Comparison rule shared by every strategy: clockwise unless strictly beaten.
pub fn choose(
    clockwise_score: OrientationScore,
    counter_clockwise_score: OrientationScore,
) -> Rotation {
    if clockwise_score >= counter_clockwise_score {
        Rotation::Clockwise
    } else {
        Rotation::CounterClockwise
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::AppError;
    use image::{GenericImageView, GrayImage, Luma};
    use std::cell::Cell;

    /// Scores the brightness of the top-left pixel.
    struct CornerScorer;

    impl OrientationScorer for CornerScorer {
        fn name(&self) -> &'static str {
            "corner"
        }

        fn score(&self, image: &DynamicImage) -> AppResult<OrientationScore> {
            Ok(f64::from(image.get_pixel(0, 0).0[0]))
        }
    }

    struct ConstantScorer {
        calls: Cell<usize>,
    }

    impl OrientationScorer for ConstantScorer {
        fn name(&self) -> &'static str {
            "constant"
        }

        fn score(&self, _image: &DynamicImage) -> AppResult<OrientationScore> {
            self.calls.set(self.calls.get() + 1);
            Ok(42.0)
        }
    }

    struct FailingScorer;

    impl OrientationScorer for FailingScorer {
        fn name(&self) -> &'static str {
            "failing"
        }

        fn score(&self, _image: &DynamicImage) -> AppResult<OrientationScore> {
            Err(AppError::MissingDependency("no engine".to_string()))
        }
    }

    fn marked(x: u32, y: u32) -> DynamicImage {
        let mut img = GrayImage::new(40, 25);
        img.put_pixel(x, y, Luma([255]));
        DynamicImage::ImageLuma8(img)
    }

    #[test]
    fn test_tie_favours_clockwise() {
        let scorer = ConstantScorer { calls: Cell::new(0) };
        let decision = decide(&marked(0, 0), &scorer).unwrap();
        assert_eq!(decision.rotation, Rotation::Clockwise);
        assert_eq!(decision.rotation.degrees(), -90);
        assert_eq!(scorer.calls.get(), 2);
    }

    #[test]
    fn test_picks_clockwise_when_it_scores_higher() {
        // Bottom-left ends up top-left after a clockwise turn.
        let decision = decide(&marked(0, 24), &CornerScorer).unwrap();
        assert_eq!(decision.rotation, Rotation::Clockwise);
        assert_eq!(decision.clockwise_score, 255.0);
        assert_eq!(decision.counter_clockwise_score, 0.0);
    }

    #[test]
    fn test_picks_counter_clockwise_when_it_scores_higher() {
        // Top-right ends up top-left after a counter-clockwise turn.
        let decision = decide(&marked(39, 0), &CornerScorer).unwrap();
        assert_eq!(decision.rotation, Rotation::CounterClockwise);
        assert_eq!(decision.rotation.degrees(), 90);
    }

    #[test]
    fn test_only_legal_angles_are_returned() {
        let positions = [(0, 0), (39, 0), (0, 24), (39, 24), (10, 10)];
        for (x, y) in positions {
            let degrees = decide(&marked(x, y), &CornerScorer).unwrap().rotation.degrees();
            assert!(degrees == -90 || degrees == 90);
        }
    }

    #[test]
    fn test_choose_rule() {
        assert_eq!(choose(1.0, 1.0), Rotation::Clockwise);
        assert_eq!(choose(-3.0, -3.0), Rotation::Clockwise);
        assert_eq!(choose(2.0, 1.0), Rotation::Clockwise);
        assert_eq!(choose(1.0, 2.0), Rotation::CounterClockwise);
    }

    #[test]
    fn test_scorer_errors_propagate() {
        let err = decide(&marked(0, 0), &FailingScorer).unwrap_err();
        assert!(err.is_missing_dependency());
    }

    #[test]
    fn test_works_through_trait_objects() {
        let boxed: Box<dyn OrientationScorer> = Box::new(CornerScorer);
        let decision = decide(&marked(39, 0), boxed.as_ref()).unwrap();
        assert_eq!(decision.rotation, Rotation::CounterClockwise);
    }
}
