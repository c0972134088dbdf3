//! # card-orient
//!
//! Batch correction of scanned card images that came off the scanner a quarter
//! turn from upright. Each scan is scored in both candidate orientations, either
//! with a gradient anisotropy heuristic or with Tesseract OCR confidence, the
//! better rotation is applied, and the file is moved to a destination folder.

pub mod batch;
pub mod config;
pub mod decider;
pub mod errors;
pub mod image_source;
pub mod observability;
pub mod observability_config;
pub mod ocr;
pub mod ocr_config;
pub mod ocr_errors;
pub mod preprocessing;
pub mod rotation;
pub mod scoring;

// Re-export types for easier access
pub use batch::{BatchOptions, BatchProcessor, BatchReport};
pub use decider::{decide, Decision};
pub use rotation::Rotation;
pub use scoring::{build_scorer, OrientationScorer, Strategy};
