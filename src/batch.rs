//! # Batch Processor
//!
//! Drives a whole source directory: every matching scan is cropped, given an
//! orientation decision, rotated, written back over its source path and moved
//! into the destination directory. In dry-run mode the same decisions are made
//! but only the plan is written out.
//!
//! Live runs are destructive. The unrotated original is overwritten before the
//! move, and a failed move leaves the rotated image at the source path.

use image::{DynamicImage, ImageFormat};
use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{info, warn};

use crate::config::AppConfig;
use crate::decider::{decide, Decision};
use crate::errors::{error_logging, AppError, AppResult};
use crate::image_source;
use crate::observability;
use crate::preprocessing::crop_top_margin;
use crate::rotation::Rotation;
use crate::scoring::OrientationScorer;

/// How the batch reacts to its inputs.
#[derive(Debug, Clone, Copy, Default)]
pub struct BatchOptions {
    /// Report the plan without touching the filesystem
    pub dry_run: bool,
    /// Skip files that fail to decode instead of aborting
    pub keep_going: bool,
}

/// Work order for one file.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchItem {
    pub source: PathBuf,
    pub destination: PathBuf,
    pub rotation: Rotation,
    pub dry_run: bool,
}

/// What happened to one file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemReport {
    pub file: String,
    pub rotation_degrees: i32,
    pub destination: PathBuf,
    pub clockwise_score: f64,
    pub counter_clockwise_score: f64,
}

/// Summary of a batch run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchReport {
    pub source_dir: PathBuf,
    pub destination_dir: PathBuf,
    pub strategy: String,
    pub dry_run: bool,
    pub processed: usize,
    pub skipped: Vec<String>,
    pub items: Vec<ItemReport>,
}

pub struct BatchProcessor<S> {
    scorer: S,
    crop_top_margin: u32,
    extensions: Vec<String>,
    output_format: ImageFormat,
}

impl<S: OrientationScorer> BatchProcessor<S> {
    pub fn new(scorer: S, config: &AppConfig) -> Self {
        Self {
            scorer,
            crop_top_margin: config.crop_top_margin,
            extensions: config.extensions.clone(),
            output_format: ImageFormat::Png,
        }
    }

    /// Process every candidate in `source_dir`, writing plan lines and notices to `out`.
    ///
    /// # Errors
    ///
    /// - `AppError::SourceMissing` if `source_dir` does not exist
    /// - `AppError::Decode` for an unreadable image, unless `keep_going` is set
    /// - `AppError::Io` for persist, move or directory failures
    /// - scorer errors, unchanged
    pub fn run<W: Write>(
        &self,
        source_dir: &Path,
        dest_dir: &Path,
        options: BatchOptions,
        out: &mut W,
    ) -> AppResult<BatchReport> {
        let start = Instant::now();
        let files = image_source::list_images(source_dir, &self.extensions)?;

        let mut report = BatchReport {
            source_dir: source_dir.to_path_buf(),
            destination_dir: dest_dir.to_path_buf(),
            strategy: self.scorer.name().to_string(),
            dry_run: options.dry_run,
            processed: 0,
            skipped: Vec::new(),
            items: Vec::new(),
        };

        if files.is_empty() {
            let kinds = self
                .extensions
                .iter()
                .map(|ext| ext.to_ascii_uppercase())
                .collect::<Vec<_>>()
                .join("/");
            emit(out, &format!("No {} files found in {}", kinds, source_dir.display()))?;
            return Ok(report);
        }

        if !options.dry_run {
            image_source::ensure_dir(dest_dir)?;
        }

        info!(
            files = files.len(),
            strategy = self.scorer.name(),
            dry_run = options.dry_run,
            "Starting batch in {}",
            source_dir.display()
        );

        for path in &files {
            let file = file_name(path);
            let span = observability::file_span(&file, self.scorer.name());
            let _guard = span.enter();

            match self.process_file(path, dest_dir, options.dry_run, out) {
                Ok(item) => {
                    observability::record_file_result(if options.dry_run {
                        "planned"
                    } else {
                        "processed"
                    });
                    report.processed += 1;
                    report.items.push(item);
                }
                Err(err) if options.keep_going && err.is_per_file() => {
                    warn!(error = %err, "Skipping unreadable file");
                    observability::record_file_result("skipped");
                    report.skipped.push(file);
                }
                Err(err) => {
                    if matches!(err, AppError::Io { .. } | AppError::Decode { .. }) {
                        error_logging::log_filesystem_error(&err, "process file", path.to_str());
                    } else {
                        error_logging::log_scoring_error(
                            &err,
                            self.scorer.name(),
                            &file,
                            Some(start.elapsed()),
                        );
                    }
                    return Err(err);
                }
            }
        }

        info!(
            processed = report.processed,
            skipped = report.skipped.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Batch finished"
        );
        Ok(report)
    }

    fn process_file<W: Write>(
        &self,
        path: &Path,
        dest_dir: &Path,
        dry_run: bool,
        out: &mut W,
    ) -> AppResult<ItemReport> {
        let raster = image_source::open_raster(path)?;
        let rgb = DynamicImage::ImageRgb8(raster.to_rgb8());
        drop(raster);
        let cropped = crop_top_margin(&rgb, self.crop_top_margin);
        drop(rgb);

        let decision = decide(&cropped, &self.scorer)?;
        observability::record_decision(decision.rotation, self.scorer.name());

        let item = BatchItem {
            source: path.to_path_buf(),
            destination: dest_dir.join(path.file_name().unwrap_or(path.as_os_str())),
            rotation: decision.rotation,
            dry_run,
        };

        self.apply(&item, &cropped, out)?;
        Ok(item_report(&item, &decision))
    }

    fn apply<W: Write>(
        &self,
        item: &BatchItem,
        cropped: &DynamicImage,
        out: &mut W,
    ) -> AppResult<()> {
        let name = file_name(&item.source);

        if item.dry_run {
            emit(
                out,
                &format!(
                    "[DRY] rotate {} degrees and overwrite: {}",
                    item.rotation.degrees(),
                    name
                ),
            )?;
            emit(
                out,
                &format!(
                    "[DRY] move: {} -> {}",
                    item.source.display(),
                    item.destination.display()
                ),
            )?;
            return Ok(());
        }

        let rotated = item.rotation.apply(cropped);
        image_source::persist(&rotated, &item.source, self.output_format)?;
        image_source::relocate(&item.source, &item.destination)?;

        info!(
            rotation = item.rotation.degrees(),
            destination = %item.destination.display(),
            "Rotated and moved {}",
            name
        );
        Ok(())
    }
}

fn item_report(item: &BatchItem, decision: &Decision) -> ItemReport {
    ItemReport {
        file: file_name(&item.source),
        rotation_degrees: item.rotation.degrees(),
        destination: item.destination.clone(),
        clockwise_score: decision.clockwise_score,
        counter_clockwise_score: decision.counter_clockwise_score,
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn emit<W: Write>(out: &mut W, line: &str) -> AppResult<()> {
    writeln!(out, "{}", line).map_err(|e| AppError::io("write output", Path::new("<output>"), e))
}
