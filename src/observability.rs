//! Observability module for logging and metrics setup.
//!
//! This module provides:
//! - Structured logging with configurable levels and formats
//! - Span helpers for per-file batch work
//! - Metric recording helpers built on the `metrics` facade

use anyhow::Result;
use tracing_subscriber::prelude::*;

use crate::observability_config::{LogFormat, ObservabilityConfig};
use crate::rotation::Rotation;

/// Initialize structured logging with tracing and configuration
///
/// Logs go to stderr so stdout stays reserved for the dry-run plan and reports.
pub fn init_tracing(config: &ObservabilityConfig) -> Result<()> {
    config
        .validate()
        .map_err(|e| anyhow::anyhow!("Invalid observability configuration: {}", e))?;

    let filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(format!("card_orient={}", config.log_level.to_ascii_lowercase()).parse()?);

    match config.log_format {
        LogFormat::Pretty => {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_writer(std::io::stderr)
                        .with_target(false)
                        .compact(),
                )
                .try_init()?;
        }
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_writer(std::io::stderr)
                        .with_target(true),
                )
                .try_init()?;
        }
    }

    tracing::debug!(
        log_level = %config.log_level,
        log_format = ?config.log_format,
        "Tracing initialized with structured logging"
    );
    Ok(())
}

/// Create a span for the processing of one file
pub fn file_span(file: &str, strategy: &str) -> tracing::Span {
    tracing::info_span!("orient_file", file = file, strategy = strategy)
}

/// Record an orientation decision
pub fn record_decision(rotation: Rotation, strategy: &'static str) {
    metrics::counter!(
        "orientation_decisions_total",
        "rotation" => rotation.as_str(),
        "strategy" => strategy
    )
    .increment(1);
}

/// Record the outcome of one batch file: `processed`, `planned` or `skipped`
pub fn record_file_result(result: &'static str) {
    metrics::counter!("batch_files_total", "result" => result).increment(1);
}
