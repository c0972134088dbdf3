//! # Observability Configuration
//!
//! Log level and output format for the tracing subscriber.

use serde::{Deserialize, Serialize};

/// Output format for log lines written to stderr
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum LogFormat {
    /// Compact single-line human readable output
    #[default]
    Pretty,
    /// One JSON object per event
    Json,
}

impl LogFormat {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "pretty" => Some(LogFormat::Pretty),
            "json" => Some(LogFormat::Json),
            _ => None,
        }
    }
}

/// Observability configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// Log level for the crate's own targets
    pub log_level: String,
    /// Log line format
    pub log_format: LogFormat,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::default(),
        }
    }
}

impl ObservabilityConfig {
    /// Validate the observability configuration
    pub fn validate(&self) -> crate::errors::AppResult<()> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.to_ascii_lowercase().as_str()) {
            return Err(crate::errors::AppError::Config(format!(
                "log_level must be one of {:?}, got '{}'",
                valid_levels, self.log_level
            )));
        }
        Ok(())
    }
}
