use anyhow::Result;
use card_orient::batch::{BatchOptions, BatchProcessor};
use card_orient::config::AppConfig;
use card_orient::errors::{error_logging, AppResult};
use card_orient::image_source::resolve_destination;
use card_orient::observability;
use card_orient::observability_config::ObservabilityConfig;
use card_orient::scoring::{build_scorer, Strategy};
use clap::Parser;
use std::io::Write;
use std::path::PathBuf;
use tracing::info;

/// Rotate and move PNG card scans.
#[derive(Debug, Parser)]
#[command(name = "card-orient", version, about = "Rotate and move PNG card scans.")]
struct CliArgs {
    /// Destination directory name or absolute path
    destination: String,

    /// How to decide clockwise vs counter-clockwise (gradient, alias simple, or ocr)
    #[arg(long = "auto", value_name = "STRATEGY", default_value = "ocr")]
    auto: Strategy,

    /// Print actions without modifying files
    #[arg(long = "dry-run")]
    dry_run: bool,

    /// Source directory holding the scans (overrides CARD_ORIENT_SOURCE_DIR)
    #[arg(long = "source", value_name = "DIR")]
    source: Option<PathBuf>,

    /// Use the gradient strategy when the OCR engine is unavailable
    #[arg(long = "fallback")]
    fallback: bool,

    /// Skip files that cannot be decoded instead of stopping the batch
    #[arg(long = "keep-going")]
    keep_going: bool,

    /// Print the batch report as JSON when done
    #[arg(long = "json")]
    json: bool,
}

/// Load and validate configuration from the environment and command line
fn load_configuration(args: &CliArgs) -> AppResult<AppConfig> {
    let mut config = AppConfig::from_env()?;

    if let Some(source) = &args.source {
        config.source_dir = source.clone();
    }

    config.validate()?;
    Ok(config)
}

fn main() -> Result<()> {
    // Load environment variables from .env file first
    dotenvy::dotenv().ok();

    let args = CliArgs::parse();
    let config = match load_configuration(&args) {
        Ok(config) => config,
        Err(e) => {
            // No usable logging settings yet, report through the defaults
            observability::init_tracing(&ObservabilityConfig::default())?;
            error_logging::log_config_error(&e, "environment", "load configuration");
            anyhow::bail!(
                "Configuration loading failed: {}. Please check your configuration values.",
                e
            );
        }
    };

    observability::init_tracing(&config.observability)?;
    info!("{}", config.summary());

    if !config.source_dir.is_dir() {
        anyhow::bail!("Source directory not found: {}", config.source_dir.display());
    }

    let dest_dir = resolve_destination(&config.source_dir, &args.destination);
    let scorer = build_scorer(args.auto, &config, args.fallback)?;
    let processor = BatchProcessor::new(scorer, &config);

    let options = BatchOptions {
        dry_run: args.dry_run,
        keep_going: args.keep_going,
    };

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let report = processor.run(&config.source_dir, &dest_dir, options, &mut out)?;

    if args.json {
        serde_json::to_writer_pretty(&mut out, &report)?;
        writeln!(out)?;
    }

    info!(
        processed = report.processed,
        skipped = report.skipped.len(),
        strategy = %report.strategy,
        "Done"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        CliArgs::command().debug_assert();
    }

    #[test]
    fn test_cli_defaults() {
        let args = CliArgs::try_parse_from(["card-orient", "done"]).unwrap();
        assert_eq!(args.destination, "done");
        assert_eq!(args.auto, Strategy::Ocr);
        assert!(!args.dry_run);
        assert!(!args.fallback);
        assert!(args.source.is_none());
    }

    #[test]
    fn test_cli_accepts_simple_alias_and_flags() {
        let args = CliArgs::try_parse_from([
            "card-orient",
            "/tmp/out",
            "--auto",
            "simple",
            "--dry-run",
            "--keep-going",
        ])
        .unwrap();
        assert_eq!(args.auto, Strategy::Gradient);
        assert!(args.dry_run);
        assert!(args.keep_going);
    }

    #[test]
    fn test_load_configuration_applies_source_override() {
        let args = CliArgs::try_parse_from(["card-orient", "done", "--source", "/data/cards"])
            .unwrap();
        let config = load_configuration(&args).unwrap();
        assert_eq!(config.source_dir, PathBuf::from("/data/cards"));
    }

    #[test]
    fn test_startup_logging_defaults_are_valid() {
        // Config errors are logged through these before the real settings exist
        assert!(ObservabilityConfig::default().validate().is_ok());
    }

    #[test]
    fn test_cli_rejects_unknown_strategy() {
        assert!(CliArgs::try_parse_from(["card-orient", "done", "--auto", "magic"]).is_err());
        assert!(CliArgs::try_parse_from(["card-orient"]).is_err());
    }
}
