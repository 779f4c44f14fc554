//! autoland-parse - run the hybrid parser over autoland report PDFs.
//!
//! Prints one JSON result per file on stdout; logs go to stderr.
//!
//! # Configuration
//!
//! Settings come from `--config` (TOML, JSON or YAML) with environment
//! variables layered on top, or from the environment alone:
//!
//! - `DOCUMENT_AI_PROCESSOR_ID` - Document AI processor resource name
//! - `GOOGLE_OAUTH_ACCESS_TOKEN` - bearer token for Document AI
//! - `AUTOLAND_MIN_TEXT_LENGTH`, `AUTOLAND_OCR_COST_PER_DOCUMENT`,
//!   `AUTOLAND_KNOWN_AIRPORTS`, `AUTOLAND_STRICT_DATES`
//!
//! Exits with status 1 when any report could not be parsed.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use autoland_core::AutolandConfig;
use autoland_extractors::{calculate_cost_savings, ExtractorFactory};
use clap::Parser;
use tracing::{info, warn, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(
    name = "autoland-parse",
    about = "Extract and parse autoland reports, falling back to cloud OCR when needed",
    version
)]
struct Cli {
    /// Configuration file (.toml, .json, .yaml).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print cost savings over all files after the individual results.
    #[arg(long)]
    aggregate: bool,

    /// PDF reports to parse.
    #[arg(required = true)]
    files: Vec<PathBuf>,
}

fn load_config(path: Option<&Path>) -> Result<AutolandConfig> {
    match path {
        Some(path) => {
            let mut config = AutolandConfig::from_file(path)
                .with_context(|| format!("Failed to load config from {}", path.display()))?;
            config.apply_overrides(|key| std::env::var(key).ok())?;
            Ok(config)
        }
        None => Ok(AutolandConfig::from_env()?),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing to stderr (stdout carries the JSON results)
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;
    let parser = ExtractorFactory::hybrid(&config);

    let mut results = Vec::with_capacity(cli.files.len());
    for path in &cli.files {
        let bytes = tokio::fs::read(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?;

        let result = parser.parse_with_fallback(&bytes).await;
        info!(
            file = %path.display(),
            success = result.success,
            method = %result.method,
            "Processed report"
        );
        println!("{}", serde_json::to_string_pretty(&result)?);
        results.push(result);
    }

    if cli.aggregate {
        let metrics = calculate_cost_savings(&results, config.pipeline.ocr_cost_per_document);
        println!("{}", serde_json::to_string_pretty(&metrics)?);
    }

    let failed = results.iter().filter(|r| !r.success).count();
    if failed > 0 {
        warn!(failed, total = results.len(), "Some reports could not be parsed");
        std::process::exit(1);
    }

    Ok(())
}
