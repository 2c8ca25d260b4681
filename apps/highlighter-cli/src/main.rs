//! Keypoint highlighter binary
//!
//! Highlights extracted keypoints in a PDF and prints a run summary.
//! Logs go to stderr; `RUST_LOG` controls verbosity.

use anyhow::{Context, Result};
use clap::Parser;
use keypoint_highlighter::HighlightConfig;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "keypoint-highlight")]
#[command(version, about = "Highlight extracted keypoints in a PDF")]
struct Args {
    /// Source PDF
    #[arg(long)]
    pdf: PathBuf,

    /// Keypoint JSON file (`{"contextual_keypoints": [...]}` or a bare array)
    #[arg(long)]
    keypoints: PathBuf,

    /// Output PDF (defaults to `<pdf>_highlighted.pdf` next to the source)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Fuzzy match threshold in [0, 1], overrides the config file
    #[arg(long)]
    min_similarity: Option<f64>,

    /// Write the full JSON report here
    #[arg(long)]
    report: Option<PathBuf>,

    /// Only log warnings and errors
    #[arg(short, long)]
    quiet: bool,
}

fn default_output(pdf: &Path) -> PathBuf {
    let stem = pdf
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string());
    pdf.with_file_name(format!("{}_highlighted.pdf", stem))
}

fn load_config(args: &Args) -> Result<HighlightConfig> {
    let mut config = match &args.config {
        Some(path) => HighlightConfig::from_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => HighlightConfig::default(),
    };
    if let Some(min_similarity) = args.min_similarity {
        config.min_similarity = min_similarity;
    }
    config.validate().context("Invalid configuration")?;
    Ok(config)
}

fn run(args: Args) -> Result<bool> {
    let config = load_config(&args)?;
    let output = args.output.clone().unwrap_or_else(|| default_output(&args.pdf));

    let report = pdf_highlight::highlight_files(&args.pdf, &args.keypoints, &output, &config)
        .with_context(|| format!("Failed to highlight {}", args.pdf.display()))?;

    print!("{}", report);

    if let Some(path) = &args.report {
        let json = serde_json::to_string_pretty(&report)?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write report {}", path.display()))?;
        tracing::info!("Report written to {}", path.display());
    }

    Ok(report.is_success())
}

fn main() -> ExitCode {
    let args = Args::parse();

    let level = if args.quiet {
        tracing::Level::WARN
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(level.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::info!("Starting keypoint-highlight v{}", env!("CARGO_PKG_VERSION"));

    match run(args) {
        Ok(true) => ExitCode::SUCCESS,
        // Output was saved but nothing was highlighted
        Ok(false) => ExitCode::from(2),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
