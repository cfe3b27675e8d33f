//! NutriTrack nutrition model trainer CLI
//!
//! Trains calories/protein/carbs/fats predictors from a meal CSV.

use anyhow::{Context, Result};
use clap::Parser;
use nutritrack_ml_trainer::{pipeline, TrainingConfig, DEFAULT_OUTPUT_DIR};
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "train-nutrition-model")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Train nutrition prediction models", long_about = None)]
struct Args {
    /// Path to CSV dataset
    #[arg(long)]
    dataset: PathBuf,

    /// Output directory for models
    #[arg(long, default_value = DEFAULT_OUTPUT_DIR)]
    output: PathBuf,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let log_level = if args.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")?;

    info!("NutriTrack nutrition trainer v{}", env!("CARGO_PKG_VERSION"));

    let config = TrainingConfig::new(args.dataset, args.output);
    let summary = pipeline::run(config).context("Training failed")?;

    info!(
        "Trained on {} samples with {} features, {} artifacts written",
        summary.samples,
        summary.feature_count,
        summary.artifacts.len()
    );
    info!("Training complete!");

    Ok(())
}
