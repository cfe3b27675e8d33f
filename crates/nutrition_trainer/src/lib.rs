//! NutriTrack ML Trainer - offline nutrition model trainer
//!
//! Trains one random-forest regressor per nutrition metric from meal
//! descriptions and writes a reusable artifact bundle.

pub mod cart;
pub mod config;
pub mod dataset;
pub mod deterministic;
pub mod errors;
pub mod features;
pub mod forest;
pub mod persist;
pub mod pipeline;
pub mod trainer;

pub use cart::{CartBuilder, TreeConfig};
pub use config::{TrainingConfig, DEFAULT_OUTPUT_DIR};
pub use dataset::{MealRecord, NutritionDataset, REQUIRED_COLUMNS};
pub use deterministic::{train_test_split, LcgRng, Split};
pub use errors::TrainerError;
pub use features::{FeatureBuilder, FeatureSet};
pub use forest::{ForestConfig, ForestTrainer};
pub use persist::save_artifacts;
pub use pipeline::{run, PipelineSummary};
pub use trainer::{ModelTrainer, TrainingReport};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
