//! Training run configuration

use nutritrack_ml_core::DEFAULT_MAX_FEATURES;
use std::path::PathBuf;

use crate::forest::ForestConfig;

/// Default artifact directory, relative to the working directory
pub const DEFAULT_OUTPUT_DIR: &str = "../models";

/// Everything one training run needs, passed by value through the pipeline
#[derive(Clone, Debug, PartialEq)]
pub struct TrainingConfig {
    pub dataset: PathBuf,
    pub output: PathBuf,
    /// Vocabulary bound for the vectorizer
    pub max_features: usize,
    /// Fraction of records held out for evaluation
    pub test_size: f64,
    /// Seed for the train/test split
    pub seed: u64,
    pub forest: ForestConfig,
}

impl TrainingConfig {
    pub fn new(dataset: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self {
            dataset: dataset.into(),
            output: output.into(),
            ..Self::default()
        }
    }
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            dataset: PathBuf::new(),
            output: PathBuf::from(DEFAULT_OUTPUT_DIR),
            max_features: DEFAULT_MAX_FEATURES,
            test_size: 0.2,
            seed: 42,
            forest: ForestConfig::default(),
        }
    }
}
