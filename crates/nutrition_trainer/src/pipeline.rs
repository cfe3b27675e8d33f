//! End-to-end training run: load, featurize, train, persist

use nutritrack_ml_core::{Evaluation, NutritionMetric};
use std::collections::BTreeMap;
use std::path::PathBuf;
use tracing::info;

use crate::config::TrainingConfig;
use crate::dataset::NutritionDataset;
use crate::errors::TrainerError;
use crate::features::FeatureBuilder;
use crate::persist::save_artifacts;
use crate::trainer::ModelTrainer;

/// What a successful run produced
#[derive(Clone, Debug)]
pub struct PipelineSummary {
    pub samples: usize,
    pub feature_count: usize,
    pub test_indices: Vec<usize>,
    pub evaluations: BTreeMap<NutritionMetric, Evaluation>,
    pub artifacts: Vec<PathBuf>,
}

/// Run the full pipeline once
pub fn run(config: TrainingConfig) -> Result<PipelineSummary, TrainerError> {
    info!("Loading dataset from: {}", config.dataset.display());
    let dataset = NutritionDataset::from_csv(&config.dataset)?;

    let features = FeatureBuilder::new(config.max_features).build(&dataset)?;

    let trainer = ModelTrainer::new(config.test_size, config.seed, config.forest.clone());
    let report = trainer.train(&features, &dataset)?;

    let artifacts = save_artifacts(&report.models, &features.vectorizer, &config.output)?;

    Ok(PipelineSummary {
        samples: dataset.len(),
        feature_count: features.n_features(),
        test_indices: report.split.test,
        evaluations: report.evaluations,
        artifacts,
    })
}
