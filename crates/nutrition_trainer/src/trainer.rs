//! Per-metric model training and evaluation
//!
//! Splits the records once and fits one forest per nutrition metric on the
//! same training rows, scoring every model on the same held-out rows.

use nutritrack_ml_core::{Evaluation, NutritionMetric, RandomForestModel};
use std::collections::BTreeMap;
use tracing::info;

use crate::dataset::NutritionDataset;
use crate::deterministic::{train_test_split, Split};
use crate::errors::TrainerError;
use crate::features::FeatureSet;
use crate::forest::{ForestConfig, ForestTrainer};

/// Output of a training run
#[derive(Clone, Debug)]
pub struct TrainingReport {
    pub split: Split,
    pub models: BTreeMap<NutritionMetric, RandomForestModel>,
    pub evaluations: BTreeMap<NutritionMetric, Evaluation>,
}

pub struct ModelTrainer {
    test_size: f64,
    seed: u64,
    forest: ForestConfig,
}

impl ModelTrainer {
    pub fn new(test_size: f64, seed: u64, forest: ForestConfig) -> Self {
        Self {
            test_size,
            seed,
            forest,
        }
    }

    /// Train and evaluate all four metrics on one shared split
    pub fn train(
        &self,
        features: &FeatureSet,
        dataset: &NutritionDataset,
    ) -> Result<TrainingReport, TrainerError> {
        if features.n_rows() != dataset.len() {
            return Err(TrainerError::Fit(format!(
                "feature matrix has {} rows but dataset has {} records",
                features.n_rows(),
                dataset.len()
            )));
        }

        let split = train_test_split(dataset.len(), self.test_size, self.seed)?;
        info!(
            "Split {} samples: {} train, {} test",
            dataset.len(),
            split.train.len(),
            split.test.len()
        );

        let x_train = Split::take(&features.matrix, &split.train);
        let x_test = Split::take(&features.matrix, &split.test);

        let forest_trainer = ForestTrainer::new(self.forest.clone());
        let mut models = BTreeMap::new();
        let mut evaluations = BTreeMap::new();

        for metric in NutritionMetric::ALL {
            let y = dataset.targets(metric);
            let y_train = Split::take(&y, &split.train);
            let y_test = Split::take(&y, &split.test);

            let model = forest_trainer.fit(metric.name(), &x_train, &y_train)?;

            let y_pred = model.predict_batch(&x_test)?;
            let evaluation = Evaluation::compute(&y_test, &y_pred);

            info!("{} Model:", metric.display_name());
            info!("  MAE: {:.2}", evaluation.mae);
            info!("  R²: {:.3}", evaluation.r2);

            models.insert(metric, model);
            evaluations.insert(metric, evaluation);
        }

        Ok(TrainingReport {
            split,
            models,
            evaluations,
        })
    }
}
