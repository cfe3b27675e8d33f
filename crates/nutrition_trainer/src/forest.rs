//! Random-forest trainer
//!
//! Fits a bagged ensemble of CART regression trees. Each tree sees a
//! bootstrap sample drawn with its own seed derived from the forest seed.

use nutritrack_ml_core::RandomForestModel;
use tracing::debug;

use crate::cart::{CartBuilder, TreeConfig};
use crate::deterministic::{bootstrap_indices, derive_seed};
use crate::errors::TrainerError;

/// Random-forest training configuration
#[derive(Clone, Debug, PartialEq)]
pub struct ForestConfig {
    pub n_estimators: usize,
    pub tree: TreeConfig,
    pub bootstrap: bool,
    pub seed: u64,
}

impl Default for ForestConfig {
    fn default() -> Self {
        Self {
            n_estimators: 100,
            tree: TreeConfig::default(),
            bootstrap: true,
            seed: 42,
        }
    }
}

pub struct ForestTrainer {
    config: ForestConfig,
}

impl ForestTrainer {
    pub fn new(config: ForestConfig) -> Self {
        Self { config }
    }

    /// Fit a forest predicting `targets` from `features`.
    ///
    /// `target` names the metric in the model metadata.
    pub fn fit(
        &self,
        target: &str,
        features: &[Vec<f64>],
        targets: &[f64],
    ) -> Result<RandomForestModel, TrainerError> {
        if features.len() != targets.len() {
            return Err(TrainerError::Fit(format!(
                "{}: {} feature rows but {} target values",
                target,
                features.len(),
                targets.len()
            )));
        }

        if features.is_empty() {
            return Err(TrainerError::Fit(format!("{}: no training rows", target)));
        }

        if self.config.n_estimators == 0 {
            return Err(TrainerError::Fit("n_estimators must be positive".to_string()));
        }

        let feature_count = features[0].len();
        if let Some(row) = features.iter().position(|r| r.len() != feature_count) {
            return Err(TrainerError::Fit(format!(
                "{}: row {} has {} features, expected {}",
                target,
                row,
                features[row].len(),
                feature_count
            )));
        }

        let builder = CartBuilder::new(features, targets, self.config.tree.clone());
        let n = features.len();
        let full_sample: Vec<usize> = (0..n).collect();

        let trees = (0..self.config.n_estimators)
            .map(|tree_idx| {
                let tree = if self.config.bootstrap {
                    let seed = derive_seed(self.config.seed, tree_idx as u64);
                    builder.build(&bootstrap_indices(n, seed))
                } else {
                    builder.build(&full_sample)
                };
                debug!(
                    "{}: tree {}/{} has {} nodes",
                    target,
                    tree_idx + 1,
                    self.config.n_estimators,
                    tree.nodes.len()
                );
                tree
            })
            .collect();

        Ok(RandomForestModel::new(target, trees, feature_count)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toy_data() -> (Vec<Vec<f64>>, Vec<f64>) {
        let features: Vec<Vec<f64>> = (0..12)
            .map(|i| vec![(i % 4) as f64, if i < 6 { 1.0 } else { 0.0 }])
            .collect();
        let targets: Vec<f64> = (0..12).map(|i| 100.0 + 10.0 * (i % 4) as f64).collect();
        (features, targets)
    }

    fn small_config() -> ForestConfig {
        ForestConfig {
            n_estimators: 10,
            ..ForestConfig::default()
        }
    }

    #[test]
    fn test_fit_produces_requested_trees() {
        let (features, targets) = toy_data();
        let model = ForestTrainer::new(small_config())
            .fit("calories", &features, &targets)
            .unwrap();

        assert_eq!(model.num_trees(), 10);
        assert_eq!(model.metadata.feature_count, 2);
        assert_eq!(model.metadata.target, "calories");
        assert!(model.validate().is_ok());
    }

    #[test]
    fn test_predictions_stay_within_target_range() {
        let (features, targets) = toy_data();
        let model = ForestTrainer::new(small_config())
            .fit("protein", &features, &targets)
            .unwrap();

        for row in &features {
            let p = model.predict(row).unwrap();
            assert!((100.0..=130.0).contains(&p));
        }
    }

    #[test]
    fn test_same_seed_same_forest() {
        let (features, targets) = toy_data();
        let a = ForestTrainer::new(small_config())
            .fit("carbs", &features, &targets)
            .unwrap();
        let b = ForestTrainer::new(small_config())
            .fit("carbs", &features, &targets)
            .unwrap();

        assert_eq!(a.trees, b.trees);
        assert_eq!(a.metadata.model_hash, b.metadata.model_hash);
    }

    #[test]
    fn test_without_bootstrap_fits_exactly() {
        let (features, targets) = toy_data();
        let config = ForestConfig {
            n_estimators: 3,
            bootstrap: false,
            ..ForestConfig::default()
        };
        let model = ForestTrainer::new(config)
            .fit("fats", &features, &targets)
            .unwrap();

        for (row, target) in features.iter().zip(&targets) {
            assert_eq!(model.predict(row).unwrap(), *target);
        }
    }

    #[test]
    fn test_shape_mismatch_is_fit_error() {
        let (features, mut targets) = toy_data();
        targets.pop();

        let err = ForestTrainer::new(small_config())
            .fit("calories", &features, &targets)
            .unwrap_err();
        assert!(matches!(err, TrainerError::Fit(_)));
    }

    #[test]
    fn test_ragged_rows_are_fit_error() {
        let (mut features, targets) = toy_data();
        features[3].push(1.0);

        let err = ForestTrainer::new(small_config())
            .fit("calories", &features, &targets)
            .unwrap_err();
        assert!(matches!(err, TrainerError::Fit(_)));
    }
}
