//! Random-forest regression model
//!
//! Implements a bagged ensemble of regression trees with:
//! - Canonical JSON serialization
//! - Blake3 hashing of the tree ensemble
//! - Hash verification on load

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use super::tree::RegressionTree;
use crate::errors::{ModelError, Result};
use crate::serde_canon::{hash_canonical_hex, to_canonical_json_pretty};

/// Current artifact format version
pub const MODEL_FORMAT_VERSION: i32 = 1;

/// Descriptive metadata stored alongside the trees
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ModelMetadata {
    /// Target metric this model predicts (e.g. "calories")
    pub target: String,
    pub feature_count: usize,
    pub tree_count: usize,
    /// Unix timestamp of training
    pub created_at: i64,
    /// Blake3 hash (hex) of the canonical tree list
    pub model_hash: String,
}

/// Random-forest regressor; prediction is the mean over trees
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RandomForestModel {
    pub version: i32,
    pub trees: Vec<RegressionTree>,
    pub metadata: ModelMetadata,
}

impl RandomForestModel {
    /// Assemble a model from fitted trees, stamping metadata and hash
    pub fn new(target: &str, trees: Vec<RegressionTree>, feature_count: usize) -> Result<Self> {
        let model_hash = Self::calculate_model_hash(&trees)?;
        let metadata = ModelMetadata {
            target: target.to_string(),
            feature_count,
            tree_count: trees.len(),
            created_at: chrono::Utc::now().timestamp(),
            model_hash,
        };

        Ok(Self {
            version: MODEL_FORMAT_VERSION,
            trees,
            metadata,
        })
    }

    /// Hash of the canonical JSON of the tree ensemble
    pub fn calculate_model_hash(trees: &[RegressionTree]) -> Result<String> {
        Ok(hash_canonical_hex(&trees)?)
    }

    pub fn num_trees(&self) -> usize {
        self.trees.len()
    }

    /// Predict a single feature vector
    pub fn predict(&self, features: &[f64]) -> Result<f64> {
        if features.len() != self.metadata.feature_count {
            return Err(ModelError::DimensionMismatch {
                expected: self.metadata.feature_count,
                actual: features.len(),
            });
        }

        if self.trees.is_empty() {
            return Ok(0.0);
        }

        let sum: f64 = self.trees.iter().map(|tree| tree.predict(features)).sum();
        Ok(sum / self.trees.len() as f64)
    }

    /// Predict every row of a feature matrix
    pub fn predict_batch(&self, rows: &[Vec<f64>]) -> Result<Vec<f64>> {
        rows.iter().map(|row| self.predict(row)).collect()
    }

    /// Validate model structure
    pub fn validate(&self) -> Result<()> {
        if self.version != MODEL_FORMAT_VERSION {
            return Err(ModelError::ValidationFailed(format!(
                "Unsupported model version: {}",
                self.version
            )));
        }

        if self.trees.is_empty() {
            return Err(ModelError::ValidationFailed(
                "model has no trees".to_string(),
            ));
        }

        if self.metadata.tree_count != self.trees.len() {
            return Err(ModelError::ValidationFailed(format!(
                "metadata declares {} trees, found {}",
                self.metadata.tree_count,
                self.trees.len()
            )));
        }

        for (i, tree) in self.trees.iter().enumerate() {
            tree.validate(self.metadata.feature_count).map_err(|e| {
                ModelError::ValidationFailed(format!("Tree {} validation failed: {}", i, e))
            })?;
        }

        Ok(())
    }

    /// Recompute the tree hash and compare against metadata
    pub fn verify_hash(&self) -> Result<()> {
        let computed = Self::calculate_model_hash(&self.trees)?;
        if computed != self.metadata.model_hash {
            return Err(ModelError::HashMismatch {
                expected: self.metadata.model_hash.clone(),
                computed,
            });
        }
        Ok(())
    }

    /// Save model to a canonical JSON file
    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json = to_canonical_json_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Load, validate and hash-check a model file
    pub fn load_json<P: AsRef<Path>>(path: P) -> Result<Self> {
        let json = fs::read_to_string(path)?;
        let model: RandomForestModel = serde_json::from_str(&json)?;
        model.validate()?;
        model.verify_hash()?;
        Ok(model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forest::tree::Node;

    fn sample_model() -> RandomForestModel {
        let mut root = Node::internal(1, 0.25);
        root.left = 1;
        root.right = 2;
        let split = RegressionTree::new(vec![root, Node::leaf(100.0), Node::leaf(300.0)]);
        let constant = RegressionTree::new(vec![Node::leaf(200.0)]);

        RandomForestModel::new("calories", vec![split, constant], 2).unwrap()
    }

    #[test]
    fn test_prediction_is_tree_mean() {
        let model = sample_model();
        assert_eq!(model.predict(&[0.0, 0.1]).unwrap(), 150.0);
        assert_eq!(model.predict(&[0.0, 0.9]).unwrap(), 250.0);
    }

    #[test]
    fn test_dimension_mismatch() {
        let model = sample_model();
        let err = model.predict(&[0.0]).unwrap_err();
        assert!(matches!(
            err,
            ModelError::DimensionMismatch {
                expected: 2,
                actual: 1
            }
        ));
    }

    #[test]
    fn test_save_load_roundtrip_verifies_hash() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("calories_model.json");

        let model = sample_model();
        model.save_json(&path).unwrap();
        let restored = RandomForestModel::load_json(&path).unwrap();

        assert_eq!(restored, model);
    }

    #[test]
    fn test_tampered_model_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("calories_model.json");

        let mut model = sample_model();
        model.trees[1].nodes[0].leaf = Some(999.0);
        model.save_json(&path).unwrap();

        let err = RandomForestModel::load_json(&path).unwrap_err();
        assert!(matches!(err, ModelError::HashMismatch { .. }));
    }

    #[test]
    fn test_hash_is_stable() {
        let a = sample_model();
        let b = sample_model();
        assert_eq!(a.metadata.model_hash, b.metadata.model_hash);
    }
}
