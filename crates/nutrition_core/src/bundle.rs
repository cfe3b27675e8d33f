//! Persisted artifact bundle
//!
//! Four per-metric forests plus the fitted vectorizer, restored from an
//! output directory for inference without any training code.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::errors::{ModelError, Result};
use crate::forest::RandomForestModel;
use crate::vectorizer::TfidfVectorizer;

/// File name of the persisted vectorizer
pub const VECTORIZER_FILE: &str = "vectorizer.json";

/// Nutrition targets predicted from meal text
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NutritionMetric {
    Calories,
    Protein,
    Carbs,
    Fats,
}

impl NutritionMetric {
    pub const ALL: [NutritionMetric; 4] = [
        NutritionMetric::Calories,
        NutritionMetric::Protein,
        NutritionMetric::Carbs,
        NutritionMetric::Fats,
    ];

    /// Lowercase name, also the dataset column name
    pub fn name(self) -> &'static str {
        match self {
            NutritionMetric::Calories => "calories",
            NutritionMetric::Protein => "protein",
            NutritionMetric::Carbs => "carbs",
            NutritionMetric::Fats => "fats",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            NutritionMetric::Calories => "Calories",
            NutritionMetric::Protein => "Protein",
            NutritionMetric::Carbs => "Carbs",
            NutritionMetric::Fats => "Fats",
        }
    }

    /// Artifact file name, e.g. `calories_model.json`
    pub fn model_file_name(self) -> String {
        format!("{}_model.json", self.name())
    }
}

impl fmt::Display for NutritionMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Every file name a complete bundle consists of
pub fn artifact_file_names() -> Vec<String> {
    let mut names: Vec<String> = NutritionMetric::ALL
        .iter()
        .map(|metric| metric.model_file_name())
        .collect();
    names.push(VECTORIZER_FILE.to_string());
    names
}

/// Predicted nutrition for one meal
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NutritionEstimate {
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fats: f64,
}

/// Loaded inference bundle
#[derive(Debug, Clone)]
pub struct ArtifactBundle {
    pub vectorizer: TfidfVectorizer,
    pub models: BTreeMap<NutritionMetric, RandomForestModel>,
}

impl ArtifactBundle {
    /// Restore a bundle previously written to `dir`
    pub fn load<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref();
        let vectorizer = TfidfVectorizer::load_json(dir.join(VECTORIZER_FILE))?;

        let mut models = BTreeMap::new();
        for metric in NutritionMetric::ALL {
            let model = RandomForestModel::load_json(model_path(dir, metric))?;
            if model.metadata.target != metric.name() {
                return Err(ModelError::ValidationFailed(format!(
                    "{} holds a {} model",
                    metric.model_file_name(),
                    model.metadata.target
                )));
            }
            if model.metadata.feature_count != vectorizer.n_features() {
                return Err(ModelError::DimensionMismatch {
                    expected: vectorizer.n_features(),
                    actual: model.metadata.feature_count,
                });
            }
            models.insert(metric, model);
        }

        info!("Loaded artifact bundle from {}", dir.display());
        Ok(Self { vectorizer, models })
    }

    /// Predict a single metric for raw meal text
    pub fn predict_metric(
        &self,
        metric: NutritionMetric,
        description: &str,
        meal_type: &str,
    ) -> Result<f64> {
        let features = self.vectorizer.transform(&meal_text(description, meal_type));
        self.model(metric)?.predict(&features)
    }

    /// Predict all four metrics for a meal
    pub fn predict(&self, description: &str, meal_type: &str) -> Result<NutritionEstimate> {
        let features = self.vectorizer.transform(&meal_text(description, meal_type));

        Ok(NutritionEstimate {
            calories: self.model(NutritionMetric::Calories)?.predict(&features)?,
            protein: self.model(NutritionMetric::Protein)?.predict(&features)?,
            carbs: self.model(NutritionMetric::Carbs)?.predict(&features)?,
            fats: self.model(NutritionMetric::Fats)?.predict(&features)?,
        })
    }

    fn model(&self, metric: NutritionMetric) -> Result<&RandomForestModel> {
        self.models.get(&metric).ok_or_else(|| {
            ModelError::ValidationFailed(format!("bundle has no {} model", metric))
        })
    }
}

/// Path of a metric's model file inside `dir`
pub fn model_path(dir: &Path, metric: NutritionMetric) -> PathBuf {
    dir.join(metric.model_file_name())
}

/// Text a meal is vectorized from: description and meal type joined by a space
pub fn meal_text(description: &str, meal_type: &str) -> String {
    format!("{} {}", description, meal_type)
}
