//! Feature building
//!
//! Derives one text field per record and fits the TF-IDF vectorizer over the
//! whole corpus.

use nutritrack_ml_core::{ModelError, TfidfVectorizer};
use tracing::info;

use crate::dataset::NutritionDataset;
use crate::errors::TrainerError;

/// Vectorized corpus together with the vectorizer that produced it
#[derive(Clone, Debug)]
pub struct FeatureSet {
    pub texts: Vec<String>,
    pub vectorizer: TfidfVectorizer,
    /// One row per record, `vectorizer.n_features()` columns each
    pub matrix: Vec<Vec<f64>>,
}

impl FeatureSet {
    pub fn n_rows(&self) -> usize {
        self.matrix.len()
    }

    pub fn n_features(&self) -> usize {
        self.vectorizer.n_features()
    }
}

pub struct FeatureBuilder {
    max_features: usize,
}

impl FeatureBuilder {
    pub fn new(max_features: usize) -> Self {
        Self { max_features }
    }

    pub fn build(&self, dataset: &NutritionDataset) -> Result<FeatureSet, TrainerError> {
        let texts = dataset.texts();

        let mut vectorizer = TfidfVectorizer::new(self.max_features);
        let matrix = vectorizer.fit_transform(&texts).map_err(|err| match err {
            ModelError::EmptyVocabulary(cause) => TrainerError::DataQuality(format!(
                "empty vocabulary, nothing to learn from: {}",
                cause
            )),
            other => TrainerError::Model(other),
        })?;

        info!(
            "Vectorized {} documents into {} features",
            matrix.len(),
            vectorizer.n_features()
        );

        Ok(FeatureSet {
            texts,
            vectorizer,
            matrix,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::MealRecord;

    fn record(description: &str, meal_type: &str) -> MealRecord {
        MealRecord {
            meal_description: description.to_string(),
            meal_type: meal_type.to_string(),
            calories: 100.0,
            protein: 10.0,
            carbs: 10.0,
            fats: 5.0,
        }
    }

    #[test]
    fn test_matrix_shape() {
        let dataset = NutritionDataset::new(vec![
            record("grilled chicken breast", "lunch"),
            record("beef tapa with garlic rice", "breakfast"),
            record("pork sinigang", "dinner"),
        ]);

        let features = FeatureBuilder::new(1000).build(&dataset).unwrap();
        assert_eq!(features.n_rows(), 3);
        assert_eq!(features.texts[0], "grilled chicken breast lunch");
        assert!(features
            .matrix
            .iter()
            .all(|row| row.len() == features.n_features()));
    }

    #[test]
    fn test_vocabulary_bound() {
        let dataset = NutritionDataset::new(vec![
            record("grilled chicken breast", "lunch"),
            record("beef tapa with garlic rice", "breakfast"),
        ]);

        let features = FeatureBuilder::new(3).build(&dataset).unwrap();
        assert_eq!(features.n_features(), 3);
    }

    #[test]
    fn test_stop_word_only_text_is_zero_row() {
        let dataset = NutritionDataset::new(vec![
            record("adobo", "dinner"),
            record("the", "a"),
        ]);

        let features = FeatureBuilder::new(1000).build(&dataset).unwrap();
        assert!(features.matrix[1].iter().all(|&x| x == 0.0));
    }

    #[test]
    fn test_empty_vocabulary_is_data_quality_error() {
        let dataset = NutritionDataset::new(vec![record("the", "a"), record("of", "an")]);

        let err = FeatureBuilder::new(1000).build(&dataset).unwrap_err();
        assert!(matches!(err, TrainerError::DataQuality(_)));
    }
}
