//! NutriTrack ML core
//!
//! Model-side building blocks shared by the trainer and by anything that
//! consumes its artifacts:
//! - Tokenization and TF-IDF vectorization of meal text
//! - Random-forest regression trees with canonical JSON persistence
//! - Regression metrics
//! - Loading a persisted artifact bundle for inference

pub mod bundle;
pub mod errors;
pub mod forest;
pub mod metrics;
pub mod serde_canon;
pub mod text;
pub mod vectorizer;

pub use bundle::{
    artifact_file_names, meal_text, model_path, ArtifactBundle, NutritionEstimate,
    NutritionMetric, VECTORIZER_FILE,
};
pub use errors::{ModelError, Result};
pub use forest::{ModelMetadata, Node, RandomForestModel, RegressionTree};
pub use metrics::{mean_absolute_error, r2_score, Evaluation};
pub use vectorizer::{TfidfVectorizer, DEFAULT_MAX_FEATURES};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
