use nutritrack_ml_core::ModelError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors returned by the nutrition training pipeline.
#[derive(Debug, Error)]
pub enum TrainerError {
    #[error("cannot access {}: {source}", .path.display())]
    DataAccess {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("dataset is missing required columns: {}", .missing.join(", "))]
    Schema { missing: Vec<String> },

    #[error("data quality error: {0}")]
    DataQuality(String),

    #[error("fit error: {0}")]
    Fit(String),

    #[error("model error: {0}")]
    Model(#[from] ModelError),
}

impl TrainerError {
    pub(crate) fn access(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        TrainerError::DataAccess {
            path: path.into(),
            source,
        }
    }
}
