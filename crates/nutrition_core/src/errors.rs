//! Error types for the nutrition model core

use thiserror::Error;

use crate::serde_canon::CanonicalError;

/// Errors raised while building, validating or loading model artifacts
#[derive(Error, Debug)]
pub enum ModelError {
    /// The fitted vocabulary contains no terms
    #[error("Empty vocabulary: {0}")]
    EmptyVocabulary(String),

    /// Model structure failed validation
    #[error("Model validation failed: {0}")]
    ValidationFailed(String),

    /// Stored model hash does not match the recomputed one
    #[error("Model hash mismatch: expected {expected}, computed {computed}")]
    HashMismatch { expected: String, computed: String },

    /// Feature vector does not match the shape the model was trained on
    #[error("Feature dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Canonical serialization error: {0}")]
    Canonical(#[from] CanonicalError),
}

/// Result type for model core operations
pub type Result<T> = std::result::Result<T, ModelError>;
