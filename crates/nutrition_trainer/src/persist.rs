//! Artifact persistence
//!
//! Writes one canonical-JSON file per metric model plus the vectorizer.

use nutritrack_ml_core::{
    model_path, ModelError, NutritionMetric, RandomForestModel, TfidfVectorizer, VECTORIZER_FILE,
};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::errors::TrainerError;

/// Save all artifacts into `output_dir`, creating it if needed.
///
/// Returns the written paths in write order. Files already written are left
/// in place if a later write fails.
pub fn save_artifacts(
    models: &BTreeMap<NutritionMetric, RandomForestModel>,
    vectorizer: &TfidfVectorizer,
    output_dir: &Path,
) -> Result<Vec<PathBuf>, TrainerError> {
    std::fs::create_dir_all(output_dir).map_err(|err| TrainerError::access(output_dir, err))?;

    let mut written = Vec::with_capacity(models.len() + 1);

    for (metric, model) in models {
        let path = model_path(output_dir, *metric);
        debug!("Saving {} model to {}", metric, path.display());
        model.save_json(&path).map_err(|err| write_error(&path, err))?;
        written.push(path);
    }

    let path = output_dir.join(VECTORIZER_FILE);
    vectorizer
        .save_json(&path)
        .map_err(|err| write_error(&path, err))?;
    written.push(path);

    info!("Models saved to {}", output_dir.display());
    Ok(written)
}

fn write_error(path: &Path, err: ModelError) -> TrainerError {
    match err {
        ModelError::Io(io) => TrainerError::access(path, io),
        other => TrainerError::Model(other),
    }
}
