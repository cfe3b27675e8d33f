//! Integration tests for the nutrition training pipeline
//!
//! Runs the full load → featurize → train → persist sequence on small
//! datasets and restores the written bundle.

use anyhow::Result;
use nutritrack_ml_core::{artifact_file_names, ArtifactBundle, NutritionMetric};
use nutritrack_ml_trainer::{
    pipeline, ForestConfig, NutritionDataset, TrainerError, TrainingConfig,
};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::{NamedTempFile, TempDir};

fn sample_csv() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/sample.csv")
}

fn config(dataset: &Path, output: &Path) -> TrainingConfig {
    let mut config = TrainingConfig::new(dataset, output);
    config.forest = ForestConfig {
        n_estimators: 20,
        ..ForestConfig::default()
    };
    config
}

fn written_files(dir: &Path) -> Result<Vec<String>> {
    let mut names = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        names.push(entry?.file_name().to_string_lossy().into_owned());
    }
    names.sort();
    Ok(names)
}

#[test]
fn test_pipeline_writes_bundle() -> Result<()> {
    let out = TempDir::new()?;
    let summary = pipeline::run(config(&sample_csv(), out.path()))?;

    assert_eq!(summary.samples, 10);
    assert_eq!(summary.test_indices.len(), 2);
    assert_eq!(summary.evaluations.len(), 4);
    assert!(summary.feature_count <= 1000);

    let mut expected = artifact_file_names();
    expected.sort();
    assert_eq!(written_files(out.path())?, expected);

    Ok(())
}

#[test]
fn test_bundle_restores_for_inference() -> Result<()> {
    let out = TempDir::new()?;
    pipeline::run(config(&sample_csv(), out.path()))?;

    let bundle = ArtifactBundle::load(out.path())?;
    let estimate = bundle.predict("grilled chicken breast", "lunch")?;

    for value in [
        estimate.calories,
        estimate.protein,
        estimate.carbs,
        estimate.fats,
    ] {
        assert!(value.is_finite());
    }
    // Forest outputs are averages of training targets
    assert!((120.0..=700.0).contains(&estimate.calories));

    Ok(())
}

#[test]
fn test_repeated_runs_match() -> Result<()> {
    let first_out = TempDir::new()?;
    let second_out = TempDir::new()?;

    let first = pipeline::run(config(&sample_csv(), first_out.path()))?;
    let second = pipeline::run(config(&sample_csv(), second_out.path()))?;

    assert_eq!(first.test_indices, second.test_indices);
    assert_eq!(first.evaluations, second.evaluations);

    let first_bundle = ArtifactBundle::load(first_out.path())?;
    let second_bundle = ArtifactBundle::load(second_out.path())?;
    for metric in NutritionMetric::ALL {
        assert_eq!(
            first_bundle.models[&metric].metadata.model_hash,
            second_bundle.models[&metric].metadata.model_hash
        );
    }

    Ok(())
}

#[test]
fn test_loader_and_features_agree_on_rows() -> Result<()> {
    let dataset = NutritionDataset::from_csv(sample_csv())?;
    let features = nutritrack_ml_trainer::FeatureBuilder::new(1000).build(&dataset)?;

    assert_eq!(dataset.len(), 10);
    assert_eq!(features.n_rows(), 10);
    Ok(())
}

#[test]
fn test_missing_carbs_column_writes_nothing() -> Result<()> {
    let mut file = NamedTempFile::new()?;
    writeln!(file, "meal_description,meal_type,calories,protein,fats")?;
    writeln!(file, "grilled chicken breast,lunch,250,40,8")?;
    file.flush()?;

    let out = TempDir::new()?;
    let output = out.path().join("models");
    let err = pipeline::run(config(file.path(), &output)).unwrap_err();

    match err {
        TrainerError::Schema { missing } => assert_eq!(missing, vec!["carbs".to_string()]),
        other => panic!("expected schema error, got {other}"),
    }
    assert!(!output.exists());

    Ok(())
}

#[test]
fn test_empty_dataset_is_rejected() -> Result<()> {
    let file = NamedTempFile::new()?;
    let out = TempDir::new()?;
    let output = out.path().join("models");

    let err = pipeline::run(config(file.path(), &output)).unwrap_err();
    assert!(matches!(err, TrainerError::DataQuality(_)));
    assert!(!output.exists());

    Ok(())
}

#[test]
fn test_stop_word_corpus_is_rejected() -> Result<()> {
    let mut file = NamedTempFile::new()?;
    writeln!(file, "meal_description,meal_type,calories,protein,carbs,fats")?;
    for _ in 0..5 {
        writeln!(file, "the,a,100,1,1,1")?;
    }
    file.flush()?;

    let out = TempDir::new()?;
    let err = pipeline::run(config(file.path(), out.path())).unwrap_err();
    assert!(matches!(err, TrainerError::DataQuality(_)));

    Ok(())
}

#[test]
fn test_missing_dataset_is_access_error() -> Result<()> {
    let out = TempDir::new()?;
    let err = pipeline::run(config(&out.path().join("missing.csv"), out.path())).unwrap_err();
    assert!(matches!(err, TrainerError::DataAccess { .. }));

    Ok(())
}

#[test]
fn test_non_finite_targets_do_not_poison_bundle() -> Result<()> {
    let mut file = NamedTempFile::new()?;
    writeln!(file, "meal_description,meal_type,calories,protein,carbs,fats")?;
    for line in std::fs::read_to_string(sample_csv())?.lines().skip(1) {
        writeln!(file, "{}", line)?;
    }
    writeln!(file, "mystery stew,dinner,NaN,10,10,10")?;
    writeln!(file, "mystery cake,dessert,300,inf,40,12")?;
    file.flush()?;

    let out = TempDir::new()?;
    let summary = pipeline::run(config(file.path(), out.path()))?;

    assert_eq!(summary.samples, 10);
    for evaluation in summary.evaluations.values() {
        assert!(evaluation.mae.is_finite());
        assert!(evaluation.r2.is_finite());
    }

    let bundle = ArtifactBundle::load(out.path())?;
    assert!(bundle.predict("mystery stew", "dinner")?.calories.is_finite());

    Ok(())
}
