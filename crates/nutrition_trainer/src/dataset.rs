//! CSV dataset loading
//!
//! Reads a headered meal dataset. Columns are looked up by name, so column
//! order is free and extra columns are ignored.

use nutritrack_ml_core::{meal_text, NutritionMetric};
use std::fs::File;
use std::path::Path;
use tracing::{debug, info, warn};

use crate::errors::TrainerError;

pub const DESCRIPTION_COLUMN: &str = "meal_description";
pub const MEAL_TYPE_COLUMN: &str = "meal_type";

/// Columns every dataset must provide, in declared order
pub const REQUIRED_COLUMNS: [&str; 6] = [
    DESCRIPTION_COLUMN,
    MEAL_TYPE_COLUMN,
    "calories",
    "protein",
    "carbs",
    "fats",
];

/// One usable dataset row
#[derive(Clone, Debug, PartialEq)]
pub struct MealRecord {
    pub meal_description: String,
    pub meal_type: String,
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fats: f64,
}

impl MealRecord {
    pub fn target(&self, metric: NutritionMetric) -> f64 {
        match metric {
            NutritionMetric::Calories => self.calories,
            NutritionMetric::Protein => self.protein,
            NutritionMetric::Carbs => self.carbs,
            NutritionMetric::Fats => self.fats,
        }
    }

    /// Description and meal type joined by a single space
    pub fn text(&self) -> String {
        meal_text(&self.meal_description, &self.meal_type)
    }
}

/// Loaded meal dataset
#[derive(Clone, Debug, Default)]
pub struct NutritionDataset {
    pub records: Vec<MealRecord>,
}

impl NutritionDataset {
    pub fn new(records: Vec<MealRecord>) -> Self {
        Self { records }
    }

    /// Load dataset from a CSV file with a header row.
    ///
    /// Rows with a missing or empty field are skipped. A zero-row result is
    /// rejected.
    pub fn from_csv<P: AsRef<Path>>(path: P) -> Result<Self, TrainerError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|err| TrainerError::access(path, err))?;

        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(file);

        let headers = reader
            .headers()
            .map_err(|err| csv_error(path, err))?
            .clone();

        if headers.iter().all(|h| h.is_empty()) {
            return Err(TrainerError::DataQuality(format!(
                "{} is empty",
                path.display()
            )));
        }

        let mut columns = [0usize; REQUIRED_COLUMNS.len()];
        let mut missing = Vec::new();
        for (slot, name) in columns.iter_mut().zip(REQUIRED_COLUMNS) {
            match headers.iter().position(|h| h == name) {
                Some(idx) => *slot = idx,
                None => missing.push(name.to_string()),
            }
        }
        if !missing.is_empty() {
            return Err(TrainerError::Schema { missing });
        }

        let mut records = Vec::new();
        let mut skipped = 0usize;

        for (row_idx, row) in reader.records().enumerate() {
            let row = row.map_err(|err| csv_error(path, err))?;
            // Header is line 1
            let line = row_idx + 2;

            let fields: Vec<&str> = columns
                .iter()
                .map(|&idx| row.get(idx).unwrap_or(""))
                .collect();

            if let Some(pos) = fields.iter().position(|f| f.is_empty()) {
                debug!("Line {}: empty {} field", line, REQUIRED_COLUMNS[pos]);
                skipped += 1;
                continue;
            }

            let mut values = [0.0f64; 4];
            for (i, value) in values.iter_mut().enumerate() {
                let raw = fields[i + 2];
                *value = raw.parse::<f64>().map_err(|_| {
                    TrainerError::DataQuality(format!(
                        "line {}, column {}: invalid number {:?}",
                        line,
                        REQUIRED_COLUMNS[i + 2],
                        raw
                    ))
                })?;
            }

            // NaN and infinities count as missing values
            if let Some(pos) = values.iter().position(|v| !v.is_finite()) {
                debug!("Line {}: non-finite {} value", line, REQUIRED_COLUMNS[pos + 2]);
                skipped += 1;
                continue;
            }

            records.push(MealRecord {
                meal_description: fields[0].to_string(),
                meal_type: fields[1].to_string(),
                calories: values[0],
                protein: values[1],
                carbs: values[2],
                fats: values[3],
            });
        }

        if skipped > 0 {
            warn!("Skipped {} incomplete rows", skipped);
        }

        if records.is_empty() {
            return Err(TrainerError::DataQuality(format!(
                "{} contains no usable records",
                path.display()
            )));
        }

        info!("Loaded {} samples", records.len());
        Ok(Self { records })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Derived text field per record
    pub fn texts(&self) -> Vec<String> {
        self.records.iter().map(MealRecord::text).collect()
    }

    /// Target column for `metric`
    pub fn targets(&self, metric: NutritionMetric) -> Vec<f64> {
        self.records.iter().map(|r| r.target(metric)).collect()
    }
}

fn csv_error(path: &Path, err: csv::Error) -> TrainerError {
    if err.is_io_error() {
        if let csv::ErrorKind::Io(io) = err.into_kind() {
            return TrainerError::access(path, io);
        }
        return TrainerError::DataQuality(format!("{}: unreadable CSV", path.display()));
    }
    TrainerError::DataQuality(format!("{}: {}", path.display(), err))
}
