//! Feature engineering для регрессии цены

use ndarray::{Array1, Array2};

use crate::error::{PipelineError, Result};
use crate::types::{Dataset, Location, AREA, BEDROOMS, LOCATION_SCORE};

/// Порядок признаков в матрице
pub const FEATURE_NAMES: [&str; 3] = [AREA, BEDROOMS, LOCATION_SCORE];

pub struct FeatureEngineer;

impl FeatureEngineer {
    /// Матрица признаков (area, bedrooms, location_score) и цель price
    pub fn regression_features(dataset: &Dataset) -> Result<(Array2<f64>, Array1<f64>)> {
        if dataset.is_empty() {
            return Err(PipelineError::InsufficientData {
                needed: 1,
                actual: 0,
            });
        }

        let records = dataset.records()?;
        let n_samples = records.len();
        let n_features = FEATURE_NAMES.len();

        let mut features = Array2::zeros((n_samples, n_features));
        let mut targets = Array1::zeros(n_samples);

        for (i, record) in records.iter().enumerate() {
            let score = record
                .location_score
                .ok_or_else(|| PipelineError::MissingColumn(LOCATION_SCORE.to_string()))?;

            features[[i, 0]] = record.area;
            features[[i, 1]] = record.bedrooms as f64;
            features[[i, 2]] = score as f64;

            targets[i] = record.price;
        }

        // Пропуски в модель не попадают
        if features.iter().chain(targets.iter()).any(|v| !v.is_finite()) {
            return Err(PipelineError::InvalidInput(
                "price/area must not contain missing values".to_string(),
            ));
        }

        Ok((features, targets))
    }

    /// Одна строка признаков для предсказания
    pub fn single(area: f64, bedrooms: i64, location: Location) -> Array2<f64> {
        let mut features = Array2::zeros((1, FEATURE_NAMES.len()));
        features[[0, 0]] = area;
        features[[0, 1]] = bedrooms as f64;
        features[[0, 2]] = location.score() as f64;
        features
    }
}
