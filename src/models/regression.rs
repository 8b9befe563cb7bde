//! Линейная модель цены: area, bedrooms, location_score -> price

use std::collections::BTreeMap;
use std::fs::File;
use std::path::Path;

use linfa::prelude::*;
use linfa_linear::{FittedLinearRegression, LinearRegression};
use ndarray::{Array1, Array2, Axis};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::config::PipelineConfig;
use crate::error::{PipelineError, Result};
use crate::preprocessing::{FeatureEngineer, FEATURE_NAMES};
use crate::types::{Dataset, Location};

/// Меньше строк - МНК на трёх признаках с разбиением 80/20 не имеет смысла
pub const MIN_TRAINING_ROWS: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelReport {
    pub intercept: f64,
    pub coefficients: BTreeMap<String, f64>,
    pub rmse: f64,
    pub train_rows: usize,
    pub test_rows: usize,
}

impl ModelReport {
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path.as_ref())?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }
}

pub struct PricePredictor {
    model: FittedLinearRegression<f64>,
}

impl PricePredictor {
    /// Обучает модель на всех строках и оценивает RMSE отдельной моделью,
    /// обученной на train-части разбиения.
    pub fn train(dataset: &Dataset, config: &PipelineConfig) -> Result<(PricePredictor, ModelReport)> {
        let (x, y) = FeatureEngineer::regression_features(dataset)?;
        if x.nrows() < MIN_TRAINING_ROWS {
            return Err(PipelineError::InsufficientData {
                needed: MIN_TRAINING_ROWS,
                actual: x.nrows(),
            });
        }

        let model = fit(&x, &y)?;

        // Оценка качества на отложенной выборке
        let (x_train, x_test, y_train, y_test) =
            train_test_split(&x, &y, config.test_size, config.split_seed)?;
        let eval_model = fit(&x_train, &y_train)?;
        let y_pred = eval_model.predict(&x_test);
        let rmse = rmse(&y_test, &y_pred);

        tracing::info!("Price model trained on {} rows. RMSE: {:.2}", x.nrows(), rmse);

        let coefficients = FEATURE_NAMES
            .iter()
            .zip(model.params().iter())
            .map(|(name, w)| (name.to_string(), *w))
            .collect();

        let report = ModelReport {
            intercept: model.intercept(),
            coefficients,
            rmse,
            train_rows: x_train.nrows(),
            test_rows: x_test.nrows(),
        };

        Ok((PricePredictor { model }, report))
    }

    pub fn predict(&self, area: f64, bedrooms: i64, location: Location) -> f64 {
        let features = FeatureEngineer::single(area, bedrooms, location);
        self.model.predict(&features)[0]
    }
}

fn fit(x: &Array2<f64>, y: &Array1<f64>) -> Result<FittedLinearRegression<f64>> {
    let dataset = linfa::Dataset::new(x.clone(), y.clone());
    LinearRegression::new()
        .fit(&dataset)
        .map_err(|e| PipelineError::Model(e.to_string()))
}

/// Перемешивание с фиксированным seed; в тест уходит `ceil(test_size * n)` строк
pub fn train_test_split(
    x: &Array2<f64>,
    y: &Array1<f64>,
    test_size: f64,
    seed: u64,
) -> Result<(Array2<f64>, Array2<f64>, Array1<f64>, Array1<f64>)> {
    let n = x.nrows();
    let n_test = (test_size * n as f64).ceil() as usize;
    if n < 2 || n_test == 0 || n_test >= n {
        return Err(PipelineError::InsufficientData {
            needed: 2,
            actual: n,
        });
    }

    let mut indices: Vec<usize> = (0..n).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    indices.shuffle(&mut rng);

    let (test_idx, train_idx) = indices.split_at(n_test);

    Ok((
        x.select(Axis(0), train_idx),
        x.select(Axis(0), test_idx),
        y.select(Axis(0), train_idx),
        y.select(Axis(0), test_idx),
    ))
}

pub fn rmse(y_true: &Array1<f64>, y_pred: &Array1<f64>) -> f64 {
    let diff = y_true - y_pred;
    diff.mapv(|d| d * d).mean().unwrap_or(0.0).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::DataLoader;
    use ndarray::array;

    /// price = 100 * area + 5000 * bedrooms + 20000 * score + 1000
    fn linear_dataset(n: usize) -> Dataset {
        let mut csv = String::from("price,area,bedrooms,location,location_score\n");
        for i in 0..n {
            let area = 1000.0 + (i * 137 % 900) as f64;
            let bedrooms = 1 + (i * 7 % 5) as i64;
            let location = Location::ALL[i % 3];
            let price = 100.0 * area
                + 5000.0 * bedrooms as f64
                + 20000.0 * location.score() as f64
                + 1000.0;
            csv.push_str(&format!(
                "{},{},{},{},{}\n",
                price,
                area,
                bedrooms,
                location.label(),
                location.score()
            ));
        }
        DataLoader::read(csv.as_bytes()).unwrap()
    }

    #[test]
    fn test_recovers_linear_relationship() {
        let ds = linear_dataset(40);
        let (model, report) = PricePredictor::train(&ds, &PipelineConfig::default()).unwrap();

        assert!((report.coefficients["area"] - 100.0).abs() < 1e-4);
        assert!((report.coefficients["bedrooms"] - 5000.0).abs() < 1e-2);
        assert!((report.coefficients["location_score"] - 20000.0).abs() < 1e-2);
        assert!(report.rmse < 1.0);
        assert_eq!(report.test_rows, 8);
        assert_eq!(report.train_rows, 32);

        let expected = 100.0 * 5000.0 + 5000.0 * 3.0 + 20000.0 * 9.0 + 1000.0;
        let predicted = model.predict(5000.0, 3, Location::NewYork);
        assert!((predicted - expected).abs() < 1.0);
    }

    #[test]
    fn test_too_few_rows() {
        let ds = linear_dataset(5);
        assert!(matches!(
            PricePredictor::train(&ds, &PipelineConfig::default()),
            Err(PipelineError::InsufficientData { needed: 10, actual: 5 })
        ));
    }

    #[test]
    fn test_split_is_seeded_and_disjoint() {
        let x = Array2::from_shape_fn((10, 1), |(i, _)| i as f64);
        let y = Array1::from_shape_fn(10, |i| i as f64);

        let (x_train, x_test, y_train, y_test) = train_test_split(&x, &y, 0.2, 42).unwrap();
        assert_eq!(x_test.nrows(), 2);
        assert_eq!(x_train.nrows(), 8);
        assert_eq!(x_train.column(0).to_vec(), y_train.to_vec());
        assert_eq!(x_test.column(0).to_vec(), y_test.to_vec());

        let mut all: Vec<f64> = y_train.iter().chain(y_test.iter()).copied().collect();
        all.sort_by(f64::total_cmp);
        assert_eq!(all, (0..10).map(|i| i as f64).collect::<Vec<_>>());

        let (_, again, _, _) = train_test_split(&x, &y, 0.2, 42).unwrap();
        assert_eq!(x_test, again);
    }

    #[test]
    fn test_rmse() {
        let y_true = array![1.0, 2.0, 3.0, 4.0];
        let y_pred = array![1.0, 2.0, 3.0, 6.0];
        assert_eq!(rmse(&y_true, &y_pred), 1.0);
    }

    #[test]
    fn test_report_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");
        let (_, report) =
            PricePredictor::train(&linear_dataset(20), &PipelineConfig::default()).unwrap();
        report.save(&path).unwrap();

        let loaded: ModelReport =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(loaded.train_rows, report.train_rows);
        assert_eq!(loaded.coefficients.len(), 3);
    }
}
