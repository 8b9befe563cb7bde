//! Настройки конвейера

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{PipelineError, Result};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Колонки фильтра выбросов, применяются по очереди
    #[serde(default = "default_outlier_columns")]
    pub outlier_columns: Vec<String>,
    #[serde(default = "default_iqr_multiplier")]
    pub iqr_multiplier: f64,
    #[serde(default = "default_seed")]
    pub location_seed: u64,
    #[serde(default = "default_seed")]
    pub split_seed: u64,
    #[serde(default = "default_test_size")]
    pub test_size: f64,
    #[serde(default = "default_raw_file")]
    pub raw_file: String,
    #[serde(default = "default_cleaned_file")]
    pub cleaned_file: String,
    #[serde(default = "default_final_file")]
    pub final_file: String,
    #[serde(default = "default_augmented_file")]
    pub augmented_file: String,
}

fn default_outlier_columns() -> Vec<String> { vec!["price".to_string(), "area".to_string()] }
fn default_iqr_multiplier() -> f64 { 1.5 }
fn default_seed() -> u64 { 42 }
fn default_test_size() -> f64 { 0.2 }
fn default_raw_file() -> String { "house_prices.csv".to_string() }
fn default_cleaned_file() -> String { "house_prices_cleaned.csv".to_string() }
fn default_final_file() -> String { "house_prices_final.csv".to_string() }
fn default_augmented_file() -> String { "house_prices_with_location_score.csv".to_string() }

impl PipelineConfig {
    /// Загрузка из JSON; отсутствующие поля берутся по умолчанию
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => PipelineError::MissingInput {
                path: path.display().to_string(),
            },
            _ => PipelineError::Io(e),
        })?;

        let config: PipelineConfig = serde_json::from_str(&content)?;
        if !(config.test_size > 0.0 && config.test_size < 1.0) {
            return Err(PipelineError::InvalidInput(format!(
                "test_size must be in (0, 1), got {}",
                config.test_size
            )));
        }
        if !(config.iqr_multiplier >= 0.0 && config.iqr_multiplier.is_finite()) {
            return Err(PipelineError::InvalidInput(format!(
                "iqr_multiplier must be a non-negative number, got {}",
                config.iqr_multiplier
            )));
        }
        Ok(config)
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            outlier_columns: default_outlier_columns(),
            iqr_multiplier: default_iqr_multiplier(),
            location_seed: default_seed(),
            split_seed: default_seed(),
            test_size: default_test_size(),
            raw_file: default_raw_file(),
            cleaned_file: default_cleaned_file(),
            final_file: default_final_file(),
            augmented_file: default_augmented_file(),
        }
    }
}
