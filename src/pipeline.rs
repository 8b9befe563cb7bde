//! Очистка набора: дубликаты, затем выбросы по колонкам

use serde::{Deserialize, Serialize};

use crate::config::PipelineConfig;
use crate::error::Result;
use crate::preprocessing::{Deduplicator, OutlierFilter, OutlierReport};
use crate::types::Dataset;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CleaningReport {
    pub initial_rows: usize,
    pub duplicates_removed: usize,
    pub outliers: Vec<OutlierReport>,
    pub final_rows: usize,
}

pub struct DatasetCleaner {
    columns: Vec<String>,
    filter: OutlierFilter,
}

impl DatasetCleaner {
    pub fn new(columns: Vec<String>, multiplier: f64) -> Self {
        Self {
            columns,
            filter: OutlierFilter::new(multiplier),
        }
    }

    pub fn from_config(config: &PipelineConfig) -> Self {
        Self::new(config.outlier_columns.clone(), config.iqr_multiplier)
    }

    pub fn clean(&self, dataset: &Dataset) -> Result<(Dataset, CleaningReport)> {
        let initial_rows = dataset.len();

        let (deduped, duplicates_removed) = Deduplicator::deduplicate(dataset);
        if duplicates_removed > 0 {
            tracing::info!("Removed {} duplicate rows.", duplicates_removed);
        }

        let (cleaned, outliers) = self.filter.filter_sequential(&deduped, &self.columns)?;
        for report in &outliers {
            match report.bounds {
                Some(b) => tracing::info!(
                    "Removed {} outliers from '{}' (Range: {:.2} - {:.2})",
                    report.removed,
                    report.column,
                    b.lower,
                    b.upper
                ),
                None => tracing::warn!("No values left to filter in '{}'", report.column),
            }
        }

        tracing::info!(
            "Final dataset size: {} (Reduced from {})",
            cleaned.len(),
            initial_rows
        );

        let report = CleaningReport {
            initial_rows,
            duplicates_removed,
            outliers,
            final_rows: cleaned.len(),
        };
        Ok((cleaned, report))
    }
}

impl Default for DatasetCleaner {
    fn default() -> Self {
        Self::from_config(&PipelineConfig::default())
    }
}
