//! Фильтрация выбросов по межквартильному размаху (IQR)
//!
//! Квантили считаются линейной интерполяцией между порядковыми
//! статистиками: `pos = q * (n - 1)`, значение между `v[floor(pos)]`
//! и `v[ceil(pos)]`.
//!
//! Колонки фильтруются последовательно: границы для второй колонки
//! считаются уже по результату фильтра первой, а не по исходным данным.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::types::Dataset;

pub struct Quantile;

impl Quantile {
    /// `sorted` должен быть отсортирован по возрастанию и без NaN
    pub fn linear(sorted: &[f64], q: f64) -> Option<f64> {
        if sorted.is_empty() {
            return None;
        }

        let pos = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
        let lo = pos.floor() as usize;
        let hi = pos.ceil() as usize;
        let frac = pos - lo as f64;

        Some(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IqrBounds {
    pub q1: f64,
    pub q3: f64,
    pub iqr: f64,
    pub lower: f64,
    pub upper: f64,
}

impl IqrBounds {
    /// `None`, если нет ни одного значения (NaN пропускаются)
    pub fn compute(values: &[f64], multiplier: f64) -> Option<IqrBounds> {
        let mut sorted: Vec<f64> = values.iter().copied().filter(|v| !v.is_nan()).collect();
        sorted.sort_by(f64::total_cmp);

        let q1 = Quantile::linear(&sorted, 0.25)?;
        let q3 = Quantile::linear(&sorted, 0.75)?;
        let iqr = q3 - q1;

        Some(IqrBounds {
            q1,
            q3,
            iqr,
            lower: q1 - multiplier * iqr,
            upper: q3 + multiplier * iqr,
        })
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.lower && value <= self.upper
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutlierReport {
    pub column: String,
    pub bounds: Option<IqrBounds>,
    pub removed: usize,
}

pub struct OutlierFilter {
    multiplier: f64,
}

impl OutlierFilter {
    pub fn new(multiplier: f64) -> Self {
        Self { multiplier }
    }

    /// Оставляет строки, у которых значение колонки лежит в `[lower, upper]`.
    /// Строки с пропуском в колонке отбрасываются.
    pub fn filter(&self, dataset: &Dataset, column: &str) -> Result<(Dataset, OutlierReport)> {
        let values = dataset.numeric_column(column)?;
        let bounds = IqrBounds::compute(&values, self.multiplier);

        let rows: Vec<Vec<String>> = match bounds {
            Some(b) => dataset
                .rows()
                .iter()
                .zip(&values)
                .filter(|&(_, &v)| b.contains(v))
                .map(|(row, _)| row.clone())
                .collect(),
            None => Vec::new(),
        };

        let report = OutlierReport {
            column: column.to_string(),
            bounds,
            removed: dataset.len() - rows.len(),
        };
        Ok((dataset.with_rows(rows), report))
    }

    /// Фильтры по колонкам в заданном порядке, каждый по выходу предыдущего
    pub fn filter_sequential<S: AsRef<str>>(
        &self,
        dataset: &Dataset,
        columns: &[S],
    ) -> Result<(Dataset, Vec<OutlierReport>)> {
        let mut current = dataset.clone();
        let mut reports = Vec::with_capacity(columns.len());

        for column in columns {
            let (next, report) = self.filter(&current, column.as_ref())?;
            current = next;
            reports.push(report);
        }

        Ok((current, reports))
    }
}

impl Default for OutlierFilter {
    fn default() -> Self {
        Self::new(1.5)
    }
}
