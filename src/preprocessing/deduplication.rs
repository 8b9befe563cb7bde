//! Удаление полных дубликатов

use std::collections::HashSet;

use crate::types::Dataset;

/// Ключ ячейки: число для числовых колонок, текст для остальных
#[derive(Debug, PartialEq, Eq, Hash)]
enum CellKey<'a> {
    Number(u64),
    Text(&'a str),
}

pub struct Deduplicator;

impl Deduplicator {
    /// Оставляет первое вхождение каждой строки, порядок сохраняется.
    ///
    /// Колонка считается числовой, если каждая непустая ячейка в ней
    /// читается как число; такие ячейки сравниваются по значению
    /// (`100` и `100.0` совпадают, пустые ячейки равны между собой).
    /// Остальные сравниваются как текст без окружающих пробелов.
    pub fn deduplicate(dataset: &Dataset) -> (Dataset, usize) {
        let numeric = Self::numeric_columns(dataset);
        let mut seen: HashSet<Vec<CellKey>> = HashSet::with_capacity(dataset.len());
        let mut rows = Vec::with_capacity(dataset.len());

        for row in dataset.rows() {
            let key: Vec<CellKey> = row
                .iter()
                .enumerate()
                .map(|(i, c)| Self::cell_key(c.trim(), numeric.get(i).copied().unwrap_or(false)))
                .collect();
            if seen.insert(key) {
                rows.push(row.clone());
            }
        }

        let removed = dataset.len() - rows.len();
        (dataset.with_rows(rows), removed)
    }

    fn numeric_columns(dataset: &Dataset) -> Vec<bool> {
        (0..dataset.headers().len())
            .map(|i| {
                dataset.rows().iter().all(|row| {
                    let cell = row.get(i).map(|c| c.trim()).unwrap_or("");
                    cell.is_empty() || cell.parse::<f64>().is_ok()
                })
            })
            .collect()
    }

    fn cell_key(cell: &str, numeric: bool) -> CellKey<'_> {
        if !numeric {
            return CellKey::Text(cell);
        }
        let value = if cell.is_empty() {
            f64::NAN
        } else {
            cell.parse::<f64>().unwrap_or(f64::NAN)
        };
        // один NaN на всех, -0.0 == 0.0
        let bits = if value.is_nan() {
            f64::NAN.to_bits()
        } else if value == 0.0 {
            0.0f64.to_bits()
        } else {
            value.to_bits()
        };
        CellKey::Number(bits)
    }
}
