/// Типы данных для подготовки набора данных о ценах на жильё

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{PipelineError, Result};

pub const PRICE: &str = "price";
pub const AREA: &str = "area";
pub const BEDROOMS: &str = "bedrooms";
pub const LOCATION: &str = "location";
pub const LOCATION_SCORE: &str = "location_score";

/// Таблица в памяти: заголовок и строки как есть.
///
/// Колонки, о которых конвейер ничего не знает, переносятся без изменений.
/// Каждая стадия возвращает новый `Dataset`, вход не меняется.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Dataset {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { headers, rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Новый набор с тем же заголовком
    pub fn with_rows(&self, rows: Vec<Vec<String>>) -> Dataset {
        Dataset {
            headers: self.headers.clone(),
            rows,
        }
    }

    pub fn column_index(&self, name: &str) -> Result<usize> {
        self.headers
            .iter()
            .position(|h| h.trim() == name)
            .ok_or_else(|| PipelineError::MissingColumn(name.to_string()))
    }

    /// Числовая колонка; пустые ячейки и "nan" дают `f64::NAN`.
    pub fn numeric_column(&self, name: &str) -> Result<Vec<f64>> {
        let idx = self.column_index(name)?;
        self.rows
            .iter()
            .enumerate()
            .map(|(row, cells)| parse_number(name, row, cell(cells, idx)))
            .collect()
    }

    /// Перезаписывает колонку, если она есть, иначе добавляет в конец.
    pub fn set_column(&mut self, name: &str, values: Vec<String>) -> Result<()> {
        if values.len() != self.rows.len() {
            return Err(PipelineError::InvalidInput(format!(
                "column '{}' has {} values for {} rows",
                name,
                values.len(),
                self.rows.len()
            )));
        }

        match self.column_index(name) {
            Ok(idx) => {
                for (row, value) in self.rows.iter_mut().zip(values) {
                    if row.len() <= idx {
                        row.resize(idx + 1, String::new());
                    }
                    row[idx] = value;
                }
            }
            Err(_) => {
                let idx = self.headers.len();
                self.headers.push(name.to_string());
                for (row, value) in self.rows.iter_mut().zip(values) {
                    row.resize(idx, String::new());
                    row.push(value);
                }
            }
        }

        Ok(())
    }

    /// Типизированное представление строк
    pub fn records(&self) -> Result<Vec<HouseRecord>> {
        let prices = self.numeric_column(PRICE)?;
        let areas = self.numeric_column(AREA)?;
        let bedrooms_idx = self.column_index(BEDROOMS)?;
        let location_idx = self.column_index(LOCATION).ok();
        let score_idx = self.column_index(LOCATION_SCORE).ok();

        let mut records = Vec::with_capacity(self.rows.len());
        for (row, cells) in self.rows.iter().enumerate() {
            let bedrooms = parse_integer(BEDROOMS, row, cell(cells, bedrooms_idx))?;
            let location = match location_idx {
                Some(idx) => Some(cell(cells, idx).parse::<Location>()?),
                None => None,
            };
            let location_score = match score_idx {
                Some(idx) => Some(parse_integer(LOCATION_SCORE, row, cell(cells, idx))?),
                None => None,
            };

            records.push(HouseRecord {
                price: prices[row],
                area: areas[row],
                bedrooms,
                location,
                location_score,
            });
        }

        Ok(records)
    }
}

fn cell(cells: &[String], idx: usize) -> &str {
    cells.get(idx).map(|c| c.trim()).unwrap_or("")
}

fn parse_number(column: &str, row: usize, value: &str) -> Result<f64> {
    if value.is_empty() {
        return Ok(f64::NAN);
    }
    value.parse::<f64>().map_err(|_| PipelineError::InvalidValue {
        column: column.to_string(),
        row,
        value: value.to_string(),
    })
}

fn parse_integer(column: &str, row: usize, value: &str) -> Result<i64> {
    let invalid = || PipelineError::InvalidValue {
        column: column.to_string(),
        row,
        value: value.to_string(),
    };

    if let Ok(v) = value.parse::<i64>() {
        return Ok(v);
    }
    // целые колонки с пропусками часто выгружаются как "3.0"
    let v = value.parse::<f64>().map_err(|_| invalid())?;
    // `as i64` насыщается, поэтому диапазон проверяется явно
    if v.is_finite() && v.fract() == 0.0 && v.abs() < i64::MAX as f64 {
        Ok(v as i64)
    } else {
        Err(invalid())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HouseRecord {
    pub price: f64,
    pub area: f64,
    pub bedrooms: i64,
    pub location: Option<Location>,
    pub location_score: Option<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Location {
    #[serde(rename = "New York")]
    NewYork,
    Florida,
    Atlanta,
}

impl Location {
    /// Порядок, в котором метки участвуют в случайном выборе
    pub const ALL: [Location; 3] = [Location::NewYork, Location::Atlanta, Location::Florida];

    pub fn score(self) -> i64 {
        match self {
            Location::NewYork => 9,
            Location::Florida => 8,
            Location::Atlanta => 7,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Location::NewYork => "New York",
            Location::Florida => "Florida",
            Location::Atlanta => "Atlanta",
        }
    }

    /// Пункт меню консольного предсказателя: 1, 2 или 3
    pub fn from_choice(choice: &str) -> Option<Location> {
        match choice.trim() {
            "1" => Some(Location::NewYork),
            "2" => Some(Location::Florida),
            "3" => Some(Location::Atlanta),
            _ => None,
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Location {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "New York" => Ok(Location::NewYork),
            "Florida" => Ok(Location::Florida),
            "Atlanta" => Ok(Location::Atlanta),
            other => Err(PipelineError::UnknownLocation(other.to_string())),
        }
    }
}

/// Способ назначения локаций
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum LocationPolicy {
    /// Равномерный случайный выбор с фиксированным seed
    Random,
    /// Сегменты по возрастанию цены: дешёвые -> Atlanta, дорогие -> New York
    PriceRank,
}
