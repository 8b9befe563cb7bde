//! Ошибки конвейера подготовки данных

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Input file not found: {path}")]
    MissingInput { path: String },

    #[error("Required column '{0}' is missing")]
    MissingColumn(String),

    #[error("Invalid value '{value}' in column '{column}' at row {row}")]
    InvalidValue {
        column: String,
        row: usize,
        value: String,
    },

    #[error("Unknown location: '{0}'")]
    UnknownLocation(String),

    #[error("Not enough rows: need at least {needed}, got {actual}")]
    InsufficientData { needed: usize, actual: usize },

    #[error("Model error: {0}")]
    Model(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, PipelineError>;
