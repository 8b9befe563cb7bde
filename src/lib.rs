//! House price - очистка данных о жилье, признак локации и линейная модель цены

pub mod config;
pub mod console;
pub mod error;
pub mod io;
pub mod models;
pub mod pipeline;
pub mod preprocessing;
pub mod types;

pub use config::PipelineConfig;
pub use error::{PipelineError, Result};
pub use io::DataLoader;
pub use models::*;
pub use pipeline::{CleaningReport, DatasetCleaner};
pub use preprocessing::*;
pub use types::*;
