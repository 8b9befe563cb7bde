/// Модуль предобработки данных

pub mod deduplication;
pub mod feature_engineering;
pub mod location;
pub mod outliers;

pub use deduplication::Deduplicator;
pub use feature_engineering::{FeatureEngineer, FEATURE_NAMES};
pub use location::LocationAssigner;
pub use outliers::{IqrBounds, OutlierFilter, OutlierReport, Quantile};
