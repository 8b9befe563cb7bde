/// ML модели

pub mod regression;

pub use regression::{rmse, train_test_split, ModelReport, PricePredictor};
