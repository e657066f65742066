//! HTTP clients for the stock service endpoints

pub mod catalog;
pub mod prediction;

pub use catalog::{CatalogClient, CatalogSource, StockItem};
pub use prediction::{ChartPoint, Prediction, PredictionClient};
