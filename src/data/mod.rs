//! Data module - CSV loading, cleaning and reshaping

mod loader;
mod processor;

pub use loader::{
    CleanedDataset, DataLoader, LoaderError, Observation, AGGREGATE_AREA, REQUIRED_COLUMNS,
};
pub use processor::{DataProcessor, Fuel, MixRow, ProcessorError};
