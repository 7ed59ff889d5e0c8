pub mod calculations;
pub mod dataset;
pub mod models;

pub use dataset::{CostDataset, DatasetError, InMemoryDataset};
pub use models::*;
