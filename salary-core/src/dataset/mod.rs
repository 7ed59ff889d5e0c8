pub mod memory;
pub mod repository;

pub use memory::InMemoryDataset;
pub use repository::{CostDataset, DatasetError};
