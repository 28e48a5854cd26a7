//! Dataset loading: the one-shot repository fetch and the store that holds the result.

pub mod repository;
pub mod store;

pub use repository::{RawDataset, SalesRepository};
pub use store::{LoadStatus, SalesSnapshot, SalesStore};
