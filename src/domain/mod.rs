//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - the dataset shape (`Product`, `SaleRecord`, `Review`)
//! - table ordering (`SortKey`, `SortDirection`, `SortDirective`, `request_sort`)
//! - run configuration (`DataSource`, `DashboardConfig`)

pub mod types;

pub use types::*;
