//! Pure computations over loaded sales data: chart smoothing and table ordering.
//!
//! Nothing in here holds state; callers pass a snapshot in and get new values back.

pub mod smoothing;
pub mod sorting;

pub use smoothing::*;
pub use sorting::*;
