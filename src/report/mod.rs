//! Presentation formatting: table cells, chart ticks, and text reports.
//!
//! We keep formatting code in one place so:
//! - the sorting/smoothing code stays free of display concerns
//! - output changes are localized (the TUI and the CLI share every cell format)

pub mod format;

pub use format::*;
