//! `sales-dash` library crate.
//!
//! The binary (`sales`) is a thin wrapper around this library so that:
//!
//! - sorting, smoothing and formatting are testable without a terminal
//! - the CLI and the TUI share one pipeline
//! - code stays easy to navigate as the project grows

pub mod analytics;
pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod io;
pub mod logging;
pub mod plot;
pub mod report;
pub mod tui;
