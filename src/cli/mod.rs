//! Command-line parsing for the sales dashboard.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the sorting/smoothing/formatting code.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::domain::SortKey;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "sales", version, about = "Product sales dashboard (terminal)")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Launch the interactive dashboard.
    Tui(SourceArgs),
    /// Print the sales table, optionally sorted, and optionally export it to CSV.
    Table(TableArgs),
    /// Print an ASCII chart of the smoothed retail and wholesale sales.
    Chart(ChartArgs),
    /// Print the product summary panel.
    Summary(SourceArgs),
}

/// Options shared by every command.
#[derive(Debug, Args, Clone)]
pub struct SourceArgs {
    /// Dataset location: a JSON file path, an http(s) URL, or `bundled`.
    ///
    /// Falls back to `SALES_DATA_SOURCE`, then to the bundled sample.
    #[arg(short = 's', long)]
    pub source: Option<String>,

    /// Moving-average window (weeks) for the chart.
    ///
    /// Falls back to `SALES_SMOOTHING_WINDOW`, then 4.
    #[arg(short = 'w', long, allow_negative_numbers = true)]
    pub window: Option<i64>,
}

#[derive(Debug, Args, Clone)]
pub struct TableArgs {
    #[command(flatten)]
    pub common: SourceArgs,

    /// Column to sort by (insertion order when omitted).
    #[arg(long, value_enum)]
    pub sort: Option<SortKey>,

    /// Sort descending instead of ascending.
    #[arg(long, requires = "sort")]
    pub desc: bool,

    /// Export the printed rows to CSV.
    #[arg(long)]
    pub export: Option<PathBuf>,
}

#[derive(Debug, Args, Clone)]
pub struct ChartArgs {
    #[command(flatten)]
    pub common: SourceArgs,

    /// Plot width (columns).
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 20)]
    pub height: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_flags_parse() {
        let cli = Cli::parse_from([
            "sales", "table", "--sort", "retailSales", "--desc", "--export", "out.csv", "-w", "6",
        ]);
        let Command::Table(args) = cli.command else {
            panic!("expected table command");
        };
        assert_eq!(args.sort, Some(SortKey::RetailSales));
        assert!(args.desc);
        assert_eq!(args.export, Some(PathBuf::from("out.csv")));
        assert_eq!(args.common.window, Some(6));
    }

    #[test]
    fn unknown_sort_column_is_rejected() {
        let res = Cli::try_parse_from(["sales", "table", "--sort", "price"]);
        assert!(res.is_err());
    }

    #[test]
    fn negative_window_reaches_validation() {
        let cli = Cli::parse_from(["sales", "chart", "--window", "-1"]);
        let Command::Chart(args) = cli.command else {
            panic!("expected chart command");
        };
        assert_eq!(args.common.window, Some(-1));
    }
}
