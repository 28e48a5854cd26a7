//! Shared domain types.
//!
//! These types mirror the JSON dataset the dashboard loads, so they derive
//! serde traits with camelCase field names:
//!
//! - `Product` carries display metadata plus the weekly `sales`
//! - `SaleRecord` is one table row / one chart sample
//! - `SortKey` / `SortDirective` describe the table ordering

use std::path::PathBuf;
use std::str::FromStr;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// One week of sales for a product.
///
/// Records have no identity field; they are addressed by position, so any
/// reordering moves whole records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleRecord {
    /// ISO-8601 calendar date (`YYYY-MM-DD`).
    pub week_ending: String,
    pub retail_sales: f64,
    pub wholesale_sales: f64,
    pub units_sold: u64,
    /// May be negative.
    pub retailer_margin: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub customer: String,
    pub review: String,
    pub score: f64,
}

/// Product metadata shown in the side panel.
///
/// The core never reads these fields; only views do.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Product {
    pub id: String,
    pub title: String,
    pub image: String,
    pub subtitle: String,
    pub brand: String,
    pub reviews: Vec<Review>,
    pub retailer: String,
    pub details: Vec<String>,
    pub tags: Vec<String>,
    pub sales: Vec<SaleRecord>,
}

/// Sortable table column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "camelCase")]
pub enum SortKey {
    #[value(name = "weekEnding")]
    WeekEnding,
    #[value(name = "retailSales")]
    RetailSales,
    #[value(name = "wholesaleSales")]
    WholesaleSales,
    #[value(name = "unitsSold")]
    UnitsSold,
    #[value(name = "retailerMargin")]
    RetailerMargin,
}

impl SortKey {
    /// Columns in table order.
    pub const ALL: [SortKey; 5] = [
        SortKey::WeekEnding,
        SortKey::RetailSales,
        SortKey::WholesaleSales,
        SortKey::UnitsSold,
        SortKey::RetailerMargin,
    ];

    /// Header text.
    pub fn label(self) -> &'static str {
        match self {
            SortKey::WeekEnding => "Week Ending",
            SortKey::RetailSales => "Retail Sales",
            SortKey::WholesaleSales => "Wholesale Sales",
            SortKey::UnitsSold => "Units Sold",
            SortKey::RetailerMargin => "Retailer Margin",
        }
    }

    /// Field name as it appears in the dataset JSON.
    pub fn field_name(self) -> &'static str {
        match self {
            SortKey::WeekEnding => "weekEnding",
            SortKey::RetailSales => "retailSales",
            SortKey::WholesaleSales => "wholesaleSales",
            SortKey::UnitsSold => "unitsSold",
            SortKey::RetailerMargin => "retailerMargin",
        }
    }

    /// Zero-based table column of this key.
    pub fn column(self) -> usize {
        match self {
            SortKey::WeekEnding => 0,
            SortKey::RetailSales => 1,
            SortKey::WholesaleSales => 2,
            SortKey::UnitsSold => 3,
            SortKey::RetailerMargin => 4,
        }
    }

    /// Map a table column back to its key.
    ///
    /// Column indices come from the view layer and are always in range; an
    /// out-of-range index is a programming error and trips the debug
    /// assertion. Release builds clamp to the last column.
    pub fn from_column(index: usize) -> SortKey {
        debug_assert!(index < Self::ALL.len(), "invalid column index {index}");
        Self::ALL[index.min(Self::ALL.len() - 1)]
    }

    pub fn next(self) -> SortKey {
        Self::ALL[(self.column() + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> SortKey {
        Self::ALL[(self.column() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

impl FromStr for SortKey {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SortKey::ALL
            .into_iter()
            .find(|k| k.field_name() == s)
            .ok_or_else(|| AppError::invalid_argument(format!("Unknown sort column '{s}'.")))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// The column + direction currently ordering the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortDirective {
    pub key: SortKey,
    pub direction: SortDirection,
}

impl SortDirective {
    pub fn ascending(key: SortKey) -> Self {
        Self {
            key,
            direction: SortDirection::Ascending,
        }
    }

    pub fn descending(key: SortKey) -> Self {
        Self {
            key,
            direction: SortDirection::Descending,
        }
    }
}

/// `None` means insertion order.
pub type SortState = Option<SortDirective>;

/// Column-click toggle.
///
/// Selecting the column that is currently ascending flips it to descending;
/// anything else (another column, or the same column while descending)
/// starts ascending on the selected column.
pub fn request_sort(current: SortState, key: SortKey) -> SortDirective {
    match current {
        Some(d) if d.key == key && d.direction == SortDirection::Ascending => {
            SortDirective::descending(key)
        }
        _ => SortDirective::ascending(key),
    }
}

/// Where the dataset comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    /// The sample dataset compiled into the binary.
    Bundled,
    File(PathBuf),
    Url(String),
}

impl DataSource {
    /// Interpret a user-supplied location: `http(s)://` is a URL, anything
    /// else is a file path. `bundled` selects the built-in dataset.
    pub fn parse(raw: &str) -> DataSource {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("bundled") {
            DataSource::Bundled
        } else if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            DataSource::Url(trimmed.to_string())
        } else {
            DataSource::File(PathBuf::from(trimmed))
        }
    }

    pub fn describe(&self) -> String {
        match self {
            DataSource::Bundled => "bundled sample".to_string(),
            DataSource::File(path) => path.display().to_string(),
            DataSource::Url(url) => url.clone(),
        }
    }
}

/// Smoothing window the original dashboard chart uses.
pub const DEFAULT_SMOOTHING_WINDOW: i64 = 4;

/// A full run's configuration as understood by the pipeline.
///
/// This is derived from CLI flags, then `.env`/environment, then defaults.
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    pub source: DataSource,
    pub window: i64,
    pub sort: SortState,
    pub export: Option<PathBuf>,
    pub plot_width: usize,
    pub plot_height: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            source: DataSource::Bundled,
            window: DEFAULT_SMOOTHING_WINDOW,
            sort: None,
            export: None,
            plot_width: 100,
            plot_height: 20,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_follows_column_click_protocol() {
        let d = request_sort(None, SortKey::RetailSales);
        assert_eq!(d, SortDirective::ascending(SortKey::RetailSales));

        let d = request_sort(Some(d), SortKey::RetailSales);
        assert_eq!(d, SortDirective::descending(SortKey::RetailSales));

        // Descending on the same column starts over at ascending.
        let again = request_sort(Some(d), SortKey::RetailSales);
        assert_eq!(again, SortDirective::ascending(SortKey::RetailSales));

        let d = request_sort(Some(d), SortKey::UnitsSold);
        assert_eq!(d, SortDirective::ascending(SortKey::UnitsSold));
    }

    #[test]
    fn sort_key_parses_field_names_only() {
        assert_eq!("unitsSold".parse::<SortKey>().unwrap(), SortKey::UnitsSold);
        assert_eq!("weekEnding".parse::<SortKey>().unwrap(), SortKey::WeekEnding);
        let err = "units_sold".parse::<SortKey>().unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::InvalidArgument);
    }

    #[test]
    fn columns_round_trip_and_wrap() {
        for key in SortKey::ALL {
            assert_eq!(SortKey::from_column(key.column()), key);
        }
        assert_eq!(SortKey::RetailerMargin.next(), SortKey::WeekEnding);
        assert_eq!(SortKey::WeekEnding.prev(), SortKey::RetailerMargin);
    }

    #[test]
    fn sale_record_reads_camel_case_json() {
        let json = r#"{"weekEnding":"2016-01-03","retailSales":348123,"wholesaleSales":255721,"unitsSold":887,"retailerMargin":123294}"#;
        let rec: SaleRecord = serde_json::from_str(json).unwrap();
        assert_eq!(rec.week_ending, "2016-01-03");
        assert_eq!(rec.units_sold, 887);
        assert_eq!(rec.retailer_margin, 123294.0);
    }

    #[test]
    fn data_source_detects_urls() {
        assert_eq!(DataSource::parse(""), DataSource::Bundled);
        assert_eq!(
            DataSource::parse("https://example.com/data.json"),
            DataSource::Url("https://example.com/data.json".to_string())
        );
        assert_eq!(
            DataSource::parse("./data.json"),
            DataSource::File(PathBuf::from("./data.json"))
        );
    }
}
