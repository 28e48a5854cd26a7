//! Export the sales table to CSV.
//!
//! Rows are written in the order given (i.e. already sorted). Each value
//! appears raw for spreadsheets, plus the formatted cell the dashboard shows.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::domain::SaleRecord;
use crate::error::AppError;
use crate::report::format_row;

/// Write rows to a CSV file.
pub fn write_sales_csv(path: &Path, rows: &[SaleRecord]) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::io(format!("Failed to create export CSV '{}': {e}", path.display())))?;
    let mut out = BufWriter::new(file);

    writeln!(
        out,
        "week_ending,retail_sales,wholesale_sales,units_sold,retailer_margin,\
         week_ending_display,retail_sales_display,wholesale_sales_display,retailer_margin_display"
    )
    .map_err(|e| AppError::io(format!("Failed to write export CSV header: {e}")))?;

    for r in rows {
        let cells = format_row(r);
        writeln!(
            out,
            "{},{},{},{},{},{},{},{},{}",
            r.week_ending,
            r.retail_sales,
            r.wholesale_sales,
            r.units_sold,
            r.retailer_margin,
            cells[0],
            csv_quote(&cells[1]),
            csv_quote(&cells[2]),
            csv_quote(&cells[4]),
        )
        .map_err(|e| AppError::io(format!("Failed to write export CSV row: {e}")))?;
    }

    out.flush()
        .map_err(|e| AppError::io(format!("Failed to flush export CSV: {e}")))?;
    tracing::info!(path = %path.display(), rows = rows.len(), "exported sales table");
    Ok(())
}

/// Currency cells contain grouping commas.
fn csv_quote(s: &str) -> String {
    if s.contains(',') || s.contains('"') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_header_and_quoted_currency() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sales.csv");
        let rows = vec![SaleRecord {
            week_ending: "2017-01-01".to_string(),
            retail_sales: 1234.5,
            wholesale_sales: 900.0,
            units_sold: 12,
            retailer_margin: -3.0,
        }];

        write_sales_csv(&path, &rows).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("week_ending,retail_sales,"));
        assert!(lines[1].starts_with("2017-01-01,1234.5,900,12,-3,"));
        assert!(lines[1].ends_with(",\"$1,234.5\",$900,$-3"));
    }

    #[test]
    fn unwritable_path_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("sales.csv");
        let err = write_sales_csv(&path, &[]).unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::Io);
    }
}
