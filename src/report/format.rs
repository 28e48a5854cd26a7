//! Display formatting for table cells, chart ticks, and plain-text reports.
//!
//! The cell formatters are pure functions of one field value and never fail:
//! input they cannot interpret is echoed back unchanged.

use std::fmt::Display;

use chrono::{DateTime, Local, NaiveDate, NaiveTime, TimeZone};

use crate::domain::{Product, SaleRecord, SortDirection, SortKey, SortState};

/// Fraction digits kept by currency formatting (en-US default).
const MAX_FRACTION_DIGITS: usize = 3;

/// `YYYY-MM-DD` -> `MM-DD-YY` in the local time zone.
pub fn format_date(iso: &str) -> String {
    format_date_in(iso, &Local)
}

/// `YYYY-MM-DD` -> `MM-DD-YY` in `tz`.
///
/// A date-only string names midnight UTC; the calendar day shown is that
/// instant seen from `tz`, so zones west of UTC show the previous day.
/// Full RFC 3339 timestamps keep their own offset before conversion.
pub fn format_date_in<Tz>(iso: &str, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    match parse_instant(iso) {
        Some(instant) => instant.with_timezone(tz).format("%m-%d-%y").to_string(),
        None => iso.to_string(),
    }
}

fn parse_instant(iso: &str) -> Option<DateTime<chrono::Utc>> {
    let trimmed = iso.trim();
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Some(date.and_time(NaiveTime::MIN).and_utc());
    }
    DateTime::parse_from_rfc3339(trimmed)
        .ok()
        .map(|dt| dt.with_timezone(&chrono::Utc))
}

/// `$` + thousands-grouped amount, at most three fraction digits, no padding.
///
/// `1234.5` renders as `$1,234.5` and `1000000` as `$1,000,000`. Negative
/// amounts keep the sign after the dollar: `$-42`.
pub fn format_currency(amount: f64) -> String {
    format!("${}", format_grouped(amount, MAX_FRACTION_DIGITS))
}

/// Units sold: plain decimal, no grouping.
pub fn format_units(units: u64) -> String {
    units.to_string()
}

/// Upper-case short month name for chart ticks (`2017-03-05` -> `MAR`).
pub fn format_month_tick(iso: &str) -> String {
    match NaiveDate::parse_from_str(iso.trim(), "%Y-%m-%d") {
        Ok(date) => date.format("%b").to_string().to_uppercase(),
        Err(_) => iso.to_string(),
    }
}

/// Header arrow: up for the ascending column, down everywhere else.
pub fn sort_indicator(state: SortState, key: SortKey) -> &'static str {
    match state {
        Some(d) if d.key == key && d.direction == SortDirection::Ascending => "▲",
        _ => "▼",
    }
}

/// Header text with its sort arrow, e.g. `Units Sold ▼`.
pub fn column_header(state: SortState, key: SortKey) -> String {
    format!("{} {}", key.label(), sort_indicator(state, key))
}

/// Every displayed cell of one row, in column order.
pub fn format_row(row: &SaleRecord) -> [String; 5] {
    [
        format_date(&row.week_ending),
        format_currency(row.retail_sales),
        format_currency(row.wholesale_sales),
        format_units(row.units_sold),
        format_currency(row.retailer_margin),
    ]
}

/// Group the integer digits with `,` and keep up to `max_fraction` trimmed
/// fraction digits.
fn format_grouped(value: f64, max_fraction: usize) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "∞".to_string() } else { "-∞".to_string() };
    }

    let fixed = format!("{:.*}", max_fraction, value.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));
    let frac_part = frac_part.trim_end_matches('0');

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    // Negative zero and values rounding to zero keep their sign (`$-0`).
    let sign = if value.is_sign_negative() { "-" } else { "" };

    if frac_part.is_empty() {
        format!("{sign}{grouped}")
    } else {
        format!("{sign}{grouped}.{frac_part}")
    }
}

/// Plain-text sales table for terminal output.
pub fn format_sales_table(rows: &[SaleRecord], state: SortState) -> String {
    let mut out = String::new();

    let headers: Vec<String> = SortKey::ALL.iter().map(|&k| column_header(state, k)).collect();
    out.push_str(
        format!(
            "{:<14} {:>18} {:>18} {:>13} {:>18}",
            headers[0], headers[1], headers[2], headers[3], headers[4]
        )
        .trim_end(),
    );
    out.push('\n');
    out.push_str(&format!(
        "{:-<14} {:-<18} {:-<18} {:-<13} {:-<18}\n",
        "", "", "", "", ""
    ));

    for row in rows {
        let cells = format_row(row);
        out.push_str(
            format!(
                "{:<14} {:>18} {:>18} {:>13} {:>18}",
                cells[0], cells[1], cells[2], cells[3], cells[4]
            )
            .trim_end(),
        );
        out.push('\n');
    }

    out
}

/// Plain-text product panel.
pub fn format_product_summary(product: &Product) -> String {
    let mut out = String::new();

    out.push_str(&format!("=== {} ===\n", product.title));
    if !product.subtitle.is_empty() {
        out.push_str(&format!("{}\n", product.subtitle));
    }
    if !product.brand.is_empty() {
        out.push_str(&format!("Brand: {}\n", product.brand));
    }
    if !product.retailer.is_empty() {
        out.push_str(&format!("Retailer: {}\n", product.retailer));
    }
    if !product.tags.is_empty() {
        out.push_str(&format!("Tags: {}\n", product.tags.join(" | ")));
    }
    if !product.details.is_empty() {
        out.push_str("Details:\n");
        for d in &product.details {
            out.push_str(&format!("- {d}\n"));
        }
    }
    if !product.reviews.is_empty() {
        let avg = product.reviews.iter().map(|r| r.score).sum::<f64>() / product.reviews.len() as f64;
        out.push_str(&format!("Reviews: {} (avg {avg:.1})\n", product.reviews.len()));
    }

    out
}
