//! Trailing moving-average smoothing for the sales chart.
//!
//! For output index `i` the value is the mean of
//!
//! ```text
//! values[max(0, i - window + 1) ..= i]
//! ```
//!
//! so the first `window - 1` points average over a shorter, growing prefix
//! (warm-up) instead of being padded or left undefined. The output always has
//! the same length as the input.

use crate::domain::SaleRecord;
use crate::error::AppError;

/// Compute a trailing, variable-width moving average.
///
/// `window` is signed so that callers passing through user input get an
/// `InvalidArgument` error for `0` or negative values rather than a silent
/// clamp. A window wider than the series is allowed: every point becomes a
/// running mean from the start.
pub fn moving_average(values: &[f64], window: i64) -> Result<Vec<f64>, AppError> {
    if window <= 0 {
        return Err(AppError::invalid_argument(format!(
            "Smoothing window must be positive (got {window})."
        )));
    }
    let window = usize::try_from(window).unwrap_or(usize::MAX);

    let mut out = Vec::with_capacity(values.len());
    for i in 0..values.len() {
        let start = (i + 1).saturating_sub(window);
        let subset = &values[start..=i];
        out.push(subset.iter().sum::<f64>() / subset.len() as f64);
    }

    Ok(out)
}

/// Smoothed chart series, index-aligned with `labels`.
#[derive(Debug, Clone, PartialEq)]
pub struct SmoothedSeries {
    /// `week_ending` of each record, in record order.
    pub labels: Vec<String>,
    pub retail: Vec<f64>,
    pub wholesale: Vec<f64>,
    pub window: i64,
}

impl SmoothedSeries {
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Min/max over both series, `None` when empty or non-finite.
    pub fn value_range(&self) -> Option<(f64, f64)> {
        let mut lo = f64::INFINITY;
        let mut hi = f64::NEG_INFINITY;
        for &v in self.retail.iter().chain(self.wholesale.iter()) {
            lo = lo.min(v);
            hi = hi.max(v);
        }
        if lo.is_finite() && hi.is_finite() {
            Some((lo, hi))
        } else {
            None
        }
    }
}

/// Smooth retail and wholesale sales independently, keeping record order.
pub fn smooth_sales(records: &[SaleRecord], window: i64) -> Result<SmoothedSeries, AppError> {
    let retail: Vec<f64> = records.iter().map(|r| r.retail_sales).collect();
    let wholesale: Vec<f64> = records.iter().map(|r| r.wholesale_sales).collect();

    let series = SmoothedSeries {
        labels: records.iter().map(|r| r.week_ending.clone()).collect(),
        retail: moving_average(&retail, window)?,
        wholesale: moving_average(&wholesale, window)?,
        window,
    };
    tracing::debug!(points = series.len(), window, "smoothed sales series");
    Ok(series)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn rec(week: &str, retail: f64, wholesale: f64) -> SaleRecord {
        SaleRecord {
            week_ending: week.to_string(),
            retail_sales: retail,
            wholesale_sales: wholesale,
            units_sold: 1,
            retailer_margin: 0.0,
        }
    }

    #[test]
    fn window_two_matches_hand_computed() {
        let out = moving_average(&[10.0, 20.0, 30.0, 40.0], 2).unwrap();
        assert_eq!(out, vec![10.0, 15.0, 25.0, 35.0]);
    }

    #[test]
    fn empty_series_is_empty() {
        assert!(moving_average(&[], 3).unwrap().is_empty());
        assert!(moving_average(&[], 1).unwrap().is_empty());
    }

    #[test]
    fn non_positive_window_is_rejected() {
        for w in [0, -1, i64::MIN] {
            let err = moving_average(&[1.0, 2.0], w).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        }
    }

    #[test]
    fn wide_window_gives_running_mean() {
        let values = [3.0, 5.0, 10.0, 2.0, 0.0];
        for w in [5, 6, 100, i64::MAX] {
            let out = moving_average(&values, w).unwrap();
            assert_eq!(out.len(), values.len());
            for i in 0..values.len() {
                let mean = values[..=i].iter().sum::<f64>() / (i + 1) as f64;
                assert!((out[i] - mean).abs() < 1e-12, "w={w} i={i}");
            }
        }
    }

    #[test]
    fn output_length_matches_input() {
        let values: Vec<f64> = (0..37).map(|i| (i * 7 % 11) as f64).collect();
        for w in 1..12 {
            assert_eq!(moving_average(&values, w).unwrap().len(), values.len());
        }
    }

    #[test]
    fn window_one_is_identity() {
        let values = [4.5, -1.0, 9.25];
        assert_eq!(moving_average(&values, 1).unwrap(), values.to_vec());
    }

    #[test]
    fn smooth_sales_keeps_series_independent() {
        let records = vec![
            rec("2017-01-01", 100.0, 10.0),
            rec("2017-01-08", 300.0, 10.0),
            rec("2017-01-15", 500.0, 40.0),
        ];
        let s = smooth_sales(&records, 2).unwrap();
        assert_eq!(s.labels, vec!["2017-01-01", "2017-01-08", "2017-01-15"]);
        assert_eq!(s.retail, vec![100.0, 200.0, 400.0]);
        assert_eq!(s.wholesale, vec![10.0, 10.0, 25.0]);
        assert_eq!(s.value_range(), Some((10.0, 400.0)));
    }
}
