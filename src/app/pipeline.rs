//! Shared "dashboard view" logic used by both CLI and TUI front-ends.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! store snapshot -> sort rows -> smooth chart series
//!
//! The CLI and the TUI can then focus on presentation (printing vs widgets).

use std::sync::Arc;

use crate::analytics::{SmoothedSeries, smooth_sales, sort_by};
use crate::data::{LoadStatus, SalesRepository, SalesSnapshot, SalesStore};
use crate::domain::{DataSource, Product, SaleRecord, SortState};
use crate::error::AppError;

/// Everything a view needs to render one frame.
#[derive(Debug, Clone)]
pub struct DashboardView {
    pub status: LoadStatus,
    pub error: Option<String>,
    pub product: Option<Arc<Product>>,
    /// Table rows under the current sort state.
    pub rows: Vec<SaleRecord>,
    /// Chart series, always in dataset order.
    pub chart: SmoothedSeries,
    pub sort: SortState,
}

/// Compose the core operations over a store snapshot.
///
/// The chart is smoothed over the unsorted rows: sorting only affects the
/// table.
pub fn build_view(snapshot: &SalesSnapshot, sort: SortState, window: i64) -> Result<DashboardView, AppError> {
    let chart = smooth_sales(&snapshot.sales, window)?;
    let rows = sort_by(&snapshot.sales, sort);

    Ok(DashboardView {
        status: snapshot.status,
        error: snapshot.error.clone(),
        product: snapshot.product.clone(),
        rows,
        chart,
        sort,
    })
}

/// Fetch the dataset once into a fresh store.
pub fn load_store(source: &DataSource) -> Result<SalesStore, AppError> {
    let repo = SalesRepository::new(source.clone());
    let mut store = SalesStore::new();
    store.load_from(&repo)?;
    Ok(store)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{SortDirective, SortKey};
    use crate::error::ErrorKind;

    #[test]
    fn view_sorts_table_but_not_chart() {
        let store = load_store(&DataSource::Bundled).unwrap();
        let snap = store.snapshot();
        let sort = Some(SortDirective::descending(SortKey::RetailSales));
        let view = build_view(&snap, sort, 4).unwrap();

        assert_eq!(view.status, LoadStatus::Succeeded);
        assert_eq!(view.rows.len(), snap.sales.len());
        assert!(view.rows.windows(2).all(|w| w[0].retail_sales >= w[1].retail_sales));
        assert_eq!(view.chart.labels.first(), snap.sales.first().map(|r| &r.week_ending));
        assert_eq!(view.chart.retail[0], snap.sales[0].retail_sales);
    }

    #[test]
    fn invalid_window_propagates() {
        let store = SalesStore::new();
        let err = build_view(&store.snapshot(), None, 0).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    }

    #[test]
    fn idle_store_gives_empty_view() {
        let view = build_view(&SalesStore::new().snapshot(), None, 4).unwrap();
        assert_eq!(view.status, LoadStatus::Idle);
        assert!(view.rows.is_empty());
        assert!(view.chart.is_empty());
        assert!(view.product.is_none());
    }
}
