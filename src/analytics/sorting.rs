//! Table ordering.
//!
//! Sorting never touches the source slice. It computes a permutation of
//! record indices and materializes a new `Vec` from it, so index-aligned
//! data (chart labels, selection markers) can be reordered with the same
//! permutation.
//!
//! Ordering rules:
//! - `weekEnding` compares as a string. ISO-8601 dates sort lexicographically
//!   in chronological order.
//! - numeric columns compare numerically (`-0.0` and `0.0` are equal).
//! - ties keep their input order in both directions. The original index is
//!   an explicit tie-breaker, so this does not depend on the sort primitive.
//! - descending inverts the key comparison only; the tie-breaker stays
//!   ascending.

use std::cmp::Ordering;

use crate::domain::{SaleRecord, SortDirection, SortDirective, SortKey};

/// Compare two records on a single column, ascending.
pub fn compare_by_key(a: &SaleRecord, b: &SaleRecord, key: SortKey) -> Ordering {
    match key {
        SortKey::WeekEnding => a.week_ending.cmp(&b.week_ending),
        SortKey::RetailSales => cmp_f64(a.retail_sales, b.retail_sales),
        SortKey::WholesaleSales => cmp_f64(a.wholesale_sales, b.wholesale_sales),
        SortKey::UnitsSold => a.units_sold.cmp(&b.units_sold),
        SortKey::RetailerMargin => cmp_f64(a.retailer_margin, b.retailer_margin),
    }
}

fn cmp_f64(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b).unwrap_or(Ordering::Equal)
}

/// Index permutation that orders `records` under `directive`.
///
/// `perm[i]` is the source index of the record shown at row `i`. With no
/// directive this is the identity.
pub fn sort_permutation(records: &[SaleRecord], directive: Option<SortDirective>) -> Vec<usize> {
    let mut perm: Vec<usize> = (0..records.len()).collect();
    let Some(directive) = directive else {
        return perm;
    };

    perm.sort_unstable_by(|&i, &j| {
        let by_key = compare_by_key(&records[i], &records[j], directive.key);
        let by_key = match directive.direction {
            SortDirection::Ascending => by_key,
            SortDirection::Descending => by_key.reverse(),
        };
        by_key.then(i.cmp(&j))
    });

    tracing::debug!(
        rows = records.len(),
        key = directive.key.field_name(),
        direction = ?directive.direction,
        "sorted sales rows"
    );
    perm
}

/// Reorder any slice by a permutation from [`sort_permutation`].
pub fn apply_permutation<T: Clone>(items: &[T], perm: &[usize]) -> Vec<T> {
    perm.iter().map(|&i| items[i].clone()).collect()
}

/// Produce a new, ordered view of `records`.
pub fn sort_by(records: &[SaleRecord], directive: Option<SortDirective>) -> Vec<SaleRecord> {
    let perm = sort_permutation(records, directive);
    apply_permutation(records, &perm)
}
