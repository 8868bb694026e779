//! Top-K selection of experiments by a numeric metric
//!
//! Heap-based: O(N log K) over the rows instead of a full sort. Cells that
//! are empty or not numbers never rank.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use super::IndexTable;
use crate::{Error, Result};

/// Sort order for Top-K selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    /// Ascending order (smallest K values)
    Ascending,
    /// Descending order (largest K values)
    Descending,
}

// Heap item ordered so that the worst-ranked row sits at the top of the
// max-heap. Ties go to the row discovered first.
#[derive(Debug)]
struct Ranked {
    value: f64,
    index: usize,
    order: SortOrder,
}

impl PartialEq for Ranked {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Ranked {}

impl Ord for Ranked {
    fn cmp(&self, other: &Self) -> Ordering {
        let by_value = match self.order {
            SortOrder::Descending => other.value.total_cmp(&self.value),
            SortOrder::Ascending => self.value.total_cmp(&other.value),
        };
        by_value.then(self.index.cmp(&other.index))
    }
}

impl PartialOrd for Ranked {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Parse a cell as a finite-or-infinite number; NaN and text do not rank.
#[must_use]
pub fn numeric(cell: Option<&str>) -> Option<f64> {
    cell?.trim().parse::<f64>().ok().filter(|v| !v.is_nan())
}

/// Row indices of the top `k` rows by `column`, best first.
///
/// # Errors
///
/// Returns [`Error::InvalidInput`] if `k` is zero or `column` does not exist.
pub fn top_k_indices(
    table: &IndexTable,
    column: &str,
    k: usize,
    order: SortOrder,
) -> Result<Vec<usize>> {
    if k == 0 {
        return Err(Error::InvalidInput("k must be greater than 0".to_string()));
    }
    if table.column_index(column).is_none() {
        return Err(Error::InvalidInput(format!("unknown column '{column}'")));
    }

    let mut heap: BinaryHeap<Ranked> = BinaryHeap::with_capacity(k + 1);
    for index in 0..table.num_rows() {
        let Some(value) = numeric(table.cell(index, column)) else {
            continue;
        };
        heap.push(Ranked {
            value,
            index,
            order,
        });
        if heap.len() > k {
            heap.pop();
        }
    }

    Ok(heap.into_sorted_vec().into_iter().map(|item| item.index).collect())
}

/// Table of the top `k` rows by `column`, best first.
///
/// # Errors
///
/// Same as [`top_k_indices`].
///
/// # Examples
///
/// ```rust
/// use experiment_index::experiment::ExperimentRecord;
/// use experiment_index::index::{top_k, IndexTable, SortOrder};
///
/// let table: IndexTable = [0.71, 0.93, 0.88]
///     .iter()
///     .enumerate()
///     .map(|(i, acc)| {
///         ExperimentRecord::builder(format!("exp{i}"), format!("exp{i}"))
///             .field("best_accuracy", *acc)
///             .build()
///     })
///     .collect();
///
/// let best = top_k(&table, "best_accuracy", 2, SortOrder::Descending)?;
/// assert_eq!(best.cell(0, "source"), Some("exp1"));
/// assert_eq!(best.cell(1, "source"), Some("exp2"));
/// # Ok::<(), experiment_index::Error>(())
/// ```
pub fn top_k(table: &IndexTable, column: &str, k: usize, order: SortOrder) -> Result<IndexTable> {
    let indices = top_k_indices(table, column, k, order)?;
    Ok(table.select(&indices))
}
