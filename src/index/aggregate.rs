//! Aggregation of experiment records into a rectangular table
//!
//! The full column set is only known after the last record, so rows are
//! accumulated as field maps first and laid out against the final
//! [`FieldUniverse`] in [`Aggregator::finish`].

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::experiment::{ExperimentRecord, ReadOutcome, SOURCE_FIELD};

/// Column names in first-seen order. Always starts with `source`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldUniverse {
    order: Vec<String>,
    positions: HashMap<String, usize>,
}

impl FieldUniverse {
    /// Create a universe holding only the `source` column.
    #[must_use]
    pub fn new() -> Self {
        let mut universe = Self {
            order: Vec::new(),
            positions: HashMap::new(),
        };
        universe.insert(SOURCE_FIELD);
        universe
    }

    /// Add a field name; returns `true` if it was not seen before.
    pub fn insert(&mut self, name: &str) -> bool {
        if self.positions.contains_key(name) {
            return false;
        }
        self.positions.insert(name.to_string(), self.order.len());
        self.order.push(name.to_string());
        true
    }

    /// Column position of `name`.
    #[must_use]
    pub fn position(&self, name: &str) -> Option<usize> {
        self.positions.get(name).copied()
    }

    /// Number of columns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Never true: `source` is always present.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        false
    }

    /// Column names in first-seen order.
    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.order
    }
}

impl Default for FieldUniverse {
    fn default() -> Self {
        Self::new()
    }
}

/// One experiment row of the index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexRow {
    path: PathBuf,
    cells: Vec<Option<String>>,
}

impl IndexRow {
    /// Experiment directory the row came from.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Cells in column order; `None` is an empty cell.
    #[must_use]
    pub fn cells(&self) -> &[Option<String>] {
        &self.cells
    }
}

/// Rectangular experiment index: every row has one cell per column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexTable {
    columns: Vec<String>,
    rows: Vec<IndexRow>,
}

impl IndexTable {
    /// Column names, `source` first.
    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Rows in discovery order.
    #[must_use]
    pub fn rows(&self) -> &[IndexRow] {
        &self.rows
    }

    /// Number of rows.
    #[must_use]
    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns.
    #[must_use]
    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    /// Whether the table has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of column `name`.
    #[must_use]
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|column| column == name)
    }

    /// Cell text of `row` in column `name`; `None` for empty cells or unknown columns.
    #[must_use]
    pub fn cell(&self, row: usize, name: &str) -> Option<&str> {
        let column = self.column_index(name)?;
        self.rows.get(row)?.cells.get(column)?.as_deref()
    }

    /// New table with the rows at `indices`, in that order.
    ///
    /// # Panics
    ///
    /// Panics if an index is out of bounds.
    #[must_use]
    pub fn select(&self, indices: &[usize]) -> Self {
        Self {
            columns: self.columns.clone(),
            rows: indices.iter().map(|&i| self.rows[i].clone()).collect(),
        }
    }

    /// New table with only the named columns that exist, in the given order.
    #[must_use]
    pub fn project(&self, names: &[&str]) -> Self {
        let keep: Vec<usize> = names
            .iter()
            .filter_map(|name| self.column_index(name))
            .collect();
        Self {
            columns: keep.iter().map(|&c| self.columns[c].clone()).collect(),
            rows: self
                .rows
                .iter()
                .map(|row| IndexRow {
                    path: row.path.clone(),
                    cells: keep.iter().map(|&c| row.cells[c].clone()).collect(),
                })
                .collect(),
        }
    }
}

#[derive(Debug)]
struct PendingRow {
    path: PathBuf,
    cells: HashMap<String, Option<String>>,
}

/// Folds experiment records into an [`IndexTable`].
///
/// ## Example
///
/// ```rust
/// use experiment_index::experiment::ExperimentRecord;
/// use experiment_index::index::Aggregator;
///
/// let mut aggregator = Aggregator::new();
/// aggregator.push(ExperimentRecord::builder("expA", "expA").field("lr", 0.1).build());
/// aggregator.push(ExperimentRecord::builder("expB", "expB").field("seed", 7).build());
///
/// let table = aggregator.finish();
/// assert_eq!(table.columns(), ["source", "lr", "seed"]);
/// assert_eq!(table.cell(0, "seed"), None);
/// ```
#[derive(Debug, Default)]
pub struct Aggregator {
    universe: FieldUniverse,
    rows: Vec<PendingRow>,
}

impl Aggregator {
    /// Create an empty aggregator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fields seen so far.
    #[must_use]
    pub const fn universe(&self) -> &FieldUniverse {
        &self.universe
    }

    /// Number of records folded so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether no record has been folded yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Fold one record into the table.
    pub fn push(&mut self, record: ExperimentRecord) {
        let mut cells = HashMap::with_capacity(record.len());
        for (name, value) in record.fields() {
            self.universe.insert(name);
            cells.insert(name.to_string(), value);
        }
        self.rows.push(PendingRow {
            path: record.path().to_path_buf(),
            cells,
        });
    }

    /// Fold a read outcome; skips are ignored. Returns `true` if a row was added.
    pub fn push_outcome(&mut self, outcome: ReadOutcome) -> bool {
        match outcome.into_record() {
            Some(record) => {
                self.push(record);
                true
            }
            None => false,
        }
    }

    /// Lay every row out against the final field universe, leaving cells
    /// empty for fields a row never had.
    #[must_use]
    pub fn finish(self) -> IndexTable {
        let columns = self.universe.order;
        let rows = self
            .rows
            .into_iter()
            .map(|mut row| IndexRow {
                cells: columns
                    .iter()
                    .map(|column| row.cells.remove(column).flatten())
                    .collect(),
                path: row.path,
            })
            .collect();
        IndexTable { columns, rows }
    }
}

impl FromIterator<ExperimentRecord> for IndexTable {
    fn from_iter<I: IntoIterator<Item = ExperimentRecord>>(iter: I) -> Self {
        let mut aggregator = Aggregator::new();
        for record in iter {
            aggregator.push(record);
        }
        aggregator.finish()
    }
}
