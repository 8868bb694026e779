//! Read-only lookups over a finished index

use super::IndexTable;
use crate::experiment::{SOURCE_FIELD, SWEEP_PARENT_FIELD};
use crate::{Error, Result};

/// Equality filter on one column's cell text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filter {
    column: String,
    value: String,
}

impl Filter {
    /// Create a filter matching rows whose `column` cell equals `value`.
    #[must_use]
    pub fn new(column: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            value: value.into(),
        }
    }

    /// Parse a `KEY=VALUE` argument.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Usage`] if there is no `=` or the key is empty.
    pub fn parse(arg: &str) -> Result<Self> {
        match arg.split_once('=') {
            Some((column, value)) if !column.is_empty() => Ok(Self::new(column, value)),
            _ => Err(Error::Usage(format!("filter '{arg}' is not KEY=VALUE"))),
        }
    }

    /// Column name.
    #[must_use]
    pub fn column(&self) -> &str {
        &self.column
    }

    /// Expected cell text.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }
}

/// Rows matching every filter. Filters on columns the index does not have
/// are ignored; an empty `VALUE` matches empty cells.
#[must_use]
pub fn filter_rows(table: &IndexTable, filters: &[Filter]) -> IndexTable {
    let active: Vec<&Filter> = filters
        .iter()
        .filter(|f| table.column_index(&f.column).is_some())
        .collect();

    let indices: Vec<usize> = (0..table.num_rows())
        .filter(|&row| {
            active
                .iter()
                .all(|f| table.cell(row, &f.column).unwrap_or("") == f.value)
        })
        .collect();
    table.select(&indices)
}

/// A sweep parent and the number of jobs indexed under it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SweepSummary {
    /// Sweep parent directory name
    pub name: String,
    /// Indexed job count
    pub jobs: usize,
}

/// Distinct sweeps in first-seen order with their job counts.
#[must_use]
pub fn sweeps(table: &IndexTable) -> Vec<SweepSummary> {
    let mut summaries: Vec<SweepSummary> = Vec::new();
    for row in 0..table.num_rows() {
        let Some(name) = table.cell(row, SWEEP_PARENT_FIELD) else {
            continue;
        };
        match summaries.iter_mut().find(|s| s.name == name) {
            Some(summary) => summary.jobs += 1,
            None => summaries.push(SweepSummary {
                name: name.to_string(),
                jobs: 1,
            }),
        }
    }
    summaries
}

/// Rows belonging to the sweep `name`, in discovery order.
#[must_use]
pub fn sweep_rows(table: &IndexTable, name: &str) -> IndexTable {
    filter_rows(table, &[Filter::new(SWEEP_PARENT_FIELD, name)])
}

/// Rows whose `source` contains `partial`, ignoring case.
#[must_use]
pub fn match_source(table: &IndexTable, partial: &str) -> IndexTable {
    let needle = partial.to_lowercase();
    let indices: Vec<usize> = (0..table.num_rows())
        .filter(|&row| {
            table
                .cell(row, SOURCE_FIELD)
                .is_some_and(|source| source.to_lowercase().contains(&needle))
        })
        .collect();
    table.select(&indices)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::experiment::ExperimentRecord;

    fn table() -> IndexTable {
        vec![
            ExperimentRecord::builder("r18_c10_1400", "outputs/r18_c10_1400")
                .field("model", "resnet18")
                .field("dataset", "cifar10")
                .build(),
            ExperimentRecord::builder("sweepA/job_0", "outputs/sweepA/job_0")
                .field("model", "resnet50")
                .field("lr", 0.1)
                .field("sweep_parent", "sweepA")
                .build(),
            ExperimentRecord::builder("sweepA/job_1", "outputs/sweepA/job_1")
                .field("model", "resnet50")
                .field("lr", 0.01)
                .field("sweep_parent", "sweepA")
                .build(),
            ExperimentRecord::builder("sweepB/job_0", "outputs/sweepB/job_0")
                .field("model", "resnet18")
                .field("sweep_parent", "sweepB")
                .build(),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_filter_parse() {
        let filter = Filter::parse("model=resnet18").unwrap();
        assert_eq!(filter.column(), "model");
        assert_eq!(filter.value(), "resnet18");
        assert_eq!(Filter::parse("note=a=b").unwrap().value(), "a=b");
        assert!(Filter::parse("model").unwrap_err().is_usage());
        assert!(Filter::parse("=x").unwrap_err().is_usage());
    }

    #[test]
    fn test_filter_rows() {
        let table = table();
        let found = filter_rows(&table, &[Filter::new("model", "resnet18")]);
        assert_eq!(found.num_rows(), 2);

        let found = filter_rows(
            &table,
            &[Filter::new("model", "resnet18"), Filter::new("dataset", "cifar10")],
        );
        assert_eq!(found.num_rows(), 1);
        assert_eq!(found.cell(0, "source"), Some("r18_c10_1400"));
    }

    #[test]
    fn test_filter_unknown_column_ignored() {
        let table = table();
        let found = filter_rows(&table, &[Filter::new("optimizer", "adam")]);
        assert_eq!(found.num_rows(), table.num_rows());
    }

    #[test]
    fn test_sweeps_summary() {
        assert_eq!(
            sweeps(&table()),
            vec![
                SweepSummary {
                    name: "sweepA".to_string(),
                    jobs: 2
                },
                SweepSummary {
                    name: "sweepB".to_string(),
                    jobs: 1
                },
            ]
        );
    }

    #[test]
    fn test_sweep_rows() {
        let rows = sweep_rows(&table(), "sweepA");
        assert_eq!(rows.num_rows(), 2);
        assert_eq!(rows.cell(1, "lr"), Some("0.01"));
        assert!(sweep_rows(&table(), "missing").is_empty());
    }

    #[test]
    fn test_match_source_case_insensitive() {
        let table = table();
        assert_eq!(match_source(&table, "R18_C10").num_rows(), 1);
        assert_eq!(match_source(&table, "job_0").num_rows(), 2);
        assert!(match_source(&table, "vit").is_empty());
    }
}
