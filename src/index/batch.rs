//! Arrow view of the index
//!
//! Every column is nullable Utf8: cells keep the exact text of the metadata
//! file, and empty cells are nulls.

use std::sync::Arc;

use arrow::array::{ArrayRef, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use arrow::util::pretty::pretty_format_batches;

use super::IndexTable;
use crate::Result;

/// Convert the index into a single `RecordBatch`.
///
/// # Errors
///
/// Returns an Arrow error if the batch cannot be assembled.
pub fn to_record_batch(table: &IndexTable) -> Result<RecordBatch> {
    let schema = Arc::new(Schema::new(
        table
            .columns()
            .iter()
            .map(|name| Field::new(name, DataType::Utf8, true))
            .collect::<Vec<_>>(),
    ));

    let columns: Vec<ArrayRef> = (0..table.num_columns())
        .map(|column| {
            let values: Vec<Option<&str>> = table
                .rows()
                .iter()
                .map(|row| row.cells()[column].as_deref())
                .collect();
            Arc::new(StringArray::from(values)) as ArrayRef
        })
        .collect();

    Ok(RecordBatch::try_new(schema, columns)?)
}

/// Render the index as a boxed text table for the terminal.
///
/// # Errors
///
/// Returns an Arrow error if the table cannot be formatted.
pub fn pretty_format(table: &IndexTable) -> Result<String> {
    let batch = to_record_batch(table)?;
    Ok(pretty_format_batches(&[batch])?.to_string())
}
