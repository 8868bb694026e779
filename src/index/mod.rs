//! Experiment index: aggregation, serialization and lookups
//!
//! ```text
//! ExperimentRecord (N) ──> Aggregator ──> IndexTable ──┬──> CSV file (writer)
//!                          FieldUniverse               ├──> terminal table (batch)
//!                                                      └──> top-K / filters / sweeps
//! ```
//!
//! Columns are the union of every field seen, `source` first and the rest in
//! first-seen order. Rows follow discovery order.

mod aggregate;
mod batch;
mod query;
mod topk;
mod writer;

pub use aggregate::{Aggregator, FieldUniverse, IndexRow, IndexTable};
pub use batch::{pretty_format, to_record_batch};
pub use query::{filter_rows, match_source, sweep_rows, sweeps, Filter, SweepSummary};
pub use topk::{numeric, top_k, top_k_indices, SortOrder};
pub use writer::{to_csv_bytes, write_index};
