//! # experiment-index: index ML experiment output directories
//!
//! Training runs configured through layered config fragments (model,
//! dataset, hyperparameters, command-line overrides, multi-run sweeps) each
//! write an `experiment_info.json` describing their resolved configuration.
//! This crate scans those output directories and folds every record into a
//! single rectangular table, written as CSV or printed for inspection.
//!
//! ## Pipeline
//!
//! ```text
//! scan(root) ──> read_candidate ──> Aggregator ──> IndexTable ──> write_index
//!  (dirs)        (record | skip)    (backfill)                    (CSV, atomic)
//! ```
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use experiment_index::config::TrackerConfig;
//! use experiment_index::index::write_index;
//!
//! let config = TrackerConfig::new("outputs");
//! let table = experiment_index::build_index(&config)?;
//! println!("{} experiments, {} columns", table.num_rows(), table.num_columns());
//! write_index(&table, config.index_path())?;
//! # Ok::<(), experiment_index::Error>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

pub mod config;
pub mod dispatch;
pub mod error;
pub mod experiment;
pub mod index;

pub use config::{MalformedPolicy, TrackerConfig};
pub use dispatch::{build_index, run, Command, RankOptions};
pub use error::{Error, Result};
