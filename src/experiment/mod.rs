//! Experiment discovery and metadata reading
//!
//! Each training run writes its resolved configuration to a metadata file in
//! its own output directory. This module finds those directories and turns
//! each metadata file into an [`ExperimentRecord`].
//!
//! ## Layout
//!
//! ```text
//! outputs/
//! ├── r18_c10_1215_1400/          plain run
//! │   ├── experiment_info.json
//! │   └── results.json            (optional)
//! └── r18_c10_1215_1430/          sweep parent
//!     ├── job_0/experiment_info.json
//!     └── job_1/experiment_info.json
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use experiment_index::config::TrackerConfig;
//! use experiment_index::experiment::{read_candidate, scan};
//!
//! let config = TrackerConfig::new("outputs");
//! for candidate in scan(&config)? {
//!     let outcome = read_candidate(&candidate?, &config)?;
//!     if let Some(record) = outcome.into_record() {
//!         println!("{} ({} fields)", record.source(), record.len());
//!     }
//! }
//! # Ok::<(), experiment_index::Error>(())
//! ```

mod reader;
mod record;
mod scanner;

pub use reader::{read_candidate, read_record, ReadOutcome};
pub use record::{
    render_cell, ExperimentRecord, ExperimentRecordBuilder, JOB_NUMBER_FIELD, SOURCE_FIELD,
    SWEEP_PARENT_FIELD,
};
pub use scanner::{scan, Candidate, ExperimentScanner};
