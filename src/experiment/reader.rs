//! Experiment Record Reader
//!
//! A candidate directory without a metadata file is skipped. A metadata or
//! results file that exists but is not a JSON object is a parse error.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use tracing::{debug, warn};

use super::record::{ExperimentRecord, JOB_NUMBER_FIELD, SWEEP_PARENT_FIELD};
use super::scanner::Candidate;
use crate::config::{MalformedPolicy, TrackerConfig};
use crate::{Error, Result};

/// Result of reading one candidate directory.
#[derive(Debug, Clone, PartialEq)]
pub enum ReadOutcome {
    /// The directory holds an experiment
    Record(ExperimentRecord),
    /// The directory is not part of the index
    Skip(PathBuf),
}

impl ReadOutcome {
    /// The record, if this is not a skip.
    #[must_use]
    pub fn into_record(self) -> Option<ExperimentRecord> {
        match self {
            Self::Record(record) => Some(record),
            Self::Skip(_) => None,
        }
    }
}

/// Read one candidate directory.
///
/// # Errors
///
/// Returns [`Error::Parse`] if the metadata or results file is malformed, or
/// an IO error if an existing file cannot be read.
pub fn read_record(candidate: &Candidate, config: &TrackerConfig) -> Result<ReadOutcome> {
    let info_path = candidate.path().join(config.metadata_file());
    let Some(info) = load_object(&info_path)? else {
        debug!(dir = %candidate.path().display(), "no metadata file, skipping");
        return Ok(ReadOutcome::Skip(candidate.path().to_path_buf()));
    };

    let mut record = ExperimentRecord::new(candidate.source(), candidate.path());
    merge_file(&mut record, info, &info_path)?;

    let results_path = candidate.path().join(config.results_file());
    if let Some(results) = load_object(&results_path)? {
        merge_file(&mut record, results, &results_path)?;
    }

    if let Some(parent) = candidate.sweep_parent() {
        record.insert(SWEEP_PARENT_FIELD, parent);
        record.insert(JOB_NUMBER_FIELD, candidate.name());
    }

    Ok(ReadOutcome::Record(record))
}

/// Read one candidate, applying the configured malformed-file policy.
///
/// # Errors
///
/// Same as [`read_record`], except that under [`MalformedPolicy::Skip`] a
/// malformed or unreadable file skips its directory instead.
pub fn read_candidate(candidate: &Candidate, config: &TrackerConfig) -> Result<ReadOutcome> {
    match read_record(candidate, config) {
        Err(e @ (Error::Parse { .. } | Error::Io(_)))
            if config.on_malformed() == MalformedPolicy::Skip =>
        {
            warn!(error = %e, "skipping malformed or unreadable experiment");
            Ok(ReadOutcome::Skip(candidate.path().to_path_buf()))
        }
        other => other,
    }
}

fn merge_file(record: &mut ExperimentRecord, object: Map<String, Value>, path: &Path) -> Result<()> {
    match record.merge_object(object) {
        Ok(true) => {
            warn!(file = %path.display(), "ignoring 'source' key, the directory name is used");
            Ok(())
        }
        Ok(false) => Ok(()),
        Err(Error::InvalidInput(reason)) => Err(Error::parse(path, reason)),
        Err(e) => Err(e),
    }
}

/// Load a JSON object from `path`; `Ok(None)` if the file does not exist.
fn load_object(path: &Path) -> Result<Option<Map<String, Value>>> {
    let data = match fs::read_to_string(path) {
        Ok(data) => data,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) if e.kind() == ErrorKind::InvalidData => return Err(Error::parse(path, e)),
        Err(e) => return Err(e.into()),
    };

    match serde_json::from_str::<Value>(&data).map_err(|e| Error::parse(path, e))? {
        Value::Object(map) => Ok(Some(map)),
        other => Err(Error::parse(
            path,
            format!("expected a JSON object, found {}", kind(&other)),
        )),
    }
}

const fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
