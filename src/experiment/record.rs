//! Experiment Record - one run's flattened configuration and outcome

use std::path::{Path, PathBuf};

use serde_json::{Map, Value};

use crate::{Error, Result};

/// Column holding the directory an experiment was read from.
pub const SOURCE_FIELD: &str = "source";
/// Column holding the sweep parent directory name of a sweep job.
pub const SWEEP_PARENT_FIELD: &str = "sweep_parent";
/// Column holding the job directory name of a sweep job.
pub const JOB_NUMBER_FIELD: &str = "job_number";

/// Experiment Record represents one run's recorded metadata.
///
/// Fields keep the key order of the metadata file, followed by any new keys
/// from the results file. Nested objects are flattened into dot-joined names,
/// so every field maps to a single cell of the index.
///
/// The `source` field is not stored in `fields`; it is always the first
/// field reported by [`ExperimentRecord::fields`].
#[derive(Debug, Clone, PartialEq)]
pub struct ExperimentRecord {
    source: String,
    path: PathBuf,
    fields: Map<String, Value>,
}

impl ExperimentRecord {
    /// Create an empty record for the experiment at `path`.
    ///
    /// # Arguments
    ///
    /// * `source` - Value of the injected `source` field
    /// * `path` - Directory the record was read from
    #[must_use]
    pub fn new(source: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            path: path.into(),
            fields: Map::new(),
        }
    }

    /// Create a builder for constructing a record field by field.
    #[must_use]
    pub fn builder(source: impl Into<String>, path: impl Into<PathBuf>) -> ExperimentRecordBuilder {
        ExperimentRecordBuilder::new(source, path)
    }

    /// Get the source identifier.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Get the experiment directory.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Get a field value by name. `source` is answered too.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Value> {
        if name == SOURCE_FIELD {
            return Some(Value::String(self.source.clone()));
        }
        self.fields.get(name).cloned()
    }

    /// Number of fields, including `source`.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len() + 1
    }

    /// A record always carries at least its `source` field.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        false
    }

    /// Iterate over `(name, value)` pairs, `source` first.
    pub fn fields(&self) -> impl Iterator<Item = (&str, Option<String>)> + '_ {
        std::iter::once((SOURCE_FIELD, Some(self.source.clone()))).chain(
            self.fields
                .iter()
                .map(|(name, value)| (name.as_str(), render_cell(value))),
        )
    }

    /// Merge a JSON object into the record, flattening nested objects.
    ///
    /// Existing fields keep their position and take the new value. A
    /// `source` key is dropped and reported back so the caller can log it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if two keys of `object` flatten to the
    /// same name, such as `"a.b"` next to `"a": {"b": ..}`. The record is left
    /// unchanged.
    pub fn merge_object(&mut self, object: Map<String, Value>) -> Result<bool> {
        let mut dropped_source = false;
        let mut flat = Map::new();
        flatten_into(None, object, &mut flat)?;
        for (name, value) in flat {
            if name == SOURCE_FIELD {
                dropped_source = true;
                continue;
            }
            self.fields.insert(name, value);
        }
        Ok(dropped_source)
    }

    /// Insert a single field.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        let name = name.into();
        if name != SOURCE_FIELD {
            self.fields.insert(name, value.into());
        }
    }
}

/// Builder for `ExperimentRecord`.
#[derive(Debug)]
pub struct ExperimentRecordBuilder {
    record: ExperimentRecord,
}

impl ExperimentRecordBuilder {
    /// Create a new builder with required fields.
    #[must_use]
    pub fn new(source: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            record: ExperimentRecord::new(source, path),
        }
    }

    /// Add a field.
    #[must_use]
    pub fn field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.record.insert(name, value);
        self
    }

    /// Build the `ExperimentRecord`.
    #[must_use]
    pub fn build(self) -> ExperimentRecord {
        self.record
    }
}

/// Render a JSON value as index cell text. `null` is an empty cell.
#[must_use]
pub fn render_cell(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Array(_) | Value::Object(_) => Some(value.to_string()),
    }
}

fn flatten_into(
    prefix: Option<&str>,
    object: Map<String, Value>,
    out: &mut Map<String, Value>,
) -> Result<()> {
    for (key, value) in object {
        let name = match prefix {
            Some(prefix) => format!("{prefix}.{key}"),
            None => key,
        };
        match value {
            Value::Object(nested) if !nested.is_empty() => flatten_into(Some(&name), nested, out)?,
            other => {
                if out.contains_key(&name) {
                    return Err(Error::InvalidInput(format!(
                        "field '{name}' appears twice after flattening"
                    )));
                }
                out.insert(name, other);
            }
        }
    }
    Ok(())
}
