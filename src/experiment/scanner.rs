//! Experiment Directory Scanner
//!
//! Lists the directories under the root in file-name order. A directory that
//! has no metadata file of its own but holds sweep job directories expands
//! into one candidate per job.

use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::TrackerConfig;
use crate::Result;

/// A directory that may hold an experiment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    path: PathBuf,
    name: String,
    sweep_parent: Option<String>,
}

impl Candidate {
    /// Candidate for a plain experiment directory.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, name: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            name: name.into(),
            sweep_parent: None,
        }
    }

    /// Candidate for a job directory of the sweep `parent`.
    #[must_use]
    pub fn sweep_job(
        path: impl Into<PathBuf>,
        name: impl Into<String>,
        parent: impl Into<String>,
    ) -> Self {
        Self {
            path: path.into(),
            name: name.into(),
            sweep_parent: Some(parent.into()),
        }
    }

    /// Directory path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Directory name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Sweep parent directory name, for sweep jobs.
    #[must_use]
    pub fn sweep_parent(&self) -> Option<&str> {
        self.sweep_parent.as_deref()
    }

    /// Identifier written to the `source` column: `name`, or `parent/name`
    /// for sweep jobs.
    #[must_use]
    pub fn source(&self) -> String {
        match &self.sweep_parent {
            Some(parent) => format!("{parent}/{}", self.name),
            None => self.name.clone(),
        }
    }
}

/// Lazy sequence of candidates under a root directory.
///
/// Only the root listing is read up front; sweep parents are expanded as the
/// iterator reaches them. Create a new scanner to start over.
#[derive(Debug)]
pub struct ExperimentScanner {
    entries: std::vec::IntoIter<(String, PathBuf)>,
    pending: VecDeque<Candidate>,
    metadata_file: String,
    sweep_job_prefix: String,
}

impl ExperimentScanner {
    /// Start scanning `config.root()`.
    ///
    /// # Errors
    ///
    /// Returns an IO error if the root cannot be listed.
    pub fn new(config: &TrackerConfig) -> Result<Self> {
        let entries = sorted_subdirs(config.root(), |_| true)?;
        debug!(root = %config.root().display(), dirs = entries.len(), "scanning experiment root");
        Ok(Self {
            entries: entries.into_iter(),
            pending: VecDeque::new(),
            metadata_file: config.metadata_file().to_string(),
            sweep_job_prefix: config.sweep_job_prefix().to_string(),
        })
    }

    fn expand(&self, name: String, path: PathBuf) -> Result<Vec<Candidate>> {
        if path.join(&self.metadata_file).exists() {
            return Ok(vec![Candidate::new(path, name)]);
        }

        let prefix = self.sweep_job_prefix.as_str();
        let jobs = sorted_subdirs(&path, |job| job.starts_with(prefix))?;
        if jobs.is_empty() {
            return Ok(vec![Candidate::new(path, name)]);
        }

        debug!(sweep = %name, jobs = jobs.len(), "expanding sweep directory");
        Ok(jobs
            .into_iter()
            .map(|(job, job_path)| Candidate::sweep_job(job_path, job, name.clone()))
            .collect())
    }
}

impl Iterator for ExperimentScanner {
    type Item = Result<Candidate>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(candidate) = self.pending.pop_front() {
                return Some(Ok(candidate));
            }
            let (name, path) = self.entries.next()?;
            match self.expand(name, path) {
                Ok(candidates) => self.pending.extend(candidates),
                Err(e) => return Some(Err(e)),
            }
        }
    }
}

/// Scan `config.root()` for experiment candidates.
///
/// # Errors
///
/// Returns an IO error if the root cannot be listed.
pub fn scan(config: &TrackerConfig) -> Result<ExperimentScanner> {
    ExperimentScanner::new(config)
}

/// Subdirectories of `dir` whose names pass `keep`, sorted by name.
fn sorted_subdirs(dir: &Path, keep: impl Fn(&str) -> bool) -> Result<Vec<(String, PathBuf)>> {
    let mut dirs = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if !path.is_dir() {
            continue;
        }
        let Some(name) = path.file_name().map(|n| n.to_string_lossy().into_owned()) else {
            continue;
        };
        if keep(&name) {
            dirs.push((name, path));
        }
    }
    dirs.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(dirs)
}
