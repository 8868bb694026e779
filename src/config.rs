//! Tracker configuration
//!
//! Defaults match the layout the training entry point writes: one directory
//! per run under `./outputs`, each holding `experiment_info.json` and, once
//! training finished, `results.json`. Sweeps put their runs in `job_N`
//! subdirectories of a shared parent.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::Error;

/// Default root scanned for experiment directories.
pub const DEFAULT_ROOT: &str = "./outputs";
/// Default per-run metadata file name.
pub const DEFAULT_METADATA_FILE: &str = "experiment_info.json";
/// Default per-run results file name.
pub const DEFAULT_RESULTS_FILE: &str = "results.json";
/// Default index file name, placed under the root.
pub const DEFAULT_INDEX_FILE: &str = "experiment_index.csv";
/// Default name prefix of sweep job directories.
pub const DEFAULT_SWEEP_JOB_PREFIX: &str = "job_";

/// What to do when a metadata or results file is present but malformed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MalformedPolicy {
    /// Fail the whole run with a parse error
    #[default]
    Abort,
    /// Log a warning and leave the experiment out of the index
    Skip,
}

impl FromStr for MalformedPolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "abort" => Ok(Self::Abort),
            "skip" => Ok(Self::Skip),
            other => Err(Error::Usage(format!(
                "unknown malformed-file policy '{other}' (expected 'abort' or 'skip')"
            ))),
        }
    }
}

/// Resolved tracker configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackerConfig {
    root: PathBuf,
    metadata_file: String,
    results_file: String,
    index_path: PathBuf,
    sweep_job_prefix: String,
    on_malformed: MalformedPolicy,
}

impl TrackerConfig {
    /// Create a configuration with defaults for `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self::builder().root(root).build()
    }

    /// Create a builder starting from the defaults.
    #[must_use]
    pub fn builder() -> TrackerConfigBuilder {
        TrackerConfigBuilder::default()
    }

    /// Directory scanned for experiments.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Per-run metadata file name.
    #[must_use]
    pub fn metadata_file(&self) -> &str {
        &self.metadata_file
    }

    /// Per-run results file name.
    #[must_use]
    pub fn results_file(&self) -> &str {
        &self.results_file
    }

    /// Destination of the CSV index.
    #[must_use]
    pub fn index_path(&self) -> &Path {
        &self.index_path
    }

    /// Name prefix identifying sweep job directories.
    #[must_use]
    pub fn sweep_job_prefix(&self) -> &str {
        &self.sweep_job_prefix
    }

    /// Malformed-file policy.
    #[must_use]
    pub const fn on_malformed(&self) -> MalformedPolicy {
        self.on_malformed
    }
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Builder for `TrackerConfig`.
#[derive(Debug, Default)]
pub struct TrackerConfigBuilder {
    root: Option<PathBuf>,
    metadata_file: Option<String>,
    results_file: Option<String>,
    index_path: Option<PathBuf>,
    sweep_job_prefix: Option<String>,
    on_malformed: MalformedPolicy,
}

impl TrackerConfigBuilder {
    /// Set the directory scanned for experiments.
    #[must_use]
    pub fn root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = Some(root.into());
        self
    }

    /// Set the metadata file name.
    #[must_use]
    pub fn metadata_file(mut self, name: impl Into<String>) -> Self {
        self.metadata_file = Some(name.into());
        self
    }

    /// Set the results file name.
    #[must_use]
    pub fn results_file(mut self, name: impl Into<String>) -> Self {
        self.results_file = Some(name.into());
        self
    }

    /// Set the index destination. Defaults to `experiment_index.csv` under the root.
    #[must_use]
    pub fn index_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.index_path = Some(path.into());
        self
    }

    /// Set the sweep job directory prefix.
    #[must_use]
    pub fn sweep_job_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.sweep_job_prefix = Some(prefix.into());
        self
    }

    /// Set the malformed-file policy.
    #[must_use]
    pub const fn on_malformed(mut self, policy: MalformedPolicy) -> Self {
        self.on_malformed = policy;
        self
    }

    /// Build the `TrackerConfig`.
    #[must_use]
    pub fn build(self) -> TrackerConfig {
        let root = self.root.unwrap_or_else(|| PathBuf::from(DEFAULT_ROOT));
        let index_path = self
            .index_path
            .unwrap_or_else(|| root.join(DEFAULT_INDEX_FILE));
        TrackerConfig {
            root,
            metadata_file: self
                .metadata_file
                .unwrap_or_else(|| DEFAULT_METADATA_FILE.to_string()),
            results_file: self
                .results_file
                .unwrap_or_else(|| DEFAULT_RESULTS_FILE.to_string()),
            index_path,
            sweep_job_prefix: self
                .sweep_job_prefix
                .unwrap_or_else(|| DEFAULT_SWEEP_JOB_PREFIX.to_string()),
            on_malformed: self.on_malformed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = TrackerConfig::default();
        assert_eq!(config.root(), Path::new(DEFAULT_ROOT));
        assert_eq!(config.metadata_file(), "experiment_info.json");
        assert_eq!(config.results_file(), "results.json");
        assert_eq!(
            config.index_path(),
            Path::new(DEFAULT_ROOT).join("experiment_index.csv")
        );
        assert_eq!(config.sweep_job_prefix(), "job_");
        assert_eq!(config.on_malformed(), MalformedPolicy::Abort);
    }

    #[test]
    fn test_index_path_follows_root() {
        let config = TrackerConfig::new("/tmp/runs");
        assert_eq!(
            config.index_path(),
            Path::new("/tmp/runs/experiment_index.csv")
        );
    }

    #[test]
    fn test_builder_overrides() {
        let config = TrackerConfig::builder()
            .root("runs")
            .metadata_file("meta.json")
            .results_file("metrics.json")
            .index_path("index.csv")
            .sweep_job_prefix("trial_")
            .on_malformed(MalformedPolicy::Skip)
            .build();

        assert_eq!(config.metadata_file(), "meta.json");
        assert_eq!(config.results_file(), "metrics.json");
        assert_eq!(config.index_path(), Path::new("index.csv"));
        assert_eq!(config.sweep_job_prefix(), "trial_");
        assert_eq!(config.on_malformed(), MalformedPolicy::Skip);
    }

    #[test]
    fn test_malformed_policy_from_str() {
        assert_eq!("abort".parse::<MalformedPolicy>().unwrap(), MalformedPolicy::Abort);
        assert_eq!("SKIP".parse::<MalformedPolicy>().unwrap(), MalformedPolicy::Skip);
        assert!("ignore".parse::<MalformedPolicy>().unwrap_err().is_usage());
    }
}
