//! Tests for the top-level configuration and command API

use std::path::Path;

use experiment_index::{Command, MalformedPolicy, RankOptions, TrackerConfig};

#[test]
fn test_config_builder_defaults() {
    let config = TrackerConfig::builder().build();
    assert_eq!(config.root(), Path::new("./outputs"));
    assert_eq!(config.on_malformed(), MalformedPolicy::Abort);
}

#[test]
fn test_config_builder_chain() {
    let config = TrackerConfig::builder()
        .root("runs")
        .on_malformed(MalformedPolicy::Skip)
        .index_path("reports/index.csv")
        .build();

    assert_eq!(config.root(), Path::new("runs"));
    assert_eq!(config.index_path(), Path::new("reports/index.csv"));
    assert_eq!(config.on_malformed(), MalformedPolicy::Skip);
}

#[test]
fn test_config_clone_eq() {
    let config = TrackerConfig::new("runs");
    assert_eq!(config.clone(), config);
}

#[test]
fn test_rank_options_default() {
    let options = RankOptions::default();
    assert_eq!(options.metric, "best_accuracy");
    assert_eq!(options.top, 5);
}

#[test]
fn test_command_debug() {
    let command = Command::parse(Some("sweeps"), &[], &RankOptions::default()).unwrap();
    let debug_str = format!("{command:?}");
    assert!(debug_str.contains("Sweeps"));
}
