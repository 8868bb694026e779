//! Tests for error types

use std::path::PathBuf;

use experiment_index::Error;

#[test]
fn test_usage_error_lists_modes() {
    let error = Error::Usage("unrecognized mode 'publish'".to_string());
    let error_str = format!("{error}");
    assert!(error_str.contains("Usage error"));
    assert!(error_str.contains("publish"));
    assert!(error_str.contains("build (default), list"));
    assert!(error.is_usage());
}

#[test]
fn test_parse_error_names_path() {
    let error = Error::parse("outputs/expB/experiment_info.json", "expected value at line 1");
    let error_str = format!("{error}");
    assert!(error_str.contains("Parse error"));
    assert!(error_str.contains("outputs/expB/experiment_info.json"));
    assert!(error_str.contains("expected value"));
    assert!(!error.is_usage());
}

#[test]
fn test_write_error() {
    let error = Error::Write {
        path: PathBuf::from("/read-only/experiment_index.csv"),
        source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "permission denied"),
    };
    let error_str = format!("{error}");
    assert!(error_str.contains("Failed to write index"));
    assert!(error_str.contains("experiment_index.csv"));
    assert!(error_str.contains("permission denied"));
    assert!(std::error::Error::source(&error).is_some());
}

#[test]
fn test_invalid_input_error() {
    let error = Error::InvalidInput("k must be greater than 0".to_string());
    let error_str = format!("{error}");
    assert!(error_str.contains("Invalid input"));
    assert!(error_str.contains("k must be greater than 0"));
}

#[test]
fn test_io_error_conversion() {
    let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
    let error: Error = io_error.into();
    let error_str = format!("{error}");
    assert!(error_str.contains("IO error"));
}

#[test]
fn test_other_error() {
    let error = Error::Other("custom error message".to_string());
    let error_str = format!("{error}");
    assert_eq!(error_str, "custom error message");
}

#[test]
fn test_error_debug() {
    let error = Error::Usage("x".to_string());
    let debug_str = format!("{error:?}");
    assert!(debug_str.contains("Usage"));
}

#[test]
fn test_result_type_alias() {
    #[allow(clippy::unnecessary_wraps)]
    fn returns_result() -> experiment_index::Result<i32> {
        Ok(42)
    }

    let result = returns_result();
    assert!(result.is_ok());
    assert_eq!(result.unwrap(), 42);
}
