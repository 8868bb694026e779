//! CSV index writer
//!
//! The whole file is rendered in memory, written to a `.tmp` sibling and
//! renamed over the destination. A failed run leaves any previous index
//! untouched and no temporary file behind.

use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use arrow::csv::WriterBuilder;
use tracing::{debug, info};

use super::batch::to_record_batch;
use super::IndexTable;
use crate::{Error, Result};

/// Render the index as CSV: header line, then one line per row.
///
/// # Errors
///
/// Returns an Arrow error if serialization fails.
pub fn to_csv_bytes(table: &IndexTable) -> Result<Vec<u8>> {
    let batch = to_record_batch(table)?;
    let mut buf = Vec::new();
    {
        let mut writer = WriterBuilder::new().with_header(true).build(&mut buf);
        writer.write(&batch)?;
    }
    Ok(buf)
}

/// Write the index to `path` atomically.
///
/// Parent directories are created when missing.
///
/// # Errors
///
/// Returns [`Error::Write`] if the destination cannot be written.
pub fn write_index(table: &IndexTable, path: &Path) -> Result<()> {
    let data = to_csv_bytes(table)?;
    atomic_write(path, &data).map_err(|source| Error::Write {
        path: path.to_path_buf(),
        source,
    })?;
    info!(
        path = %path.display(),
        rows = table.num_rows(),
        columns = table.num_columns(),
        "wrote experiment index"
    );
    Ok(())
}

fn atomic_write(path: &Path, data: &[u8]) -> io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let tmp = tmp_path(path)?;
    debug!(tmp = %tmp.display(), "writing temporary index");
    let written = fs::write(&tmp, data).and_then(|()| fs::rename(&tmp, path));
    if written.is_err() {
        let _ = fs::remove_file(&tmp);
    }
    written
}

fn tmp_path(path: &Path) -> io::Result<PathBuf> {
    let mut name: OsString = path
        .file_name()
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "destination has no file name"))?
        .to_os_string();
    name.push(".tmp");
    Ok(path.with_file_name(name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::experiment::ExperimentRecord;
    use tempfile::TempDir;

    fn table() -> IndexTable {
        vec![
            ExperimentRecord::builder("expA", "expA")
                .field("model", "X")
                .field("lr", 0.1)
                .build(),
            ExperimentRecord::builder("expB", "expB")
                .field("model", "Y")
                .field("lr", 0.2)
                .field("seed", 7)
                .build(),
        ]
        .into_iter()
        .collect()
    }

    fn lines(bytes: &[u8]) -> Vec<String> {
        String::from_utf8(bytes.to_vec())
            .unwrap()
            .lines()
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn test_csv_layout() {
        let csv = to_csv_bytes(&table()).unwrap();
        assert_eq!(
            lines(&csv),
            vec!["source,model,lr,seed", "expA,X,0.1,", "expB,Y,0.2,7"]
        );
    }

    #[test]
    fn test_csv_quotes_commas() {
        let table: IndexTable = vec![ExperimentRecord::builder("a", "a")
            .field("note", "warmup, then decay")
            .build()]
        .into_iter()
        .collect();

        let csv = to_csv_bytes(&table).unwrap();
        assert_eq!(lines(&csv)[1], "a,\"warmup, then decay\"");
    }

    #[test]
    fn test_write_index_creates_parents() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("reports/index.csv");

        write_index(&table(), &path).unwrap();

        assert_eq!(fs::read(&path).unwrap(), to_csv_bytes(&table()).unwrap());
        assert!(!dir.path().join("reports/index.csv.tmp").exists());
    }

    #[test]
    fn test_write_index_onto_directory_fails_cleanly() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("taken");
        fs::create_dir(&path).unwrap();

        let err = write_index(&table(), &path).unwrap_err();
        assert!(matches!(err, Error::Write { .. }));
        assert!(!dir.path().join("taken.tmp").exists());
    }

    #[test]
    fn test_write_index_under_file_fails() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "").unwrap();

        let err = write_index(&table(), &blocker.join("index.csv")).unwrap_err();
        assert!(matches!(err, Error::Write { ref path, .. } if path.ends_with("index.csv")));
    }
}
