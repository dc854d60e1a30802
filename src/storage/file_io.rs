//! JSON file helpers
//!
//! Writes go to a sibling temp file that is synced and renamed over the
//! target, so a data file is either the old or the new version.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::{de::DeserializeOwned, Serialize};

use crate::error::{VatbookError, VatbookResult};

fn persistence(action: &str, path: &Path, err: impl std::fmt::Display) -> VatbookError {
    VatbookError::Persistence(format!("Failed to {} {}: {}", action, path.display(), err))
}

/// Read JSON from a file, or `T::default()` if the file does not exist yet
pub fn read_json<T, P>(path: P) -> VatbookResult<T>
where
    T: DeserializeOwned + Default,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    if !path.exists() {
        return Ok(T::default());
    }
    read_json_required(path)
}

/// Read JSON from a file that must exist
pub fn read_json_required<T, P>(path: P) -> VatbookResult<T>
where
    T: DeserializeOwned,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| persistence("open", path, e))?;
    serde_json::from_reader(BufReader::new(file)).map_err(|e| persistence("parse", path, e))
}

/// Serialize `data` as pretty JSON and atomically replace `path`
pub fn write_json_atomic<T, P>(path: P, data: &T) -> VatbookResult<()>
where
    T: Serialize,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| persistence("create directory", parent, e))?;
    }

    // Same directory as the target so the rename stays on one filesystem
    let temp_path = temp_path_for(path);
    let result = write_and_sync(&temp_path, data).and_then(|()| {
        fs::rename(&temp_path, path).map_err(|e| persistence("replace", path, e))
    });

    if result.is_err() {
        let _ = fs::remove_file(&temp_path);
    }
    result
}

fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

fn write_and_sync<T: Serialize>(temp_path: &Path, data: &T) -> VatbookResult<()> {
    let file = File::create(temp_path).map_err(|e| persistence("create", temp_path, e))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, data)
        .map_err(|e| persistence("serialize", temp_path, e))?;
    writer.flush().map_err(|e| persistence("flush", temp_path, e))?;
    writer
        .get_ref()
        .sync_all()
        .map_err(|e| persistence("sync", temp_path, e))
}

/// Whether a file exists and holds parseable JSON
pub fn json_file_valid<P: AsRef<Path>>(path: P) -> bool {
    File::open(path.as_ref())
        .ok()
        .map(|file| serde_json::from_reader::<_, serde_json::Value>(BufReader::new(file)).is_ok())
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use tempfile::TempDir;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
    struct Ledger {
        owner: String,
        entries: Vec<i64>,
    }

    fn sample() -> Ledger {
        Ledger {
            owner: "Kiosk Nord".into(),
            entries: vec![1_900, -500],
        }
    }

    #[test]
    fn test_missing_file_reads_as_default() {
        let temp_dir = TempDir::new().unwrap();
        let ledger: Ledger = read_json(temp_dir.path().join("missing.json")).unwrap();
        assert_eq!(ledger, Ledger::default());

        let err = read_json_required::<Ledger, _>(temp_dir.path().join("missing.json")).unwrap_err();
        assert!(err.is_persistence());
    }

    #[test]
    fn test_atomic_write_round_trip_leaves_no_temp_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("data").join("ledger.json");

        write_json_atomic(&path, &sample()).unwrap();

        assert!(path.exists());
        assert!(!temp_dir.path().join("data").join("ledger.json.tmp").exists());
        let loaded: Ledger = read_json(&path).unwrap();
        assert_eq!(loaded, sample());
    }

    #[test]
    fn test_corrupt_file_is_persistence_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("ledger.json");
        fs::write(&path, "{ not json").unwrap();

        assert!(!json_file_valid(&path));
        assert!(read_json::<Ledger, _>(&path).unwrap_err().is_persistence());
    }
}
