//! Backup manager
//!
//! Archives are single JSON documents named
//! `vatbook-YYYYMMDD-HHMMSS-mmm.json` inside the backup directory.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::paths::VatbookPaths;
use crate::config::settings::BackupRetention;
use crate::error::{VatbookError, VatbookResult};
use crate::models::MonthKey;
use crate::storage::{read_json, write_json_atomic};

pub const ARCHIVE_SCHEMA_VERSION: u32 = 1;

const FILE_PREFIX: &str = "vatbook-";
const TIMESTAMP_FORMAT: &str = "%Y%m%d-%H%M%S-%3f";

/// Metadata about a backup on disk
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackupInfo {
    pub filename: String,
    pub path: PathBuf,
    pub created_at: DateTime<Utc>,
    pub size_bytes: u64,
    /// First backup of its calendar month
    pub is_monthly: bool,
}

/// Contents of one backup file
///
/// Each section holds the file's JSON verbatim, or `null` when the file did
/// not exist yet.
#[derive(Debug, Serialize, Deserialize)]
pub struct BackupArchive {
    pub schema_version: u32,
    pub created_at: DateTime<Utc>,
    pub settings: serde_json::Value,
    pub categories: serde_json::Value,
    pub transactions: serde_json::Value,
}

pub struct BackupManager {
    backup_dir: PathBuf,
    paths: VatbookPaths,
    retention: BackupRetention,
}

impl BackupManager {
    pub fn new(paths: VatbookPaths, retention: BackupRetention) -> Self {
        Self {
            backup_dir: paths.backup_dir(),
            paths,
            retention,
        }
    }

    pub fn backup_dir(&self) -> &Path {
        &self.backup_dir
    }

    /// Write a new archive and return its path
    pub fn create_backup(&self) -> VatbookResult<PathBuf> {
        fs::create_dir_all(&self.backup_dir)
            .map_err(|e| VatbookError::Backup(format!("Failed to create backup directory: {}", e)))?;

        let now = Utc::now();
        let archive = BackupArchive {
            schema_version: ARCHIVE_SCHEMA_VERSION,
            created_at: now,
            settings: read_json(self.paths.settings_file())?,
            categories: read_json(self.paths.categories_file())?,
            transactions: read_json(self.paths.transactions_file())?,
        };

        let path = self.backup_dir.join(backup_filename(now));
        write_json_atomic(&path, &archive)
            .map_err(|e| VatbookError::Backup(format!("Failed to write {}: {}", path.display(), e)))?;

        tracing::info!(path = %path.display(), "created backup");
        Ok(path)
    }

    /// Create a backup, then prune old ones
    pub fn create_backup_with_retention(&self) -> VatbookResult<(PathBuf, Vec<PathBuf>)> {
        let path = self.create_backup()?;
        let deleted = self.enforce_retention()?;
        Ok((path, deleted))
    }

    /// All backups, newest first
    pub fn list_backups(&self) -> VatbookResult<Vec<BackupInfo>> {
        if !self.backup_dir.exists() {
            return Ok(Vec::new());
        }

        let entries = fs::read_dir(&self.backup_dir)
            .map_err(|e| VatbookError::Backup(format!("Failed to read backup directory: {}", e)))?;

        let mut backups = Vec::new();
        for entry in entries {
            let path = entry?.path();
            if let Some(info) = parse_backup_info(&path) {
                backups.push(info);
            }
        }

        backups.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        let mut seen_months = HashSet::new();
        for backup in &mut backups {
            backup.is_monthly = seen_months.insert(MonthKey::from_date(backup.created_at.date_naive()));
        }
        backups.reverse();

        Ok(backups)
    }

    pub fn latest_backup(&self) -> VatbookResult<Option<BackupInfo>> {
        Ok(self.list_backups()?.into_iter().next())
    }

    /// Delete backups beyond the retention counts, returning the removed paths
    pub fn enforce_retention(&self) -> VatbookResult<Vec<PathBuf>> {
        let (monthly, daily): (Vec<_>, Vec<_>) =
            self.list_backups()?.into_iter().partition(|b| b.is_monthly);

        let expired = daily
            .into_iter()
            .skip(self.retention.daily_count as usize)
            .chain(monthly.into_iter().skip(self.retention.monthly_count as usize));

        let mut deleted = Vec::new();
        for backup in expired {
            fs::remove_file(&backup.path).map_err(|e| {
                VatbookError::Backup(format!("Failed to delete {}: {}", backup.filename, e))
            })?;
            tracing::debug!(file = %backup.filename, "pruned backup");
            deleted.push(backup.path);
        }

        Ok(deleted)
    }

    /// Read an archive back from disk
    pub fn load_archive(&self, path: &Path) -> VatbookResult<BackupArchive> {
        let contents = fs::read_to_string(path)?;
        let archive: BackupArchive = serde_json::from_str(&contents)
            .map_err(|e| VatbookError::Backup(format!("Invalid backup {}: {}", path.display(), e)))?;

        if archive.schema_version > ARCHIVE_SCHEMA_VERSION {
            return Err(VatbookError::Backup(format!(
                "Backup schema version {} is newer than supported version {}",
                archive.schema_version, ARCHIVE_SCHEMA_VERSION
            )));
        }
        Ok(archive)
    }

    /// Find a backup by `latest`, file name or path
    pub fn resolve(&self, name: &str) -> VatbookResult<PathBuf> {
        if name == "latest" {
            return self
                .latest_backup()?
                .map(|b| b.path)
                .ok_or_else(|| VatbookError::Backup("No backups found".into()));
        }

        let direct = PathBuf::from(name);
        if direct.is_file() {
            return Ok(direct);
        }
        let in_dir = self.backup_dir.join(name);
        if in_dir.is_file() {
            return Ok(in_dir);
        }
        Err(VatbookError::Backup(format!("Backup not found: {}", name)))
    }

    /// Replace the current data files with an archive's contents
    ///
    /// The current state is backed up first. Sections that were absent when
    /// the archive was taken leave the matching file alone.
    pub fn restore(&self, path: &Path) -> VatbookResult<RestoreSummary> {
        let archive = self.load_archive(path)?;
        let pre_restore = self.create_backup()?;

        let sections = [
            (&archive.settings, self.paths.settings_file()),
            (&archive.categories, self.paths.categories_file()),
            (&archive.transactions, self.paths.transactions_file()),
        ];
        let mut restored = 0;
        for (section, target) in sections {
            if section.is_null() {
                continue;
            }
            write_json_atomic(&target, section)?;
            restored += 1;
        }

        tracing::info!(
            backup = %path.display(),
            pre_restore = %pre_restore.display(),
            restored,
            "restored backup"
        );
        Ok(RestoreSummary {
            created_at: archive.created_at,
            pre_restore,
            sections_restored: restored,
        })
    }
}

/// Outcome of [`BackupManager::restore`]
#[derive(Debug)]
pub struct RestoreSummary {
    /// When the restored archive was taken
    pub created_at: DateTime<Utc>,
    /// Backup of the data that was replaced
    pub pre_restore: PathBuf,
    pub sections_restored: usize,
}

fn backup_filename(timestamp: DateTime<Utc>) -> String {
    format!("{}{}.json", FILE_PREFIX, timestamp.format(TIMESTAMP_FORMAT))
}

fn parse_backup_timestamp(stem: &str) -> Option<DateTime<Utc>> {
    let raw = stem.strip_prefix(FILE_PREFIX)?;
    NaiveDateTime::parse_from_str(raw, TIMESTAMP_FORMAT)
        .ok()
        .map(|naive| naive.and_utc())
}

fn parse_backup_info(path: &Path) -> Option<BackupInfo> {
    if path.extension()? != "json" {
        return None;
    }
    let filename = path.file_name()?.to_string_lossy().into_owned();
    let created_at = parse_backup_timestamp(path.file_stem()?.to_str()?)?;
    let size_bytes = fs::metadata(path).ok()?.len();

    Some(BackupInfo {
        filename,
        path: path.to_path_buf(),
        created_at,
        size_bytes,
        is_monthly: false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, TimeZone};
    use tempfile::TempDir;

    fn manager(daily_count: u32, monthly_count: u32) -> (BackupManager, TempDir) {
        let temp = TempDir::new().unwrap();
        let paths = VatbookPaths::with_base_dir(temp.path());
        paths.ensure_directories().unwrap();
        let retention = BackupRetention {
            daily_count,
            monthly_count,
        };
        (BackupManager::new(paths, retention), temp)
    }

    fn touch_backup(manager: &BackupManager, timestamp: DateTime<Utc>) {
        fs::create_dir_all(manager.backup_dir()).unwrap();
        fs::write(manager.backup_dir().join(backup_filename(timestamp)), "{}").unwrap();
    }

    #[test]
    fn test_create_backup_captures_data_files() {
        let (manager, _temp) = manager(30, 12);
        fs::write(manager.paths.categories_file(), r#"[{"name":"Office"}]"#).unwrap();

        let path = manager.create_backup().unwrap();
        assert!(path.file_name().unwrap().to_string_lossy().starts_with("vatbook-"));

        let archive = manager.load_archive(&path).unwrap();
        assert_eq!(archive.schema_version, ARCHIVE_SCHEMA_VERSION);
        assert_eq!(archive.categories[0]["name"], "Office");
        assert!(archive.transactions.is_null());
    }

    #[test]
    fn test_timestamp_round_trip() {
        let timestamp = Utc.with_ymd_and_hms(2026, 10, 19, 14, 30, 22).unwrap();
        let name = backup_filename(timestamp);
        assert_eq!(name, "vatbook-20261019-143022-000.json");

        let parsed = parse_backup_timestamp(name.trim_end_matches(".json")).unwrap();
        assert_eq!(parsed, timestamp);
        assert!(parse_backup_timestamp("backup-20261019-143022").is_none());
    }

    #[test]
    fn test_list_marks_first_of_month() {
        let (manager, _temp) = manager(30, 12);
        touch_backup(&manager, Utc.with_ymd_and_hms(2026, 9, 3, 8, 0, 0).unwrap());
        touch_backup(&manager, Utc.with_ymd_and_hms(2026, 9, 20, 8, 0, 0).unwrap());
        touch_backup(&manager, Utc.with_ymd_and_hms(2026, 10, 2, 8, 0, 0).unwrap());
        fs::write(manager.backup_dir().join("notes.txt"), "ignored").unwrap();

        let backups = manager.list_backups().unwrap();
        assert_eq!(backups.len(), 3);
        assert_eq!(backups[0].created_at.month(), 10);
        let monthly: Vec<_> = backups.iter().map(|b| b.is_monthly).collect();
        assert_eq!(monthly, vec![true, false, true]);
    }

    #[test]
    fn test_retention_keeps_configured_counts() {
        let (manager, _temp) = manager(2, 1);
        for day in 1..=5 {
            touch_backup(&manager, Utc.with_ymd_and_hms(2026, 10, day, 8, 0, 0).unwrap());
        }
        touch_backup(&manager, Utc.with_ymd_and_hms(2026, 9, 15, 8, 0, 0).unwrap());

        let deleted = manager.enforce_retention().unwrap();
        // Daily: Oct 2..5 keep 5th and 4th. Monthly: Oct 1 and Sep 15 keep Oct 1.
        assert_eq!(deleted.len(), 3);

        let remaining = manager.list_backups().unwrap();
        let days: Vec<_> = remaining.iter().map(|b| b.created_at.day()).collect();
        assert_eq!(days, vec![5, 4, 1]);
    }

    #[test]
    fn test_empty_backup_dir() {
        let (manager, _temp) = manager(30, 12);
        assert!(manager.list_backups().unwrap().is_empty());
        assert!(manager.latest_backup().unwrap().is_none());
    }

    #[test]
    fn test_restore_replaces_data_files() {
        let (manager, _temp) = manager(30, 12);
        fs::write(manager.paths.categories_file(), r#"[{"name":"Office"}]"#).unwrap();
        let archived = manager.create_backup().unwrap();
        std::thread::sleep(std::time::Duration::from_millis(5));

        fs::write(manager.paths.categories_file(), r#"[{"name":"Travel"}]"#).unwrap();
        fs::write(manager.paths.transactions_file(), "[]").unwrap();

        let summary = manager.restore(&archived).unwrap();
        assert_eq!(summary.sections_restored, 1);
        assert_ne!(summary.pre_restore, archived);

        let categories = fs::read_to_string(manager.paths.categories_file()).unwrap();
        assert!(categories.contains("Office"));
        // Absent when archived, so left as it was
        assert!(manager.paths.transactions_file().exists());

        let previous = manager.load_archive(&summary.pre_restore).unwrap();
        assert_eq!(previous.categories[0]["name"], "Travel");
    }

    #[test]
    fn test_resolve_backup_names() {
        let (manager, _temp) = manager(30, 12);
        assert!(matches!(manager.resolve("latest"), Err(VatbookError::Backup(_))));

        let older = Utc.with_ymd_and_hms(2026, 10, 1, 8, 0, 0).unwrap();
        let newer = Utc.with_ymd_and_hms(2026, 10, 2, 8, 0, 0).unwrap();
        touch_backup(&manager, older);
        touch_backup(&manager, newer);

        let latest = manager.resolve("latest").unwrap();
        assert!(latest.ends_with(backup_filename(newer)));
        assert_eq!(
            manager.resolve(&backup_filename(older)).unwrap(),
            manager.backup_dir().join(backup_filename(older))
        );
        assert!(manager.resolve("vatbook-missing.json").is_err());
    }

    #[test]
    fn test_rejects_newer_schema() {
        let (manager, _temp) = manager(30, 12);
        let path = manager.backup_dir().join("vatbook-20261019-143022-000.json");
        fs::create_dir_all(manager.backup_dir()).unwrap();
        fs::write(
            &path,
            r#"{"schema_version":99,"created_at":"2026-10-19T14:30:22Z","settings":null,"categories":null,"transactions":null}"#,
        )
        .unwrap();
        assert!(matches!(manager.load_archive(&path), Err(VatbookError::Backup(_))));
    }
}
