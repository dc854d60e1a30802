//! Backup system for vatbook
//!
//! Rolling JSON backups of the settings and both data files.
//!
//! # Retention Policy
//!
//! The oldest backup of each calendar month counts as that month's monthly
//! backup. By default the newest 30 other backups and the newest 12 monthly
//! backups are kept.

mod manager;

pub use manager::{
    BackupArchive, BackupInfo, BackupManager, RestoreSummary, ARCHIVE_SCHEMA_VERSION,
};
