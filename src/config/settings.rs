//! User settings for vatbook
//!
//! Global preferences for VAT handling, amount display and backups. Settings
//! are passed explicitly to whatever needs them and are never global state.

use serde::{Deserialize, Serialize};

use super::paths::VatbookPaths;
use crate::error::{VatbookError, VatbookResult};
use crate::services::vat::{VatMode, VatRate};
use crate::storage::file_io::{read_json_required, write_json_atomic};

/// Backup retention settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackupRetention {
    /// Number of daily backups to keep
    pub daily_count: u32,
    /// Number of monthly backups to keep
    pub monthly_count: u32,
}

impl Default for BackupRetention {
    fn default() -> Self {
        Self {
            daily_count: 30,
            monthly_count: 12,
        }
    }
}

/// User settings for vatbook
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Compute VAT from the rate (true) or take it from user input (false)
    #[serde(default = "default_true")]
    pub auto_vat: bool,

    /// Show amounts with the euro sign
    #[serde(default = "default_true")]
    pub currency_display: bool,

    /// Write a backup after every change
    #[serde(default = "default_true")]
    pub auto_backup: bool,

    /// VAT rate in basis points
    #[serde(default = "default_vat_rate")]
    pub vat_rate: u32,

    #[serde(default)]
    pub backup_retention: BackupRetention,
}

fn default_schema_version() -> u32 {
    1
}

fn default_true() -> bool {
    true
}

fn default_vat_rate() -> u32 {
    VatRate::GERMAN_STANDARD.basis_points()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            auto_vat: true,
            currency_display: true,
            auto_backup: true,
            vat_rate: default_vat_rate(),
            backup_retention: BackupRetention::default(),
        }
    }
}

impl Settings {
    pub fn vat_mode(&self) -> VatMode {
        if self.auto_vat {
            VatMode::Auto
        } else {
            VatMode::Manual
        }
    }

    pub fn vat_rate(&self) -> VatRate {
        VatRate::from_basis_points(self.vat_rate)
    }

    /// Load settings from disk, or defaults if the file doesn't exist
    ///
    /// Defaults are not written; the caller decides when to persist.
    pub fn load_or_create(paths: &VatbookPaths) -> VatbookResult<Self> {
        let settings_path = paths.settings_file();
        if !settings_path.exists() {
            return Ok(Settings::default());
        }

        read_json_required(&settings_path)
            .map_err(|e| VatbookError::Config(format!("Failed to load settings: {}", e)))
    }

    /// Save settings to disk
    pub fn save(&self, paths: &VatbookPaths) -> VatbookResult<()> {
        paths.ensure_directories()?;
        write_json_atomic(paths.settings_file(), self)
            .map_err(|e| VatbookError::Config(format!("Failed to save settings: {}", e)))
    }

    /// Set a single option from its key, as used by `settings set`
    pub fn set(&mut self, key: &str, value: &str) -> VatbookResult<()> {
        match key.trim().to_lowercase().replace('-', "_").as_str() {
            "auto_vat" => self.auto_vat = parse_bool(key, value)?,
            "currency_display" => self.currency_display = parse_bool(key, value)?,
            "auto_backup" => self.auto_backup = parse_bool(key, value)?,
            "vat_mode" => {
                let mode: VatMode = value.parse().map_err(VatbookError::Config)?;
                self.auto_vat = mode == VatMode::Auto;
            }
            "vat_rate" => {
                let rate: VatRate = value.parse().map_err(VatbookError::Config)?;
                self.vat_rate = rate.basis_points();
            }
            "backup_daily" => self.backup_retention.daily_count = parse_count(key, value)?,
            "backup_monthly" => self.backup_retention.monthly_count = parse_count(key, value)?,
            other => {
                return Err(VatbookError::Config(format!(
                    "Unknown setting '{}' (expected auto_vat, currency_display, auto_backup, vat_mode, vat_rate, backup_daily or backup_monthly)",
                    other
                )))
            }
        }
        Ok(())
    }
}

fn parse_bool(key: &str, value: &str) -> VatbookResult<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "on" | "yes" | "1" => Ok(true),
        "false" | "off" | "no" | "0" => Ok(false),
        _ => Err(VatbookError::Config(format!(
            "Invalid value '{}' for {} (expected true or false)",
            value, key
        ))),
    }
}

fn parse_count(key: &str, value: &str) -> VatbookResult<u32> {
    value.trim().parse().map_err(|_| {
        VatbookError::Config(format!("Invalid value '{}' for {} (expected a number)", value, key))
    })
}
