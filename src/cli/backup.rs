//! Backup CLI commands

use clap::Subcommand;

use crate::backup::BackupManager;
use crate::config::paths::VatbookPaths;
use crate::config::settings::Settings;
use crate::error::VatbookResult;

/// Backup subcommands
#[derive(Subcommand)]
pub enum BackupCommands {
    /// Create a new backup and prune old ones
    Create,

    /// List all available backups
    List {
        /// Show size and full path
        #[arg(short, long)]
        verbose: bool,
    },

    /// Replace the current data with a backup
    Restore {
        /// Backup file name, path, or `latest`
        backup: String,

        /// Restore without asking for confirmation
        #[arg(short, long)]
        force: bool,
    },
}

/// Handle a backup command
pub fn handle_backup_command(
    paths: &VatbookPaths,
    settings: &Settings,
    cmd: BackupCommands,
) -> VatbookResult<()> {
    let manager = BackupManager::new(paths.clone(), settings.backup_retention);

    match cmd {
        BackupCommands::Create => {
            let (path, deleted) = manager.create_backup_with_retention()?;
            println!("Backup created: {}", path.display());
            if !deleted.is_empty() {
                println!("Removed {} old backup(s)", deleted.len());
            }
        }

        BackupCommands::List { verbose } => {
            let backups = manager.list_backups()?;
            if backups.is_empty() {
                println!("No backups found.");
                println!("Create one with: vatbook backup create");
                return Ok(());
            }

            println!("Available Backups");
            println!("=================");
            for backup in &backups {
                let kind = if backup.is_monthly { "monthly" } else { "daily" };
                println!(
                    "{}  {:<8} {}",
                    backup.created_at.format("%d.%m.%Y %H:%M:%S"),
                    kind,
                    backup.filename
                );
                if verbose {
                    println!("    {} bytes  {}", backup.size_bytes, backup.path.display());
                }
            }
            println!();
            println!("{} backup(s) in {}", backups.len(), manager.backup_dir().display());
        }

        BackupCommands::Restore { backup, force } => {
            let path = manager.resolve(&backup)?;
            let archive = manager.load_archive(&path)?;

            println!("Backup: {}", path.display());
            println!("Created: {}", archive.created_at.format("%d.%m.%Y %H:%M:%S UTC"));
            if !force {
                println!();
                println!("This replaces all current categories, transactions and settings.");
                println!("To proceed, run: vatbook backup restore {} --force", backup);
                return Ok(());
            }

            let summary = manager.restore(&path)?;
            println!("Previous data saved to: {}", summary.pre_restore.display());
            println!("Restored {} data file(s)", summary.sections_restored);
        }
    }

    Ok(())
}

/// Back up after a successful change when enabled in the settings
///
/// Failures are logged, never returned: the change itself already succeeded.
pub fn auto_backup(paths: &VatbookPaths, settings: &Settings) {
    if !settings.auto_backup {
        return;
    }
    let manager = BackupManager::new(paths.clone(), settings.backup_retention);
    if let Err(e) = manager.create_backup_with_retention() {
        tracing::warn!(error = %e, "automatic backup failed");
    }
}
