//! Settings CLI commands

use clap::Subcommand;

use crate::config::paths::VatbookPaths;
use crate::config::settings::Settings;
use crate::error::VatbookResult;

/// Settings subcommands
#[derive(Subcommand)]
pub enum SettingsCommands {
    /// Show current settings and paths
    Show,

    /// Change a setting
    ///
    /// Keys: auto_vat, vat_mode (auto/manual), vat_rate (e.g. 19 or 7),
    /// currency_display, auto_backup, backup_daily, backup_monthly.
    Set {
        key: String,
        value: String,
    },
}

/// Handle a settings command
pub fn handle_settings_command(
    paths: &VatbookPaths,
    settings: &mut Settings,
    cmd: SettingsCommands,
) -> VatbookResult<()> {
    match cmd {
        SettingsCommands::Show => {
            println!("vatbook configuration");
            println!("=====================");
            println!("Base directory:   {}", paths.base_dir().display());
            println!("Data directory:   {}", paths.data_dir().display());
            println!("Backup directory: {}", paths.backup_dir().display());
            println!();
            println!("VAT mode:         {}", settings.vat_mode());
            println!("VAT rate:         {}", settings.vat_rate());
            println!("Currency symbol:  {}", on_off(settings.currency_display));
            println!("Auto backup:      {}", on_off(settings.auto_backup));
            println!(
                "Backup retention: {} daily, {} monthly",
                settings.backup_retention.daily_count, settings.backup_retention.monthly_count
            );
        }

        SettingsCommands::Set { key, value } => {
            settings.set(&key, &value)?;
            settings.save(paths)?;
            tracing::info!(%key, %value, "updated setting");
            println!("Updated {} = {}", key, value);
        }
    }

    Ok(())
}

fn on_off(value: bool) -> &'static str {
    if value {
        "on"
    } else {
        "off"
    }
}
