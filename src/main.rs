use anyhow::Result;
use clap::{Parser, Subcommand};

use vatbook::cli::{
    auto_backup, handle_backup_command, handle_category_command, handle_export_command,
    handle_report_command, handle_settings_command, handle_transaction_command, BackupCommands,
    CategoryCommands, ExportArgs, ReportCommands, SettingsCommands, TransactionCommands,
};
use vatbook::config::{paths::VatbookPaths, settings::Settings};
use vatbook::logging::init_tracing;
use vatbook::services::FinanceBook;
use vatbook::storage::JsonBackend;

#[derive(Parser)]
#[command(
    name = "vatbook",
    version,
    about = "Income and expense tracking with German VAT",
    long_about = "vatbook records business revenue and expenses, computes German VAT \
                  (19% by default) and produces dashboard, profit & loss, VAT and \
                  expense reports from the command line."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Category management commands
    #[command(subcommand)]
    Category(CategoryCommands),

    /// Transaction management commands
    #[command(subcommand, alias = "txn")]
    Transaction(TransactionCommands),

    /// Reports
    #[command(subcommand)]
    Report(ReportCommands),

    /// Export data as CSV
    Export(ExportArgs),

    /// Show or change settings
    #[command(subcommand)]
    Settings(SettingsCommands),

    /// Backup management commands
    #[command(subcommand)]
    Backup(BackupCommands),
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let Some(command) = cli.command else {
        println!("vatbook - income and expense tracking with German VAT");
        println!();
        println!("Run 'vatbook --help' for usage information.");
        return Ok(());
    };

    let paths = VatbookPaths::new()?;
    paths.ensure_directories()?;
    let mut settings = Settings::load_or_create(&paths)?;

    match command {
        Commands::Settings(cmd) => handle_settings_command(&paths, &mut settings, cmd)?,
        Commands::Backup(cmd) => handle_backup_command(&paths, &settings, cmd)?,
        command => {
            let backend = JsonBackend::open(paths.clone())?;
            let mut book = FinanceBook::open(backend, settings)?;

            let mutated = match command {
                Commands::Category(cmd) => {
                    let mutates = cmd.mutates();
                    handle_category_command(&mut book, cmd)?;
                    mutates
                }
                Commands::Transaction(cmd) => {
                    let mutates = cmd.mutates();
                    handle_transaction_command(&mut book, cmd)?;
                    mutates
                }
                Commands::Report(cmd) => {
                    handle_report_command(&book, cmd)?;
                    false
                }
                Commands::Export(args) => {
                    handle_export_command(&book, args)?;
                    false
                }
                Commands::Settings(_) | Commands::Backup(_) => false,
            };

            if mutated {
                auto_backup(&paths, book.settings());
            }
        }
    }

    Ok(())
}
