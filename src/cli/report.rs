//! CLI commands for reports
//!
//! Every report can be written to a CSV file with `--output`; `-` writes the
//! CSV to stdout.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use clap::{Args, Subcommand};

use crate::error::{VatbookError, VatbookResult};
use crate::models::ReportTimeframe;
use crate::services::FinanceBook;
use crate::storage::FinanceBackend;

use super::{parse_date, today};

/// Options shared by the period reports
#[derive(Args, Debug)]
pub struct ReportOptions {
    /// Period to cover: month, quarter or year (from its first day onwards)
    #[arg(short, long, default_value = "month")]
    timeframe: ReportTimeframe,
    /// Reference date instead of today (YYYY-MM-DD or DD.MM.YYYY)
    #[arg(long)]
    date: Option<String>,
    /// Export as CSV to this file ("-" for stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

/// Report subcommands
#[derive(Subcommand, Debug)]
pub enum ReportCommands {
    /// Six-month overview with current month and year-to-date figures
    Dashboard {
        /// Reference date instead of today
        #[arg(long)]
        date: Option<String>,
    },

    /// Profit and loss by category
    #[command(alias = "pnl")]
    ProfitLoss(ReportOptions),

    /// VAT collected, paid and the resulting balance
    Vat(ReportOptions),

    /// Expense share per category
    Expenses(ReportOptions),
}

/// Handle report commands
pub fn handle_report_command<B: FinanceBackend>(
    book: &FinanceBook<B>,
    cmd: ReportCommands,
) -> VatbookResult<()> {
    let show_currency = book.settings().currency_display;

    match cmd {
        ReportCommands::Dashboard { date } => {
            let reference = reference_date(date.as_deref())?;
            print!("{}", book.dashboard(reference).format_terminal(show_currency));
        }

        ReportCommands::ProfitLoss(opts) => {
            let report = book.profit_loss(opts.timeframe, reference_date(opts.date.as_deref())?);
            match &opts.output {
                Some(path) => write_csv(path, |w| report.export_csv(w))?,
                None => print!("{}", report.format_terminal(show_currency)),
            }
        }

        ReportCommands::Vat(opts) => {
            let report = book.vat_summary(opts.timeframe, reference_date(opts.date.as_deref())?);
            match &opts.output {
                Some(path) => write_csv(path, |w| report.export_csv(w))?,
                None => print!("{}", report.format_terminal(show_currency)),
            }
        }

        ReportCommands::Expenses(opts) => {
            let report =
                book.expense_breakdown(opts.timeframe, reference_date(opts.date.as_deref())?);
            match &opts.output {
                Some(path) => write_csv(path, |w| report.export_csv(w))?,
                None => print!("{}", report.format_terminal(show_currency)),
            }
        }
    }

    Ok(())
}

fn reference_date(input: Option<&str>) -> VatbookResult<chrono::NaiveDate> {
    Ok(input.map(parse_date).transpose()?.unwrap_or_else(today))
}

/// Run `export` against the target file, or stdout for `-`
pub(crate) fn write_csv<F>(path: &Path, export: F) -> VatbookResult<()>
where
    F: FnOnce(&mut dyn Write) -> VatbookResult<()>,
{
    if path == Path::new("-") {
        let stdout = io::stdout();
        let mut lock = stdout.lock();
        return export(&mut lock);
    }

    let file = File::create(path).map_err(|e| {
        VatbookError::Export(format!("Failed to create {}: {}", path.display(), e))
    })?;
    let mut writer = BufWriter::new(file);
    export(&mut writer)?;
    writer.flush()?;
    eprintln!("Exported to {}", path.display());
    Ok(())
}
