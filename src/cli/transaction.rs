//! Transaction CLI commands

use clap::Subcommand;

use crate::display::{format_transaction_details, format_transaction_table};
use crate::error::{VatbookError, VatbookResult};
use crate::models::{Money, RecurringFrequency, TransactionType};
use crate::services::vat::{parse_manual_vat, parse_net_amount};
use crate::services::{
    FinanceBook, SortDirection, SortField, TransactionDraft, TransactionPatch, TransactionQuery,
    VatMode,
};
use crate::storage::FinanceBackend;

use super::{parse_date, today};

/// Transaction subcommands
#[derive(Subcommand)]
pub enum TransactionCommands {
    /// Add a new transaction
    Add {
        /// Net amount before VAT (e.g. "100", "1.234,56")
        amount: String,
        /// Category name or ID
        #[arg(short, long)]
        category: String,
        /// Description
        #[arg(short = 'D', long)]
        description: String,
        /// Transaction type: expense or revenue
        #[arg(short = 't', long = "type", default_value = "expense")]
        kind: TransactionType,
        /// Transaction date (YYYY-MM-DD or DD.MM.YYYY), defaults to today
        #[arg(short, long)]
        date: Option<String>,
        /// VAT amount, used when automatic VAT is off
        #[arg(long)]
        vat: Option<String>,
        /// Transaction is exempt from VAT
        #[arg(long)]
        exempt: bool,
        /// Free-form notes
        #[arg(short, long)]
        notes: Option<String>,
        /// Path or reference to the invoice document
        #[arg(long)]
        invoice: Option<String>,
        /// Repeat interval: daily, weekly, monthly or yearly
        #[arg(long)]
        recurring: Option<RecurringFrequency>,
    },

    /// List transactions
    List {
        /// Search description, category and notes
        #[arg(short, long)]
        search: Option<String>,
        /// Only revenue or expense
        #[arg(short = 't', long = "type")]
        kind: Option<TransactionType>,
        /// Category name or ID
        #[arg(short, long)]
        category: Option<String>,
        /// Start date, inclusive
        #[arg(long)]
        from: Option<String>,
        /// End date, inclusive
        #[arg(long)]
        to: Option<String>,
        /// Sort by date, type, category, description, amount, vat, total or created
        #[arg(long, default_value = "date")]
        sort: SortField,
        /// Sort ascending instead of descending
        #[arg(long)]
        asc: bool,
        /// Maximum number of transactions to show
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Show transaction details
    Show {
        /// Transaction ID (or a unique prefix)
        id: String,
    },

    /// Edit a transaction
    Edit {
        /// Transaction ID (or a unique prefix)
        id: String,
        /// New net amount
        #[arg(short, long)]
        amount: Option<String>,
        /// New VAT amount, used when automatic VAT is off
        #[arg(long)]
        vat: Option<String>,
        /// New category name or ID
        #[arg(short, long)]
        category: Option<String>,
        /// New description
        #[arg(short = 'D', long)]
        description: Option<String>,
        /// New type
        #[arg(short = 't', long = "type")]
        kind: Option<TransactionType>,
        /// New date
        #[arg(short, long)]
        date: Option<String>,
        /// Whether the transaction is VAT exempt (true/false)
        #[arg(long)]
        exempt: Option<bool>,
        /// New notes
        #[arg(short, long, conflicts_with = "clear_notes")]
        notes: Option<String>,
        /// Remove the notes
        #[arg(long)]
        clear_notes: bool,
        /// New invoice reference
        #[arg(long, conflicts_with = "clear_invoice")]
        invoice: Option<String>,
        /// Remove the invoice reference
        #[arg(long)]
        clear_invoice: bool,
        /// Make recurring with this interval
        #[arg(long, conflicts_with = "no_recurring")]
        recurring: Option<RecurringFrequency>,
        /// Stop recurring
        #[arg(long)]
        no_recurring: bool,
    },

    /// Delete a transaction
    Delete {
        /// Transaction ID (or a unique prefix)
        id: String,
    },
}

impl TransactionCommands {
    /// Whether the command changes stored data
    pub fn mutates(&self) -> bool {
        !matches!(self, Self::List { .. } | Self::Show { .. })
    }
}

/// Handle a transaction command
pub fn handle_transaction_command<B: FinanceBackend>(
    book: &mut FinanceBook<B>,
    cmd: TransactionCommands,
) -> VatbookResult<()> {
    let show_currency = book.settings().currency_display;

    match cmd {
        TransactionCommands::Add {
            amount,
            category,
            description,
            kind,
            date,
            vat,
            exempt,
            notes,
            invoice,
            recurring,
        } => {
            let category_id = book.categories().require(&category)?.id;
            let date = date.as_deref().map(parse_date).transpose()?.unwrap_or_else(today);
            let net = parse_net_amount(&amount)?;

            let mut draft = TransactionDraft::new(date, kind, category_id, description, net)
                .vat_exempt(exempt);
            if let Some(vat) = manual_vat(book, vat.as_deref()) {
                draft = draft.manual_vat(vat);
            }
            if let Some(notes) = notes {
                draft = draft.notes(notes);
            }
            if let Some(invoice) = invoice {
                draft = draft.invoice_path(invoice);
            }
            if let Some(frequency) = recurring {
                draft = draft.recurring(frequency);
            }

            let txn = book.add_transaction(draft)?;
            println!("Created transaction: {}", txn.id);
            println!("  {} {}", txn.date.format("%d.%m.%Y"), txn.description);
            println!("  Net:   {}", txn.amount.format_de(show_currency));
            println!("  VAT:   {}", txn.vat.format_de(show_currency));
            println!("  Total: {}", txn.total_amount.format_de(show_currency));
        }

        TransactionCommands::List {
            search,
            kind,
            category,
            from,
            to,
            sort,
            asc,
            limit,
        } => {
            let direction = if asc {
                SortDirection::Ascending
            } else {
                SortDirection::Descending
            };
            let mut query = TransactionQuery::new().sort_by(sort, direction).date_range(
                from.as_deref().map(parse_date).transpose()?,
                to.as_deref().map(parse_date).transpose()?,
            );
            if let Some(search) = search {
                query = query.search(search);
            }
            if let Some(kind) = kind {
                query = query.kind(kind);
            }
            if let Some(category) = category {
                query = query.category(book.categories().require(&category)?.id);
            }
            if let Some(limit) = limit {
                query = query.limit(limit);
            }

            let views = book.list_transactions(&query);
            print!("{}", format_transaction_table(&views, show_currency));
        }

        TransactionCommands::Show { id } => {
            let id = book.transactions().require(&id)?.id;
            let view = book
                .view(id)
                .ok_or_else(|| VatbookError::transaction_not_found(id.to_string()))?;
            print!("{}", format_transaction_details(&view, show_currency));
        }

        TransactionCommands::Edit {
            id,
            amount,
            vat,
            category,
            description,
            kind,
            date,
            exempt,
            notes,
            clear_notes,
            invoice,
            clear_invoice,
            recurring,
            no_recurring,
        } => {
            let id = book.transactions().require(&id)?.id;

            let mut patch = TransactionPatch {
                kind,
                description,
                vat_exempt: exempt,
                vat: manual_vat(book, vat.as_deref()),
                ..Default::default()
            };
            if let Some(amount) = amount {
                patch.amount = Some(parse_net_amount(&amount)?);
            }
            if let Some(category) = category {
                patch.category_id = Some(book.categories().require(&category)?.id);
            }
            if let Some(date) = date {
                patch.date = Some(parse_date(&date)?);
            }
            if clear_notes {
                patch.notes = Some(None);
            } else if notes.is_some() {
                patch.notes = Some(notes);
            }
            if clear_invoice {
                patch.invoice_path = Some(None);
            } else if invoice.is_some() {
                patch.invoice_path = Some(invoice);
            }
            if no_recurring {
                patch.recurring = Some(false);
            } else if recurring.is_some() {
                patch.recurring = Some(true);
                patch.recurring_frequency = Some(recurring);
            }

            if patch.is_empty() {
                println!("No changes specified. See 'vatbook transaction edit --help'.");
                return Ok(());
            }

            let txn = book.update_transaction(id, patch)?;
            println!("Updated transaction: {}", txn.id);
            println!("  Total: {}", txn.total_amount.format_de(show_currency));
        }

        TransactionCommands::Delete { id } => {
            let id = book.transactions().require(&id)?.id;
            let deleted = book.delete_transaction(id)?;
            println!("Deleted transaction: {} ({})", deleted.description, deleted.id);
        }
    }

    Ok(())
}

/// Parse `--vat`, which only has an effect in manual mode
fn manual_vat<B: FinanceBackend>(book: &FinanceBook<B>, input: Option<&str>) -> Option<Money> {
    let input = input?;
    if book.calculator().mode() == VatMode::Auto {
        tracing::warn!("--vat ignored because automatic VAT is enabled");
        return None;
    }
    Some(parse_manual_vat(input))
}
