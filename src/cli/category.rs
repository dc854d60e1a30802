//! Category CLI commands

use clap::Subcommand;

use crate::display::{format_category_details, format_category_table};
use crate::error::VatbookResult;
use crate::models::{Category, CategoryKind, TransactionType};
use crate::services::{CategoryUpdate, FinanceBook};
use crate::storage::FinanceBackend;

/// Category subcommands
#[derive(Subcommand)]
pub enum CategoryCommands {
    /// List categories with their usage counts
    List {
        /// Only categories usable for this transaction type (revenue or expense)
        #[arg(short = 't', long = "type")]
        kind: Option<TransactionType>,
    },

    /// Create a new category
    Add {
        /// Category name
        name: String,
        /// Category type: expense, revenue or both
        #[arg(short = 't', long = "type", default_value = "expense")]
        kind: CategoryKind,
        /// Display colour (#RRGGBB)
        #[arg(long)]
        color: Option<String>,
        /// Transactions in this category never carry VAT
        #[arg(long)]
        no_vat: bool,
    },

    /// Show category details
    Show {
        /// Category name or ID
        category: String,
    },

    /// Edit a category
    Edit {
        /// Category name or ID
        category: String,
        /// New name
        #[arg(short, long)]
        name: Option<String>,
        /// New type
        #[arg(short = 't', long = "type")]
        kind: Option<CategoryKind>,
        /// New colour (#RRGGBB)
        #[arg(long, conflicts_with = "clear_color")]
        color: Option<String>,
        /// Remove the colour
        #[arg(long)]
        clear_color: bool,
        /// Whether VAT applies (true/false)
        #[arg(long)]
        vat: Option<bool>,
    },

    /// Delete a category that has no transactions
    Delete {
        /// Category name or ID
        category: String,
    },
}

impl CategoryCommands {
    /// Whether the command changes stored data
    pub fn mutates(&self) -> bool {
        !matches!(self, Self::List { .. } | Self::Show { .. })
    }
}

/// Handle a category command
pub fn handle_category_command<B: FinanceBackend>(
    book: &mut FinanceBook<B>,
    cmd: CategoryCommands,
) -> VatbookResult<()> {
    match cmd {
        CategoryCommands::List { kind } => {
            let categories: Vec<&Category> = match kind {
                Some(kind) => book.categories().filter_applicable(kind),
                None => book.categories().all().iter().collect(),
            };
            let rows: Vec<_> = categories
                .into_iter()
                .map(|c| (c, book.transactions().count_for_category(c.id)))
                .collect();
            print!("{}", format_category_table(&rows));
        }

        CategoryCommands::Add {
            name,
            kind,
            color,
            no_vat,
        } => {
            let mut category = Category::new(name, kind).with_vat_applicable(!no_vat);
            if let Some(color) = color {
                category = category.with_color(color);
            }

            let category = book.add_category(category)?;
            println!("Created category: {}", category.name);
            println!("  Type: {}", category.kind);
            println!("  ID:   {}", category.id);
        }

        CategoryCommands::Show { category } => {
            let category = book.categories().require(&category)?;
            let usage = book.transactions().count_for_category(category.id);
            print!("{}", format_category_details(category, usage));
        }

        CategoryCommands::Edit {
            category,
            name,
            kind,
            color,
            clear_color,
            vat,
        } => {
            let id = book.categories().require(&category)?.id;
            let update = CategoryUpdate {
                name,
                kind,
                color: if clear_color { Some(None) } else { color.map(Some) },
                vat_applicable: vat,
            };

            if update.is_empty() {
                println!("No changes specified. Use --name, --type, --color, --clear-color or --vat.");
                return Ok(());
            }

            let updated = book.update_category(id, update)?;
            println!("Updated category: {}", updated.name);
        }

        CategoryCommands::Delete { category } => {
            let id = book.categories().require(&category)?.id;
            let deleted = book.delete_category(id)?;
            println!("Deleted category: {}", deleted.name);
        }
    }

    Ok(())
}
