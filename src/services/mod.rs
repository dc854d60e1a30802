//! Service layer for vatbook
//!
//! Business logic on top of the storage layer: VAT computation, category
//! rules, the transaction store and the [`FinanceBook`] that ties them to a
//! persistence backend.

pub mod book;
pub mod category;
pub mod transaction;
pub mod vat;

pub use book::{CategoryUpdate, FinanceBook, TransactionDraft};
pub use category::{filter_applicable, CategoryRegistry};
pub use transaction::{
    SortDirection, SortField, TransactionPatch, TransactionQuery, TransactionStore,
    TransactionView,
};
pub use vat::{AmountBreakdown, AmountCalculator, VatMode, VatRate};
