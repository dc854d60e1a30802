//! Storage layer for vatbook
//!
//! The bookkeeping core talks to persistence only through [`FinanceBackend`].
//! Two backends exist: [`JsonBackend`] keeps one JSON file per entity with
//! atomic writes, [`MemoryBackend`] lives in-process.

pub mod file_io;
pub mod json;
pub mod memory;
pub mod repository;

pub use file_io::{read_json, write_json_atomic};
pub use json::JsonBackend;
pub use memory::MemoryBackend;
pub use repository::{Record, Repository};

use crate::error::VatbookResult;
use crate::models::{Category, CategoryId, Transaction, TransactionId};

/// Persistence collaborator for categories and transactions
///
/// A write either fully succeeds and returns the stored record, or fails
/// without changing what was stored.
pub trait FinanceBackend {
    fn list_categories(&self) -> VatbookResult<Vec<Category>>;

    fn list_transactions(&self) -> VatbookResult<Vec<Transaction>>;

    fn insert_category(&self, category: &Category) -> VatbookResult<Category>;

    fn update_category(&self, category: &Category) -> VatbookResult<Category>;

    fn delete_category(&self, id: CategoryId) -> VatbookResult<()>;

    fn insert_transaction(&self, transaction: &Transaction) -> VatbookResult<Transaction>;

    fn update_transaction(&self, transaction: &Transaction) -> VatbookResult<Transaction>;

    fn delete_transaction(&self, id: TransactionId) -> VatbookResult<()>;
}
