//! JSON file backend
//!
//! Stores `data/categories.json` and `data/transactions.json` as JSON arrays.

use crate::config::paths::VatbookPaths;
use crate::error::VatbookResult;
use crate::models::{Category, CategoryId, Transaction, TransactionId};

use super::repository::Repository;
use super::FinanceBackend;

pub struct JsonBackend {
    paths: VatbookPaths,
    categories: Repository<Category>,
    transactions: Repository<Transaction>,
}

impl JsonBackend {
    /// Create the data directories and load both files
    pub fn open(paths: VatbookPaths) -> VatbookResult<Self> {
        paths.ensure_directories()?;

        let backend = Self {
            categories: Repository::with_file(paths.categories_file()),
            transactions: Repository::with_file(paths.transactions_file()),
            paths,
        };
        backend.categories.load()?;
        backend.transactions.load()?;

        tracing::debug!(
            base_dir = %backend.paths.base_dir().display(),
            categories = backend.categories.len()?,
            transactions = backend.transactions.len()?,
            "opened JSON storage"
        );
        Ok(backend)
    }

    pub fn paths(&self) -> &VatbookPaths {
        &self.paths
    }
}

impl FinanceBackend for JsonBackend {
    fn list_categories(&self) -> VatbookResult<Vec<Category>> {
        self.categories.get_all()
    }

    fn list_transactions(&self) -> VatbookResult<Vec<Transaction>> {
        self.transactions.get_all()
    }

    fn insert_category(&self, category: &Category) -> VatbookResult<Category> {
        self.categories.insert(category.clone())
    }

    fn update_category(&self, category: &Category) -> VatbookResult<Category> {
        self.categories.update(category.clone())
    }

    fn delete_category(&self, id: CategoryId) -> VatbookResult<()> {
        self.categories.delete(id).map(|_| ())
    }

    fn insert_transaction(&self, transaction: &Transaction) -> VatbookResult<Transaction> {
        self.transactions.insert(transaction.clone())
    }

    fn update_transaction(&self, transaction: &Transaction) -> VatbookResult<Transaction> {
        self.transactions.update(transaction.clone())
    }

    fn delete_transaction(&self, id: TransactionId) -> VatbookResult<()> {
        self.transactions.delete(id).map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CategoryKind, Money, TransactionType};
    use chrono::NaiveDate;
    use tempfile::TempDir;

    #[test]
    fn test_open_creates_layout() {
        let temp_dir = TempDir::new().unwrap();
        let backend = JsonBackend::open(VatbookPaths::with_base_dir(temp_dir.path())).unwrap();

        assert!(backend.paths().data_dir().is_dir());
        assert!(backend.list_categories().unwrap().is_empty());
        assert!(backend.list_transactions().unwrap().is_empty());
    }

    #[test]
    fn test_records_survive_reopen() {
        let temp_dir = TempDir::new().unwrap();
        let paths = VatbookPaths::with_base_dir(temp_dir.path());

        let category = Category::new("Office", CategoryKind::Expense);
        let transaction = Transaction::new(
            NaiveDate::from_ymd_opt(2026, 3, 2).unwrap(),
            TransactionType::Expense,
            category.id,
            "Desk",
            Money::from_cents(25_000),
        );
        {
            let backend = JsonBackend::open(paths.clone()).unwrap();
            backend.insert_category(&category).unwrap();
            backend.insert_transaction(&transaction).unwrap();
        }

        let backend = JsonBackend::open(paths.clone()).unwrap();
        assert_eq!(backend.list_categories().unwrap(), vec![category]);
        assert_eq!(backend.list_transactions().unwrap(), vec![transaction.clone()]);

        backend.delete_transaction(transaction.id).unwrap();
        let raw = std::fs::read_to_string(paths.transactions_file()).unwrap();
        assert_eq!(raw.trim(), "[]");
    }
}
