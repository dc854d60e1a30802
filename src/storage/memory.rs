//! In-process backend
//!
//! Keeps records in memory only. A failure can be injected so that every
//! write is rejected, which is how callers exercise their error paths.

use std::sync::RwLock;

use crate::error::{VatbookError, VatbookResult};
use crate::models::{Category, CategoryId, Transaction, TransactionId};

use super::repository::Repository;
use super::FinanceBackend;

pub struct MemoryBackend {
    categories: Repository<Category>,
    transactions: Repository<Transaction>,
    failure: RwLock<Option<String>>,
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self {
            categories: Repository::in_memory(),
            transactions: Repository::in_memory(),
            failure: RwLock::new(None),
        }
    }

    /// Backend pre-filled with records
    pub fn with_records(
        categories: Vec<Category>,
        transactions: Vec<Transaction>,
    ) -> VatbookResult<Self> {
        let backend = Self::new();
        backend.categories.seed(categories)?;
        backend.transactions.seed(transactions)?;
        Ok(backend)
    }

    /// Reject every following write with `message`
    pub fn fail_with(&self, message: impl Into<String>) {
        if let Ok(mut failure) = self.failure.write() {
            *failure = Some(message.into());
        }
    }

    /// Accept writes again
    pub fn clear_failure(&self) {
        if let Ok(mut failure) = self.failure.write() {
            *failure = None;
        }
    }

    fn check_failure(&self) -> VatbookResult<()> {
        let failure = self.failure.read().map_err(|e| {
            VatbookError::Persistence(format!("Failed to acquire read lock: {}", e))
        })?;
        match failure.as_ref() {
            Some(message) => Err(VatbookError::Persistence(message.clone())),
            None => Ok(()),
        }
    }
}

impl FinanceBackend for MemoryBackend {
    fn list_categories(&self) -> VatbookResult<Vec<Category>> {
        self.categories.get_all()
    }

    fn list_transactions(&self) -> VatbookResult<Vec<Transaction>> {
        self.transactions.get_all()
    }

    fn insert_category(&self, category: &Category) -> VatbookResult<Category> {
        self.check_failure()?;
        self.categories.insert(category.clone())
    }

    fn update_category(&self, category: &Category) -> VatbookResult<Category> {
        self.check_failure()?;
        self.categories.update(category.clone())
    }

    fn delete_category(&self, id: CategoryId) -> VatbookResult<()> {
        self.check_failure()?;
        self.categories.delete(id).map(|_| ())
    }

    fn insert_transaction(&self, transaction: &Transaction) -> VatbookResult<Transaction> {
        self.check_failure()?;
        self.transactions.insert(transaction.clone())
    }

    fn update_transaction(&self, transaction: &Transaction) -> VatbookResult<Transaction> {
        self.check_failure()?;
        self.transactions.update(transaction.clone())
    }

    fn delete_transaction(&self, id: TransactionId) -> VatbookResult<()> {
        self.check_failure()?;
        self.transactions.delete(id).map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CategoryKind;

    #[test]
    fn test_failure_injection() {
        let backend = MemoryBackend::new();
        backend.fail_with("database offline");

        let err = backend
            .insert_category(&Category::new("Rent", CategoryKind::Expense))
            .unwrap_err();
        assert_eq!(err.to_string(), "Persistence error: database offline");
        assert!(backend.list_categories().unwrap().is_empty());

        backend.clear_failure();
        backend
            .insert_category(&Category::new("Rent", CategoryKind::Expense))
            .unwrap();
        assert_eq!(backend.list_categories().unwrap().len(), 1);
    }
}
