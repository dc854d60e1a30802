//! Category registry
//!
//! In-memory lookup of categories in insertion order. The registry only holds
//! records; lifecycle rules that involve transactions live in `FinanceBook`.

use crate::error::{VatbookError, VatbookResult};
use crate::models::{Category, CategoryId, TransactionType};

/// Ordered collection of categories
#[derive(Debug, Clone, Default)]
pub struct CategoryRegistry {
    categories: Vec<Category>,
}

impl CategoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from loaded records, keeping their order
    pub fn from_categories(categories: Vec<Category>) -> Self {
        Self { categories }
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// All categories in insertion order
    pub fn all(&self) -> &[Category] {
        &self.categories
    }

    pub fn get(&self, id: CategoryId) -> Option<&Category> {
        self.categories.iter().find(|c| c.id == id)
    }

    /// Get a category by name (case-insensitive)
    pub fn get_by_name(&self, name: &str) -> Option<&Category> {
        let name = name.trim().to_lowercase();
        self.categories
            .iter()
            .find(|c| c.name.to_lowercase() == name)
    }

    /// Find a category by name or ID string
    pub fn find(&self, identifier: &str) -> Option<&Category> {
        if let Some(category) = self.get_by_name(identifier) {
            return Some(category);
        }

        if let Ok(id) = identifier.trim().parse::<CategoryId>() {
            return self.get(id);
        }

        // Short display form, e.g. "cat-1a2b3c4d"
        if !identifier.trim().starts_with(CategoryId::PREFIX) {
            return None;
        }
        let mut matches = self
            .categories
            .iter()
            .filter(|c| c.id.matches_short(identifier));
        match (matches.next(), matches.next()) {
            (Some(category), None) => Some(category),
            _ => None,
        }
    }

    /// Find a category or fail with NotFound
    pub fn require(&self, identifier: &str) -> VatbookResult<&Category> {
        self.find(identifier)
            .ok_or_else(|| VatbookError::category_not_found(identifier))
    }

    /// Categories usable for a transaction type, preserving order
    pub fn filter_applicable(&self, transaction_type: TransactionType) -> Vec<&Category> {
        filter_applicable(&self.categories, transaction_type)
    }

    /// Whether transactions in this category may carry VAT
    ///
    /// Unknown categories count as VAT-applicable.
    pub fn is_vat_applicable(&self, id: CategoryId) -> bool {
        self.get(id).map(|c| c.vat_applicable).unwrap_or(true)
    }

    /// Category name for display, or a placeholder for dangling references
    pub fn name_of(&self, id: CategoryId) -> &str {
        self.get(id).map(|c| c.name.as_str()).unwrap_or("Unknown")
    }

    pub(crate) fn insert(&mut self, category: Category) {
        self.categories.push(category);
    }

    /// Replace the record with the same id, keeping its position
    pub(crate) fn replace(&mut self, category: Category) -> VatbookResult<()> {
        let slot = self
            .categories
            .iter_mut()
            .find(|c| c.id == category.id)
            .ok_or_else(|| VatbookError::category_not_found(category.id.to_string()))?;
        *slot = category;
        Ok(())
    }

    pub(crate) fn remove(&mut self, id: CategoryId) -> Option<Category> {
        let idx = self.categories.iter().position(|c| c.id == id)?;
        Some(self.categories.remove(idx))
    }
}

/// Categories whose kind matches `transaction_type` or is `Both`, in input order
pub fn filter_applicable(
    categories: &[Category],
    transaction_type: TransactionType,
) -> Vec<&Category> {
    categories
        .iter()
        .filter(|c| c.accepts(transaction_type))
        .collect()
}
