//! Finance book
//!
//! Owns the settings, the category registry, the transaction store and the
//! persistence backend. Every mutation validates first, computes amounts,
//! writes through the backend and only then updates the in-memory state, so a
//! rejected write leaves everything as it was.

use chrono::NaiveDate;

use crate::config::settings::Settings;
use crate::error::{VatbookError, VatbookResult};
use crate::models::{
    Category, CategoryId, CategoryKind, Money, RecurringFrequency, ReportTimeframe, Transaction,
    TransactionId, TransactionType,
};
use crate::reports::{DashboardSummary, ExpenseBreakdownReport, ProfitLossReport, VatSummary};
use crate::storage::FinanceBackend;

use super::category::CategoryRegistry;
use super::transaction::{TransactionPatch, TransactionQuery, TransactionStore, TransactionView};
use super::vat::{AmountBreakdown, AmountCalculator};

/// Input for creating a new transaction
#[derive(Debug, Clone)]
pub struct TransactionDraft {
    pub date: NaiveDate,
    pub kind: TransactionType,
    pub category_id: CategoryId,
    pub description: String,
    /// Net amount
    pub amount: Money,
    /// Only used in manual VAT mode; absent means zero
    pub manual_vat: Option<Money>,
    pub vat_exempt: bool,
    pub notes: Option<String>,
    pub invoice_path: Option<String>,
    pub recurring: bool,
    pub recurring_frequency: Option<RecurringFrequency>,
}

impl TransactionDraft {
    pub fn new(
        date: NaiveDate,
        kind: TransactionType,
        category_id: CategoryId,
        description: impl Into<String>,
        amount: Money,
    ) -> Self {
        Self {
            date,
            kind,
            category_id,
            description: description.into(),
            amount,
            manual_vat: None,
            vat_exempt: false,
            notes: None,
            invoice_path: None,
            recurring: false,
            recurring_frequency: None,
        }
    }

    pub fn manual_vat(mut self, vat: Money) -> Self {
        self.manual_vat = Some(vat);
        self
    }

    pub fn vat_exempt(mut self, vat_exempt: bool) -> Self {
        self.vat_exempt = vat_exempt;
        self
    }

    pub fn notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub fn invoice_path(mut self, path: impl Into<String>) -> Self {
        self.invoice_path = Some(path.into());
        self
    }

    pub fn recurring(mut self, frequency: RecurringFrequency) -> Self {
        self.recurring = true;
        self.recurring_frequency = Some(frequency);
        self
    }
}

/// Partial update of a category
#[derive(Debug, Clone, Default)]
pub struct CategoryUpdate {
    pub name: Option<String>,
    pub kind: Option<CategoryKind>,
    /// `Some(None)` removes the colour
    pub color: Option<Option<String>>,
    pub vat_applicable: Option<bool>,
}

impl CategoryUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.kind.is_none()
            && self.color.is_none()
            && self.vat_applicable.is_none()
    }
}

pub struct FinanceBook<B: FinanceBackend> {
    settings: Settings,
    categories: CategoryRegistry,
    transactions: TransactionStore,
    backend: B,
}

impl<B: FinanceBackend> FinanceBook<B> {
    /// Load all records from the backend
    ///
    /// Records with inconsistent amounts are repaired and written back, so
    /// the book starts out mirroring storage. A record that still fails
    /// validation afterwards is rejected.
    pub fn open(backend: B, settings: Settings) -> VatbookResult<Self> {
        let categories = CategoryRegistry::from_categories(
            backend.list_categories().map_err(persistence_failure)?,
        );
        let transactions = TransactionStore::from_transactions(
            backend.list_transactions().map_err(persistence_failure)?,
        );

        let mut book = Self {
            settings,
            categories,
            transactions,
            backend,
        };

        for id in book.write_repairs()? {
            tracing::warn!(id = %id, "repaired inconsistent VAT or total on load");
        }
        for txn in book.transactions.all() {
            txn.validate().map_err(|e| {
                VatbookError::Validation(format!("Stored transaction {} is invalid: {}", txn.id, e))
            })?;
        }

        Ok(book)
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Replace the settings used for subsequent calculations
    pub fn set_settings(&mut self, settings: Settings) {
        self.settings = settings;
    }

    pub fn calculator(&self) -> AmountCalculator {
        AmountCalculator::from_settings(&self.settings)
    }

    pub fn categories(&self) -> &CategoryRegistry {
        &self.categories
    }

    pub fn transactions(&self) -> &TransactionStore {
        &self.transactions
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    // === Categories ===

    /// Create a category
    pub fn add_category(&mut self, mut category: Category) -> VatbookResult<&Category> {
        category.name = category.name.trim().to_string();
        category
            .validate()
            .map_err(|e| VatbookError::Validation(e.to_string()))?;
        self.ensure_unique_name(&category.name, None)?;

        let stored = self
            .backend
            .insert_category(&category)
            .map_err(persistence_failure)?;

        tracing::info!(category = %stored.name, kind = %stored.kind, "created category");
        let id = stored.id;
        self.categories.insert(stored);
        self.categories
            .get(id)
            .ok_or_else(|| VatbookError::category_not_found(id.to_string()))
    }

    /// Apply a partial update to a category
    ///
    /// A type change is rejected if an existing transaction would no longer
    /// fit the category. Turning VAT off clears the VAT of the category's
    /// transactions and writes each cleared record through the backend; a
    /// failed write leaves the records written before it cleared.
    pub fn update_category(&mut self, id: CategoryId, update: CategoryUpdate) -> VatbookResult<&Category> {
        let existing = self
            .categories
            .get(id)
            .cloned()
            .ok_or_else(|| VatbookError::category_not_found(id.to_string()))?;

        let mut updated = existing.clone();
        if let Some(name) = &update.name {
            updated.name = name.trim().to_string();
        }
        if let Some(kind) = update.kind {
            updated.kind = kind;
        }
        if let Some(color) = &update.color {
            updated.color = color.clone();
        }
        if let Some(vat_applicable) = update.vat_applicable {
            updated.vat_applicable = vat_applicable;
        }

        updated
            .validate()
            .map_err(|e| VatbookError::Validation(e.to_string()))?;
        self.ensure_unique_name(&updated.name, Some(id))?;

        if updated.kind != existing.kind {
            if let Some(conflict) = self
                .transactions
                .for_category(id)
                .find(|t| !updated.accepts(t.kind))
            {
                return Err(VatbookError::CategoryTypeMismatch {
                    category: updated.name.clone(),
                    category_kind: updated.kind,
                    transaction_kind: conflict.kind,
                });
            }
        }

        updated.updated_at = chrono::Utc::now();
        let stored = self
            .backend
            .update_category(&updated)
            .map_err(persistence_failure)?;

        tracing::info!(category = %stored.name, "updated category");
        let vat_disabled = existing.vat_applicable && !stored.vat_applicable;
        self.categories.replace(stored)?;

        if vat_disabled {
            let cleared = self.write_repairs()?;
            tracing::info!(category = %updated.name, cleared = cleared.len(), "VAT disabled for category");
        }

        self.categories
            .get(id)
            .ok_or_else(|| VatbookError::category_not_found(id.to_string()))
    }

    /// Delete a category that no transaction references
    pub fn delete_category(&mut self, id: CategoryId) -> VatbookResult<Category> {
        let category = self
            .categories
            .get(id)
            .cloned()
            .ok_or_else(|| VatbookError::category_not_found(id.to_string()))?;

        let count = self.transactions.count_for_category(id);
        if count > 0 {
            tracing::warn!(category = %category.name, count, "category deletion blocked");
            return Err(VatbookError::CategoryInUse {
                category: category.name,
                count,
            });
        }

        self.backend
            .delete_category(id)
            .map_err(persistence_failure)?;

        tracing::info!(category = %category.name, "deleted category");
        self.categories.remove(id);
        Ok(category)
    }

    /// Write corrected copies of inconsistent records through the backend
    ///
    /// Each record is applied in memory as soon as its write succeeds.
    fn write_repairs(&mut self) -> VatbookResult<Vec<TransactionId>> {
        let mut written = Vec::new();
        for mut txn in self.transactions.needing_repair(&self.categories) {
            txn.updated_at = chrono::Utc::now();
            let stored = self
                .backend
                .update_transaction(&txn)
                .map_err(persistence_failure)?;
            written.push(self.transactions.replace(stored)?.id);
        }
        Ok(written)
    }

    fn ensure_unique_name(&self, name: &str, except: Option<CategoryId>) -> VatbookResult<()> {
        match self.categories.get_by_name(name) {
            Some(existing) if Some(existing.id) != except => Err(VatbookError::Duplicate {
                entity_type: "Category",
                identifier: name.to_string(),
            }),
            _ => Ok(()),
        }
    }

    // === Transactions ===

    /// Create a transaction with VAT and total computed from the settings
    pub fn add_transaction(&mut self, draft: TransactionDraft) -> VatbookResult<&Transaction> {
        let description = draft.description.trim().to_string();
        if description.is_empty() {
            return Err(VatbookError::Validation("Description cannot be empty".into()));
        }

        let category = self.compatible_category(draft.category_id, draft.kind)?;
        let breakdown = self.amounts_for(
            category,
            draft.amount,
            draft.manual_vat,
            draft.vat_exempt,
        )?;

        let mut txn = Transaction::new(
            draft.date,
            draft.kind,
            draft.category_id,
            description,
            breakdown.net,
        );
        txn.set_amounts(breakdown.net, breakdown.vat);
        txn.vat_exempt = draft.vat_exempt;
        txn.notes = draft.notes.filter(|n| !n.trim().is_empty());
        txn.invoice_path = draft.invoice_path;
        txn.recurring = draft.recurring;
        txn.recurring_frequency = draft.recurring_frequency.filter(|_| draft.recurring);
        txn.validate()
            .map_err(|e| VatbookError::Validation(e.to_string()))?;

        let stored = self
            .backend
            .insert_transaction(&txn)
            .map_err(persistence_failure)?;

        tracing::info!(
            id = %stored.id,
            kind = %stored.kind,
            total = stored.total_amount.cents(),
            "created transaction"
        );
        let id = stored.id;
        self.transactions.add(stored);
        self.transactions
            .get(id)
            .ok_or_else(|| VatbookError::transaction_not_found(id.to_string()))
    }

    /// Merge a patch into a transaction
    ///
    /// VAT and total are recomputed when amount, VAT, exemption, type or
    /// category change. In manual mode the current VAT stays unless the patch
    /// brings a new one.
    pub fn update_transaction(&mut self, id: TransactionId, patch: TransactionPatch) -> VatbookResult<&Transaction> {
        let existing_vat = self
            .transactions
            .get(id)
            .map(|t| t.vat)
            .ok_or_else(|| VatbookError::transaction_not_found(id.to_string()))?;

        let mut updated = self.transactions.preview_update(id, &patch)?;
        if updated.description.is_empty() {
            return Err(VatbookError::Validation("Description cannot be empty".into()));
        }

        let category = self.compatible_category(updated.category_id, updated.kind)?;
        if patch.affects_amounts() {
            let manual_vat = patch.vat.or(Some(existing_vat));
            let breakdown =
                self.amounts_for(category, updated.amount, manual_vat, updated.vat_exempt)?;
            updated.set_amounts(breakdown.net, breakdown.vat);
        }
        updated
            .validate()
            .map_err(|e| VatbookError::Validation(e.to_string()))?;

        let stored = self
            .backend
            .update_transaction(&updated)
            .map_err(persistence_failure)?;

        tracing::info!(id = %stored.id, total = stored.total_amount.cents(), "updated transaction");
        self.transactions.replace(stored)
    }

    pub fn delete_transaction(&mut self, id: TransactionId) -> VatbookResult<Transaction> {
        if self.transactions.get(id).is_none() {
            return Err(VatbookError::transaction_not_found(id.to_string()));
        }

        self.backend
            .delete_transaction(id)
            .map_err(persistence_failure)?;

        tracing::info!(id = %id, "deleted transaction");
        self.transactions.delete(id)
    }

    /// Filtered, sorted transaction listing joined with categories
    pub fn list_transactions(&self, query: &TransactionQuery) -> Vec<TransactionView<'_>> {
        self.transactions.list(query, &self.categories)
    }

    /// Join one transaction with its category
    pub fn view(&self, id: TransactionId) -> Option<TransactionView<'_>> {
        self.transactions.get(id).map(|transaction| TransactionView {
            transaction,
            category: self.categories.get(transaction.category_id),
        })
    }

    fn compatible_category(&self, id: CategoryId, kind: TransactionType) -> VatbookResult<&Category> {
        let category = self
            .categories
            .get(id)
            .ok_or_else(|| VatbookError::category_not_found(id.to_string()))?;

        if !category.accepts(kind) {
            return Err(VatbookError::CategoryTypeMismatch {
                category: category.name.clone(),
                category_kind: category.kind,
                transaction_kind: kind,
            });
        }
        Ok(category)
    }

    fn amounts_for(
        &self,
        category: &Category,
        net: Money,
        manual_vat: Option<Money>,
        vat_exempt: bool,
    ) -> VatbookResult<AmountBreakdown> {
        let breakdown = self.calculator().calculate(net, manual_vat, vat_exempt)?;
        Ok(if category.vat_applicable {
            breakdown
        } else {
            breakdown.without_vat()
        })
    }

    // === Reports ===

    pub fn dashboard(&self, reference: NaiveDate) -> DashboardSummary {
        DashboardSummary::generate(self.transactions.all(), self.categories.all(), reference)
    }

    pub fn profit_loss(&self, timeframe: ReportTimeframe, reference: NaiveDate) -> ProfitLossReport {
        ProfitLossReport::generate(
            self.transactions.all(),
            self.categories.all(),
            timeframe,
            reference,
        )
    }

    pub fn vat_summary(&self, timeframe: ReportTimeframe, reference: NaiveDate) -> VatSummary {
        VatSummary::generate(self.transactions.all(), timeframe, reference)
    }

    pub fn expense_breakdown(&self, timeframe: ReportTimeframe, reference: NaiveDate) -> ExpenseBreakdownReport {
        ExpenseBreakdownReport::generate(
            self.transactions.all(),
            self.categories.all(),
            timeframe,
            reference,
        )
    }
}

fn persistence_failure(err: VatbookError) -> VatbookError {
    let err = match err {
        VatbookError::Persistence(_) => err,
        other => VatbookError::Persistence(other.to_string()),
    };
    tracing::warn!(error = %err, "persistence backend rejected operation");
    err
}
