//! Transaction store
//!
//! Ordered in-memory collection of transactions, newest first by date. Ties on
//! the same date are ordered by creation time, latest first. The store never
//! computes VAT itself; callers run the amount calculator before handing
//! records over.

use chrono::NaiveDate;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::error::{VatbookError, VatbookResult};
use crate::models::{
    Category, CategoryId, Money, RecurringFrequency, Transaction, TransactionId, TransactionType,
};

use super::category::CategoryRegistry;

/// Field to sort a transaction listing by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortField {
    #[default]
    Date,
    Type,
    Category,
    Description,
    Amount,
    Vat,
    Total,
    Created,
}

impl FromStr for SortField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "date" => Ok(Self::Date),
            "type" => Ok(Self::Type),
            "category" => Ok(Self::Category),
            "description" => Ok(Self::Description),
            "amount" | "net" => Ok(Self::Amount),
            "vat" => Ok(Self::Vat),
            "total" | "gross" => Ok(Self::Total),
            "created" => Ok(Self::Created),
            other => Err(format!("Unknown sort field '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    Ascending,
    #[default]
    Descending,
}

impl SortDirection {
    pub fn toggled(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ascending => write!(f, "asc"),
            Self::Descending => write!(f, "desc"),
        }
    }
}

/// Options for filtering and sorting a transaction listing
#[derive(Debug, Clone, Default)]
pub struct TransactionQuery {
    /// Case-insensitive substring over description, category name and notes
    pub search: Option<String>,
    pub kind: Option<TransactionType>,
    pub category_id: Option<CategoryId>,
    /// Inclusive lower bound
    pub start_date: Option<NaiveDate>,
    /// Inclusive upper bound
    pub end_date: Option<NaiveDate>,
    pub sort: SortField,
    pub direction: SortDirection,
    pub limit: Option<usize>,
}

impl TransactionQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search(mut self, text: impl Into<String>) -> Self {
        let text = text.into();
        self.search = if text.trim().is_empty() {
            None
        } else {
            Some(text)
        };
        self
    }

    pub fn kind(mut self, kind: TransactionType) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn category(mut self, category_id: CategoryId) -> Self {
        self.category_id = Some(category_id);
        self
    }

    pub fn date_range(mut self, start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        self.start_date = start;
        self.end_date = end;
        self
    }

    pub fn sort_by(mut self, field: SortField, direction: SortDirection) -> Self {
        self.sort = field;
        self.direction = direction;
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    fn matches(&self, view: &TransactionView<'_>) -> bool {
        let txn = view.transaction;

        if self.kind.is_some_and(|kind| txn.kind != kind) {
            return false;
        }
        if self.category_id.is_some_and(|id| txn.category_id != id) {
            return false;
        }
        if self.start_date.is_some_and(|start| txn.date < start) {
            return false;
        }
        if self.end_date.is_some_and(|end| txn.date > end) {
            return false;
        }

        match &self.search {
            Some(needle) => {
                let needle = needle.to_lowercase();
                txn.description.to_lowercase().contains(&needle)
                    || view.category_name().to_lowercase().contains(&needle)
                    || txn
                        .notes
                        .as_deref()
                        .is_some_and(|notes| notes.to_lowercase().contains(&needle))
            }
            None => true,
        }
    }

    fn compare(&self, a: &TransactionView<'_>, b: &TransactionView<'_>) -> Ordering {
        let (x, y) = (a.transaction, b.transaction);
        let ordering = match self.sort {
            SortField::Date => x.date.cmp(&y.date),
            SortField::Type => compare_text(&x.kind.to_string(), &y.kind.to_string()),
            SortField::Category => compare_text(a.category_name(), b.category_name()),
            SortField::Description => compare_text(&x.description, &y.description),
            SortField::Amount => x.amount.cmp(&y.amount),
            SortField::Vat => x.vat.cmp(&y.vat),
            SortField::Total => x.total_amount.cmp(&y.total_amount),
            SortField::Created => x.created_at.cmp(&y.created_at),
        };
        match self.direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    }
}

/// Case-folded comparison with a byte-wise tiebreak
fn compare_text(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

/// A transaction joined with its category
#[derive(Debug, Clone, Copy)]
pub struct TransactionView<'a> {
    pub transaction: &'a Transaction,
    pub category: Option<&'a Category>,
}

impl<'a> TransactionView<'a> {
    pub fn category_name(&self) -> &'a str {
        self.category.map(|c| c.name.as_str()).unwrap_or("Unknown")
    }
}

/// Partial update of a transaction
///
/// `None` leaves a field untouched. For optional fields the inner `None`
/// clears the value.
#[derive(Debug, Clone, Default)]
pub struct TransactionPatch {
    pub date: Option<NaiveDate>,
    pub kind: Option<TransactionType>,
    pub category_id: Option<CategoryId>,
    pub description: Option<String>,
    pub amount: Option<Money>,
    /// Manual VAT; only honoured in manual mode
    pub vat: Option<Money>,
    pub vat_exempt: Option<bool>,
    pub notes: Option<Option<String>>,
    pub invoice_path: Option<Option<String>>,
    pub recurring: Option<bool>,
    pub recurring_frequency: Option<Option<RecurringFrequency>>,
}

impl TransactionPatch {
    pub fn is_empty(&self) -> bool {
        self.date.is_none()
            && self.kind.is_none()
            && self.category_id.is_none()
            && self.description.is_none()
            && self.amount.is_none()
            && self.vat.is_none()
            && self.vat_exempt.is_none()
            && self.notes.is_none()
            && self.invoice_path.is_none()
            && self.recurring.is_none()
            && self.recurring_frequency.is_none()
    }

    /// Whether VAT and total must be recomputed after applying this patch
    pub fn affects_amounts(&self) -> bool {
        self.amount.is_some()
            || self.vat.is_some()
            || self.vat_exempt.is_some()
            || self.kind.is_some()
            || self.category_id.is_some()
    }

    /// Merge into a transaction and bump `updated_at`
    ///
    /// Amount and VAT are copied as given with the total derived from them.
    pub fn apply_to(&self, txn: &mut Transaction) {
        if let Some(date) = self.date {
            txn.date = date;
        }
        if let Some(kind) = self.kind {
            txn.kind = kind;
        }
        if let Some(category_id) = self.category_id {
            txn.category_id = category_id;
        }
        if let Some(description) = &self.description {
            txn.description = description.trim().to_string();
        }
        if let Some(vat_exempt) = self.vat_exempt {
            txn.vat_exempt = vat_exempt;
        }
        if self.amount.is_some() || self.vat.is_some() {
            txn.set_amounts(
                self.amount.unwrap_or(txn.amount),
                self.vat.unwrap_or(txn.vat),
            );
        }
        if let Some(notes) = &self.notes {
            txn.notes = notes.clone();
        }
        if let Some(invoice_path) = &self.invoice_path {
            txn.invoice_path = invoice_path.clone();
        }
        if let Some(recurring) = self.recurring {
            txn.recurring = recurring;
            if !recurring {
                txn.recurring_frequency = None;
            }
        }
        if let Some(frequency) = self.recurring_frequency {
            txn.recurring_frequency = frequency;
        }
        txn.touch();
    }
}

/// Newest-first collection of transactions
#[derive(Debug, Clone, Default)]
pub struct TransactionStore {
    transactions: Vec<Transaction>,
}

impl TransactionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from loaded records
    pub fn from_transactions(mut transactions: Vec<Transaction>) -> Self {
        transactions.sort_by(newest_first);
        Self { transactions }
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    /// All transactions, newest first
    pub fn all(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn get(&self, id: TransactionId) -> Option<&Transaction> {
        self.transactions.iter().find(|t| t.id == id)
    }

    /// Find a transaction by full id or by its short "txn-xxxxxxxx" form
    pub fn find(&self, identifier: &str) -> Option<&Transaction> {
        let identifier = identifier.trim();
        if let Ok(id) = identifier.parse::<TransactionId>() {
            return self.get(id);
        }

        let mut matches = self
            .transactions
            .iter()
            .filter(|t| t.id.matches_short(identifier));
        match (matches.next(), matches.next()) {
            (Some(txn), None) => Some(txn),
            _ => None,
        }
    }

    /// Find a transaction or fail with NotFound
    pub fn require(&self, identifier: &str) -> VatbookResult<&Transaction> {
        self.find(identifier)
            .ok_or_else(|| VatbookError::transaction_not_found(identifier))
    }

    /// Insert a record as the newest among its date
    pub fn add(&mut self, txn: Transaction) {
        let idx = self.insert_position(&txn);
        self.transactions.insert(idx, txn);
    }

    /// Merge a patch into the stored record
    ///
    /// VAT is not recomputed here.
    pub fn update(&mut self, id: TransactionId, patch: &TransactionPatch) -> VatbookResult<&Transaction> {
        let txn = self.preview_update(id, patch)?;
        txn.validate()
            .map_err(|e| VatbookError::Validation(e.to_string()))?;
        self.replace(txn)
    }

    /// The record as it would look after applying a patch, without storing it
    pub fn preview_update(&self, id: TransactionId, patch: &TransactionPatch) -> VatbookResult<Transaction> {
        let mut txn = self
            .get(id)
            .cloned()
            .ok_or_else(|| VatbookError::transaction_not_found(id.to_string()))?;
        patch.apply_to(&mut txn);
        Ok(txn)
    }

    /// Swap in a new version of a record, re-sorting if its date changed
    pub fn replace(&mut self, txn: Transaction) -> VatbookResult<&Transaction> {
        let idx = self
            .transactions
            .iter()
            .position(|t| t.id == txn.id)
            .ok_or_else(|| VatbookError::transaction_not_found(txn.id.to_string()))?;

        let idx = if self.transactions[idx].date == txn.date {
            self.transactions[idx] = txn;
            idx
        } else {
            self.transactions.remove(idx);
            let new_idx = self.insert_position(&txn);
            self.transactions.insert(new_idx, txn);
            new_idx
        };
        Ok(&self.transactions[idx])
    }

    /// Remove a record, signalling NotFound if it is absent
    pub fn delete(&mut self, id: TransactionId) -> VatbookResult<Transaction> {
        let idx = self
            .transactions
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| VatbookError::transaction_not_found(id.to_string()))?;
        Ok(self.transactions.remove(idx))
    }

    /// Filtered, sorted listing joined with categories
    pub fn list<'a>(
        &'a self,
        query: &TransactionQuery,
        categories: &'a CategoryRegistry,
    ) -> Vec<TransactionView<'a>> {
        let mut views: Vec<TransactionView<'a>> = self
            .transactions
            .iter()
            .map(|transaction| TransactionView {
                transaction,
                category: categories.get(transaction.category_id),
            })
            .filter(|view| query.matches(view))
            .collect();

        // Stable sort keeps the store order among equal keys
        views.sort_by(|a, b| query.compare(a, b));

        if let Some(limit) = query.limit {
            views.truncate(limit);
        }
        views
    }

    pub fn for_category(&self, category_id: CategoryId) -> impl Iterator<Item = &Transaction> {
        self.transactions
            .iter()
            .filter(move |t| t.category_id == category_id)
    }

    /// Number of transactions referencing a category
    pub fn count_for_category(&self, category_id: CategoryId) -> usize {
        self.for_category(category_id).count()
    }

    /// Corrected copies of records whose stored amounts are inconsistent
    ///
    /// Exempt records and records in categories without VAT lose their VAT;
    /// every total is re-derived from net and VAT. The store itself is left
    /// untouched.
    pub fn needing_repair(&self, categories: &CategoryRegistry) -> Vec<Transaction> {
        self.transactions
            .iter()
            .filter_map(|txn| {
                let mut repaired = txn.clone();
                if txn.vat_exempt || !categories.is_vat_applicable(txn.category_id) {
                    repaired.clear_vat();
                } else {
                    repaired.set_amounts(txn.amount, txn.vat);
                }
                let changed =
                    repaired.vat != txn.vat || repaired.total_amount != txn.total_amount;
                changed.then_some(repaired)
            })
            .collect()
    }

    fn insert_position(&self, txn: &Transaction) -> usize {
        self.transactions
            .iter()
            .position(|existing| newest_first(txn, existing) != Ordering::Greater)
            .unwrap_or(self.transactions.len())
    }
}

fn newest_first(a: &Transaction, b: &Transaction) -> Ordering {
    b.date
        .cmp(&a.date)
        .then_with(|| b.created_at.cmp(&a.created_at))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CategoryKind;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn txn(day: u32, kind: TransactionType, category: CategoryId, description: &str, cents: i64) -> Transaction {
        Transaction::new(
            date(2026, 5, day),
            kind,
            category,
            description,
            Money::from_cents(cents),
        )
    }

    fn fixture() -> (CategoryRegistry, TransactionStore) {
        let office = Category::new("Office", CategoryKind::Expense);
        let sales = Category::new("Sales", CategoryKind::Revenue);
        let mut store = TransactionStore::new();
        store.add(txn(3, TransactionType::Expense, office.id, "paper", 2_000));
        store.add(txn(10, TransactionType::Revenue, sales.id, "Consulting", 50_000));
        let mut toner = txn(7, TransactionType::Expense, office.id, "Toner", 8_000);
        toner.notes = Some("for the laser printer".into());
        store.add(toner);
        (CategoryRegistry::from_categories(vec![office, sales]), store)
    }

    fn descriptions(views: &[TransactionView<'_>]) -> Vec<String> {
        views.iter().map(|v| v.transaction.description.clone()).collect()
    }

    #[test]
    fn test_newest_first_with_insertion_tiebreak() {
        let category = CategoryId::new();
        let mut store = TransactionStore::new();
        store.add(txn(1, TransactionType::Expense, category, "old", 100));
        store.add(txn(5, TransactionType::Expense, category, "first on 5th", 100));
        store.add(txn(5, TransactionType::Expense, category, "second on 5th", 100));
        store.add(txn(3, TransactionType::Expense, category, "middle", 100));

        let order: Vec<&str> = store.all().iter().map(|t| t.description.as_str()).collect();
        assert_eq!(order, vec!["second on 5th", "first on 5th", "middle", "old"]);
    }

    #[test]
    fn test_list_search_is_case_insensitive() {
        let (categories, store) = fixture();

        let views = store.list(&TransactionQuery::new().search("PAPER"), &categories);
        assert_eq!(descriptions(&views), vec!["paper"]);

        // Category name and notes are searched too
        let views = store.list(&TransactionQuery::new().search("sales"), &categories);
        assert_eq!(descriptions(&views), vec!["Consulting"]);
        let views = store.list(&TransactionQuery::new().search("Laser"), &categories);
        assert_eq!(descriptions(&views), vec!["Toner"]);
    }

    #[test]
    fn test_list_sorting() {
        let (categories, store) = fixture();

        let query = TransactionQuery::new().sort_by(SortField::Amount, SortDirection::Ascending);
        assert_eq!(
            descriptions(&store.list(&query, &categories)),
            vec!["paper", "Toner", "Consulting"]
        );

        // Case-folded: "paper" sorts between "Consulting" and "Toner"
        let query = TransactionQuery::new().sort_by(SortField::Description, SortDirection::Ascending);
        assert_eq!(
            descriptions(&store.list(&query, &categories)),
            vec!["Consulting", "paper", "Toner"]
        );

        let query = TransactionQuery::new()
            .sort_by(SortField::Description, SortDirection::Ascending.toggled());
        assert_eq!(
            descriptions(&store.list(&query, &categories)),
            vec!["Toner", "paper", "Consulting"]
        );

        let query = TransactionQuery::new().sort_by(SortField::Date, SortDirection::Descending);
        assert_eq!(
            descriptions(&store.list(&query, &categories)),
            vec!["Consulting", "Toner", "paper"]
        );
    }

    #[test]
    fn test_list_filters() {
        let (categories, store) = fixture();

        let query = TransactionQuery::new().kind(TransactionType::Expense);
        assert_eq!(store.list(&query, &categories).len(), 2);

        let query = TransactionQuery::new().date_range(Some(date(2026, 5, 3)), Some(date(2026, 5, 7)));
        assert_eq!(descriptions(&store.list(&query, &categories)), vec!["Toner", "paper"]);

        let query = TransactionQuery::new().limit(1);
        assert_eq!(store.list(&query, &categories).len(), 1);
    }

    #[test]
    fn test_update_merges_and_resorts() {
        let (categories, mut store) = fixture();
        let paper = store.find_by_description("paper");

        let patch = TransactionPatch {
            date: Some(date(2026, 5, 20)),
            description: Some("Paper A4".into()),
            ..Default::default()
        };
        let updated = store.update(paper, &patch).unwrap();
        assert_eq!(updated.description, "Paper A4");
        assert_eq!(store.all()[0].description, "Paper A4");
        assert_eq!(categories.name_of(store.all()[0].category_id), "Office");
    }

    #[test]
    fn test_update_does_not_recompute_vat() {
        let (_, mut store) = fixture();
        let toner = store.find_by_description("Toner");
        let patch = TransactionPatch {
            amount: Some(Money::from_cents(9_000)),
            ..Default::default()
        };
        let updated = store.update(toner, &patch).unwrap();
        assert_eq!(updated.vat, Money::zero());
        assert_eq!(updated.total_amount, Money::from_cents(9_000));
    }

    #[test]
    fn test_delete_missing_is_not_found() {
        let (_, mut store) = fixture();
        assert!(store.delete(TransactionId::new()).unwrap_err().is_not_found());

        let toner = store.find_by_description("Toner");
        store.delete(toner).unwrap();
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_find_by_short_id() {
        let (_, store) = fixture();
        let first = &store.all()[0];
        assert_eq!(store.find(&first.id.to_string()).unwrap().id, first.id);
        assert_eq!(store.find(&first.id.uuid().to_string()).unwrap().id, first.id);
        assert!(store.find("txn-").is_none());
    }

    #[test]
    fn test_needing_repair() {
        let insurance = Category::new("Insurance", CategoryKind::Expense).with_vat_applicable(false);
        let office = Category::new("Office", CategoryKind::Expense);

        let mut policy = txn(1, TransactionType::Expense, insurance.id, "Policy", 10_000);
        policy.set_amounts(policy.amount, Money::from_cents(1_900));
        let mut chair = txn(2, TransactionType::Expense, office.id, "Chair", 20_000);
        chair.set_amounts(chair.amount, Money::from_cents(3_800));
        chair.total_amount = Money::from_cents(20_000);
        let mut desk = txn(3, TransactionType::Expense, office.id, "Desk", 30_000);
        desk.set_amounts(desk.amount, Money::from_cents(5_700));

        let store = TransactionStore::from_transactions(vec![policy, chair, desk]);
        let categories = CategoryRegistry::from_categories(vec![insurance, office]);

        let mut repairs = store.needing_repair(&categories);
        repairs.sort_by_key(|t| t.amount);
        assert_eq!(repairs.len(), 2);
        assert_eq!(repairs[0].vat, Money::zero());
        assert_eq!(repairs[0].total_amount, Money::from_cents(10_000));
        assert_eq!(repairs[1].vat, Money::from_cents(3_800));
        assert_eq!(repairs[1].total_amount, Money::from_cents(23_800));

        // The store keeps the stored amounts until the repairs are written
        assert!(store.all().iter().any(|t| t.total_amount == Money::from_cents(20_000)));
    }

    impl TransactionStore {
        fn find_by_description(&self, description: &str) -> TransactionId {
            self.transactions
                .iter()
                .find(|t| t.description == description)
                .map(|t| t.id)
                .unwrap()
        }
    }
}
