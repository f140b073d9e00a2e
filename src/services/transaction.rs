//! Transaction service
//!
//! Entry, deletion and filtered listing of transactions. Listing validates
//! the stored rows the same way the engine does, so a malformed row is left
//! out and reported instead of failing the whole listing.

use std::str::FromStr;

use chrono::NaiveDate;
use tracing::info;

use crate::engine::{diagnostics::parse_records, AggregateDiagnostics};
use crate::error::{KuberiumError, KuberiumResult};
use crate::models::{CategoryId, Money, Transaction, TransactionId, TransactionKind};
use crate::storage::DataStore;

use super::{match_id, CategoryService};

/// Service for transaction management
pub struct TransactionService<'a> {
    store: &'a dyn DataStore,
}

/// Options for filtering transactions
#[derive(Debug, Clone, Default)]
pub struct TransactionFilter {
    pub kind: Option<TransactionKind>,
    pub category_id: Option<CategoryId>,
    /// Inclusive start date
    pub start_date: Option<NaiveDate>,
    /// Inclusive end date
    pub end_date: Option<NaiveDate>,
    /// Maximum number of transactions to return
    pub limit: Option<usize>,
}

impl TransactionFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn kind(mut self, kind: TransactionKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn category(mut self, category_id: CategoryId) -> Self {
        self.category_id = Some(category_id);
        self
    }

    pub fn date_range(mut self, start: NaiveDate, end: NaiveDate) -> Self {
        self.start_date = Some(start);
        self.end_date = Some(end);
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    fn matches(&self, txn: &Transaction) -> bool {
        self.kind.map_or(true, |k| txn.kind == k)
            && self
                .category_id
                .as_ref()
                .map_or(true, |c| txn.category_id.as_ref() == Some(c))
            && self.start_date.map_or(true, |d| txn.date >= d)
            && self.end_date.map_or(true, |d| txn.date <= d)
    }
}

/// Input for creating a new transaction
#[derive(Debug, Clone)]
pub struct CreateTransactionInput {
    pub kind: TransactionKind,
    pub amount: Money,
    pub date: NaiveDate,
    pub description: String,
    /// Category id, id prefix or name
    pub category: Option<String>,
    pub payment_method: Option<String>,
}

/// Result of a listing: matching transactions plus rows that were skipped
#[derive(Debug, Clone)]
pub struct TransactionListing {
    /// Newest first
    pub transactions: Vec<Transaction>,
    pub diagnostics: AggregateDiagnostics,
}

impl<'a> TransactionService<'a> {
    pub fn new(store: &'a dyn DataStore) -> Self {
        Self { store }
    }

    /// Validate and record a new transaction
    pub fn add(&self, input: CreateTransactionInput) -> KuberiumResult<Transaction> {
        if input.amount.is_negative() {
            return Err(KuberiumError::Validation(
                "Amount cannot be negative; use the transaction kind for direction".into(),
            ));
        }

        let mut txn = Transaction::new(input.kind, input.amount, input.date);
        txn.description = input.description.trim().to_string();
        txn.payment_method = input
            .payment_method
            .map(|m| m.trim().to_lowercase())
            .unwrap_or_default();

        if let Some(category) = input.category.as_deref().filter(|c| !c.trim().is_empty()) {
            let category = CategoryService::new(self.store).resolve(category)?;
            txn.category_id = Some(category.id);
        }

        txn.validate()
            .map_err(|e| KuberiumError::Validation(e.to_string()))?;

        self.store.insert_transaction(&txn)?;
        info!(id = %txn.id, kind = txn.kind.as_str(), amount = %txn.amount, "added transaction");
        Ok(txn)
    }

    /// Delete a transaction by id or unique id prefix
    pub fn delete(&self, identifier: &str) -> KuberiumResult<TransactionId> {
        let id = self.resolve_id(identifier)?;
        if !self.store.delete_transaction(&id)? {
            return Err(KuberiumError::transaction_not_found(identifier));
        }
        info!(%id, "deleted transaction");
        Ok(id)
    }

    /// List transactions matching a filter, newest first
    pub fn list(&self, filter: &TransactionFilter) -> KuberiumResult<TransactionListing> {
        let records = self.store.fetch_transactions()?;
        let (transactions, diagnostics) = parse_records("list_transactions", &records);

        let mut transactions: Vec<_> = transactions
            .into_iter()
            .filter(|t| filter.matches(t))
            .collect();
        transactions.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| b.time.cmp(&a.time)));

        if let Some(limit) = filter.limit {
            transactions.truncate(limit);
        }

        Ok(TransactionListing {
            transactions,
            diagnostics,
        })
    }

    fn resolve_id(&self, identifier: &str) -> KuberiumResult<TransactionId> {
        let wanted = TransactionId::from_str(identifier)
            .map(|id| id.as_str().to_string())
            .unwrap_or_default();

        let records = self.store.fetch_transactions()?;
        match_id(
            &wanted,
            records.iter().filter_map(|r| r.id.as_deref()),
            "Transaction",
        )?
        .map(TransactionId::from_raw)
        .ok_or_else(|| KuberiumError::transaction_not_found(identifier))
    }
}
