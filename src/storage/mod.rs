//! Storage layer for Kuberium
//!
//! [`DataStore`] is the contract services are written against: fetch and
//! insert operations over transactions, categories, budgets and saving goals.
//! "No data" and "could not read" are different outcomes: the first is an
//! empty collection or `None`, the second a [`KuberiumError::Fetch`].
//!
//! [`Storage`] is the local implementation: one JSON file per collection,
//! written atomically, with every change appended to the audit log.

pub mod budget;
pub mod categories;
pub mod file_io;
pub mod goals;
pub mod init;
pub mod transactions;

pub use budget::BudgetRepository;
pub use categories::CategoryRepository;
pub use file_io::{decode_rows, read_json, write_json_atomic, DecodedRows};
pub use goals::GoalRepository;
pub use init::initialize_storage;
pub use transactions::TransactionRepository;

use tracing::{debug, warn};

use crate::audit::{AuditEntry, AuditLogger, EntityType};
use crate::config::paths::KuberiumPaths;
use crate::error::{KuberiumError, KuberiumResult};
use crate::models::{
    Budget, Category, GoalId, Money, SavingGoal, Transaction, TransactionId, TransactionRecord,
};

/// Data store collaborator
pub trait DataStore {
    /// All transaction rows, unvalidated
    fn fetch_transactions(&self) -> KuberiumResult<Vec<TransactionRecord>>;

    fn fetch_categories(&self) -> KuberiumResult<Vec<Category>>;

    /// The budget for a (month, year), or `None` if none was created
    fn fetch_budget(&self, month: u32, year: i32) -> KuberiumResult<Option<Budget>>;

    /// All budgets, oldest period first
    fn fetch_budgets(&self) -> KuberiumResult<Vec<Budget>>;

    fn fetch_saving_goals(&self) -> KuberiumResult<Vec<SavingGoal>>;

    fn insert_transaction(&self, transaction: &Transaction) -> KuberiumResult<()>;

    /// Add several transactions at once; either all of them are stored or none
    fn insert_transactions(&self, transactions: &[Transaction]) -> KuberiumResult<()>;

    /// Remove a transaction; `false` when no row had that id
    fn delete_transaction(&self, id: &TransactionId) -> KuberiumResult<bool>;

    fn insert_category(&self, category: &Category) -> KuberiumResult<()>;

    /// Add a budget; a second budget for the same period is a `Duplicate` error
    fn insert_budget(&self, budget: &Budget) -> KuberiumResult<()>;

    /// Replace a stored budget (matched by period and id) and return it
    fn update_budget(&self, budget: &Budget) -> KuberiumResult<Budget>;

    /// Remove the budget for a period; `false` when there was none
    fn delete_budget(&self, month: u32, year: i32) -> KuberiumResult<bool>;

    fn insert_saving_goal(&self, goal: &SavingGoal) -> KuberiumResult<()>;

    /// Overwrite a goal's current amount and return the updated goal
    fn update_goal_amount(&self, id: &GoalId, amount: Money) -> KuberiumResult<SavingGoal>;

    /// Remove a goal; `false` when no goal had that id
    fn delete_saving_goal(&self, id: &GoalId) -> KuberiumResult<bool>;
}

/// JSON-file data store
pub struct Storage {
    paths: KuberiumPaths,
    pub transactions: TransactionRepository,
    pub categories: CategoryRepository,
    pub budgets: BudgetRepository,
    pub goals: GoalRepository,
    audit: AuditLogger,
}

impl Storage {
    /// Create a Storage instance without loading anything
    pub fn new(paths: KuberiumPaths) -> Result<Self, KuberiumError> {
        paths.ensure_directories()?;

        Ok(Self {
            transactions: TransactionRepository::new(paths.transactions_file()),
            categories: CategoryRepository::new(paths.categories_file()),
            budgets: BudgetRepository::new(paths.budgets_file()),
            goals: GoalRepository::new(paths.goals_file()),
            audit: AuditLogger::new(paths.audit_log()),
            paths,
        })
    }

    /// Create a Storage instance and load every collection from disk
    pub fn open(paths: KuberiumPaths) -> Result<Self, KuberiumError> {
        let storage = Self::new(paths)?;
        storage.load_all()?;
        Ok(storage)
    }

    pub fn paths(&self) -> &KuberiumPaths {
        &self.paths
    }

    pub fn audit(&self) -> &AuditLogger {
        &self.audit
    }

    /// Load all data from disk
    pub fn load_all(&self) -> Result<(), KuberiumError> {
        self.transactions.load()?;
        self.categories.load()?;
        self.budgets.load()?;
        self.goals.load()?;
        Ok(())
    }

    /// Budget and goal rows skipped by the last load because they didn't decode
    pub fn rejected_rows(&self) -> usize {
        self.budgets.rejected_count() + self.goals.rejected_count()
    }

    /// Check if storage has been initialized
    pub fn is_initialized(&self) -> bool {
        self.paths.is_initialized()
    }

    /// Audit failures never undo a write that already reached disk
    fn record(&self, entry: AuditEntry) {
        if let Err(e) = self.audit.log(&entry) {
            warn!(error = %e, entity = %entry.entity_type, "failed to write audit entry");
        }
    }
}

impl DataStore for Storage {
    fn fetch_transactions(&self) -> KuberiumResult<Vec<TransactionRecord>> {
        self.transactions.get_all()
    }

    fn fetch_categories(&self) -> KuberiumResult<Vec<Category>> {
        self.categories.get_all()
    }

    fn fetch_budget(&self, month: u32, year: i32) -> KuberiumResult<Option<Budget>> {
        self.budgets.get(month, year)
    }

    fn fetch_budgets(&self) -> KuberiumResult<Vec<Budget>> {
        self.budgets.get_all()
    }

    fn fetch_saving_goals(&self) -> KuberiumResult<Vec<SavingGoal>> {
        self.goals.get_all()
    }

    fn insert_transaction(&self, transaction: &Transaction) -> KuberiumResult<()> {
        let record = transaction.to_record();
        self.transactions.insert(record.clone())?;
        self.transactions.save()?;

        debug!(id = %transaction.id, "inserted transaction");
        self.record(AuditEntry::create(
            EntityType::Transaction,
            transaction.id.as_str(),
            Some(transaction.description.clone()).filter(|d| !d.is_empty()),
            &record,
        ));
        Ok(())
    }

    fn insert_transactions(&self, transactions: &[Transaction]) -> KuberiumResult<()> {
        if transactions.is_empty() {
            return Ok(());
        }

        let records: Vec<TransactionRecord> =
            transactions.iter().map(Transaction::to_record).collect();
        self.transactions.insert_many(records.clone())?;

        if let Err(e) = self.transactions.save() {
            let ids: Vec<&TransactionId> = transactions.iter().map(|t| &t.id).collect();
            if let Err(rollback) = self.transactions.remove_many(&ids) {
                warn!(error = %rollback, "failed to roll back unsaved transactions");
            }
            return Err(e);
        }

        debug!(count = transactions.len(), "inserted transactions");
        for (transaction, record) in transactions.iter().zip(&records) {
            self.record(AuditEntry::create(
                EntityType::Transaction,
                transaction.id.as_str(),
                Some(transaction.description.clone()).filter(|d| !d.is_empty()),
                record,
            ));
        }
        Ok(())
    }

    fn delete_transaction(&self, id: &TransactionId) -> KuberiumResult<bool> {
        let Some(removed) = self.transactions.delete(id)? else {
            return Ok(false);
        };
        self.transactions.save()?;

        debug!(%id, "deleted transaction");
        self.record(AuditEntry::delete(
            EntityType::Transaction,
            id.as_str(),
            Some(removed.description.clone()).filter(|d| !d.is_empty()),
            &removed,
        ));
        Ok(true)
    }

    fn insert_category(&self, category: &Category) -> KuberiumResult<()> {
        self.categories.insert(category.clone())?;
        self.categories.save()?;

        self.record(AuditEntry::create(
            EntityType::Category,
            category.id.as_str(),
            Some(category.name.clone()),
            category,
        ));
        Ok(())
    }

    fn insert_budget(&self, budget: &Budget) -> KuberiumResult<()> {
        self.budgets.insert(budget.clone())?;
        self.budgets.save()?;

        self.record(AuditEntry::create(
            EntityType::Budget,
            budget.id.as_str(),
            Some(budget.period_label()),
            budget,
        ));
        Ok(())
    }

    fn update_budget(&self, budget: &Budget) -> KuberiumResult<Budget> {
        let (before, after) = self.budgets.update(budget.clone())?;
        self.budgets.save()?;

        self.record(AuditEntry::update(
            EntityType::Budget,
            after.id.as_str(),
            Some(after.period_label()),
            &before,
            &after,
        ));
        Ok(after)
    }

    fn delete_budget(&self, month: u32, year: i32) -> KuberiumResult<bool> {
        let Some(removed) = self.budgets.delete(month, year)? else {
            return Ok(false);
        };
        self.budgets.save()?;

        debug!(period = %removed.period_label(), "deleted budget");
        self.record(AuditEntry::delete(
            EntityType::Budget,
            removed.id.as_str(),
            Some(removed.period_label()),
            &removed,
        ));
        Ok(true)
    }

    fn insert_saving_goal(&self, goal: &SavingGoal) -> KuberiumResult<()> {
        self.goals.insert(goal.clone())?;
        self.goals.save()?;

        self.record(AuditEntry::create(
            EntityType::SavingGoal,
            goal.id.as_str(),
            Some(goal.name.clone()),
            goal,
        ));
        Ok(())
    }

    fn update_goal_amount(&self, id: &GoalId, amount: Money) -> KuberiumResult<SavingGoal> {
        let (before, after) = self.goals.set_current_amount(id, amount)?;
        self.goals.save()?;

        self.record(AuditEntry::update(
            EntityType::SavingGoal,
            id.as_str(),
            Some(after.name.clone()),
            &before,
            &after,
        ));
        Ok(after)
    }

    fn delete_saving_goal(&self, id: &GoalId) -> KuberiumResult<bool> {
        let Some(removed) = self.goals.delete(id)? else {
            return Ok(false);
        };
        self.goals.save()?;

        debug!(%id, "deleted saving goal");
        self.record(AuditEntry::delete(
            EntityType::SavingGoal,
            id.as_str(),
            Some(removed.name.clone()),
            &removed,
        ));
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::Operation;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn create_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = KuberiumPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::open(paths).unwrap();
        (temp_dir, storage)
    }

    fn date(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, m, d).unwrap()
    }

    #[test]
    fn test_storage_creation() {
        let (temp_dir, storage) = create_storage();
        assert!(temp_dir.path().join("data").exists());
        assert!(!storage.is_initialized());
    }

    #[test]
    fn test_empty_store_returns_empty_collections() {
        let (_temp, storage) = create_storage();
        assert!(storage.fetch_transactions().unwrap().is_empty());
        assert!(storage.fetch_categories().unwrap().is_empty());
        assert!(storage.fetch_budget(1, 2024).unwrap().is_none());
        assert!(storage.fetch_saving_goals().unwrap().is_empty());
    }

    #[test]
    fn test_transaction_insert_delete_persists_and_audits() {
        let (temp, storage) = create_storage();
        let mut txn = Transaction::expense(Money::from_units(12), "food", date(1, 5));
        txn.description = "Lunch".into();

        storage.insert_transaction(&txn).unwrap();
        assert!(storage.paths().transactions_file().exists());

        let reopened =
            Storage::open(KuberiumPaths::with_base_dir(temp.path().to_path_buf())).unwrap();
        assert_eq!(reopened.fetch_transactions().unwrap().len(), 1);

        assert!(storage.delete_transaction(&txn.id).unwrap());
        assert!(!storage.delete_transaction(&txn.id).unwrap());

        let entries = storage.audit().read_all().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].operation, Operation::Create);
        assert_eq!(entries[0].entity_name.as_deref(), Some("Lunch"));
        assert_eq!(entries[1].operation, Operation::Delete);
    }

    #[test]
    fn test_budget_duplicate_period() {
        let (_temp, storage) = create_storage();
        storage
            .insert_budget(&Budget::new(1, 2024, Money::from_units(100)))
            .unwrap();

        let err = storage
            .insert_budget(&Budget::new(1, 2024, Money::from_units(100)))
            .unwrap_err();
        assert!(matches!(err, KuberiumError::Duplicate { .. }));
    }

    #[test]
    fn test_update_goal_amount_audits_diff() {
        let (_temp, storage) = create_storage();
        let goal = SavingGoal::new("Trip", Money::from_units(500), date(12, 1));
        storage.insert_saving_goal(&goal).unwrap();

        let updated = storage
            .update_goal_amount(&goal.id, Money::from_units(100))
            .unwrap();
        assert_eq!(updated.current_amount, Money::from_units(100));

        let last = storage.audit().read_recent(1).unwrap().remove(0);
        assert_eq!(last.operation, Operation::Update);
        assert_eq!(
            last.diff_summary.as_deref(),
            Some("current_amount: 0 -> 10000")
        );
    }

    #[test]
    fn test_batch_insert_is_all_or_nothing() {
        let (_temp, storage) = create_storage();
        let first = Transaction::expense(Money::from_units(5), "food", date(1, 5));
        storage.insert_transaction(&first).unwrap();

        let fresh = Transaction::expense(Money::from_units(7), "food", date(1, 6));
        let err = storage
            .insert_transactions(&[fresh.clone(), first.clone()])
            .unwrap_err();
        assert!(matches!(err, KuberiumError::Duplicate { .. }));
        assert_eq!(storage.fetch_transactions().unwrap().len(), 1);

        let other = Transaction::income(Money::from_units(9), "salary", date(1, 7));
        storage.insert_transactions(&[fresh, other]).unwrap();
        assert_eq!(storage.fetch_transactions().unwrap().len(), 3);
        assert_eq!(storage.audit().read_all().unwrap().len(), 3);
    }

    #[test]
    fn test_budget_update_and_delete_are_audited() {
        let (_temp, storage) = create_storage();
        let budget = Budget::new(2, 2024, Money::from_units(100));
        storage.insert_budget(&budget).unwrap();

        let mut changed = budget.clone();
        changed.total_budget = Money::from_units(120);
        let updated = storage.update_budget(&changed).unwrap();
        assert_eq!(updated.total_budget, Money::from_units(120));
        assert_eq!(
            storage.fetch_budget(2, 2024).unwrap().unwrap().total_budget,
            Money::from_units(120)
        );

        assert!(storage.delete_budget(2, 2024).unwrap());
        assert!(!storage.delete_budget(2, 2024).unwrap());
        assert!(storage.fetch_budget(2, 2024).unwrap().is_none());

        let ops: Vec<_> = storage
            .audit()
            .read_all()
            .unwrap()
            .into_iter()
            .map(|e| e.operation)
            .collect();
        assert_eq!(ops, vec![Operation::Create, Operation::Update, Operation::Delete]);
    }

    #[test]
    fn test_delete_saving_goal() {
        let (_temp, storage) = create_storage();
        let goal = SavingGoal::new("Trip", Money::from_units(500), date(12, 1));
        storage.insert_saving_goal(&goal).unwrap();

        assert!(storage.delete_saving_goal(&goal.id).unwrap());
        assert!(!storage.delete_saving_goal(&goal.id).unwrap());
        assert!(storage.fetch_saving_goals().unwrap().is_empty());
    }

    #[test]
    fn test_bad_goal_row_does_not_block_open() {
        let temp_dir = TempDir::new().unwrap();
        let paths = KuberiumPaths::with_base_dir(temp_dir.path().to_path_buf());
        paths.ensure_directories().unwrap();
        std::fs::write(
            paths.goals_file(),
            r#"{"goals": [{"id": "g1", "name": "Yacht", "target_amount": "lots", "deadline": "2025-01-01"}]}"#,
        )
        .unwrap();

        let storage = Storage::open(paths).unwrap();
        assert!(storage.fetch_saving_goals().unwrap().is_empty());
        assert_eq!(storage.rejected_rows(), 1);
        assert!(storage.fetch_transactions().unwrap().is_empty());
    }

    #[test]
    fn test_corrupt_file_is_distinct_from_empty() {
        let temp_dir = TempDir::new().unwrap();
        let paths = KuberiumPaths::with_base_dir(temp_dir.path().to_path_buf());
        paths.ensure_directories().unwrap();
        std::fs::write(paths.goals_file(), "[not valid").unwrap();

        let err = Storage::open(paths).err().unwrap();
        assert!(err.is_fetch_failure());
    }
}
