//! Service layer for Kuberium
//!
//! Services hold a borrowed [`DataStore`](crate::storage::DataStore) handle,
//! validate input, call the store and hand records to the aggregation engine.
//! They never cache data between calls.

pub mod analytics;
pub mod budget;
pub mod category;
pub mod goal;
pub mod import;
pub mod transaction;

pub use analytics::{AnalyticsService, Dashboard};
pub use budget::{BudgetService, CreateBudgetInput};
pub use category::CategoryService;
pub use goal::GoalService;
pub use import::{ImportFormat, ImportResult, ImportService, RowError};
pub use transaction::{CreateTransactionInput, TransactionFilter, TransactionListing, TransactionService};

/// Resolve a user-supplied identifier against known ids
///
/// Accepts the full id or a unique prefix of it (what the tables print after
/// the type prefix is stripped). Returns `Ok(None)` when nothing matches.
pub(crate) fn match_id<'a>(
    wanted: &str,
    ids: impl IntoIterator<Item = &'a str>,
    entity_type: &'static str,
) -> crate::error::KuberiumResult<Option<String>> {
    let mut prefix_matches = Vec::new();

    for id in ids {
        if id == wanted {
            return Ok(Some(id.to_string()));
        }
        if !wanted.is_empty() && id.starts_with(wanted) {
            prefix_matches.push(id);
        }
    }

    match prefix_matches.as_slice() {
        [] => Ok(None),
        [only] => Ok(Some(only.to_string())),
        _ => Err(crate::error::KuberiumError::Validation(format!(
            "{} id '{}' is ambiguous ({} matches)",
            entity_type,
            wanted,
            prefix_matches.len()
        ))),
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::cell::RefCell;

    use crate::error::{KuberiumError, KuberiumResult};
    use crate::models::{
        Budget, Category, GoalId, Money, SavingGoal, Transaction, TransactionId, TransactionRecord,
    };
    use crate::storage::DataStore;

    /// In-memory store for service tests
    #[derive(Default)]
    pub struct MemoryStore {
        pub transactions: RefCell<Vec<TransactionRecord>>,
        pub categories: RefCell<Vec<Category>>,
        pub budgets: RefCell<Vec<Budget>>,
        pub goals: RefCell<Vec<SavingGoal>>,
        /// When set, every fetch fails
        pub fail_reads: bool,
        /// When set, batch inserts fail
        pub fail_writes: bool,
    }

    impl MemoryStore {
        fn guard(&self, collection: &'static str) -> KuberiumResult<()> {
            if self.fail_reads {
                Err(KuberiumError::fetch(collection, "backend unreachable"))
            } else {
                Ok(())
            }
        }
    }

    impl DataStore for MemoryStore {
        fn fetch_transactions(&self) -> KuberiumResult<Vec<TransactionRecord>> {
            self.guard("transactions")?;
            Ok(self.transactions.borrow().clone())
        }

        fn fetch_categories(&self) -> KuberiumResult<Vec<Category>> {
            self.guard("categories")?;
            Ok(self.categories.borrow().clone())
        }

        fn fetch_budget(&self, month: u32, year: i32) -> KuberiumResult<Option<Budget>> {
            self.guard("budgets")?;
            Ok(self
                .budgets
                .borrow()
                .iter()
                .find(|b| b.month == month && b.year == year)
                .cloned())
        }

        fn fetch_budgets(&self) -> KuberiumResult<Vec<Budget>> {
            self.guard("budgets")?;
            Ok(self.budgets.borrow().clone())
        }

        fn fetch_saving_goals(&self) -> KuberiumResult<Vec<SavingGoal>> {
            self.guard("saving goals")?;
            Ok(self.goals.borrow().clone())
        }

        fn insert_transaction(&self, transaction: &Transaction) -> KuberiumResult<()> {
            self.transactions.borrow_mut().push(transaction.to_record());
            Ok(())
        }

        fn insert_transactions(&self, transactions: &[Transaction]) -> KuberiumResult<()> {
            if self.fail_writes {
                return Err(KuberiumError::Storage("disk full".into()));
            }
            self.transactions
                .borrow_mut()
                .extend(transactions.iter().map(Transaction::to_record));
            Ok(())
        }

        fn delete_transaction(&self, id: &TransactionId) -> KuberiumResult<bool> {
            let mut rows = self.transactions.borrow_mut();
            let before = rows.len();
            rows.retain(|r| r.id.as_deref() != Some(id.as_str()));
            Ok(rows.len() != before)
        }

        fn insert_category(&self, category: &Category) -> KuberiumResult<()> {
            self.categories.borrow_mut().push(category.clone());
            Ok(())
        }

        fn insert_budget(&self, budget: &Budget) -> KuberiumResult<()> {
            let mut budgets = self.budgets.borrow_mut();
            if budgets
                .iter()
                .any(|b| b.month == budget.month && b.year == budget.year)
            {
                return Err(KuberiumError::Duplicate {
                    entity_type: "Budget",
                    identifier: budget.period_label(),
                });
            }
            budgets.push(budget.clone());
            Ok(())
        }

        fn update_budget(&self, budget: &Budget) -> KuberiumResult<Budget> {
            let mut budgets = self.budgets.borrow_mut();
            let slot = budgets
                .iter_mut()
                .find(|b| b.id == budget.id)
                .ok_or_else(|| KuberiumError::budget_not_found(budget.period_label()))?;
            *slot = budget.clone();
            Ok(budget.clone())
        }

        fn delete_budget(&self, month: u32, year: i32) -> KuberiumResult<bool> {
            let mut budgets = self.budgets.borrow_mut();
            let before = budgets.len();
            budgets.retain(|b| !(b.month == month && b.year == year));
            Ok(budgets.len() != before)
        }

        fn insert_saving_goal(&self, goal: &SavingGoal) -> KuberiumResult<()> {
            self.goals.borrow_mut().push(goal.clone());
            Ok(())
        }

        fn update_goal_amount(&self, id: &GoalId, amount: Money) -> KuberiumResult<SavingGoal> {
            let mut goals = self.goals.borrow_mut();
            let goal = goals
                .iter_mut()
                .find(|g| &g.id == id)
                .ok_or_else(|| KuberiumError::goal_not_found(id.as_str()))?;
            goal.current_amount = amount;
            Ok(goal.clone())
        }

        fn delete_saving_goal(&self, id: &GoalId) -> KuberiumResult<bool> {
            let mut goals = self.goals.borrow_mut();
            let before = goals.len();
            goals.retain(|g| &g.id != id);
            Ok(goals.len() != before)
        }
    }
}
