//! Budget service
//!
//! Creates monthly budgets and computes how much of each planned line has
//! been spent.

use tracing::{info, warn};

use crate::engine::{compute_budget_utilization, Aggregate};
use crate::error::{KuberiumError, KuberiumResult};
use crate::models::{Budget, Money};
use crate::storage::DataStore;

use super::CategoryService;

/// Input for creating a budget
#[derive(Debug, Clone)]
pub struct CreateBudgetInput {
    pub month: u32,
    pub year: i32,
    pub total: Money,
    /// (category id, id prefix or name; planned amount)
    pub lines: Vec<(String, Money)>,
}

fn period(month: u32, year: i32) -> String {
    format!("{:04}-{:02}", year, month)
}

/// Service for budget management
pub struct BudgetService<'a> {
    store: &'a dyn DataStore,
}

impl<'a> BudgetService<'a> {
    pub fn new(store: &'a dyn DataStore) -> Self {
        Self { store }
    }

    /// Create the budget for a month
    ///
    /// Fails with `Duplicate` if that month already has a budget.
    pub fn create(&self, input: CreateBudgetInput) -> KuberiumResult<Budget> {
        let categories = CategoryService::new(self.store);

        let mut budget = Budget::new(input.month, input.year, input.total);
        for (category, amount) in &input.lines {
            let category = categories.resolve(category)?;
            budget = budget.with_category(category.id, *amount);
        }

        budget
            .validate()
            .map_err(|e| KuberiumError::Validation(e.to_string()))?;

        if self.store.fetch_budget(input.month, input.year)?.is_some() {
            return Err(KuberiumError::Duplicate {
                entity_type: "Budget",
                identifier: budget.period_label(),
            });
        }

        if budget.total_allocated() > budget.total_budget {
            warn!(
                period = %budget.period_label(),
                allocated = %budget.total_allocated(),
                total = %budget.total_budget,
                "category lines exceed the overall budget"
            );
        }

        self.store.insert_budget(&budget)?;
        info!(period = %budget.period_label(), lines = budget.categories.len(), "created budget");
        Ok(budget)
    }

    /// The stored budget for a month
    pub fn get(&self, month: u32, year: i32) -> KuberiumResult<Budget> {
        self.store
            .fetch_budget(month, year)?
            .ok_or_else(|| KuberiumError::budget_not_found(period(month, year)))
    }

    fn save_changes(&self, budget: Budget) -> KuberiumResult<Budget> {
        budget
            .validate()
            .map_err(|e| KuberiumError::Validation(e.to_string()))?;

        let updated = self.store.update_budget(&budget)?;
        info!(period = %updated.period_label(), lines = updated.categories.len(), "updated budget");
        Ok(updated)
    }

    /// Budget for a month with every line's `spent` filled in
    pub fn utilization(&self, month: u32, year: i32) -> KuberiumResult<Aggregate<Budget>> {
        let budget = self.get(month, year)?;

        let records = self.store.fetch_transactions()?;
        Ok(compute_budget_utilization(&budget, &records))
    }

    /// Change a month's overall planned amount
    pub fn update_total(&self, month: u32, year: i32, total: Money) -> KuberiumResult<Budget> {
        let mut budget = self.get(month, year)?;
        budget.total_budget = total;
        self.save_changes(budget)
    }

    /// Plan an amount for a category, adding the line if the budget has none
    pub fn set_line(
        &self,
        month: u32,
        year: i32,
        category: &str,
        amount: Money,
    ) -> KuberiumResult<Budget> {
        let category = CategoryService::new(self.store).resolve(category)?;
        let mut budget = self.get(month, year)?;

        let existing = budget
            .categories
            .iter()
            .position(|line| line.category_id == category.id);
        match existing {
            Some(index) => budget.categories[index].amount = amount,
            None => budget = budget.with_category(category.id, amount),
        }
        self.save_changes(budget)
    }

    /// Drop a category's line from a budget
    pub fn remove_line(&self, month: u32, year: i32, category: &str) -> KuberiumResult<Budget> {
        let category = CategoryService::new(self.store).resolve(category)?;
        let mut budget = self.get(month, year)?;

        let before = budget.categories.len();
        budget.categories.retain(|line| line.category_id != category.id);
        if budget.categories.len() == before {
            return Err(KuberiumError::NotFound {
                entity_type: "Budget line",
                identifier: format!("{} in {}", category.name, budget.period_label()),
            });
        }
        self.save_changes(budget)
    }

    /// Remove a month's budget
    pub fn delete(&self, month: u32, year: i32) -> KuberiumResult<()> {
        if !self.store.delete_budget(month, year)? {
            return Err(KuberiumError::budget_not_found(period(month, year)));
        }
        info!(period = %period(month, year), "deleted budget");
        Ok(())
    }

    /// All budgets, oldest first (without utilization)
    pub fn list(&self) -> KuberiumResult<Vec<Budget>> {
        self.store.fetch_budgets()
    }
}
