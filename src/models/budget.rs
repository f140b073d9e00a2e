//! Monthly budget model
//!
//! A budget plans spending for one calendar month, split into per-category
//! lines. The `spent` figure on each line is derived from transactions by the
//! aggregation engine and is never trusted from storage.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{BudgetCategoryId, BudgetId, CategoryId};
use super::money::Money;

/// One planned line of a budget
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetCategory {
    pub id: BudgetCategoryId,

    /// The category this line plans for
    pub category_id: CategoryId,

    /// Planned amount
    pub amount: Money,

    /// Amount spent in the budget's period; filled in by the engine
    #[serde(default, skip_serializing)]
    pub spent: Money,
}

impl BudgetCategory {
    pub fn new(category_id: impl Into<CategoryId>, amount: Money) -> Self {
        Self {
            id: BudgetCategoryId::new(),
            category_id: category_id.into(),
            amount,
            spent: Money::zero(),
        }
    }

    /// Spending went past the planned amount
    pub fn is_over_budget(&self) -> bool {
        self.spent > self.amount
    }

    /// Planned minus spent (negative when over budget)
    pub fn remaining(&self) -> Money {
        self.amount - self.spent
    }

    /// Spent as a percentage of planned; 0 when nothing was planned
    pub fn percent_spent(&self) -> f64 {
        if !self.amount.is_positive() {
            return 0.0;
        }
        self.spent.cents() as f64 / self.amount.cents() as f64 * 100.0
    }
}

/// A budget for one (month, year)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Budget {
    pub id: BudgetId,

    /// Month of year, 1-12
    pub month: u32,

    pub year: i32,

    /// Overall planned amount for the month
    pub total_budget: Money,

    /// Per-category lines, in display order
    #[serde(default)]
    pub categories: Vec<BudgetCategory>,
}

impl Budget {
    pub fn new(month: u32, year: i32, total_budget: Money) -> Self {
        Self {
            id: BudgetId::new(),
            month,
            year,
            total_budget,
            categories: Vec::new(),
        }
    }

    /// Add a planned line
    pub fn with_category(mut self, category_id: impl Into<CategoryId>, amount: Money) -> Self {
        self.categories.push(BudgetCategory::new(category_id, amount));
        self
    }

    /// Whether a date falls in this budget's month
    pub fn covers(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }

    /// Sum of `spent` over all lines
    pub fn total_spent(&self) -> Money {
        self.categories.iter().map(|c| c.spent).sum()
    }

    /// Sum of planned amounts over all lines
    pub fn total_allocated(&self) -> Money {
        self.categories.iter().map(|c| c.amount).sum()
    }

    /// Overall budget minus everything spent
    pub fn remaining(&self) -> Money {
        self.total_budget - self.total_spent()
    }

    /// Lines whose spending exceeds their plan
    pub fn over_budget_categories(&self) -> impl Iterator<Item = &BudgetCategory> {
        self.categories.iter().filter(|c| c.is_over_budget())
    }

    /// "2024-01" style label
    pub fn period_label(&self) -> String {
        format!("{:04}-{:02}", self.year, self.month)
    }

    /// Validate the budget
    pub fn validate(&self) -> Result<(), BudgetValidationError> {
        if !(1..=12).contains(&self.month) {
            return Err(BudgetValidationError::InvalidMonth(self.month));
        }

        if self.total_budget.is_negative() {
            return Err(BudgetValidationError::NegativeBudget);
        }

        if self.categories.iter().any(|c| c.amount.is_negative()) {
            return Err(BudgetValidationError::NegativeBudget);
        }

        let mut seen = std::collections::HashSet::new();
        for line in &self.categories {
            if !seen.insert(&line.category_id) {
                return Err(BudgetValidationError::DuplicateCategory(
                    line.category_id.to_string(),
                ));
            }
        }

        Ok(())
    }
}

impl fmt::Display for Budget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} budget: {}", self.period_label(), self.total_budget)
    }
}

/// Validation errors for budgets
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BudgetValidationError {
    InvalidMonth(u32),
    NegativeBudget,
    DuplicateCategory(String),
}

impl fmt::Display for BudgetValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidMonth(m) => write!(f, "Month must be between 1 and 12, got {}", m),
            Self::NegativeBudget => write!(f, "Budget amount cannot be negative"),
            Self::DuplicateCategory(c) => {
                write!(f, "Category '{}' appears more than once in the budget", c)
            }
        }
    }
}

impl std::error::Error for BudgetValidationError {}
