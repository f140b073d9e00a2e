//! Core data models for Kuberium
//!
//! This module contains the data structures of the personal-finance domain:
//! categories, transactions, monthly budgets and saving goals.

pub mod budget;
pub mod category;
pub mod goal;
pub mod ids;
pub mod money;
pub mod transaction;

pub use budget::{Budget, BudgetCategory, BudgetValidationError};
pub use category::{
    default_categories, Category, CategoryValidationError, FALLBACK_CATEGORY_COLOR,
    FALLBACK_CATEGORY_NAME,
};
pub use goal::{GoalValidationError, SavingGoal};
pub use ids::{BudgetCategoryId, BudgetId, CategoryId, GoalId, TransactionId};
pub use money::{Money, MoneyParseError};
pub use transaction::{RecordError, Transaction, TransactionKind, TransactionRecord};
