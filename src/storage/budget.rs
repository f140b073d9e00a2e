//! Budget repository for JSON storage
//!
//! Budgets are keyed by (year, month); at most one budget exists per period.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::RwLock;

use tracing::warn;

use crate::error::KuberiumError;
use crate::models::Budget;

use super::file_io::{decode_rows, read_json, write_json_atomic};

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct BudgetData {
    #[serde(default)]
    budgets: Vec<serde_json::Value>,
}

/// Period key, ordered chronologically
type PeriodKey = (i32, u32);

/// Repository for budget persistence
pub struct BudgetRepository {
    path: PathBuf,
    budgets: RwLock<BTreeMap<PeriodKey, Budget>>,
    rejected: RwLock<Vec<serde_json::Value>>,
}

impl BudgetRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            budgets: RwLock::new(BTreeMap::new()),
            rejected: RwLock::new(Vec::new()),
        }
    }

    /// Load budgets from disk
    ///
    /// When the file holds more than one budget for a period, the first one
    /// wins and the others are dropped with a warning. Rows that don't decode
    /// are skipped and kept aside.
    pub fn load(&self) -> Result<(), KuberiumError> {
        let file_data: BudgetData =
            read_json(&self.path).map_err(|e| KuberiumError::fetch("budgets", e.to_string()))?;
        let decoded = decode_rows::<Budget>("budgets", file_data.budgets);

        let mut budgets = self
            .budgets
            .write()
            .map_err(|e| KuberiumError::fetch("budgets", format!("lock poisoned: {}", e)))?;
        let mut rejected = self
            .rejected
            .write()
            .map_err(|e| KuberiumError::fetch("budgets", format!("lock poisoned: {}", e)))?;
        *rejected = decoded.rejected;

        budgets.clear();
        for budget in decoded.valid {
            let key = (budget.year, budget.month);
            if let Some(kept) = budgets.get(&key) {
                warn!(
                    period = %budget.period_label(),
                    kept = %kept.id,
                    dropped = %budget.id,
                    "dropping duplicate budget for period"
                );
                continue;
            }
            budgets.insert(key, budget);
        }

        Ok(())
    }

    /// Save budgets to disk, oldest period first, then any rows skipped on load
    pub fn save(&self) -> Result<(), KuberiumError> {
        let budgets = self.get_all().map_err(|e| KuberiumError::Storage(e.to_string()))?;
        let rejected = self
            .rejected
            .read()
            .map_err(|e| KuberiumError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let mut rows = budgets
            .iter()
            .map(serde_json::to_value)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| KuberiumError::Storage(format!("Failed to serialize budgets: {}", e)))?;
        rows.extend(rejected.iter().cloned());

        write_json_atomic(&self.path, &BudgetData { budgets: rows })
    }

    /// Number of rows skipped by the last load
    pub fn rejected_count(&self) -> usize {
        self.rejected.read().map(|r| r.len()).unwrap_or(0)
    }

    /// The budget for a (month, year), if one exists
    pub fn get(&self, month: u32, year: i32) -> Result<Option<Budget>, KuberiumError> {
        let budgets = self
            .budgets
            .read()
            .map_err(|e| KuberiumError::fetch("budgets", format!("lock poisoned: {}", e)))?;
        Ok(budgets.get(&(year, month)).cloned())
    }

    /// All budgets, oldest period first
    pub fn get_all(&self) -> Result<Vec<Budget>, KuberiumError> {
        let budgets = self
            .budgets
            .read()
            .map_err(|e| KuberiumError::fetch("budgets", format!("lock poisoned: {}", e)))?;
        Ok(budgets.values().cloned().collect())
    }

    /// Add a budget; fails if its period already has one
    pub fn insert(&self, budget: Budget) -> Result<(), KuberiumError> {
        let mut budgets = self
            .budgets
            .write()
            .map_err(|e| KuberiumError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        let key = (budget.year, budget.month);
        if budgets.contains_key(&key) {
            return Err(KuberiumError::Duplicate {
                entity_type: "Budget",
                identifier: budget.period_label(),
            });
        }

        budgets.insert(key, budget);
        Ok(())
    }

    /// Replace the budget for the same period; returns the states before and after
    pub fn update(&self, budget: Budget) -> Result<(Budget, Budget), KuberiumError> {
        let mut budgets = self
            .budgets
            .write()
            .map_err(|e| KuberiumError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        let slot = budgets
            .get_mut(&(budget.year, budget.month))
            .filter(|existing| existing.id == budget.id)
            .ok_or_else(|| KuberiumError::budget_not_found(budget.period_label()))?;

        let before = std::mem::replace(slot, budget);
        Ok((before, slot.clone()))
    }

    /// Remove the budget for a period; returns it when it existed
    pub fn delete(&self, month: u32, year: i32) -> Result<Option<Budget>, KuberiumError> {
        let mut budgets = self
            .budgets
            .write()
            .map_err(|e| KuberiumError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        Ok(budgets.remove(&(year, month)))
    }
}
