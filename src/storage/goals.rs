//! Saving goal repository for JSON storage

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::KuberiumError;
use crate::models::{GoalId, Money, SavingGoal};

use super::file_io::{decode_rows, read_json, write_json_atomic};

/// On-disk shape; rows stay untyped until [`decode_rows`] checks each one
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct GoalData {
    #[serde(default)]
    goals: Vec<serde_json::Value>,
}

/// Repository for saving goal persistence
pub struct GoalRepository {
    path: PathBuf,
    goals: RwLock<HashMap<GoalId, SavingGoal>>,
    rejected: RwLock<Vec<serde_json::Value>>,
}

impl GoalRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            goals: RwLock::new(HashMap::new()),
            rejected: RwLock::new(Vec::new()),
        }
    }

    /// Load goals from disk
    ///
    /// Rows that don't decode are skipped and kept aside; an unreadable file
    /// is a fetch error.
    pub fn load(&self) -> Result<(), KuberiumError> {
        let file_data: GoalData =
            read_json(&self.path).map_err(|e| KuberiumError::fetch("saving goals", e.to_string()))?;
        let decoded = decode_rows::<SavingGoal>("saving goals", file_data.goals);

        let mut goals = self
            .goals
            .write()
            .map_err(|e| KuberiumError::fetch("saving goals", format!("lock poisoned: {}", e)))?;
        let mut rejected = self
            .rejected
            .write()
            .map_err(|e| KuberiumError::fetch("saving goals", format!("lock poisoned: {}", e)))?;

        goals.clear();
        for goal in decoded.valid {
            goals.insert(goal.id.clone(), goal);
        }
        *rejected = decoded.rejected;
        Ok(())
    }

    /// Save goals to disk; rows skipped on load are written back as they were
    pub fn save(&self) -> Result<(), KuberiumError> {
        let goals = self.get_all().map_err(|e| KuberiumError::Storage(e.to_string()))?;
        let rejected = self
            .rejected
            .read()
            .map_err(|e| KuberiumError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let mut rows = goals
            .iter()
            .map(serde_json::to_value)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| KuberiumError::Storage(format!("Failed to serialize goals: {}", e)))?;
        rows.extend(rejected.iter().cloned());

        write_json_atomic(&self.path, &GoalData { goals: rows })
    }

    /// Number of rows skipped by the last load
    pub fn rejected_count(&self) -> usize {
        self.rejected.read().map(|r| r.len()).unwrap_or(0)
    }

    /// All goals, nearest deadline first
    pub fn get_all(&self) -> Result<Vec<SavingGoal>, KuberiumError> {
        let goals = self
            .goals
            .read()
            .map_err(|e| KuberiumError::fetch("saving goals", format!("lock poisoned: {}", e)))?;

        let mut list: Vec<_> = goals.values().cloned().collect();
        list.sort_by(|a, b| a.deadline.cmp(&b.deadline).then_with(|| a.name.cmp(&b.name)));
        Ok(list)
    }

    pub fn get(&self, id: &GoalId) -> Result<Option<SavingGoal>, KuberiumError> {
        let goals = self
            .goals
            .read()
            .map_err(|e| KuberiumError::fetch("saving goals", format!("lock poisoned: {}", e)))?;
        Ok(goals.get(id).cloned())
    }

    pub fn insert(&self, goal: SavingGoal) -> Result<(), KuberiumError> {
        let mut goals = self
            .goals
            .write()
            .map_err(|e| KuberiumError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        if goals.contains_key(&goal.id) {
            return Err(KuberiumError::Duplicate {
                entity_type: "Saving goal",
                identifier: goal.id.to_string(),
            });
        }

        goals.insert(goal.id.clone(), goal);
        Ok(())
    }

    /// Remove a goal; returns it when it existed
    pub fn delete(&self, id: &GoalId) -> Result<Option<SavingGoal>, KuberiumError> {
        let mut goals = self
            .goals
            .write()
            .map_err(|e| KuberiumError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        Ok(goals.remove(id))
    }

    /// Overwrite a goal's current amount; returns the states before and after
    pub fn set_current_amount(
        &self,
        id: &GoalId,
        amount: Money,
    ) -> Result<(SavingGoal, SavingGoal), KuberiumError> {
        let mut goals = self
            .goals
            .write()
            .map_err(|e| KuberiumError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        let goal = goals
            .get_mut(id)
            .ok_or_else(|| KuberiumError::goal_not_found(id.as_str()))?;

        let before = goal.clone();
        goal.current_amount = amount;
        Ok((before, goal.clone()))
    }
}
