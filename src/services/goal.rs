//! Saving goal service

use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};
use tracing::info;

use crate::engine::{partition_goals, GoalPartition};
use crate::error::{KuberiumError, KuberiumResult};
use crate::models::{GoalId, Money, SavingGoal};
use crate::storage::DataStore;

use super::match_id;

/// Service for saving goals
pub struct GoalService<'a> {
    store: &'a dyn DataStore,
}

impl<'a> GoalService<'a> {
    pub fn new(store: &'a dyn DataStore) -> Self {
        Self { store }
    }

    pub fn create(&self, name: &str, target: Money, deadline: NaiveDate) -> KuberiumResult<SavingGoal> {
        let goal = SavingGoal::new(name.trim(), target, deadline);
        goal.validate()
            .map_err(|e| KuberiumError::Validation(e.to_string()))?;

        self.store.insert_saving_goal(&goal)?;
        info!(id = %goal.id, name = %goal.name, "created saving goal");
        Ok(goal)
    }

    /// Add money to a goal
    ///
    /// Contributions must be positive, so a goal's saved amount never goes down
    /// through this path.
    pub fn contribute(&self, identifier: &str, amount: Money) -> KuberiumResult<SavingGoal> {
        if !amount.is_positive() {
            return Err(KuberiumError::Validation(
                "Contribution must be greater than zero".into(),
            ));
        }

        let goal = self.resolve(identifier)?;
        let new_amount = goal.current_amount.checked_add(amount).ok_or_else(|| {
            KuberiumError::Validation(format!(
                "Contribution of {} would overflow the saved amount of '{}'",
                amount, goal.name
            ))
        })?;
        let updated = self.store.update_goal_amount(&goal.id, new_amount)?;
        info!(id = %updated.id, added = %amount, total = %updated.current_amount, "contributed to goal");
        Ok(updated)
    }

    /// Overwrite a goal's saved amount
    pub fn set_amount(&self, identifier: &str, amount: Money) -> KuberiumResult<SavingGoal> {
        if amount.is_negative() {
            return Err(KuberiumError::Validation(
                "Saved amount cannot be negative".into(),
            ));
        }

        let goal = self.resolve(identifier)?;
        self.store.update_goal_amount(&goal.id, amount)
    }

    /// Remove a goal
    pub fn delete(&self, identifier: &str) -> KuberiumResult<SavingGoal> {
        let goal = self.resolve(identifier)?;
        if !self.store.delete_saving_goal(&goal.id)? {
            return Err(KuberiumError::goal_not_found(identifier));
        }
        info!(id = %goal.id, name = %goal.name, "deleted saving goal");
        Ok(goal)
    }

    /// All goals split into active and completed, with progress as of `now`
    pub fn list_with_progress(&self, now: NaiveDateTime) -> KuberiumResult<GoalPartition> {
        let goals = self.store.fetch_saving_goals()?;
        Ok(partition_goals(&goals, now))
    }

    /// Find a goal by id, unique id prefix or case-insensitive name
    pub fn resolve(&self, identifier: &str) -> KuberiumResult<SavingGoal> {
        let goals = self.store.fetch_saving_goals()?;
        let wanted = GoalId::from_str(identifier)
            .map(|id| id.as_str().to_string())
            .unwrap_or_default();

        if let Some(id) = match_id(&wanted, goals.iter().map(|g| g.id.as_str()), "Saving goal")? {
            if let Some(goal) = goals.iter().find(|g| g.id.as_str() == id) {
                return Ok(goal.clone());
            }
        }

        let name_lower = identifier.trim().to_lowercase();
        goals
            .into_iter()
            .find(|g| g.name.to_lowercase() == name_lower)
            .ok_or_else(|| KuberiumError::goal_not_found(identifier))
    }
}
