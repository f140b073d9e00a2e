//! Saving goal progress

use chrono::NaiveDateTime;
use std::fmt;

use crate::models::SavingGoal;

const SECONDS_PER_DAY: i64 = 86_400;

/// Days-left threshold under which an open goal counts as urgent
pub const URGENT_DAYS: i64 = 30;

/// Coarse progress bucket used for coloring
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressBand {
    /// Below 25%
    Low,
    /// 25% up to 75%
    Medium,
    /// 75% and above
    High,
}

impl ProgressBand {
    pub fn from_percent(percent: f64) -> Self {
        if percent < 25.0 {
            Self::Low
        } else if percent < 75.0 {
            Self::Medium
        } else {
            Self::High
        }
    }
}

impl fmt::Display for ProgressBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Low => write!(f, "low"),
            Self::Medium => write!(f, "medium"),
            Self::High => write!(f, "high"),
        }
    }
}

/// Derived view of a goal at a point in time
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GoalProgress {
    /// 0-100
    pub percent_complete: f64,
    pub is_complete: bool,
    /// Whole days to the deadline, rounded up; negative once overdue
    pub days_remaining: i64,
    /// The goal's target is zero or negative
    pub invalid_target: bool,
    pub band: ProgressBand,
    pub is_urgent: bool,
}

/// Compute progress for a goal as of `now`
pub fn goal_progress(goal: &SavingGoal, now: NaiveDateTime) -> GoalProgress {
    let invalid_target = !goal.target_amount.is_positive();

    let percent_complete = if invalid_target {
        0.0
    } else {
        let raw = goal.current_amount.cents() as f64 / goal.target_amount.cents() as f64 * 100.0;
        raw.clamp(0.0, 100.0)
    };

    let days_remaining = days_until(goal, now);

    GoalProgress {
        percent_complete,
        is_complete: goal.is_complete(),
        days_remaining,
        invalid_target,
        band: ProgressBand::from_percent(percent_complete),
        is_urgent: (0..URGENT_DAYS).contains(&days_remaining),
    }
}

fn days_until(goal: &SavingGoal, now: NaiveDateTime) -> i64 {
    let deadline = goal.deadline.and_time(chrono::NaiveTime::MIN);
    let seconds = (deadline - now).num_seconds();

    let whole = seconds.div_euclid(SECONDS_PER_DAY);
    if seconds.rem_euclid(SECONDS_PER_DAY) > 0 {
        whole + 1
    } else {
        whole
    }
}

/// A goal alongside its computed progress
#[derive(Debug, Clone, PartialEq)]
pub struct GoalWithProgress {
    pub goal: SavingGoal,
    pub progress: GoalProgress,
}

/// Goals split by completion
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GoalPartition {
    pub active: Vec<GoalWithProgress>,
    pub completed: Vec<GoalWithProgress>,
}

/// Split goals into active and completed, preserving input order
pub fn partition_goals(goals: &[SavingGoal], now: NaiveDateTime) -> GoalPartition {
    let mut partition = GoalPartition::default();

    for goal in goals {
        let entry = GoalWithProgress {
            goal: goal.clone(),
            progress: goal_progress(goal, now),
        };
        if entry.progress.is_complete {
            partition.completed.push(entry);
        } else {
            partition.active.push(entry);
        }
    }

    partition
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Money;
    use chrono::NaiveDate;

    fn at(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    fn goal(target: i64, current: i64, deadline: (i32, u32, u32)) -> SavingGoal {
        let mut goal = SavingGoal::new(
            "Trip",
            Money::from_units(target),
            NaiveDate::from_ymd_opt(deadline.0, deadline.1, deadline.2).unwrap(),
        );
        goal.current_amount = Money::from_units(current);
        goal
    }

    #[test]
    fn test_over_target_caps_at_hundred() {
        let progress = goal_progress(&goal(1000, 1200, (2025, 1, 1)), at(2024, 1, 1, 0));
        assert!(progress.is_complete);
        assert_eq!(progress.percent_complete, 100.0);
        assert_eq!(progress.band, ProgressBand::High);
    }

    #[test]
    fn test_zero_target_is_flagged() {
        let progress = goal_progress(&goal(0, 0, (2025, 1, 1)), at(2024, 1, 1, 0));
        assert_eq!(progress.percent_complete, 0.0);
        assert!(progress.invalid_target);
        // current >= target holds literally
        assert!(progress.is_complete);
    }

    #[test]
    fn test_partial_progress_bands() {
        let now = at(2024, 1, 1, 0);
        assert_eq!(goal_progress(&goal(100, 10, (2025, 1, 1)), now).band, ProgressBand::Low);
        assert_eq!(goal_progress(&goal(100, 25, (2025, 1, 1)), now).band, ProgressBand::Medium);
        assert_eq!(goal_progress(&goal(100, 74, (2025, 1, 1)), now).band, ProgressBand::Medium);
        assert_eq!(goal_progress(&goal(100, 75, (2025, 1, 1)), now).band, ProgressBand::High);

        let progress = goal_progress(&goal(1000, 250, (2025, 1, 1)), now);
        assert!((progress.percent_complete - 25.0).abs() < f64::EPSILON);
        assert!(!progress.is_complete);
    }

    #[test]
    fn test_days_remaining_rounds_up() {
        let g = goal(100, 0, (2024, 1, 31));
        assert_eq!(goal_progress(&g, at(2024, 1, 1, 0)).days_remaining, 30);
        assert_eq!(goal_progress(&g, at(2024, 1, 1, 12)).days_remaining, 30);
        assert_eq!(goal_progress(&g, at(2024, 1, 30, 23)).days_remaining, 1);
        assert_eq!(goal_progress(&g, at(2024, 1, 31, 12)).days_remaining, 0);
        assert_eq!(goal_progress(&g, at(2024, 2, 2, 0)).days_remaining, -2);
    }

    #[test]
    fn test_urgency() {
        let g = goal(100, 0, (2024, 1, 31));
        assert!(!goal_progress(&g, at(2024, 1, 1, 0)).is_urgent);
        assert!(goal_progress(&g, at(2024, 1, 2, 0)).is_urgent);
        assert!(!goal_progress(&g, at(2024, 3, 1, 0)).is_urgent);
    }

    #[test]
    fn test_partition_goals() {
        let goals = vec![
            goal(100, 100, (2024, 6, 1)),
            goal(100, 10, (2024, 6, 1)),
            goal(50, 60, (2024, 6, 1)),
        ];

        let partition = partition_goals(&goals, at(2024, 1, 1, 0));
        assert_eq!(partition.active.len(), 1);
        assert_eq!(partition.completed.len(), 2);
        assert_eq!(partition.active.len() + partition.completed.len(), goals.len());
        assert_eq!(partition.completed[0].goal.id, goals[0].id);
    }
}
