//! Aggregation engine
//!
//! Pure functions that turn raw transaction records into summaries, monthly
//! series, category breakdowns, budget utilization and goal progress. Nothing
//! here touches storage or the clock; callers pass in records and `now`.
//!
//! Records are validated one at a time. A record that fails validation is left
//! out of the result, logged at `warn`, and listed in the returned
//! [`AggregateDiagnostics`].

pub mod breakdown;
pub mod budget;
pub mod diagnostics;
pub mod goals;
pub mod monthly;
pub mod summary;

pub use breakdown::{
    breakdown_parsed, compute_category_breakdown, sort_by_value_desc, CategoryFallback,
    CategorySpending,
};
pub use budget::compute_budget_utilization;
pub use diagnostics::{
    parse_transactions, Aggregate, AggregateDiagnostics, ParsedRecord, SkippedRecord,
};
pub use goals::{
    goal_progress, partition_goals, GoalPartition, GoalProgress, GoalWithProgress, ProgressBand,
};
pub use monthly::{
    compute_monthly_series, compute_monthly_series_for_year, MonthlyData, MONTH_LABELS,
};
pub use summary::{compute_summary, summarize_parsed, ExpenseSummary, UNCATEGORIZED_KEY};

#[cfg(test)]
pub(crate) mod test_support {
    use crate::models::TransactionRecord;

    /// Build a raw record the way the store would return it
    pub fn rec(
        id: &str,
        amount: serde_json::Value,
        category: &str,
        date: &str,
        kind: &str,
    ) -> TransactionRecord {
        TransactionRecord {
            id: Some(id.to_string()),
            amount,
            description: String::new(),
            category_id: Some(category.to_string()),
            date: date.to_string(),
            kind: kind.to_string(),
            payment_method: "card".to_string(),
        }
    }
}
