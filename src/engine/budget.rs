//! Budget utilization

use super::diagnostics::{parse_indexed, Aggregate};
use crate::models::{Budget, Money, TransactionRecord};

/// Fill in `spent` for every line of a budget
///
/// A line's spent amount is the sum of expenses dated in the budget's month
/// whose category matches the line. Lines start from zero, so a stale `spent`
/// on the input budget is discarded.
pub fn compute_budget_utilization(
    budget: &Budget,
    records: &[TransactionRecord],
) -> Aggregate<Budget> {
    const OPERATION: &str = "compute_budget_utilization";
    let (parsed, mut diagnostics) = parse_indexed(OPERATION, records);

    let mut filled = budget.clone();
    for line in &mut filled.categories {
        line.spent = Money::zero();
    }

    // Checking the running period total keeps every line and their sum in range
    let mut period_total = Money::zero();
    for record in &parsed {
        let txn = &record.transaction;
        if !txn.is_expense() || !budget.covers(txn.date) {
            continue;
        }
        let Some(line) = filled
            .categories
            .iter_mut()
            .find(|line| txn.category_id.as_ref() == Some(&line.category_id))
        else {
            continue;
        };
        let Some(total) = period_total.checked_add(txn.amount) else {
            diagnostics.skip_overflow(OPERATION, record);
            continue;
        };
        period_total = total;
        line.spent += txn.amount;
    }

    Aggregate::new(filled, diagnostics)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::test_support::rec;
    use serde_json::json;

    fn january() -> Budget {
        Budget::new(1, 2024, Money::from_units(2000))
            .with_category("food", Money::from_units(400))
            .with_category("fun", Money::from_units(100))
    }

    #[test]
    fn test_fills_spent_per_line() {
        let records = vec![
            rec("1", json!(150), "food", "2024-01-05", "expense"),
            rec("2", json!(100), "food", "2024-01-20", "expense"),
            rec("3", json!(125), "fun", "2024-01-21", "expense"),
            rec("4", json!(999), "food", "2024-02-01", "expense"),
            rec("5", json!(999), "food", "2023-01-05", "expense"),
            rec("6", json!(999), "food", "2024-01-05", "income"),
        ];

        let budget = compute_budget_utilization(&january(), &records).value;
        assert_eq!(budget.categories[0].spent, Money::from_units(250));
        assert_eq!(budget.categories[1].spent, Money::from_units(125));
        assert!(budget.categories[1].is_over_budget());
        assert!(!budget.categories[0].is_over_budget());
        assert_eq!(budget.total_spent(), Money::from_units(375));
        assert_eq!(budget.remaining(), Money::from_units(1625));
    }

    #[test]
    fn test_spent_sum_matches_period_expenses() {
        let records = vec![
            rec("1", json!(12.5), "food", "2024-01-05", "expense"),
            rec("2", json!(7.25), "fun", "2024-01-06", "expense"),
            rec("3", json!(3), "food", "2024-01-31", "expense"),
        ];

        let budget = compute_budget_utilization(&january(), &records).value;
        assert_eq!(budget.total_spent(), Money::from_cents(2275));
    }

    #[test]
    fn test_no_matches_gives_zero() {
        let budget = compute_budget_utilization(&january(), &[]).value;
        assert!(budget.categories.iter().all(|c| c.spent.is_zero()));
    }

    #[test]
    fn test_stale_spent_is_reset() {
        let mut stale = january();
        stale.categories[0].spent = Money::from_units(50);
        let budget = compute_budget_utilization(&stale, &[]).value;
        assert_eq!(budget.categories[0].spent, Money::zero());
    }

    #[test]
    fn test_overflowing_expense_is_skipped() {
        let records = vec![
            rec("1", json!("90000000000000000"), "food", "2024-01-05", "expense"),
            rec("2", json!("90000000000000000"), "fun", "2024-01-06", "expense"),
        ];

        let agg = compute_budget_utilization(&january(), &records);
        assert_eq!(agg.skipped_count(), 1);
        assert_eq!(agg.value.categories[0].spent, Money::from_units(90_000_000_000_000_000));
        assert!(agg.value.categories[1].spent.is_zero());
    }

    #[test]
    fn test_budget_without_lines() {
        let empty = Budget::new(1, 2024, Money::from_units(10));
        let records = vec![rec("1", json!(5), "food", "2024-01-05", "expense")];
        let budget = compute_budget_utilization(&empty, &records).value;
        assert!(budget.categories.is_empty());
        assert_eq!(budget, empty);
    }
}
