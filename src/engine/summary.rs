//! Income / expense summary

use std::collections::BTreeMap;

use super::diagnostics::{parse_indexed, Aggregate, AggregateDiagnostics, ParsedRecord};
use crate::models::{Money, Transaction, TransactionKind, TransactionRecord};

/// Category key used for expenses that carry no category id
pub const UNCATEGORIZED_KEY: &str = "uncategorized";

/// Totals over a set of transactions
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpenseSummary {
    pub total_income: Money,
    pub total_expenses: Money,
    /// Income minus expenses; negative when spending exceeded income
    pub net_savings: Money,
    /// Equal to `net_savings`; there is no opening balance to add
    pub total_balance: Money,
    /// Summed expense amount per category key
    pub categories: BTreeMap<String, Money>,
}

impl ExpenseSummary {
    /// Fold one transaction in; `false` (and no change) if a total would overflow
    fn try_add(&mut self, txn: &Transaction) -> bool {
        match txn.kind {
            TransactionKind::Income => match self.total_income.checked_add(txn.amount) {
                Some(total) => self.total_income = total,
                None => return false,
            },
            TransactionKind::Expense => {
                let Some(total) = self.total_expenses.checked_add(txn.amount) else {
                    return false;
                };
                let key = txn
                    .category_id
                    .as_ref()
                    .map(|c| c.as_str().to_string())
                    .unwrap_or_else(|| UNCATEGORIZED_KEY.to_string());
                // A category's total never exceeds total_expenses, so it fits too
                *self.categories.entry(key).or_insert_with(Money::zero) += txn.amount;
                self.total_expenses = total;
            }
        }
        true
    }

    /// Savings rate as a percentage of income; 0 when there was no income
    pub fn savings_rate(&self) -> f64 {
        if !self.total_income.is_positive() {
            return 0.0;
        }
        self.net_savings.cents() as f64 / self.total_income.cents() as f64 * 100.0
    }
}

/// Summarize already validated records
///
/// A record that would push a total past the money range is skipped and
/// listed in the diagnostics.
pub fn summarize_parsed(parsed: &[ParsedRecord]) -> Aggregate<ExpenseSummary> {
    let mut summary = ExpenseSummary::default();
    let mut diagnostics = AggregateDiagnostics::default();

    for record in parsed {
        if !summary.try_add(&record.transaction) {
            diagnostics.skip_overflow("compute_summary", record);
        }
    }

    // Both totals are non-negative, so the difference can't overflow
    summary.net_savings = summary.total_income - summary.total_expenses;
    summary.total_balance = summary.net_savings;
    Aggregate::new(summary, diagnostics)
}

/// Compute income, expense and per-category totals
pub fn compute_summary(records: &[TransactionRecord]) -> Aggregate<ExpenseSummary> {
    let (parsed, mut diagnostics) = parse_indexed("compute_summary", records);
    let summary = summarize_parsed(&parsed);
    diagnostics.merge(summary.diagnostics);
    Aggregate::new(summary.value, diagnostics)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::test_support::rec;
    use serde_json::json;

    #[test]
    fn test_empty_input_is_all_zero() {
        let agg = compute_summary(&[]);
        assert_eq!(agg.value, ExpenseSummary::default());
        assert!(agg.value.categories.is_empty());
        assert!(agg.diagnostics.is_clean());
    }

    #[test]
    fn test_food_and_salary() {
        let records = vec![
            rec("1", json!(500), "food", "2024-01-05", "expense"),
            rec("2", json!(2000), "salary", "2024-01-01", "income"),
        ];

        let summary = compute_summary(&records).value;
        assert_eq!(summary.total_income, Money::from_units(2000));
        assert_eq!(summary.total_expenses, Money::from_units(500));
        assert_eq!(summary.net_savings, Money::from_units(1500));
        assert_eq!(summary.total_balance, summary.net_savings);
        assert_eq!(summary.categories.len(), 1);
        assert_eq!(summary.categories["food"], Money::from_units(500));
    }

    #[test]
    fn test_net_savings_can_be_negative() {
        let records = vec![
            rec("1", json!(100), "salary", "2024-01-01", "income"),
            rec("2", json!("250.75"), "rent", "2024-01-02", "expense"),
        ];
        let summary = compute_summary(&records).value;
        assert_eq!(summary.net_savings, Money::from_cents(-15075));
        assert_eq!(
            summary.net_savings,
            summary.total_income - summary.total_expenses
        );
    }

    #[test]
    fn test_permutation_invariance() {
        let mut records = vec![
            rec("1", json!(0.1), "food", "2024-01-01", "expense"),
            rec("2", json!(0.2), "food", "2024-02-01", "expense"),
            rec("3", json!("19.99"), "fun", "2024-03-01", "expense"),
            rec("4", json!(1234.56), "salary", "2024-03-01", "income"),
            rec("5", json!(7), "", "2024-03-04", "expense"),
        ];

        let forward = compute_summary(&records).value;
        records.reverse();
        let backward = compute_summary(&records).value;
        records.swap(0, 3);
        let shuffled = compute_summary(&records).value;

        assert_eq!(forward, backward);
        assert_eq!(forward, shuffled);
        assert_eq!(forward.categories["food"], Money::from_cents(30));
    }

    #[test]
    fn test_missing_category_uses_uncategorized_key() {
        let records = vec![rec("1", json!(12), "", "2024-01-01", "expense")];
        let summary = compute_summary(&records).value;
        assert_eq!(summary.categories[UNCATEGORIZED_KEY], Money::from_units(12));
    }

    #[test]
    fn test_malformed_amount_is_skipped_and_counted() {
        let records = vec![
            rec("1", json!(500), "food", "2024-01-05", "expense"),
            rec("bad", json!("abc"), "food", "2024-01-06", "expense"),
            rec("2", json!(3000), "salary", "2024-01-01", "income"),
        ];

        let agg = compute_summary(&records);
        assert_eq!(agg.skipped_count(), 1);
        assert_eq!(agg.diagnostics.skipped[0].id.as_deref(), Some("bad"));
        assert_eq!(agg.value.total_expenses, Money::from_units(500));
        assert_eq!(agg.value.total_income, Money::from_units(3000));
    }

    #[test]
    fn test_sign_garbage_amounts_are_skipped() {
        let records = vec![
            rec("a", json!("--5"), "food", "2024-01-05", "expense"),
            rec("b", json!("--1.50"), "food", "2024-01-06", "expense"),
            rec("c", json!("4"), "food", "2024-01-07", "expense"),
        ];

        let agg = compute_summary(&records);
        assert_eq!(agg.skipped_count(), 2);
        assert_eq!(agg.value.total_expenses, Money::from_units(4));
    }

    #[test]
    fn test_huge_amounts_do_not_overflow() {
        let records = vec![
            rec("1", json!("90000000000000000"), "food", "2024-01-05", "expense"),
            rec("2", json!("90000000000000000"), "food", "2024-01-06", "expense"),
            rec("3", json!("25"), "food", "2024-01-07", "expense"),
        ];

        let agg = compute_summary(&records);
        assert_eq!(agg.skipped_count(), 1);
        assert_eq!(agg.diagnostics.skipped[0].index, 1);
        assert!(matches!(
            agg.diagnostics.skipped[0].reason,
            crate::models::RecordError::AmountOverflow(_)
        ));
        assert_eq!(
            agg.value.total_expenses,
            Money::from_units(90_000_000_000_000_025)
        );
        assert_eq!(agg.value.categories["food"], agg.value.total_expenses);
    }

    #[test]
    fn test_savings_rate() {
        let records = vec![
            rec("1", json!(250), "food", "2024-01-05", "expense"),
            rec("2", json!(1000), "salary", "2024-01-01", "income"),
        ];
        let summary = compute_summary(&records).value;
        assert!((summary.savings_rate() - 75.0).abs() < f64::EPSILON);
        assert_eq!(ExpenseSummary::default().savings_rate(), 0.0);
    }
}
