//! Expense breakdown by category

use std::collections::{BTreeMap, HashMap};

use super::diagnostics::{parse_indexed, Aggregate, AggregateDiagnostics, ParsedRecord};
use crate::models::{
    Category, CategoryId, Money, TransactionRecord, FALLBACK_CATEGORY_COLOR,
    FALLBACK_CATEGORY_NAME,
};

/// Spending in one category
#[derive(Debug, Clone, PartialEq)]
pub struct CategorySpending {
    /// `None` for expenses recorded without a category
    pub category_id: Option<CategoryId>,
    /// Resolved display name, or the fallback label
    pub name: String,
    /// Resolved display color, or the fallback color
    pub color: String,
    /// Summed expense amount
    pub value: Money,
    pub transaction_count: usize,
    /// Percentage of total expenses (0-100)
    pub share: f64,
}

/// Display name and color for expenses whose category can't be resolved
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryFallback {
    pub name: String,
    pub color: String,
}

impl Default for CategoryFallback {
    fn default() -> Self {
        Self {
            name: FALLBACK_CATEGORY_NAME.to_string(),
            color: FALLBACK_CATEGORY_COLOR.to_string(),
        }
    }
}

/// Group expenses by category and resolve display attributes
///
/// Unknown or missing category ids get the fallback name and color; this
/// never fails. Entries come back ordered by category id, uncategorized first.
pub fn compute_category_breakdown(
    records: &[TransactionRecord],
    categories: &[Category],
) -> Aggregate<Vec<CategorySpending>> {
    let (parsed, mut diagnostics) = parse_indexed("compute_category_breakdown", records);
    let breakdown = breakdown_parsed(&parsed, categories, &CategoryFallback::default());
    diagnostics.merge(breakdown.diagnostics);
    Aggregate::new(breakdown.value, diagnostics)
}

/// [`compute_category_breakdown`] over already validated records, with a
/// caller-chosen fallback
pub fn breakdown_parsed(
    parsed: &[ParsedRecord],
    categories: &[Category],
    fallback: &CategoryFallback,
) -> Aggregate<Vec<CategorySpending>> {
    let mut diagnostics = AggregateDiagnostics::default();
    let lookup: HashMap<&CategoryId, &Category> = categories.iter().map(|c| (&c.id, c)).collect();

    let mut total_expenses = Money::zero();
    let mut totals: BTreeMap<Option<CategoryId>, (Money, usize)> = BTreeMap::new();
    for record in parsed.iter().filter(|p| p.transaction.is_expense()) {
        let txn = &record.transaction;
        let Some(total) = total_expenses.checked_add(txn.amount) else {
            diagnostics.skip_overflow("compute_category_breakdown", record);
            continue;
        };
        total_expenses = total;

        let entry = totals
            .entry(txn.category_id.clone())
            .or_insert((Money::zero(), 0));
        entry.0 += txn.amount;
        entry.1 += 1;
    }

    let breakdown = totals
        .into_iter()
        .map(|(category_id, (value, transaction_count))| {
            let resolved = category_id.as_ref().and_then(|id| lookup.get(id));
            let (name, color) = match resolved {
                Some(category) => (category.name.clone(), category.color.clone()),
                None => (fallback.name.clone(), fallback.color.clone()),
            };

            let share = if total_expenses.is_positive() {
                value.cents() as f64 / total_expenses.cents() as f64 * 100.0
            } else {
                0.0
            };

            CategorySpending {
                category_id,
                name,
                color,
                value,
                transaction_count,
                share,
            }
        })
        .collect();

    Aggregate::new(breakdown, diagnostics)
}

/// Largest spending first; ties broken by name
pub fn sort_by_value_desc(breakdown: &mut [CategorySpending]) {
    breakdown.sort_by(|a, b| b.value.cmp(&a.value).then_with(|| a.name.cmp(&b.name)));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::test_support::rec;
    use serde_json::json;

    fn categories() -> Vec<Category> {
        vec![
            Category::with_id("food", "Food", "utensils", "#f97316"),
            Category::with_id("salary", "Salary", "briefcase", "#16a34a"),
        ]
    }

    #[test]
    fn test_food_and_salary() {
        let records = vec![
            rec("1", json!(500), "food", "2024-01-05", "expense"),
            rec("2", json!(3000), "salary", "2024-01-01", "income"),
        ];

        let breakdown = compute_category_breakdown(&records, &categories()).value;
        assert_eq!(breakdown.len(), 1);
        assert_eq!(breakdown[0].name, "Food");
        assert_eq!(breakdown[0].color, "#f97316");
        assert_eq!(breakdown[0].value, Money::from_units(500));
        assert_eq!(breakdown[0].transaction_count, 1);
        assert!((breakdown[0].share - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_income_only_is_empty() {
        let records = vec![rec("1", json!(3000), "salary", "2024-01-01", "income")];
        assert!(compute_category_breakdown(&records, &categories())
            .value
            .is_empty());
    }

    #[test]
    fn test_unknown_category_uses_fallback() {
        let records = vec![
            rec("1", json!(20), "ghost", "2024-01-05", "expense"),
            rec("2", json!(5), "", "2024-01-06", "expense"),
        ];

        let breakdown = compute_category_breakdown(&records, &[]).value;
        assert_eq!(breakdown.len(), 2);
        for entry in &breakdown {
            assert_eq!(entry.name, FALLBACK_CATEGORY_NAME);
            assert_eq!(entry.color, FALLBACK_CATEGORY_COLOR);
        }
        assert_eq!(breakdown[0].category_id, None);
        assert_eq!(breakdown[1].category_id, Some(CategoryId::from_raw("ghost")));
    }

    #[test]
    fn test_custom_fallback() {
        let records = vec![rec("1", json!(20), "ghost", "2024-01-05", "expense")];
        let parsed = crate::engine::parse_transactions(&records).value;
        let fallback = CategoryFallback {
            name: "Other".into(),
            color: "#123456".into(),
        };

        let breakdown = breakdown_parsed(&parsed, &categories(), &fallback).value;
        assert_eq!(breakdown[0].name, "Other");
        assert_eq!(breakdown[0].color, "#123456");
    }

    #[test]
    fn test_overflowing_expense_is_skipped() {
        let records = vec![
            rec("1", json!("90000000000000000"), "food", "2024-01-05", "expense"),
            rec("2", json!("90000000000000000"), "rent", "2024-01-06", "expense"),
        ];

        let agg = compute_category_breakdown(&records, &categories());
        assert_eq!(agg.skipped_count(), 1);
        assert_eq!(agg.value.len(), 1);
        assert!((agg.value[0].share - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_one_entry_per_category() {
        let records = vec![
            rec("1", json!(10), "food", "2024-01-05", "expense"),
            rec("2", json!(30), "food", "2024-02-05", "expense"),
            rec("3", json!(60), "rent", "2024-02-05", "expense"),
        ];

        let mut breakdown = compute_category_breakdown(&records, &categories()).value;
        assert_eq!(breakdown.len(), 2);

        let food = breakdown.iter().find(|e| e.name == "Food").unwrap();
        assert_eq!(food.value, Money::from_units(40));
        assert_eq!(food.transaction_count, 2);
        assert!((food.share - 40.0).abs() < 1e-9);

        sort_by_value_desc(&mut breakdown);
        assert_eq!(breakdown[0].value, Money::from_units(60));
    }
}
