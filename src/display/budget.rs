//! Budget display formatting
//!
//! Utilization is shown per planned line with a usage bar; over-budget lines
//! are flagged rather than hidden.

use std::collections::HashMap;

use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::config::Settings;
use crate::models::{Budget, Category, CategoryId};

use super::{format_bar, format_percentage};

const BAR_WIDTH: usize = 12;

#[derive(Tabled)]
struct UtilizationRow {
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Planned")]
    planned: String,
    #[tabled(rename = "Spent")]
    spent: String,
    #[tabled(rename = "Remaining")]
    remaining: String,
    #[tabled(rename = "Used")]
    used: String,
    #[tabled(rename = "")]
    status: String,
}

#[derive(Tabled)]
struct BudgetRow {
    #[tabled(rename = "Period")]
    period: String,
    #[tabled(rename = "Total")]
    total: String,
    #[tabled(rename = "Allocated")]
    allocated: String,
    #[tabled(rename = "Lines")]
    lines: usize,
}

/// Format a budget whose `spent` figures have been filled in
pub fn format_budget_utilization(
    budget: &Budget,
    categories: &[Category],
    settings: &Settings,
) -> String {
    let symbol = settings.currency_symbol.as_str();
    let names: HashMap<&CategoryId, &str> =
        categories.iter().map(|c| (&c.id, c.name.as_str())).collect();

    let mut output = String::new();
    output.push_str(&format!("Budget for {}\n", budget.period_label()));
    output.push_str(&format!(
        "Total: {}   Allocated: {}   Spent: {}   Remaining: {}\n\n",
        budget.total_budget.format_with_symbol(symbol),
        budget.total_allocated().format_with_symbol(symbol),
        budget.total_spent().format_with_symbol(symbol),
        budget.remaining().format_with_symbol(symbol),
    ));

    if budget.categories.is_empty() {
        output.push_str("No category lines planned.\n");
        return output;
    }

    let rows = budget.categories.iter().map(|line| {
        let percent = line.percent_spent();
        UtilizationRow {
            category: names
                .get(&line.category_id)
                .map(|n| n.to_string())
                .unwrap_or_else(|| settings.fallback_category_label.clone()),
            planned: line.amount.format_with_symbol(symbol),
            spent: line.spent.format_with_symbol(symbol),
            remaining: line.remaining().format_with_symbol(symbol),
            used: format!(
                "{} {}",
                format_bar(percent, 100.0, BAR_WIDTH),
                format_percentage(percent)
            ),
            status: if line.is_over_budget() {
                "OVER".to_string()
            } else {
                String::new()
            },
        }
    });

    let mut table = Table::new(rows);
    table.with(Style::rounded());
    output.push_str(&table.to_string());
    output.push('\n');

    let over = budget.over_budget_categories().count();
    if over > 0 {
        output.push_str(&format!("\n{} line(s) over budget\n", over));
    }

    output
}

/// Format a list of budgets, one row per period
pub fn format_budget_list(budgets: &[Budget], settings: &Settings) -> String {
    if budgets.is_empty() {
        return "No budgets found.".to_string();
    }

    let symbol = settings.currency_symbol.as_str();
    let rows = budgets.iter().map(|b| BudgetRow {
        period: b.period_label(),
        total: b.total_budget.format_with_symbol(symbol),
        allocated: b.total_allocated().format_with_symbol(symbol),
        lines: b.categories.len(),
    });

    let mut table = Table::new(rows);
    table.with(Style::rounded());
    table.to_string()
}
