//! Summary Report
//!
//! Income, expenses and net savings over every stored transaction, with the
//! expense total split per category.

use std::collections::HashMap;
use std::io::Write;

use crate::engine::{
    compute_summary, AggregateDiagnostics, CategoryFallback, ExpenseSummary, UNCATEGORIZED_KEY,
};
use crate::error::KuberiumResult;
use crate::models::Money;
use crate::storage::DataStore;

use super::export_error;
use crate::display::{format_percentage, format_skipped_note, separator};

/// Summary report
#[derive(Debug, Clone)]
pub struct SummaryReport {
    pub summary: ExpenseSummary,
    /// (display name, amount) per category, largest first
    pub category_rows: Vec<(String, Money)>,
    pub diagnostics: AggregateDiagnostics,
}

impl SummaryReport {
    /// Category ids with no stored category are shown under the fallback label
    pub fn generate(store: &dyn DataStore, fallback: &CategoryFallback) -> KuberiumResult<Self> {
        let records = store.fetch_transactions()?;
        let categories = store.fetch_categories()?;
        let aggregate = compute_summary(&records);

        let names: HashMap<&str, &str> = categories
            .iter()
            .map(|c| (c.id.as_str(), c.name.as_str()))
            .collect();

        let mut category_rows: Vec<(String, Money)> = aggregate
            .value
            .categories
            .iter()
            .map(|(key, amount)| {
                let name = match names.get(key.as_str()) {
                    Some(name) => name.to_string(),
                    None if key == UNCATEGORIZED_KEY => "Uncategorized".to_string(),
                    None => fallback.name.clone(),
                };
                (name, *amount)
            })
            .collect();
        category_rows = merge_by_name(category_rows);
        category_rows.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

        Ok(Self {
            summary: aggregate.value,
            category_rows,
            diagnostics: aggregate.diagnostics,
        })
    }

    /// Format the report for terminal display
    pub fn format_terminal(&self, symbol: &str) -> String {
        let s = &self.summary;
        let mut output = String::new();

        output.push_str("Financial Summary\n");
        output.push_str(&separator(50));
        output.push('\n');
        output.push_str(&format!("{:<20} {:>20}\n", "Total Income", s.total_income.format_with_symbol(symbol)));
        output.push_str(&format!("{:<20} {:>20}\n", "Total Expenses", s.total_expenses.format_with_symbol(symbol)));
        output.push_str(&format!("{:<20} {:>20}\n", "Net Savings", s.net_savings.format_with_symbol(symbol)));
        output.push_str(&format!("{:<20} {:>20}\n", "Balance", s.total_balance.format_with_symbol(symbol)));
        output.push_str(&format!("{:<20} {:>20}\n", "Savings Rate", format_percentage(s.savings_rate())));

        if !self.category_rows.is_empty() {
            output.push_str("\nExpenses by category\n");
            output.push_str(&separator(50));
            output.push('\n');
            for (name, amount) in &self.category_rows {
                output.push_str(&format!("{:<30} {:>19}\n", name, amount.format_with_symbol(symbol)));
            }
        }

        if let Some(note) = format_skipped_note(&self.diagnostics) {
            output.push('\n');
            output.push_str(&note);
            output.push('\n');
        }

        output
    }

    /// Export the report to CSV format
    pub fn export_csv<W: Write>(&self, writer: W) -> KuberiumResult<()> {
        let mut csv = csv::Writer::from_writer(writer);
        let s = &self.summary;

        csv.write_record(["Metric", "Amount"]).map_err(export_error)?;
        for (metric, amount) in [
            ("Total Income", s.total_income),
            ("Total Expenses", s.total_expenses),
            ("Net Savings", s.net_savings),
            ("Balance", s.total_balance),
        ] {
            csv.write_record([metric.to_string(), amount.to_string()])
                .map_err(export_error)?;
        }
        for (name, amount) in &self.category_rows {
            csv.write_record([format!("Category: {}", name), amount.to_string()])
                .map_err(export_error)?;
        }

        csv.flush()?;
        Ok(())
    }
}

/// Several unknown ids share the fallback label; fold them into one row
fn merge_by_name(rows: Vec<(String, Money)>) -> Vec<(String, Money)> {
    let mut merged: Vec<(String, Money)> = Vec::with_capacity(rows.len());
    for (name, amount) in rows {
        match merged.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, total)) => *total += amount,
            None => merged.push((name, amount)),
        }
    }
    merged
}
