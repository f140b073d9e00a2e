//! Category Report
//!
//! Expense breakdown by category, largest first.

use std::io::Write;

use crate::display::{format_bar, format_percentage, format_skipped_note, separator, truncate};
use crate::engine::{AggregateDiagnostics, CategoryFallback, CategorySpending};
use crate::error::KuberiumResult;
use crate::models::Money;
use crate::services::AnalyticsService;
use crate::storage::DataStore;

use super::export_error;

const BAR_WIDTH: usize = 20;

/// Category report
#[derive(Debug, Clone)]
pub struct CategoryReport {
    pub rows: Vec<CategorySpending>,
    pub total_expenses: Money,
    pub diagnostics: AggregateDiagnostics,
}

impl CategoryReport {
    pub fn generate(store: &dyn DataStore, fallback: &CategoryFallback) -> KuberiumResult<Self> {
        let breakdown = AnalyticsService::new(store)
            .with_fallback(fallback.clone())
            .breakdown()?;
        let total_expenses = breakdown.value.iter().map(|row| row.value).sum();

        Ok(Self {
            rows: breakdown.value,
            total_expenses,
            diagnostics: breakdown.diagnostics,
        })
    }

    /// The `limit` largest categories
    pub fn top(&self, limit: usize) -> &[CategorySpending] {
        &self.rows[..limit.min(self.rows.len())]
    }

    /// Format the report for terminal display
    pub fn format_terminal(&self, symbol: &str, limit: Option<usize>) -> String {
        let rows = match limit {
            Some(limit) => self.top(limit),
            None => &self.rows,
        };

        let mut output = String::new();
        output.push_str("Spending by Category\n");
        output.push_str(&separator(80));
        output.push('\n');

        if rows.is_empty() {
            output.push_str("No expenses recorded.\n");
        } else {
            output.push_str(&format!(
                "{:<24} {:>14} {:>6} {:>7}  {}\n",
                "Category", "Amount", "Count", "Share", ""
            ));
            for row in rows {
                output.push_str(&format!(
                    "{:<24} {:>14} {:>6} {:>7}  {}\n",
                    truncate(&row.name, 24),
                    row.value.format_with_symbol(symbol),
                    row.transaction_count,
                    format_percentage(row.share),
                    format_bar(row.share, 100.0, BAR_WIDTH)
                ));
            }
        }

        output.push_str(&separator(80));
        output.push('\n');
        output.push_str(&format!(
            "{:<24} {:>14}\n",
            "TOTAL SPENDING",
            self.total_expenses.format_with_symbol(symbol)
        ));

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

        csv.write_record(["Category ID", "Category", "Color", "Amount", "Transactions", "Share"])
            .map_err(export_error)?;
        for row in &self.rows {
            csv.write_record([
                row.category_id
                    .as_ref()
                    .map(|id| id.to_string())
                    .unwrap_or_default(),
                row.name.clone(),
                row.color.clone(),
                row.value.to_string(),
                row.transaction_count.to_string(),
                format!("{:.2}", row.share),
            ])
            .map_err(export_error)?;
        }

        csv.flush()?;
        Ok(())
    }
}
