//! Monthly Report
//!
//! Income and expenses per calendar month, for one year or pooled across all
//! years.

use std::io::Write;

use crate::display::{format_bar, format_skipped_note, separator};
use crate::engine::{
    compute_monthly_series, compute_monthly_series_for_year, AggregateDiagnostics, MonthlyData,
};
use crate::error::KuberiumResult;
use crate::models::Money;
use crate::storage::DataStore;

use super::export_error;

const BAR_WIDTH: usize = 20;

/// Monthly report
#[derive(Debug, Clone)]
pub struct MonthlyReport {
    /// `None` when months from every year are pooled together
    pub year: Option<i32>,
    pub months: [MonthlyData; 12],
    pub diagnostics: AggregateDiagnostics,
}

impl MonthlyReport {
    pub fn generate(store: &dyn DataStore, year: Option<i32>) -> KuberiumResult<Self> {
        let records = store.fetch_transactions()?;
        let aggregate = match year {
            Some(year) => compute_monthly_series_for_year(&records, year),
            None => compute_monthly_series(&records),
        };

        Ok(Self {
            year,
            months: aggregate.value,
            diagnostics: aggregate.diagnostics,
        })
    }

    pub fn total_income(&self) -> Money {
        self.months.iter().map(|m| m.income).sum()
    }

    pub fn total_expenses(&self) -> Money {
        self.months.iter().map(|m| m.expenses).sum()
    }

    /// Format the report for terminal display
    pub fn format_terminal(&self, symbol: &str) -> String {
        let mut output = String::new();

        match self.year {
            Some(year) => output.push_str(&format!("Monthly Report: {}\n", year)),
            None => output.push_str("Monthly Report: all years\n"),
        }
        output.push_str(&separator(80));
        output.push('\n');
        output.push_str(&format!(
            "{:<5} {:>14} {:>14} {:>14}  {}\n",
            "Month", "Income", "Expenses", "Net", "Spending"
        ));

        let max_expense = self
            .months
            .iter()
            .map(|m| m.expenses.cents())
            .max()
            .unwrap_or(0) as f64;

        for month in &self.months {
            output.push_str(&format!(
                "{:<5} {:>14} {:>14} {:>14}  {}\n",
                month.month,
                month.income.format_with_symbol(symbol),
                month.expenses.format_with_symbol(symbol),
                month.net().format_with_symbol(symbol),
                format_bar(month.expenses.cents() as f64, max_expense, BAR_WIDTH)
            ));
        }

        output.push_str(&separator(80));
        output.push('\n');
        output.push_str(&format!(
            "{:<5} {:>14} {:>14} {:>14}\n",
            "Total",
            self.total_income().format_with_symbol(symbol),
            self.total_expenses().format_with_symbol(symbol),
            (self.total_income() - self.total_expenses()).format_with_symbol(symbol)
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
        let year = self.year.map(|y| y.to_string()).unwrap_or_default();

        csv.write_record(["Year", "Month", "Income", "Expenses", "Net"])
            .map_err(export_error)?;
        for month in &self.months {
            csv.write_record([
                year.clone(),
                month.month.to_string(),
                month.income.to_string(),
                month.expenses.to_string(),
                month.net().to_string(),
            ])
            .map_err(export_error)?;
        }

        csv.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Transaction;
    use crate::services::test_support::MemoryStore;
    use chrono::NaiveDate;

    fn store() -> MemoryStore {
        let store = MemoryStore::default();
        for txn in [
            Transaction::expense(
                Money::from_units(500),
                "food",
                NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
            ),
            Transaction::income(
                Money::from_units(3000),
                "salary",
                NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            ),
            Transaction::expense(
                Money::from_units(70),
                "food",
                NaiveDate::from_ymd_opt(2023, 1, 9).unwrap(),
            ),
        ] {
            store.transactions.borrow_mut().push(txn.to_record());
        }
        store
    }

    #[test]
    fn test_year_scoping() {
        let store = store();

        let scoped = MonthlyReport::generate(&store, Some(2024)).unwrap();
        assert_eq!(scoped.months[0].expenses, Money::from_units(500));
        assert_eq!(scoped.total_income(), Money::from_units(3000));

        let pooled = MonthlyReport::generate(&store, None).unwrap();
        assert_eq!(pooled.months[0].expenses, Money::from_units(570));
        assert!(pooled.format_terminal("₹").contains("all years"));
    }

    #[test]
    fn test_terminal_lists_every_month() {
        let store = store();
        let text = MonthlyReport::generate(&store, Some(2024))
            .unwrap()
            .format_terminal("₹");

        for label in ["Jan", "Feb", "Jun", "Dec", "Total"] {
            assert!(text.contains(label), "missing {}", label);
        }
        assert!(text.contains("₹2500.00"));
    }

    #[test]
    fn test_export_csv_has_twelve_rows() {
        let store = store();
        let report = MonthlyReport::generate(&store, Some(2024)).unwrap();

        let mut buffer = Vec::new();
        report.export_csv(&mut buffer).unwrap();
        let csv = String::from_utf8(buffer).unwrap();

        assert_eq!(csv.lines().count(), 13);
        assert!(csv.contains("2024,Jan,0.00,500.00,-500.00"));
        assert!(csv.contains("2024,Mar,3000.00,0.00,3000.00"));
    }
}
