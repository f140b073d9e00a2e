//! Month-by-month income and expense series

use chrono::Datelike;

use super::diagnostics::{parse_indexed, Aggregate, AggregateDiagnostics, ParsedRecord};
use crate::models::{Money, TransactionKind, TransactionRecord};

/// Short month labels, January first
pub const MONTH_LABELS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Totals for one month of the year
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthlyData {
    pub month: &'static str,
    pub income: Money,
    pub expenses: Money,
}

impl MonthlyData {
    pub fn net(&self) -> Money {
        self.income - self.expenses
    }
}

/// Twelve zeroed entries labelled Jan..Dec
pub fn empty_series() -> [MonthlyData; 12] {
    std::array::from_fn(|i| MonthlyData {
        month: MONTH_LABELS[i],
        income: Money::zero(),
        expenses: Money::zero(),
    })
}

/// Bucket parsed records by month, skipping any that would overflow
///
/// Running totals across all twelve months are checked as well, so summing
/// the series afterwards stays in range.
fn bucket<'a>(
    operation: &'static str,
    parsed: impl IntoIterator<Item = &'a ParsedRecord>,
) -> Aggregate<[MonthlyData; 12]> {
    let mut series = empty_series();
    let mut diagnostics = AggregateDiagnostics::default();
    let mut income_total = Money::zero();
    let mut expense_total = Money::zero();

    for record in parsed {
        let txn = &record.transaction;
        let running = match txn.kind {
            TransactionKind::Income => &mut income_total,
            TransactionKind::Expense => &mut expense_total,
        };
        let Some(total) = running.checked_add(txn.amount) else {
            diagnostics.skip_overflow(operation, record);
            continue;
        };
        *running = total;

        let slot = &mut series[txn.date.month0() as usize];
        match txn.kind {
            TransactionKind::Income => slot.income += txn.amount,
            TransactionKind::Expense => slot.expenses += txn.amount,
        }
    }

    Aggregate::new(series, diagnostics)
}

fn with_parse_diagnostics<T>(mut parse: AggregateDiagnostics, agg: Aggregate<T>) -> Aggregate<T> {
    parse.merge(agg.diagnostics);
    Aggregate::new(agg.value, parse)
}

/// Bucket all transactions by month of year
///
/// The year is ignored: January 2023 and January 2024 land in the same entry.
/// Use [`compute_monthly_series_for_year`] to look at a single year.
pub fn compute_monthly_series(records: &[TransactionRecord]) -> Aggregate<[MonthlyData; 12]> {
    let (parsed, diagnostics) = parse_indexed("compute_monthly_series", records);
    with_parse_diagnostics(diagnostics, bucket("compute_monthly_series", &parsed))
}

/// Bucket the transactions of one calendar year by month
pub fn compute_monthly_series_for_year(
    records: &[TransactionRecord],
    year: i32,
) -> Aggregate<[MonthlyData; 12]> {
    const OPERATION: &str = "compute_monthly_series_for_year";
    let (parsed, diagnostics) = parse_indexed(OPERATION, records);
    let in_year = parsed.iter().filter(|p| p.transaction.date.year() == year);
    with_parse_diagnostics(diagnostics, bucket(OPERATION, in_year))
}
