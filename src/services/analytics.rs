//! Analytics service
//!
//! Fetches transactions once per call and runs the engine over them.

use crate::engine::{
    breakdown_parsed, compute_monthly_series, compute_monthly_series_for_year, compute_summary,
    parse_transactions, sort_by_value_desc, summarize_parsed, Aggregate, AggregateDiagnostics,
    CategoryFallback, CategorySpending, ExpenseSummary, MonthlyData,
};
use crate::error::KuberiumResult;
use crate::models::Transaction;
use crate::storage::DataStore;

/// Number of recent transactions shown on the dashboard
const RECENT_COUNT: usize = 5;

/// Everything the overview screen shows
#[derive(Debug, Clone)]
pub struct Dashboard {
    pub summary: ExpenseSummary,
    /// Largest spending category first
    pub top_categories: Vec<CategorySpending>,
    /// Newest first
    pub recent: Vec<Transaction>,
    pub diagnostics: AggregateDiagnostics,
}

/// Service for spending analytics
pub struct AnalyticsService<'a> {
    store: &'a dyn DataStore,
    fallback: CategoryFallback,
}

impl<'a> AnalyticsService<'a> {
    pub fn new(store: &'a dyn DataStore) -> Self {
        Self {
            store,
            fallback: CategoryFallback::default(),
        }
    }

    /// Label and color used for expenses with an unknown category
    pub fn with_fallback(mut self, fallback: CategoryFallback) -> Self {
        self.fallback = fallback;
        self
    }

    /// Summary, category ranking and recent activity in one fetch
    ///
    /// Records are validated once and every view is built from that result.
    pub fn dashboard(&self) -> KuberiumResult<Dashboard> {
        let records = self.store.fetch_transactions()?;
        let categories = self.store.fetch_categories()?;

        let parsed = parse_transactions(&records);
        let mut diagnostics = parsed.diagnostics;

        let summary = summarize_parsed(&parsed.value);
        let breakdown = breakdown_parsed(&parsed.value, &categories, &self.fallback);
        diagnostics.merge(summary.diagnostics);
        for skipped in breakdown.diagnostics.skipped {
            if !diagnostics.skipped.iter().any(|s| s.index == skipped.index) {
                diagnostics.skipped.push(skipped);
            }
        }

        let mut top_categories = breakdown.value;
        sort_by_value_desc(&mut top_categories);

        let mut recent: Vec<Transaction> =
            parsed.value.into_iter().map(|p| p.transaction).collect();
        recent.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| b.time.cmp(&a.time)));
        recent.truncate(RECENT_COUNT);

        Ok(Dashboard {
            summary: summary.value,
            top_categories,
            recent,
            diagnostics,
        })
    }

    /// Totals over every stored transaction
    pub fn summary(&self) -> KuberiumResult<Aggregate<ExpenseSummary>> {
        Ok(compute_summary(&self.store.fetch_transactions()?))
    }

    /// Month-by-month series for one year, or across all years when `None`
    pub fn monthly(&self, year: Option<i32>) -> KuberiumResult<Aggregate<[MonthlyData; 12]>> {
        let records = self.store.fetch_transactions()?;
        Ok(match year {
            Some(year) => compute_monthly_series_for_year(&records, year),
            None => compute_monthly_series(&records),
        })
    }

    /// Expense breakdown, largest category first
    pub fn breakdown(&self) -> KuberiumResult<Aggregate<Vec<CategorySpending>>> {
        let records = self.store.fetch_transactions()?;
        let categories = self.store.fetch_categories()?;

        let parsed = parse_transactions(&records);
        let mut diagnostics = parsed.diagnostics;
        let mut breakdown = breakdown_parsed(&parsed.value, &categories, &self.fallback);
        diagnostics.merge(breakdown.diagnostics);

        sort_by_value_desc(&mut breakdown.value);
        Ok(Aggregate::new(breakdown.value, diagnostics))
    }
}
