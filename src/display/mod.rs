//! Display formatting for terminal output
//!
//! Tables for transactions, categories, budgets and goals, plus the small
//! formatting helpers the reports share.

pub mod budget;
pub mod category;
pub mod goal;
pub mod transaction;

pub use budget::{format_budget_list, format_budget_utilization};
pub use category::format_category_table;
pub use goal::format_goal_partition;
pub use transaction::{format_transaction_details, format_transaction_table};

use std::fmt::Write;

use chrono::NaiveDate;

use crate::engine::AggregateDiagnostics;

/// Format a date with a user-supplied strftime pattern
///
/// Falls back to ISO 8601 when the pattern can't render a plain date
/// (bad specifiers, or time fields like `%H`).
pub fn format_date(date: NaiveDate, pattern: &str) -> String {
    let mut out = String::new();
    match write!(out, "{}", date.format(pattern)) {
        Ok(()) => out,
        Err(_) => date.format("%Y-%m-%d").to_string(),
    }
}

/// Format a percentage with appropriate precision
pub fn format_percentage(pct: f64) -> String {
    if pct > 0.0 && pct < 0.1 {
        format!("{:.2}%", pct)
    } else if pct < 10.0 {
        format!("{:.1}%", pct)
    } else {
        format!("{:.0}%", pct)
    }
}

/// Horizontal bar filled in proportion to `value / max_value`
pub fn format_bar(value: f64, max_value: f64, width: usize) -> String {
    if max_value <= 0.0 || value <= 0.0 {
        return "░".repeat(width);
    }

    let filled = ((value / max_value) * width as f64).round() as usize;
    let filled = filled.min(width);

    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

/// Format a separator line
pub fn separator(width: usize) -> String {
    "─".repeat(width)
}

/// Truncate a string to a maximum number of characters with ellipsis
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        ".".repeat(max_len)
    } else {
        let head: String = s.chars().take(max_len - 3).collect();
        format!("{}...", head)
    }
}

/// One-line note about records an aggregation had to skip
pub fn format_skipped_note(diagnostics: &AggregateDiagnostics) -> Option<String> {
    let first = diagnostics.skipped.first()?;
    let location = first
        .id
        .clone()
        .unwrap_or_else(|| format!("record #{}", first.index + 1));

    let more = match diagnostics.skipped_count() {
        1 => String::new(),
        n => format!(" and {} more", n - 1),
    };

    Some(format!(
        "Note: skipped {} malformed record(s): {} ({}){}",
        diagnostics.skipped_count(),
        location,
        first.reason,
        more
    ))
}
