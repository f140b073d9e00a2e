//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the service layer.

pub mod ask;
pub mod budget;
pub mod category;
pub mod goal;
pub mod history;
pub mod report;
pub mod transaction;

pub use ask::handle_ask_command;
pub use budget::{handle_budget_command, BudgetCommands};
pub use category::{handle_category_command, CategoryCommands};
pub use goal::{handle_goal_command, GoalCommands};
pub use history::handle_history_command;
pub use report::{handle_dashboard, handle_report_command, ReportCommands};
pub use transaction::{handle_transaction_command, TransactionCommands};

use chrono::{Datelike, Local, NaiveDate};

use crate::engine::AggregateDiagnostics;
use crate::error::{KuberiumError, KuberiumResult};
use crate::models::Money;

/// Parse a user-entered amount such as "12.50" or "1,200"
pub(crate) fn parse_amount(raw: &str) -> KuberiumResult<Money> {
    Money::parse(raw).map_err(|e| KuberiumError::Validation(e.to_string()))
}

/// Parse a YYYY-MM-DD date
pub(crate) fn parse_date(raw: &str) -> KuberiumResult<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|_| {
        KuberiumError::Validation(format!("Invalid date: {}. Use YYYY-MM-DD", raw))
    })
}

/// Parse a "YYYY-MM" period into (month, year); `None` means the current month
pub(crate) fn parse_period(raw: Option<&str>) -> KuberiumResult<(u32, i32)> {
    let Some(raw) = raw else {
        let today = Local::now().date_naive();
        return Ok((today.month(), today.year()));
    };

    let invalid = || {
        KuberiumError::Validation(format!(
            "Invalid period format: {}. Use YYYY-MM (e.g., 2024-01)",
            raw
        ))
    };

    let (year, month) = raw.trim().split_once('-').ok_or_else(invalid)?;
    let year: i32 = year.parse().map_err(|_| invalid())?;
    let month: u32 = month.parse().map_err(|_| invalid())?;
    if !(1..=12).contains(&month) {
        return Err(invalid());
    }

    Ok((month, year))
}

/// Tell the user on stderr that some stored records were left out
pub(crate) fn warn_skipped(diagnostics: &AggregateDiagnostics) {
    if let Some(note) = crate::display::format_skipped_note(diagnostics) {
        eprintln!("{}", note);
    }
}
