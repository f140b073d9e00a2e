//! Budget CLI commands
//!
//! Create, change and delete a month's budget, show its utilization and list
//! budgets.

use clap::Subcommand;

use crate::config::Settings;
use crate::display::{format_budget_list, format_budget_utilization};
use crate::error::{KuberiumError, KuberiumResult};
use crate::services::{BudgetService, CategoryService, CreateBudgetInput};
use crate::storage::Storage;

use super::{parse_amount, parse_period, warn_skipped};

/// Budget subcommands
#[derive(Subcommand)]
pub enum BudgetCommands {
    /// Create the budget for a month
    Create {
        /// Budget period (e.g., "2024-01")
        period: String,
        /// Overall amount planned for the month
        total: String,
        /// Planned amount for a category, repeatable
        #[arg(short, long = "line", value_name = "CATEGORY=AMOUNT")]
        lines: Vec<String>,
    },

    /// Show how much of a month's budget has been spent
    Show {
        /// Budget period (defaults to the current month)
        period: Option<String>,
    },

    /// Change a month's total or its category lines
    Update {
        /// Budget period (e.g., "2024-01")
        period: String,
        /// New overall amount
        #[arg(long)]
        total: Option<String>,
        /// Set a category's planned amount, repeatable
        #[arg(short, long = "line", value_name = "CATEGORY=AMOUNT")]
        lines: Vec<String>,
        /// Drop a category's line, repeatable
        #[arg(long = "remove", value_name = "CATEGORY")]
        remove: Vec<String>,
    },

    /// Delete a month's budget
    Delete {
        /// Budget period (e.g., "2024-01")
        period: String,
    },

    /// List all budgets
    List,
}

fn parse_line(raw: &str) -> KuberiumResult<(String, crate::models::Money)> {
    let (category, amount) = raw.rsplit_once('=').ok_or_else(|| {
        KuberiumError::Validation(format!(
            "Invalid budget line: {}. Use CATEGORY=AMOUNT",
            raw
        ))
    })?;
    Ok((category.trim().to_string(), parse_amount(amount)?))
}

/// Handle a budget command
pub fn handle_budget_command(
    storage: &Storage,
    settings: &Settings,
    cmd: BudgetCommands,
) -> KuberiumResult<()> {
    let service = BudgetService::new(storage);

    match cmd {
        BudgetCommands::Create {
            period,
            total,
            lines,
        } => {
            let (month, year) = parse_period(Some(&period))?;
            let lines = lines
                .iter()
                .map(|l| parse_line(l))
                .collect::<KuberiumResult<Vec<_>>>()?;

            let budget = service.create(CreateBudgetInput {
                month,
                year,
                total: parse_amount(&total)?,
                lines,
            })?;

            println!(
                "Created budget for {}: {} across {} category line(s)",
                budget.period_label(),
                budget.total_budget.format_with_symbol(&settings.currency_symbol),
                budget.categories.len()
            );
        }

        BudgetCommands::Show { period } => {
            let (month, year) = parse_period(period.as_deref())?;
            let utilization = service.utilization(month, year)?;
            let categories = CategoryService::new(storage).list()?;

            println!(
                "{}",
                format_budget_utilization(&utilization.value, &categories, settings).trim_end()
            );
            warn_skipped(&utilization.diagnostics);
        }

        BudgetCommands::Update {
            period,
            total,
            lines,
            remove,
        } => {
            let (month, year) = parse_period(Some(&period))?;
            if total.is_none() && lines.is_empty() && remove.is_empty() {
                return Err(KuberiumError::Validation(
                    "Nothing to update. Pass --total, --line or --remove".into(),
                ));
            }
            let lines = lines
                .iter()
                .map(|l| parse_line(l))
                .collect::<KuberiumResult<Vec<_>>>()?;

            let mut budget = service.get(month, year)?;
            if let Some(total) = total {
                budget = service.update_total(month, year, parse_amount(&total)?)?;
            }
            for (category, amount) in &lines {
                budget = service.set_line(month, year, category, *amount)?;
            }
            for category in &remove {
                budget = service.remove_line(month, year, category)?;
            }

            println!(
                "Updated budget for {}: {} across {} category line(s)",
                budget.period_label(),
                budget.total_budget.format_with_symbol(&settings.currency_symbol),
                budget.categories.len()
            );
        }

        BudgetCommands::Delete { period } => {
            let (month, year) = parse_period(Some(&period))?;
            service.delete(month, year)?;
            println!("Deleted budget for {}-{:02}", year, month);
        }

        BudgetCommands::List => {
            println!("{}", format_budget_list(&service.list()?, settings));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Money;

    #[test]
    fn test_parse_line() {
        assert_eq!(
            parse_line("food=300").unwrap(),
            ("food".to_string(), Money::from_units(300))
        );
        assert_eq!(
            parse_line("Food & Dining = 1,200.50").unwrap(),
            ("Food & Dining".to_string(), Money::from_cents(120050))
        );
        assert!(parse_line("food").unwrap_err().is_validation());
    }
}
