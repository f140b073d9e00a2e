//! CLI commands for reports
//!
//! Provides commands for generating and exporting reports, plus the overview
//! shown when `kuberium` runs without a subcommand.

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use chrono::{Datelike, Local};
use clap::Subcommand;

use crate::config::Settings;
use crate::display::{format_percentage, format_transaction_table, separator};
use crate::error::{KuberiumError, KuberiumResult};
use crate::reports::{CategoryReport, MonthlyReport, SummaryReport};
use crate::services::{AnalyticsService, CategoryService};
use crate::storage::Storage;

use super::warn_skipped;

/// Report subcommands
#[derive(Subcommand, Debug)]
pub enum ReportCommands {
    /// Income, expenses and net savings
    Summary {
        /// Export to CSV file
        #[arg(long, value_name = "FILE")]
        csv: Option<PathBuf>,
    },

    /// Income and expenses per month
    Monthly {
        /// Year to report on (defaults to the current year)
        #[arg(short, long, conflicts_with = "all_years")]
        year: Option<i32>,

        /// Pool the same month across every year
        #[arg(long)]
        all_years: bool,

        /// Export to CSV file
        #[arg(long, value_name = "FILE")]
        csv: Option<PathBuf>,
    },

    /// Expense breakdown by category
    Categories {
        /// Show top N categories only
        #[arg(long)]
        top: Option<usize>,

        /// Export to CSV file
        #[arg(long, value_name = "FILE")]
        csv: Option<PathBuf>,
    },
}

fn create_csv(path: &Path) -> KuberiumResult<BufWriter<File>> {
    let file = File::create(path).map_err(|e| {
        KuberiumError::Export(format!("Failed to create file {}: {}", path.display(), e))
    })?;
    Ok(BufWriter::new(file))
}

/// Handle report commands
pub fn handle_report_command(
    storage: &Storage,
    settings: &Settings,
    cmd: ReportCommands,
) -> KuberiumResult<()> {
    let symbol = settings.currency_symbol.as_str();
    let fallback = settings.category_fallback();

    match cmd {
        ReportCommands::Summary { csv } => {
            let report = SummaryReport::generate(storage, &fallback)?;
            match csv {
                Some(path) => {
                    report.export_csv(create_csv(&path)?)?;
                    println!("Summary report exported to: {}", path.display());
                    warn_skipped(&report.diagnostics);
                }
                None => print!("{}", report.format_terminal(symbol)),
            }
        }

        ReportCommands::Monthly {
            year,
            all_years,
            csv,
        } => {
            let year = if all_years {
                None
            } else {
                Some(year.unwrap_or_else(|| Local::now().year()))
            };

            let report = MonthlyReport::generate(storage, year)?;
            match csv {
                Some(path) => {
                    report.export_csv(create_csv(&path)?)?;
                    println!("Monthly report exported to: {}", path.display());
                    warn_skipped(&report.diagnostics);
                }
                None => print!("{}", report.format_terminal(symbol)),
            }
        }

        ReportCommands::Categories { top, csv } => {
            let report = CategoryReport::generate(storage, &fallback)?;
            match csv {
                Some(path) => {
                    report.export_csv(create_csv(&path)?)?;
                    println!("Category report exported to: {}", path.display());
                    warn_skipped(&report.diagnostics);
                }
                None => print!("{}", report.format_terminal(symbol, top)),
            }
        }
    }

    Ok(())
}

/// Print the overview: totals, top categories and recent transactions
pub fn handle_dashboard(storage: &Storage, settings: &Settings) -> KuberiumResult<()> {
    let symbol = settings.currency_symbol.as_str();
    let dashboard = AnalyticsService::new(storage)
        .with_fallback(settings.category_fallback())
        .dashboard()?;
    let summary = &dashboard.summary;

    println!("Kuberium Overview");
    println!("{}", separator(50));
    println!("Income:      {}", summary.total_income.format_with_symbol(symbol));
    println!("Expenses:    {}", summary.total_expenses.format_with_symbol(symbol));
    println!(
        "Net savings: {} ({} of income)",
        summary.net_savings.format_with_symbol(symbol),
        format_percentage(summary.savings_rate())
    );

    if !dashboard.top_categories.is_empty() {
        println!();
        println!("Top spending");
        for row in dashboard.top_categories.iter().take(3) {
            println!(
                "  {:<24} {:>14} {:>6}",
                row.name,
                row.value.format_with_symbol(symbol),
                format_percentage(row.share)
            );
        }
    }

    println!();
    println!("Recent transactions");
    let categories = CategoryService::new(storage).list()?;
    println!(
        "{}",
        format_transaction_table(&dashboard.recent, &categories, settings)
    );

    warn_skipped(&dashboard.diagnostics);
    Ok(())
}
