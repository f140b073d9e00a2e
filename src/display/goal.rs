//! Saving goal display formatting

use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::config::Settings;
use crate::engine::{GoalPartition, GoalWithProgress};

use super::{format_bar, format_date, format_percentage};

const BAR_WIDTH: usize = 10;

#[derive(Tabled)]
struct GoalRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Goal")]
    name: String,
    #[tabled(rename = "Saved")]
    saved: String,
    #[tabled(rename = "Target")]
    target: String,
    #[tabled(rename = "Progress")]
    progress: String,
    #[tabled(rename = "Deadline")]
    deadline: String,
    #[tabled(rename = "Days left")]
    days_left: String,
}

fn days_label(entry: &GoalWithProgress) -> String {
    let days = entry.progress.days_remaining;
    if entry.progress.is_complete {
        "-".to_string()
    } else if days < 0 {
        format!("overdue {}d", -days)
    } else if entry.progress.is_urgent {
        format!("{} (soon)", days)
    } else {
        days.to_string()
    }
}

fn goal_table(entries: &[GoalWithProgress], settings: &Settings) -> String {
    let symbol = settings.currency_symbol.as_str();

    let rows = entries.iter().map(|entry| {
        let progress = &entry.progress;
        let progress_text = if progress.invalid_target {
            "invalid target".to_string()
        } else {
            format!(
                "{} {} ({})",
                format_bar(progress.percent_complete, 100.0, BAR_WIDTH),
                format_percentage(progress.percent_complete),
                progress.band
            )
        };

        GoalRow {
            id: entry.goal.id.short(),
            name: entry.goal.name.clone(),
            saved: entry.goal.current_amount.format_with_symbol(symbol),
            target: entry.goal.target_amount.format_with_symbol(symbol),
            progress: progress_text,
            deadline: format_date(entry.goal.deadline, &settings.date_format),
            days_left: days_label(entry),
        }
    });

    let mut table = Table::new(rows);
    table.with(Style::rounded());
    table.to_string()
}

/// Format goals as an active section followed by a completed section
pub fn format_goal_partition(partition: &GoalPartition, settings: &Settings) -> String {
    if partition.active.is_empty() && partition.completed.is_empty() {
        return "No saving goals yet. Add one with 'kuberium goal add'.".to_string();
    }

    let mut output = String::new();

    output.push_str(&format!("Active goals ({})\n", partition.active.len()));
    if partition.active.is_empty() {
        output.push_str("  none\n");
    } else {
        output.push_str(&goal_table(&partition.active, settings));
        output.push('\n');
    }

    if !partition.completed.is_empty() {
        output.push_str(&format!("\nCompleted goals ({})\n", partition.completed.len()));
        output.push_str(&goal_table(&partition.completed, settings));
        output.push('\n');
    }

    output
}
