//! Saving goal CLI commands

use chrono::Local;
use clap::Subcommand;

use crate::config::Settings;
use crate::display::format_goal_partition;
use crate::error::KuberiumResult;
use crate::services::GoalService;
use crate::storage::Storage;

use super::{parse_amount, parse_date};

/// Goal subcommands
#[derive(Subcommand)]
pub enum GoalCommands {
    /// Create a saving goal
    Add {
        /// Goal name
        name: String,
        /// Target amount
        target: String,
        /// Deadline (YYYY-MM-DD)
        #[arg(short, long)]
        deadline: String,
    },

    /// Put money towards a goal
    Contribute {
        /// Goal name or ID
        goal: String,
        /// Amount to add
        amount: String,
    },

    /// Overwrite the amount saved so far
    Set {
        /// Goal name or ID
        goal: String,
        /// New saved amount
        amount: String,
    },

    /// Delete a saving goal
    Delete {
        /// Goal name or ID
        goal: String,
    },

    /// List goals with their progress
    List,
}

/// Handle a goal command
pub fn handle_goal_command(
    storage: &Storage,
    settings: &Settings,
    cmd: GoalCommands,
) -> KuberiumResult<()> {
    let service = GoalService::new(storage);
    let symbol = settings.currency_symbol.as_str();

    match cmd {
        GoalCommands::Add {
            name,
            target,
            deadline,
        } => {
            let goal = service.create(&name, parse_amount(&target)?, parse_date(&deadline)?)?;
            println!(
                "Created goal '{}': {} by {}",
                goal.name,
                goal.target_amount.format_with_symbol(symbol),
                goal.deadline
            );
        }

        GoalCommands::Contribute { goal, amount } => {
            let goal = service.contribute(&goal, parse_amount(&amount)?)?;
            println!(
                "'{}' now at {} of {}",
                goal.name,
                goal.current_amount.format_with_symbol(symbol),
                goal.target_amount.format_with_symbol(symbol)
            );
            if goal.is_complete() {
                println!("Goal reached!");
            }
        }

        GoalCommands::Set { goal, amount } => {
            let goal = service.set_amount(&goal, parse_amount(&amount)?)?;
            println!(
                "'{}' set to {}",
                goal.name,
                goal.current_amount.format_with_symbol(symbol)
            );
        }

        GoalCommands::Delete { goal } => {
            let goal = service.delete(&goal)?;
            println!("Deleted goal '{}'", goal.name);
        }

        GoalCommands::List => {
            let partition = service.list_with_progress(Local::now().naive_local())?;
            println!("{}", format_goal_partition(&partition, settings).trim_end());
        }
    }

    Ok(())
}
