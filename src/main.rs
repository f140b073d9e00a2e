use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use kuberium::cli::{
    handle_ask_command, handle_budget_command, handle_category_command, handle_dashboard,
    handle_goal_command, handle_history_command, handle_report_command,
    handle_transaction_command,
};
use kuberium::config::{KuberiumPaths, Settings};
use kuberium::storage::{initialize_storage, Storage};

/// Environment variable holding the log filter (e.g. "kuberium=debug")
const LOG_ENV: &str = "KUBERIUM_LOG";

#[derive(Parser)]
#[command(
    name = "kuberium",
    version,
    about = "Personal-finance tracker for the terminal",
    long_about = "Kuberium records income and expenses, plans monthly budgets, \
                  tracks saving goals and summarizes where your money goes."
)]
struct Cli {
    /// Data directory (defaults to ~/.config/kuberium)
    #[arg(long, global = true, env = "KUBERIUM_DATA_DIR")]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the data directory and default categories
    Init,

    /// Show current configuration and paths
    Config,

    /// Transaction management commands
    #[command(subcommand, alias = "transaction")]
    Txn(kuberium::cli::TransactionCommands),

    /// Category management commands
    #[command(subcommand)]
    Category(kuberium::cli::CategoryCommands),

    /// Monthly budget commands
    #[command(subcommand)]
    Budget(kuberium::cli::BudgetCommands),

    /// Saving goal commands
    #[command(subcommand)]
    Goal(kuberium::cli::GoalCommands),

    /// Reports and CSV export
    #[command(subcommand)]
    Report(kuberium::cli::ReportCommands),

    /// Ask the assistant a question (interactive without a message)
    Ask {
        /// The question to send
        message: Option<String>,
        /// Assistant endpoint URL, overriding config.json
        #[arg(long, env = "KUBERIUM_ASSISTANT_URL")]
        endpoint: Option<String>,
    },

    /// Show recent changes from the audit log
    History {
        /// Number of entries to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn open_storage(paths: &KuberiumPaths) -> Result<Storage> {
    let storage = Storage::open(paths.clone())?;
    let rejected = storage.rejected_rows();
    if rejected > 0 {
        eprintln!(
            "Note: {} stored budget/goal row(s) could not be read and were left as they are",
            rejected
        );
    }
    Ok(storage)
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let paths = KuberiumPaths::resolve(cli.data_dir.map(PathBuf::into_os_string))?;
    let settings = Settings::load_or_create(&paths)?;

    match cli.command {
        Some(Commands::Init) => {
            println!("Initializing Kuberium at: {}", paths.base_dir().display());
            initialize_storage(&paths)?;
            settings.save(&paths)?;
            println!("Initialization complete!");
            println!();
            println!("Default categories have been created. Run 'kuberium category list' to see them.");
        }
        Some(Commands::Config) => {
            println!("Kuberium Configuration");
            println!("======================");
            println!("Base directory:  {}", paths.base_dir().display());
            println!("Data directory:  {}", paths.data_dir().display());
            println!("Settings file:   {}", paths.settings_file().display());
            println!("Audit log:       {}", paths.audit_log().display());
            println!("Initialized:     {}", paths.is_initialized());
            println!();
            println!("Settings:");
            println!("  Currency symbol:    {}", settings.currency_symbol);
            println!("  Date format:        {}", settings.date_format);
            println!("  Fallback category:  {}", settings.fallback_category_label);
            println!("  Fallback color:     {}", settings.fallback_category_color);
            println!(
                "  Assistant endpoint: {}",
                settings.assistant.endpoint.as_deref().unwrap_or("(not set)")
            );
        }
        Some(Commands::Ask { message, endpoint }) => {
            handle_ask_command(&settings, endpoint, message)?;
        }
        Some(Commands::Txn(cmd)) => {
            handle_transaction_command(&open_storage(&paths)?, &settings, cmd)?;
        }
        Some(Commands::Category(cmd)) => {
            handle_category_command(&open_storage(&paths)?, cmd)?;
        }
        Some(Commands::Budget(cmd)) => {
            handle_budget_command(&open_storage(&paths)?, &settings, cmd)?;
        }
        Some(Commands::Goal(cmd)) => {
            handle_goal_command(&open_storage(&paths)?, &settings, cmd)?;
        }
        Some(Commands::Report(cmd)) => {
            handle_report_command(&open_storage(&paths)?, &settings, cmd)?;
        }
        Some(Commands::History { limit }) => {
            handle_history_command(&open_storage(&paths)?, limit)?;
        }
        None => {
            if !paths.is_initialized() {
                println!("Kuberium - personal-finance tracker");
                println!();
                println!("Run 'kuberium init' to get started, or 'kuberium --help' for usage.");
                return Ok(());
            }
            handle_dashboard(&open_storage(&paths)?, &settings)?;
        }
    }

    Ok(())
}
