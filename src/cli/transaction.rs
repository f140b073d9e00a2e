//! Transaction CLI commands
//!
//! Add, list, delete and bulk-import transactions.

use std::path::PathBuf;

use chrono::Local;
use clap::{Subcommand, ValueEnum};

use crate::config::Settings;
use crate::display::{format_transaction_details, format_transaction_table};
use crate::error::KuberiumResult;
use crate::models::TransactionKind;
use crate::services::{
    CategoryService, CreateTransactionInput, ImportFormat, ImportService, TransactionFilter,
    TransactionService,
};
use crate::storage::Storage;

use super::{parse_amount, parse_date, warn_skipped};

/// Transaction kind as given on the command line
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum KindArg {
    Expense,
    Income,
}

/// Import file layout as given on the command line
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    Csv,
    /// Account-aggregator JSON statement
    AaJson,
}

impl From<FormatArg> for ImportFormat {
    fn from(format: FormatArg) -> Self {
        match format {
            FormatArg::Csv => ImportFormat::Csv,
            FormatArg::AaJson => ImportFormat::AggregatorJson,
        }
    }
}

impl From<KindArg> for TransactionKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Expense => TransactionKind::Expense,
            KindArg::Income => TransactionKind::Income,
        }
    }
}

/// Transaction subcommands
#[derive(Subcommand)]
pub enum TransactionCommands {
    /// Record a new transaction
    Add {
        /// Amount (e.g., "12.50"); never negative
        amount: String,
        /// Expense or income
        #[arg(short = 't', long = "type", value_enum, default_value_t = KindArg::Expense)]
        kind: KindArg,
        /// Category name or ID
        #[arg(short, long)]
        category: Option<String>,
        /// Transaction date (YYYY-MM-DD, defaults to today)
        #[arg(short, long)]
        date: Option<String>,
        /// Description
        #[arg(short = 'm', long)]
        description: Option<String>,
        /// Payment method tag (cash, card, upi, ...)
        #[arg(short, long)]
        payment: Option<String>,
    },

    /// List transactions, newest first
    List {
        /// Only this kind
        #[arg(short = 't', long = "type", value_enum)]
        kind: Option<KindArg>,
        /// Only this category (name or ID)
        #[arg(short, long)]
        category: Option<String>,
        /// Earliest date (YYYY-MM-DD)
        #[arg(long)]
        from: Option<String>,
        /// Latest date (YYYY-MM-DD)
        #[arg(long)]
        to: Option<String>,
        /// Number of transactions to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },

    /// Delete a transaction
    Delete {
        /// Transaction ID or unique ID prefix
        id: String,
    },

    /// Import transactions from a CSV file or an account-aggregator statement
    Import {
        /// Path to the file
        file: PathBuf,
        /// File layout; guessed from the extension when omitted
        #[arg(long, value_enum)]
        format: Option<FormatArg>,
    },
}

/// Handle a transaction command
pub fn handle_transaction_command(
    storage: &Storage,
    settings: &Settings,
    cmd: TransactionCommands,
) -> KuberiumResult<()> {
    let service = TransactionService::new(storage);

    match cmd {
        TransactionCommands::Add {
            amount,
            kind,
            category,
            date,
            description,
            payment,
        } => {
            let date = match date {
                Some(d) => parse_date(&d)?,
                None => Local::now().date_naive(),
            };

            let txn = service.add(CreateTransactionInput {
                kind: kind.into(),
                amount: parse_amount(&amount)?,
                date,
                description: description.unwrap_or_default(),
                category,
                payment_method: payment,
            })?;

            let categories = CategoryService::new(storage).list()?;
            println!("Recorded transaction:");
            print!("{}", format_transaction_details(&txn, &categories, settings));
        }

        TransactionCommands::List {
            kind,
            category,
            from,
            to,
            limit,
        } => {
            let category_service = CategoryService::new(storage);

            let mut filter = TransactionFilter::new().limit(limit);
            filter.kind = kind.map(Into::into);
            if let Some(category) = category {
                filter.category_id = Some(category_service.resolve(&category)?.id);
            }
            filter.start_date = from.as_deref().map(parse_date).transpose()?;
            filter.end_date = to.as_deref().map(parse_date).transpose()?;

            let listing = service.list(&filter)?;
            let categories = category_service.list()?;
            println!(
                "{}",
                format_transaction_table(&listing.transactions, &categories, settings)
            );
            warn_skipped(&listing.diagnostics);
        }

        TransactionCommands::Delete { id } => {
            let deleted = service.delete(&id)?;
            println!("Deleted transaction {}", deleted.short());
        }

        TransactionCommands::Import { file, format } => {
            let format = format
                .map(ImportFormat::from)
                .unwrap_or_else(|| ImportFormat::from_path(&file));
            let result = ImportService::new(storage).import_file(&file, format)?;

            println!(
                "Imported {} transaction(s) from {}",
                result.imported_count(),
                file.display()
            );
            if result.duplicates_skipped > 0 {
                println!(
                    "Skipped {} duplicate(s) already on record",
                    result.duplicates_skipped
                );
            }
            if result.skipped_count() > 0 {
                println!("Skipped {} row(s):", result.skipped_count());
                for row in &result.skipped {
                    println!("  line {}: {}", row.line, row.reason);
                }
            }
        }
    }

    Ok(())
}
