//! Transaction import service
//!
//! Two sources are understood. A CSV file with a header row:
//!
//! ```text
//! date,amount,description,category,type,payment_method
//! 2024-01-05,500,Groceries,food,expense,upi
//! ```
//!
//! Columns are matched by header name (case-insensitive) so their order does
//! not matter; `description`, `category` and `payment_method` are optional.
//!
//! And an account-aggregator statement in JSON: a `customer` plus a list of
//! `accounts`, each carrying its own `transactions` with `type` set to
//! `DEBIT`/`CREDIT` (or `expense`/`income`).
//!
//! Each row goes through the same record validation as stored data. Bad rows
//! are skipped and reported with their position. Rows that repeat a stored
//! transaction, or an earlier row of the same file, are counted and dropped.
//! The surviving rows are written in one batch: either all of them are saved
//! or none are.

use std::collections::HashSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::NaiveDate;
use csv::{ReaderBuilder, StringRecord};
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::error::{KuberiumError, KuberiumResult};
use crate::models::{Category, Money, Transaction, TransactionKind, TransactionRecord};
use crate::storage::DataStore;

/// A row that was not imported
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowError {
    /// 1-based position: the file line for CSV (the header is line 1), the
    /// transaction's number across all accounts for a JSON statement
    pub line: u64,
    pub reason: String,
}

/// Outcome of an import run
#[derive(Debug, Clone, Default)]
pub struct ImportResult {
    pub imported: Vec<Transaction>,
    pub skipped: Vec<RowError>,
    /// Valid rows dropped because the same transaction was already present
    pub duplicates_skipped: usize,
}

impl ImportResult {
    pub fn imported_count(&self) -> usize {
        self.imported.len()
    }

    pub fn skipped_count(&self) -> usize {
        self.skipped.len()
    }
}

/// Source file layout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportFormat {
    Csv,
    AggregatorJson,
}

impl ImportFormat {
    /// Guess from the file extension; anything but `.json` is read as CSV
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Self::AggregatorJson,
            _ => Self::Csv,
        }
    }
}

/// Identity used to spot a transaction imported twice
type DuplicateKey = (NaiveDate, Money, String, TransactionKind);

fn duplicate_key(txn: &Transaction) -> DuplicateKey {
    (
        txn.date,
        txn.amount,
        txn.description.trim().to_lowercase(),
        txn.kind,
    )
}

#[derive(Debug, Clone, Copy)]
struct Columns {
    date: usize,
    amount: usize,
    kind: usize,
    description: Option<usize>,
    category: Option<usize>,
    payment_method: Option<usize>,
}

impl Columns {
    fn from_headers(headers: &StringRecord) -> KuberiumResult<Self> {
        let find = |names: &[&str]| {
            headers
                .iter()
                .position(|h| names.contains(&h.trim().to_lowercase().as_str()))
        };
        let require = |names: &[&str]| {
            find(names).ok_or_else(|| {
                KuberiumError::Import(format!("CSV header is missing a '{}' column", names[0]))
            })
        };

        Ok(Self {
            date: require(&["date"])?,
            amount: require(&["amount"])?,
            kind: require(&["type", "kind"])?,
            description: find(&["description", "memo", "note"]),
            category: find(&["category", "category_id"]),
            payment_method: find(&["payment_method", "payment method", "method"]),
        })
    }
}

#[derive(Debug, Deserialize)]
struct AggregatorStatement {
    customer: AggregatorCustomer,
    #[serde(default)]
    accounts: Vec<AggregatorAccount>,
}

#[derive(Debug, Deserialize)]
struct AggregatorCustomer {
    id: String,
}

#[derive(Debug, Deserialize)]
struct AggregatorAccount {
    account_id: String,
    #[serde(default)]
    bank: String,
    /// Kept untyped so one bad entry doesn't reject the statement
    #[serde(default)]
    transactions: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct AggregatorTransaction {
    #[serde(default)]
    date: String,
    #[serde(rename = "type", default)]
    kind: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    amount: serde_json::Value,
}

impl AggregatorTransaction {
    fn to_record(&self, account_id: &str) -> TransactionRecord {
        let kind = match self.kind.trim().to_ascii_lowercase().as_str() {
            "credit" => TransactionKind::Income.as_str().to_string(),
            "debit" => TransactionKind::Expense.as_str().to_string(),
            _ => self.kind.clone(),
        };

        TransactionRecord {
            id: None,
            amount: self.amount.clone(),
            description: self.description.clone(),
            category_id: None,
            date: self.date.clone(),
            kind,
            payment_method: account_id.to_string(),
        }
    }
}

/// Service for importing transactions
pub struct ImportService<'a> {
    store: &'a dyn DataStore,
}

impl<'a> ImportService<'a> {
    pub fn new(store: &'a dyn DataStore) -> Self {
        Self { store }
    }

    /// Import a file on disk in the given format
    pub fn import_file(&self, path: &Path, format: ImportFormat) -> KuberiumResult<ImportResult> {
        let file = File::open(path).map_err(|e| {
            KuberiumError::Import(format!("Failed to open {}: {}", path.display(), e))
        })?;
        match format {
            ImportFormat::Csv => self.import_reader(file),
            ImportFormat::AggregatorJson => self.import_aggregator_reader(file),
        }
    }

    /// Import from any CSV source
    pub fn import_reader<R: Read>(&self, reader: R) -> KuberiumResult<ImportResult> {
        let mut csv_reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = csv_reader
            .headers()
            .map_err(|e| KuberiumError::Import(format!("Failed to read CSV header: {}", e)))?
            .clone();
        let columns = Columns::from_headers(&headers)?;

        let categories = self.store.fetch_categories()?;
        let mut rows = Vec::new();
        let mut skipped = Vec::new();

        for row in csv_reader.records() {
            let row = match row {
                Ok(row) => row,
                Err(e) => {
                    let line = e.position().map(|p| p.line()).unwrap_or(0);
                    skipped.push(RowError {
                        line,
                        reason: e.to_string(),
                    });
                    continue;
                }
            };
            let line = row.position().map(|p| p.line()).unwrap_or(0);
            rows.push((line, to_record(&row, columns, &categories)));
        }

        self.commit("CSV", rows, skipped)
    }

    /// Import an account-aggregator JSON statement
    ///
    /// A document that isn't a statement at all is an import error; a single
    /// transaction that doesn't decode is skipped like a bad CSV row.
    pub fn import_aggregator_reader<R: Read>(&self, reader: R) -> KuberiumResult<ImportResult> {
        let statement: AggregatorStatement = serde_json::from_reader(reader).map_err(|e| {
            KuberiumError::Import(format!("Not an account-aggregator statement: {}", e))
        })?;
        info!(
            customer = %statement.customer.id,
            accounts = statement.accounts.len(),
            "reading account-aggregator statement"
        );

        let mut rows = Vec::new();
        let mut skipped = Vec::new();
        let mut position = 0u64;

        for account in &statement.accounts {
            debug!(account = %account.account_id, bank = %account.bank, "reading account");
            for value in &account.transactions {
                position += 1;
                match AggregatorTransaction::deserialize(value) {
                    Ok(txn) => rows.push((position, txn.to_record(&account.account_id))),
                    Err(e) => skipped.push(RowError {
                        line: position,
                        reason: e.to_string(),
                    }),
                }
            }
        }

        self.commit("account-aggregator", rows, skipped)
    }

    /// Validate, drop duplicates, then write everything left in one batch
    fn commit(
        &self,
        source: &'static str,
        rows: Vec<(u64, TransactionRecord)>,
        mut skipped: Vec<RowError>,
    ) -> KuberiumResult<ImportResult> {
        let mut seen: HashSet<DuplicateKey> = self
            .store
            .fetch_transactions()?
            .iter()
            .filter_map(|record| record.parse().ok())
            .map(|txn| duplicate_key(&txn))
            .collect();

        let mut imported = Vec::new();
        let mut duplicates_skipped = 0;

        for (line, record) in rows {
            match record.parse() {
                Ok(txn) => {
                    if seen.insert(duplicate_key(&txn)) {
                        imported.push(txn);
                    } else {
                        debug!(line, "skipping duplicate transaction");
                        duplicates_skipped += 1;
                    }
                }
                Err(reason) => {
                    warn!(line, %reason, source, "skipping import row");
                    skipped.push(RowError {
                        line,
                        reason: reason.to_string(),
                    });
                }
            }
        }
        skipped.sort_by_key(|row| row.line);

        self.store.insert_transactions(&imported).map_err(|e| {
            KuberiumError::Import(format!(
                "none of the {} valid row(s) were saved: {}",
                imported.len(),
                e
            ))
        })?;

        let result = ImportResult {
            imported,
            skipped,
            duplicates_skipped,
        };
        info!(
            source,
            imported = result.imported_count(),
            skipped = result.skipped_count(),
            duplicates = result.duplicates_skipped,
            "finished import"
        );
        Ok(result)
    }
}

/// Build a store-shaped record from a CSV row
///
/// The category cell may hold an id or a display name; names are mapped to
/// ids so that the breakdown can resolve them later.
fn to_record(row: &StringRecord, columns: Columns, categories: &[Category]) -> TransactionRecord {
    let cell = |index: Option<usize>| {
        index
            .and_then(|i| row.get(i))
            .map(str::to_string)
            .unwrap_or_default()
    };

    let category = cell(columns.category);
    let category_id = if category.is_empty() {
        None
    } else {
        let lower = category.to_lowercase();
        let resolved = categories
            .iter()
            .find(|c| c.id.as_str() == category || c.name.to_lowercase() == lower)
            .map(|c| c.id.to_string());
        Some(resolved.unwrap_or(category))
    };

    TransactionRecord {
        id: None,
        amount: serde_json::Value::String(cell(Some(columns.amount))),
        description: cell(columns.description),
        category_id,
        date: cell(Some(columns.date)),
        kind: cell(Some(columns.kind)),
        payment_method: cell(columns.payment_method).to_lowercase(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CategoryId;
    use crate::services::test_support::MemoryStore;

    fn store() -> MemoryStore {
        let store = MemoryStore::default();
        store
            .categories
            .borrow_mut()
            .push(Category::with_id("food", "Food & Dining", "", "#f97316"));
        store
    }

    const STATEMENT: &str = r#"{
        "customer": {"id": "cust-9", "name": "A. Sharma", "email": "a@x.in", "mobile": "99"},
        "accounts": [
            {
                "account_id": "acc-1", "type": "savings", "bank": "SBI", "balance": 9000,
                "transactions": [
                    {"txn_id": "t1", "date": "2024-03-01", "type": "CREDIT",
                     "description": "Salary", "amount": 50000, "balance_after_txn": 50000},
                    {"txn_id": "t2", "date": "2024-03-02", "type": "DEBIT",
                     "description": "Rent", "amount": 15000.5, "balance_after_txn": 34999.5}
                ]
            },
            {
                "account_id": "acc-2", "type": "current", "bank": "HDFC", "balance": 10,
                "transactions": [
                    {"txn_id": "t3", "date": "2024-03-03", "type": "REFUND",
                     "description": "?", "amount": 5},
                    {"txn_id": "t4", "date": "2024-03-04", "type": "DEBIT",
                     "description": "Cab", "amount": "320"}
                ]
            }
        ]
    }"#;

    #[test]
    fn test_import_valid_rows() {
        let csv = "date,amount,description,category,type,payment_method\n\
                   2024-01-05,500,Groceries,food,expense,UPI\n\
                   2024-01-01,\"3,000.00\",Paycheck,,income,bank\n";

        let store = store();
        let result = ImportService::new(&store).import_reader(csv.as_bytes()).unwrap();

        assert_eq!(result.imported_count(), 2);
        assert_eq!(result.skipped_count(), 0);
        assert_eq!(result.imported[0].category_id, Some(CategoryId::from_raw("food")));
        assert_eq!(result.imported[0].payment_method, "upi");
        assert_eq!(result.imported[1].amount, Money::from_units(3000));
        assert_eq!(result.imported[1].kind, TransactionKind::Income);
        assert_eq!(store.transactions.borrow().len(), 2);
    }

    #[test]
    fn test_bad_rows_are_skipped_with_line_numbers() {
        let csv = "date,amount,type,category\n\
                   2024-01-05,12.50,expense,Food & Dining\n\
                   not-a-date,10,expense,food\n\
                   2024-01-06,abc,expense,food\n\
                   2024-01-07,5,transfer,food\n";

        let store = store();
        let result = ImportService::new(&store).import_reader(csv.as_bytes()).unwrap();

        assert_eq!(result.imported_count(), 1);
        assert_eq!(result.imported[0].category_id, Some(CategoryId::from_raw("food")));
        let lines: Vec<_> = result.skipped.iter().map(|s| s.line).collect();
        assert_eq!(lines, vec![3, 4, 5]);
        assert!(result.skipped[1].reason.contains("amount"));
    }

    #[test]
    fn test_missing_required_column() {
        let csv = "date,description,type\n2024-01-05,Lunch,expense\n";
        let store = store();
        let err = ImportService::new(&store)
            .import_reader(csv.as_bytes())
            .unwrap_err();
        assert!(matches!(err, KuberiumError::Import(_)));
    }

    #[test]
    fn test_column_order_does_not_matter() {
        let csv = "Type,Amount,Date\nexpense,7,2024-02-02\n";
        let store = store();
        let result = ImportService::new(&store).import_reader(csv.as_bytes()).unwrap();
        assert_eq!(result.imported_count(), 1);
        assert!(result.imported[0].category_id.is_none());
    }

    #[test]
    fn test_reimport_skips_duplicates() {
        let csv = "date,amount,description,type\n\
                   2024-01-05,500,Groceries,expense\n\
                   2024-01-05,500.00, groceries ,expense\n\
                   2024-01-05,500,Groceries,income\n";

        let store = store();
        let service = ImportService::new(&store);

        let first = service.import_reader(csv.as_bytes()).unwrap();
        assert_eq!(first.imported_count(), 2);
        assert_eq!(first.duplicates_skipped, 1);

        let second = service.import_reader(csv.as_bytes()).unwrap();
        assert_eq!(second.imported_count(), 0);
        assert_eq!(second.duplicates_skipped, 3);
        assert_eq!(store.transactions.borrow().len(), 2);
    }

    #[test]
    fn test_failed_write_saves_nothing() {
        let csv = "date,amount,type\n2024-01-05,1,expense\n2024-01-06,2,expense\n";
        let store = MemoryStore {
            fail_writes: true,
            ..MemoryStore::default()
        };

        let err = ImportService::new(&store)
            .import_reader(csv.as_bytes())
            .unwrap_err();
        match err {
            KuberiumError::Import(message) => {
                assert!(message.contains("none of the 2 valid row(s) were saved"))
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(store.transactions.borrow().is_empty());
    }

    #[test]
    fn test_aggregator_statement() {
        let store = store();
        let result = ImportService::new(&store)
            .import_aggregator_reader(STATEMENT.as_bytes())
            .unwrap();

        assert_eq!(result.imported_count(), 3);
        assert_eq!(result.imported[0].kind, TransactionKind::Income);
        assert_eq!(result.imported[0].payment_method, "acc-1");
        assert_eq!(result.imported[1].kind, TransactionKind::Expense);
        assert_eq!(result.imported[1].amount, Money::from_cents(1_500_050));
        assert_eq!(result.imported[2].amount, Money::from_units(320));
        assert!(result.imported.iter().all(|t| t.category_id.is_none()));

        assert_eq!(result.skipped_count(), 1);
        assert_eq!(result.skipped[0].line, 3);

        let again = ImportService::new(&store)
            .import_aggregator_reader(STATEMENT.as_bytes())
            .unwrap();
        assert_eq!(again.duplicates_skipped, 3);
    }

    #[test]
    fn test_aggregator_rejects_other_documents() {
        let store = store();
        let err = ImportService::new(&store)
            .import_aggregator_reader(r#"{"accounts": []}"#.as_bytes())
            .unwrap_err();
        assert!(matches!(err, KuberiumError::Import(_)));
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(
            ImportFormat::from_path(Path::new("statement.JSON")),
            ImportFormat::AggregatorJson
        );
        assert_eq!(ImportFormat::from_path(Path::new("bank.csv")), ImportFormat::Csv);
        assert_eq!(ImportFormat::from_path(Path::new("export")), ImportFormat::Csv);
    }
}
