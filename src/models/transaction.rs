//! Transaction model
//!
//! A transaction is either an outflow (`expense`) or an inflow (`income`);
//! amounts are always non-negative and the kind carries the direction.
//!
//! Two shapes live here. [`TransactionRecord`] is the loosely typed row the
//! data store hands back (amount may be a number or a string, dates and kinds
//! are plain strings). [`Transaction`] is the validated form. Converting one
//! into the other with [`TransactionRecord::parse`] is the only place record
//! shape is checked.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{CategoryId, TransactionId};
use super::money::Money;

/// Direction of a transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Expense,
    Income,
}

impl TransactionKind {
    /// Parse the store's string form ("expense" / "income", case-insensitive)
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "expense" => Some(Self::Expense),
            "income" => Some(Self::Income),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Expense => "expense",
            Self::Income => "income",
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Expense => write!(f, "Expense"),
            Self::Income => write!(f, "Income"),
        }
    }
}

/// A validated financial transaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    /// Unique identifier
    pub id: TransactionId,

    /// Amount, never negative
    pub amount: Money,

    /// Free-text description
    pub description: String,

    /// Category this transaction belongs to, if any
    pub category_id: Option<CategoryId>,

    /// Calendar date of occurrence
    pub date: NaiveDate,

    /// Time of day, when the source supplied one
    pub time: Option<NaiveTime>,

    /// Expense or income
    pub kind: TransactionKind,

    /// Payment-method tag ("card", "upi", "cash", ...); not used in aggregation
    pub payment_method: String,
}

impl Transaction {
    /// Create a new transaction with a fresh id
    pub fn new(kind: TransactionKind, amount: Money, date: NaiveDate) -> Self {
        Self {
            id: TransactionId::new(),
            amount,
            description: String::new(),
            category_id: None,
            date,
            time: None,
            kind,
            payment_method: String::new(),
        }
    }

    /// Create an expense in a category
    pub fn expense(amount: Money, category_id: impl Into<CategoryId>, date: NaiveDate) -> Self {
        let mut txn = Self::new(TransactionKind::Expense, amount, date);
        txn.category_id = Some(category_id.into());
        txn
    }

    /// Create an income in a category
    pub fn income(amount: Money, category_id: impl Into<CategoryId>, date: NaiveDate) -> Self {
        let mut txn = Self::new(TransactionKind::Income, amount, date);
        txn.category_id = Some(category_id.into());
        txn
    }

    pub fn is_expense(&self) -> bool {
        self.kind == TransactionKind::Expense
    }

    pub fn is_income(&self) -> bool {
        self.kind == TransactionKind::Income
    }

    /// Validate the transaction
    pub fn validate(&self) -> Result<(), RecordError> {
        if self.amount.is_negative() {
            return Err(RecordError::NegativeAmount(self.amount.to_string()));
        }
        Ok(())
    }

    /// Convert back into the store's row shape
    pub fn to_record(&self) -> TransactionRecord {
        let date = match self.time {
            Some(time) => NaiveDateTime::new(self.date, time)
                .format("%Y-%m-%dT%H:%M:%S")
                .to_string(),
            None => self.date.format("%Y-%m-%d").to_string(),
        };

        TransactionRecord {
            id: Some(self.id.to_string()),
            amount: serde_json::Value::from(self.amount.as_f64()),
            description: self.description.clone(),
            category_id: self.category_id.as_ref().map(|c| c.to_string()),
            date,
            kind: self.kind.as_str().to_string(),
            payment_method: self.payment_method.clone(),
        }
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.is_income() { "+" } else { "-" };
        write!(
            f,
            "{} {} {}{}",
            self.date.format("%Y-%m-%d"),
            self.description,
            sign,
            self.amount
        )
    }
}

/// A transaction row as it comes back from the data store
///
/// Every field is kept as loose as the store delivers it so that a bad row can
/// be read, reported and skipped instead of failing the whole fetch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionRecord {
    #[serde(default)]
    pub id: Option<String>,

    /// Number or numeric string, in currency units
    #[serde(default)]
    pub amount: serde_json::Value,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub category_id: Option<String>,

    #[serde(default)]
    pub date: String,

    #[serde(rename = "type", default)]
    pub kind: String,

    #[serde(default)]
    pub payment_method: String,
}

impl TransactionRecord {
    /// Validate and coerce this row into a [`Transaction`]
    pub fn parse(&self) -> Result<Transaction, RecordError> {
        let amount = parse_amount(&self.amount)?;
        if amount.is_negative() {
            return Err(RecordError::NegativeAmount(amount.to_string()));
        }

        let kind = TransactionKind::parse(&self.kind)
            .ok_or_else(|| RecordError::InvalidKind(self.kind.clone()))?;

        let (date, time) = parse_occurrence(&self.date)?;

        let id = match self.id.as_deref().map(str::trim) {
            Some(raw) if !raw.is_empty() => TransactionId::from_raw(raw),
            _ => TransactionId::new(),
        };

        let category_id = self
            .category_id
            .as_deref()
            .map(str::trim)
            .filter(|raw| !raw.is_empty())
            .map(CategoryId::from_raw);

        Ok(Transaction {
            id,
            amount,
            description: self.description.clone(),
            category_id,
            date,
            time,
            kind,
            payment_method: self.payment_method.clone(),
        })
    }
}

impl From<&Transaction> for TransactionRecord {
    fn from(txn: &Transaction) -> Self {
        txn.to_record()
    }
}

fn parse_amount(value: &serde_json::Value) -> Result<Money, RecordError> {
    match value {
        // Numbers go through the same decimal parser as strings so that 1.999
        // and "1.999" land on the same cent; exponent forms fall back to f64.
        serde_json::Value::Number(n) => {
            let text = n.to_string();
            if text.contains(['e', 'E']) {
                n.as_f64()
                    .and_then(Money::from_f64)
                    .ok_or(RecordError::InvalidAmount(text))
            } else {
                Money::parse(&text).map_err(|_| RecordError::InvalidAmount(text))
            }
        }
        serde_json::Value::String(s) => {
            Money::parse(s).map_err(|_| RecordError::InvalidAmount(s.clone()))
        }
        serde_json::Value::Null => Err(RecordError::InvalidAmount("null".to_string())),
        other => Err(RecordError::InvalidAmount(other.to_string())),
    }
}

/// Parse a date with optional time
///
/// Accepts "2024-01-05", "2024-01-05T10:30:00", "2024-01-05 10:30:00" and full
/// RFC 3339 timestamps (the offset is dropped; the local wall-clock date is kept).
pub fn parse_occurrence(raw: &str) -> Result<(NaiveDate, Option<NaiveTime>), RecordError> {
    let raw = raw.trim();

    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok((date, None));
    }

    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(raw) {
        let naive = dt.naive_local();
        return Ok((naive.date(), Some(naive.time())));
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, format) {
            return Ok((dt.date(), Some(dt.time())));
        }
    }

    Err(RecordError::InvalidDate(raw.to_string()))
}

/// Why a record could not be turned into a [`Transaction`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordError {
    InvalidAmount(String),
    NegativeAmount(String),
    InvalidDate(String),
    InvalidKind(String),
    /// Valid on its own, but adding it would overflow a total
    AmountOverflow(String),
}

impl fmt::Display for RecordError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidAmount(raw) => write!(f, "unparseable amount '{}'", raw),
            Self::NegativeAmount(raw) => write!(f, "negative amount {}", raw),
            Self::InvalidDate(raw) => write!(f, "unparseable date '{}'", raw),
            Self::InvalidKind(raw) => {
                write!(f, "unknown kind '{}' (expected expense or income)", raw)
            }
            Self::AmountOverflow(raw) => write!(f, "amount {} overflows the total", raw),
        }
    }
}

impl std::error::Error for RecordError {}
