//! Aggregation results and their diagnostics
//!
//! Every engine operation that consumes raw transaction records returns an
//! [`Aggregate`]: the computed value together with the list of records that
//! had to be skipped. Skipping is never fatal; the caller decides whether a
//! non-empty skip list is worth surfacing.

use tracing::warn;

use crate::models::{RecordError, Transaction, TransactionRecord};

/// A record the engine could not use
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRecord {
    /// Position of the record in the input slice
    pub index: usize,
    /// The record's id, when it carried one
    pub id: Option<String>,
    /// Why it was skipped
    pub reason: RecordError,
}

/// Out-of-band information about an aggregation run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AggregateDiagnostics {
    pub skipped: Vec<SkippedRecord>,
}

impl AggregateDiagnostics {
    /// Number of skipped records
    pub fn skipped_count(&self) -> usize {
        self.skipped.len()
    }

    /// No record was skipped
    pub fn is_clean(&self) -> bool {
        self.skipped.is_empty()
    }

    /// Fold another run's diagnostics into this one
    pub fn merge(&mut self, other: AggregateDiagnostics) {
        self.skipped.extend(other.skipped);
    }
}

/// A computed value plus its diagnostics
#[derive(Debug, Clone, PartialEq)]
pub struct Aggregate<T> {
    pub value: T,
    pub diagnostics: AggregateDiagnostics,
}

impl<T> Aggregate<T> {
    pub fn new(value: T, diagnostics: AggregateDiagnostics) -> Self {
        Self { value, diagnostics }
    }

    /// Shorthand for `diagnostics.skipped_count()`
    pub fn skipped_count(&self) -> usize {
        self.diagnostics.skipped_count()
    }

    /// Transform the value, keeping the diagnostics
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Aggregate<U> {
        Aggregate {
            value: f(self.value),
            diagnostics: self.diagnostics,
        }
    }

    pub fn into_value(self) -> T {
        self.value
    }
}

/// A record that passed validation, tagged with its position in the input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedRecord {
    pub index: usize,
    pub transaction: Transaction,
}

impl AggregateDiagnostics {
    /// Record a skipped record and log it
    pub(crate) fn skip(
        &mut self,
        operation: &'static str,
        index: usize,
        id: Option<String>,
        reason: RecordError,
    ) {
        warn!(
            operation,
            index,
            id = id.as_deref().unwrap_or("-"),
            %reason,
            "skipping malformed transaction record"
        );
        self.skipped.push(SkippedRecord { index, id, reason });
    }

    /// Record a valid transaction whose amount no longer fits a running total
    pub(crate) fn skip_overflow(&mut self, operation: &'static str, parsed: &ParsedRecord) {
        self.skip(
            operation,
            parsed.index,
            Some(parsed.transaction.id.to_string()),
            RecordError::AmountOverflow(parsed.transaction.amount.to_string()),
        );
    }
}

/// Validate every record once, keeping the good ones with their input position
///
/// The engine's `*_parsed` functions take this output, so a caller building
/// several views over the same records validates (and logs) each one once.
pub fn parse_transactions(records: &[TransactionRecord]) -> Aggregate<Vec<ParsedRecord>> {
    let (parsed, diagnostics) = parse_indexed("parse_transactions", records);
    Aggregate::new(parsed, diagnostics)
}

pub(crate) fn parse_indexed(
    operation: &'static str,
    records: &[TransactionRecord],
) -> (Vec<ParsedRecord>, AggregateDiagnostics) {
    let mut parsed = Vec::with_capacity(records.len());
    let mut diagnostics = AggregateDiagnostics::default();

    for (index, record) in records.iter().enumerate() {
        match record.parse() {
            Ok(transaction) => parsed.push(ParsedRecord { index, transaction }),
            Err(reason) => diagnostics.skip(operation, index, record.id.clone(), reason),
        }
    }

    (parsed, diagnostics)
}

/// Validate a batch of records, keeping the good ones and recording the rest
///
/// `operation` only labels the log line.
pub(crate) fn parse_records(
    operation: &'static str,
    records: &[TransactionRecord],
) -> (Vec<Transaction>, AggregateDiagnostics) {
    let (parsed, diagnostics) = parse_indexed(operation, records);
    let transactions = parsed.into_iter().map(|p| p.transaction).collect();
    (transactions, diagnostics)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(id: &str, amount: serde_json::Value) -> TransactionRecord {
        TransactionRecord {
            id: Some(id.into()),
            amount,
            description: String::new(),
            category_id: None,
            date: "2024-01-01".into(),
            kind: "expense".into(),
            payment_method: String::new(),
        }
    }

    #[test]
    fn test_parse_records_keeps_good_and_reports_bad() {
        let records = vec![
            record("a", json!(10)),
            record("b", json!("abc")),
            record("c", json!("2.50")),
        ];

        let (txns, diagnostics) = parse_records("test", &records);
        assert_eq!(txns.len(), 2);
        assert_eq!(diagnostics.skipped_count(), 1);

        let skipped = &diagnostics.skipped[0];
        assert_eq!(skipped.index, 1);
        assert_eq!(skipped.id.as_deref(), Some("b"));
        assert!(matches!(skipped.reason, RecordError::InvalidAmount(_)));
    }

    #[test]
    fn test_aggregate_map_keeps_diagnostics() {
        let mut diagnostics = AggregateDiagnostics::default();
        diagnostics.skipped.push(SkippedRecord {
            index: 0,
            id: None,
            reason: RecordError::InvalidKind("x".into()),
        });

        let agg = Aggregate::new(2, diagnostics).map(|v| v * 10);
        assert_eq!(agg.value, 20);
        assert_eq!(agg.skipped_count(), 1);
        assert!(!agg.diagnostics.is_clean());
    }
}
