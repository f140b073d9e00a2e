//! Transaction repository for JSON storage
//!
//! Rows are kept in the store's loose record shape so that a malformed row
//! written by another client still loads and reaches the engine, which skips
//! and reports it.

use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::KuberiumError;
use crate::models::{TransactionId, TransactionRecord};

use super::file_io::{read_json, write_json_atomic};

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct TransactionData {
    #[serde(default)]
    transactions: Vec<TransactionRecord>,
}

/// Repository for transaction persistence
pub struct TransactionRepository {
    path: PathBuf,
    data: RwLock<Vec<TransactionRecord>>,
}

impl TransactionRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(Vec::new()),
        }
    }

    /// Load transactions from disk
    pub fn load(&self) -> Result<(), KuberiumError> {
        let file_data: TransactionData = read_json(&self.path)
            .map_err(|e| KuberiumError::fetch("transactions", e.to_string()))?;

        let mut data = self
            .data
            .write()
            .map_err(|e| KuberiumError::fetch("transactions", format!("lock poisoned: {}", e)))?;
        *data = file_data.transactions;
        Ok(())
    }

    /// Save transactions to disk, newest date first
    pub fn save(&self) -> Result<(), KuberiumError> {
        let data = self
            .data
            .read()
            .map_err(|e| KuberiumError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let mut transactions = data.clone();
        // Dates are ISO strings, so lexical order is chronological
        transactions.sort_by(|a, b| b.date.cmp(&a.date));

        write_json_atomic(&self.path, &TransactionData { transactions })
    }

    /// All rows, in storage order
    pub fn get_all(&self) -> Result<Vec<TransactionRecord>, KuberiumError> {
        let data = self
            .data
            .read()
            .map_err(|e| KuberiumError::fetch("transactions", format!("lock poisoned: {}", e)))?;
        Ok(data.clone())
    }

    /// Find a row by id
    pub fn get(&self, id: &TransactionId) -> Result<Option<TransactionRecord>, KuberiumError> {
        let data = self
            .data
            .read()
            .map_err(|e| KuberiumError::fetch("transactions", format!("lock poisoned: {}", e)))?;
        Ok(data
            .iter()
            .find(|r| r.id.as_deref() == Some(id.as_str()))
            .cloned())
    }

    /// Append a row; its id must not already be present
    pub fn insert(&self, record: TransactionRecord) -> Result<(), KuberiumError> {
        let mut data = self
            .data
            .write()
            .map_err(|e| KuberiumError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        if let Some(id) = record.id.as_deref() {
            if data.iter().any(|r| r.id.as_deref() == Some(id)) {
                return Err(KuberiumError::Duplicate {
                    entity_type: "Transaction",
                    identifier: id.to_string(),
                });
            }
        }

        data.push(record);
        Ok(())
    }

    /// Append several rows; if any id is already present (or repeated) none are added
    pub fn insert_many(&self, records: Vec<TransactionRecord>) -> Result<(), KuberiumError> {
        let mut data = self
            .data
            .write()
            .map_err(|e| KuberiumError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        let mut seen: HashSet<&str> = data.iter().filter_map(|r| r.id.as_deref()).collect();
        for id in records.iter().filter_map(|r| r.id.as_deref()) {
            if !seen.insert(id) {
                return Err(KuberiumError::Duplicate {
                    entity_type: "Transaction",
                    identifier: id.to_string(),
                });
            }
        }

        data.extend(records);
        Ok(())
    }

    /// Drop every row whose id is listed
    pub fn remove_many(&self, ids: &[&TransactionId]) -> Result<(), KuberiumError> {
        let mut data = self
            .data
            .write()
            .map_err(|e| KuberiumError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        let ids: HashSet<&str> = ids.iter().map(|id| id.as_str()).collect();
        data.retain(|r| !r.id.as_deref().is_some_and(|id| ids.contains(id)));
        Ok(())
    }

    /// Remove a row by id; returns the removed row
    pub fn delete(&self, id: &TransactionId) -> Result<Option<TransactionRecord>, KuberiumError> {
        let mut data = self
            .data
            .write()
            .map_err(|e| KuberiumError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        let position = data
            .iter()
            .position(|r| r.id.as_deref() == Some(id.as_str()));
        Ok(position.map(|index| data.remove(index)))
    }

    pub fn count(&self) -> Result<usize, KuberiumError> {
        let data = self
            .data
            .read()
            .map_err(|e| KuberiumError::fetch("transactions", format!("lock poisoned: {}", e)))?;
        Ok(data.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Money, Transaction};
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn create_test_repo() -> (TempDir, TransactionRepository) {
        let temp_dir = TempDir::new().unwrap();
        let repo = TransactionRepository::new(temp_dir.path().join("transactions.json"));
        (temp_dir, repo)
    }

    fn sample(day: u32) -> Transaction {
        Transaction::expense(
            Money::from_units(10),
            "food",
            NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
        )
    }

    #[test]
    fn test_insert_get_delete() {
        let (_temp, repo) = create_test_repo();
        let txn = sample(5);

        repo.insert(txn.to_record()).unwrap();
        assert_eq!(repo.count().unwrap(), 1);
        assert!(repo.get(&txn.id).unwrap().is_some());

        let removed = repo.delete(&txn.id).unwrap();
        assert!(removed.is_some());
        assert!(repo.delete(&txn.id).unwrap().is_none());
        assert_eq!(repo.count().unwrap(), 0);
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let (_temp, repo) = create_test_repo();
        let txn = sample(5);

        repo.insert(txn.to_record()).unwrap();
        let err = repo.insert(txn.to_record()).unwrap_err();
        assert!(matches!(err, KuberiumError::Duplicate { .. }));
    }

    #[test]
    fn test_insert_many_rejects_whole_batch_on_duplicate() {
        let (_temp, repo) = create_test_repo();
        let existing = sample(1);
        repo.insert(existing.to_record()).unwrap();

        let fresh = sample(2);
        let err = repo
            .insert_many(vec![fresh.to_record(), existing.to_record()])
            .unwrap_err();
        assert!(matches!(err, KuberiumError::Duplicate { .. }));
        assert_eq!(repo.count().unwrap(), 1);

        repo.insert_many(vec![fresh.to_record(), sample(3).to_record()])
            .unwrap();
        assert_eq!(repo.count().unwrap(), 3);

        repo.remove_many(&[&fresh.id]).unwrap();
        assert_eq!(repo.count().unwrap(), 2);
        assert!(repo.get(&fresh.id).unwrap().is_none());
    }

    #[test]
    fn test_save_and_reload() {
        let (temp, repo) = create_test_repo();
        repo.insert(sample(1).to_record()).unwrap();
        repo.insert(sample(20).to_record()).unwrap();
        repo.save().unwrap();

        let reloaded = TransactionRepository::new(temp.path().join("transactions.json"));
        reloaded.load().unwrap();
        let all = reloaded.get_all().unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].date, "2024-01-20");
    }

    #[test]
    fn test_malformed_rows_survive_load() {
        let (temp, repo) = create_test_repo();
        std::fs::write(
            temp.path().join("transactions.json"),
            r#"{"transactions": [
                {"id": "a", "amount": "abc", "date": "2024-01-01", "type": "expense"},
                {"id": "b", "amount": 5, "date": "2024-01-02", "type": "income"}
            ]}"#,
        )
        .unwrap();

        repo.load().unwrap();
        assert_eq!(repo.count().unwrap(), 2);
    }

    #[test]
    fn test_corrupt_file_is_fetch_error() {
        let (temp, repo) = create_test_repo();
        std::fs::write(temp.path().join("transactions.json"), "{oops").unwrap();

        let err = repo.load().unwrap_err();
        assert!(err.is_fetch_failure());
    }
}
