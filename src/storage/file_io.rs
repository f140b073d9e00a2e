//! JSON file helpers with atomic writes

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, warn};

use crate::error::KuberiumError;

/// Read JSON from a file, returning a default value if the file doesn't exist
///
/// An empty file is treated like a missing one.
pub fn read_json<T, P>(path: P) -> Result<T, KuberiumError>
where
    T: DeserializeOwned + Default,
    P: AsRef<Path>,
{
    let path = path.as_ref();

    if !path.exists() {
        return Ok(T::default());
    }

    let file = File::open(path)
        .map_err(|e| KuberiumError::Storage(format!("Failed to open {}: {}", path.display(), e)))?;

    let is_empty = file.metadata().map(|m| m.len() == 0).unwrap_or(false);
    if is_empty {
        return Ok(T::default());
    }

    serde_json::from_reader(BufReader::new(file))
        .map_err(|e| KuberiumError::Storage(format!("Failed to parse {}: {}", path.display(), e)))
}

/// Write JSON to a file atomically (write to a sibling temp file, then rename)
pub fn write_json_atomic<T, P>(path: P, data: &T) -> Result<(), KuberiumError>
where
    T: Serialize,
    P: AsRef<Path>,
{
    let path = path.as_ref();

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| {
            KuberiumError::Storage(format!(
                "Failed to create directory {}: {}",
                parent.display(),
                e
            ))
        })?;
    }

    // Same directory as the target so the rename stays on one filesystem
    let temp_path = temp_path_for(path);

    let file = File::create(&temp_path)
        .map_err(|e| KuberiumError::Storage(format!("Failed to create temp file: {}", e)))?;

    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, data)
        .map_err(|e| KuberiumError::Storage(format!("Failed to serialize data: {}", e)))?;

    writer
        .flush()
        .map_err(|e| KuberiumError::Storage(format!("Failed to flush data: {}", e)))?;

    writer
        .get_ref()
        .sync_all()
        .map_err(|e| KuberiumError::Storage(format!("Failed to sync data: {}", e)))?;

    fs::rename(&temp_path, path).map_err(|e| {
        let _ = fs::remove_file(&temp_path);
        KuberiumError::Storage(format!("Failed to rename temp file: {}", e))
    })?;

    debug!(path = %path.display(), "wrote data file");
    Ok(())
}

/// Rows of a collection file split by whether they decoded
///
/// Rejected rows are kept verbatim so that saving the collection writes them
/// back untouched.
#[derive(Debug)]
pub struct DecodedRows<T> {
    pub valid: Vec<T>,
    pub rejected: Vec<serde_json::Value>,
}

/// Decode rows one at a time, skipping the ones that don't fit `T`
pub fn decode_rows<T: DeserializeOwned>(
    collection: &'static str,
    rows: Vec<serde_json::Value>,
) -> DecodedRows<T> {
    let mut decoded = DecodedRows {
        valid: Vec::with_capacity(rows.len()),
        rejected: Vec::new(),
    };

    for (index, row) in rows.into_iter().enumerate() {
        match T::deserialize(&row) {
            Ok(item) => decoded.valid.push(item),
            Err(e) => {
                warn!(collection, index, error = %e, "skipping malformed row");
                decoded.rejected.push(row);
            }
        }
    }

    decoded
}

fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
