//! Custom error types for Kuberium
//!
//! This module defines the error hierarchy for the application using thiserror
//! for ergonomic error definitions. Problems with individual transaction
//! records are NOT represented here; those are `RecordError`s and only ever
//! show up in aggregation diagnostics.

use thiserror::Error;

/// The main error type for Kuberium operations
#[derive(Error, Debug)]
pub enum KuberiumError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// Validation errors for user input
    #[error("Validation error: {0}")]
    Validation(String),

    /// Entity not found errors
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },

    /// Duplicate entity errors
    #[error("{entity_type} already exists: {identifier}")]
    Duplicate {
        entity_type: &'static str,
        identifier: String,
    },

    /// A read from the data store failed (as opposed to returning no data)
    #[error("Failed to fetch {collection}: {reason}")]
    Fetch {
        collection: &'static str,
        reason: String,
    },

    /// A write to the data store failed
    #[error("Storage error: {0}")]
    Storage(String),

    /// The assistant collaborator could not produce a reply
    #[error("Assistant unavailable: {0}")]
    Assistant(String),

    /// Import errors
    #[error("Import error: {0}")]
    Import(String),

    /// Export errors
    #[error("Export error: {0}")]
    Export(String),
}

impl KuberiumError {
    /// Create a "not found" error for categories
    pub fn category_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Category",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for transactions
    pub fn transaction_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Transaction",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for budgets
    pub fn budget_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Budget",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for saving goals
    pub fn goal_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Saving goal",
            identifier: identifier.into(),
        }
    }

    /// Create a fetch failure for the named collection
    pub fn fetch(collection: &'static str, reason: impl Into<String>) -> Self {
        Self::Fetch {
            collection,
            reason: reason.into(),
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Check if this error came from a collaborator read failure
    pub fn is_fetch_failure(&self) -> bool {
        matches!(self, Self::Fetch { .. })
    }

    /// Whether retrying the same request may succeed
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Assistant(_) | Self::Fetch { .. } | Self::Io(_))
    }
}

impl From<std::io::Error> for KuberiumError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for KuberiumError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

/// Result type alias for Kuberium operations
pub type KuberiumResult<T> = Result<T, KuberiumError>;
