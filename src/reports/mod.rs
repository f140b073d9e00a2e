//! Reports module for Kuberium
//!
//! Each report is generated from the data store, rendered for the terminal,
//! and can be exported to CSV.

pub mod categories;
pub mod monthly;
pub mod summary;

pub use categories::CategoryReport;
pub use monthly::MonthlyReport;
pub use summary::SummaryReport;

use crate::error::KuberiumError;

pub(crate) fn export_error(e: csv::Error) -> KuberiumError {
    KuberiumError::Export(e.to_string())
}
