//! Audit logging system for Kuberium
//!
//! Records create, update and delete operations on stored entities in an
//! append-only, line-delimited JSON log (`audit.log`). Update entries carry
//! both states plus a short summary of the changed fields.
//!
//! # Example
//!
//! ```rust,ignore
//! use kuberium::audit::{AuditEntry, AuditLogger, EntityType};
//!
//! let logger = AuditLogger::new(paths.audit_log());
//! logger.log(&AuditEntry::update(
//!     EntityType::SavingGoal,
//!     goal.id.as_str(),
//!     Some(goal.name.clone()),
//!     &before,
//!     &goal,
//! ))?;
//! ```

mod entry;
mod logger;

pub use entry::{AuditEntry, EntityType, Operation};
pub use logger::AuditLogger;
