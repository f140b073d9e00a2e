//! Kuberium - personal-finance tracker
//!
//! Records income and expenses, plans monthly budgets, tracks saving goals and
//! turns the raw transaction history into summaries, monthly series and
//! category breakdowns. A chat assistant can be reached over HTTP.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Configuration and path management
//! - `error`: Custom error types
//! - `models`: Core data models (transactions, categories, budgets, goals)
//! - `engine`: Pure aggregation over raw transaction records
//! - `storage`: JSON file storage behind the `DataStore` trait
//! - `services`: Business logic layer
//! - `audit`: Audit logging system
//! - `assistant`: Chat assistant client and conversation history
//! - `reports`: Summary, monthly and category reports
//! - `display`: Terminal tables and formatting helpers
//! - `cli`: Command handlers for the `kuberium` binary
//!
//! # Example
//!
//! ```rust,ignore
//! use kuberium::config::{KuberiumPaths, Settings};
//! use kuberium::services::AnalyticsService;
//! use kuberium::storage::Storage;
//!
//! let paths = KuberiumPaths::new()?;
//! let storage = Storage::open(paths)?;
//! let dashboard = AnalyticsService::new(&storage).dashboard()?;
//! println!("net savings: {}", dashboard.summary.net_savings);
//! ```

pub mod assistant;
pub mod audit;
pub mod cli;
pub mod config;
pub mod display;
pub mod engine;
pub mod error;
pub mod models;
pub mod reports;
pub mod services;
pub mod storage;

pub use error::{KuberiumError, KuberiumResult};
