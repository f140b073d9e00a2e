//! Configuration module for Kuberium
//!
//! This module provides configuration management including:
//! - XDG-compliant path resolution
//! - User settings persistence

pub mod paths;
pub mod settings;

pub use paths::KuberiumPaths;
pub use settings::{AssistantSettings, Settings};
