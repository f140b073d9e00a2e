//! User settings for Kuberium
//!
//! Manages display preferences, fallback category presentation and the
//! assistant endpoint.

use chrono::format::{Item, StrftimeItems};
use serde::{Deserialize, Serialize};

use super::paths::KuberiumPaths;
use crate::engine::CategoryFallback;
use crate::error::KuberiumError;
use crate::models::{FALLBACK_CATEGORY_COLOR, FALLBACK_CATEGORY_NAME};

/// Assistant collaborator settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssistantSettings {
    /// Chat endpoint; the assistant is disabled when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Number of prior turns sent along with each message
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,
}

impl Default for AssistantSettings {
    fn default() -> Self {
        Self {
            endpoint: None,
            timeout_secs: default_timeout_secs(),
            history_limit: default_history_limit(),
        }
    }
}

/// User settings for Kuberium
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Currency symbol shown in front of amounts
    #[serde(default = "default_currency")]
    pub currency_symbol: String,

    /// Date format preference (strftime format)
    #[serde(default = "default_date_format")]
    pub date_format: String,

    /// Label shown for transactions whose category cannot be resolved
    #[serde(default = "default_fallback_label")]
    pub fallback_category_label: String,

    /// Color used for transactions whose category cannot be resolved
    #[serde(default = "default_fallback_color")]
    pub fallback_category_color: String,

    #[serde(default)]
    pub assistant: AssistantSettings,
}

fn default_schema_version() -> u32 {
    1
}

fn default_currency() -> String {
    "₹".to_string()
}

fn default_date_format() -> String {
    "%Y-%m-%d".to_string()
}

fn default_fallback_label() -> String {
    FALLBACK_CATEGORY_NAME.to_string()
}

fn default_fallback_color() -> String {
    FALLBACK_CATEGORY_COLOR.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_history_limit() -> usize {
    10
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            currency_symbol: default_currency(),
            date_format: default_date_format(),
            fallback_category_label: default_fallback_label(),
            fallback_category_color: default_fallback_color(),
            assistant: AssistantSettings::default(),
        }
    }
}

impl Settings {
    /// Load settings from disk, or return defaults if the file doesn't exist
    pub fn load_or_create(paths: &KuberiumPaths) -> Result<Self, KuberiumError> {
        let settings_path = paths.settings_file();

        if settings_path.exists() {
            let contents = std::fs::read_to_string(&settings_path).map_err(|e| {
                KuberiumError::Io(format!("Failed to read settings file: {}", e))
            })?;

            let settings: Settings = serde_json::from_str(&contents).map_err(|e| {
                KuberiumError::Config(format!("Failed to parse settings file: {}", e))
            })?;
            settings.validate()?;

            Ok(settings)
        } else {
            // Don't save yet - let caller decide when to persist
            Ok(Settings::default())
        }
    }

    /// Reject values that would fail later at display time
    pub fn validate(&self) -> Result<(), KuberiumError> {
        if StrftimeItems::new(&self.date_format).any(|item| matches!(item, Item::Error)) {
            return Err(KuberiumError::Config(format!(
                "Invalid date_format '{}' in settings",
                self.date_format
            )));
        }
        Ok(())
    }

    /// Fallback name and color for categories that can't be resolved
    pub fn category_fallback(&self) -> CategoryFallback {
        CategoryFallback {
            name: self.fallback_category_label.clone(),
            color: self.fallback_category_color.clone(),
        }
    }

    /// Save settings to disk
    pub fn save(&self, paths: &KuberiumPaths) -> Result<(), KuberiumError> {
        paths.ensure_directories()?;

        let contents = serde_json::to_string_pretty(self).map_err(|e| {
            KuberiumError::Config(format!("Failed to serialize settings: {}", e))
        })?;

        std::fs::write(paths.settings_file(), contents)
            .map_err(|e| KuberiumError::Io(format!("Failed to write settings file: {}", e)))?;

        Ok(())
    }
}
