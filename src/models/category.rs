//! Category model
//!
//! Categories are immutable reference data: transactions point at them by id,
//! and the analytics layer resolves ids to a display name and color.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::CategoryId;

/// Label used when a transaction references a category that does not exist
pub const FALLBACK_CATEGORY_NAME: &str = "Unknown";

/// Color used when a transaction references a category that does not exist
pub const FALLBACK_CATEGORY_COLOR: &str = "#888888";

/// A spending/income category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Unique identifier
    pub id: CategoryId,

    /// Display name
    pub name: String,

    /// Icon reference (emoji or icon-set name)
    #[serde(default)]
    pub icon: String,

    /// Display color as a hex string, e.g. "#16a34a"
    #[serde(default = "default_color")]
    pub color: String,
}

fn default_color() -> String {
    FALLBACK_CATEGORY_COLOR.to_string()
}

impl Category {
    /// Create a new category with a fresh id
    pub fn new(name: impl Into<String>, icon: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            id: CategoryId::new(),
            name: name.into(),
            icon: icon.into(),
            color: color.into(),
        }
    }

    /// Create a category with a caller-chosen id
    pub fn with_id(
        id: impl Into<CategoryId>,
        name: impl Into<String>,
        icon: impl Into<String>,
        color: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            icon: icon.into(),
            color: color.into(),
        }
    }

    /// Validate the category
    pub fn validate(&self) -> Result<(), CategoryValidationError> {
        if self.name.trim().is_empty() {
            return Err(CategoryValidationError::EmptyName);
        }

        if self.name.len() > 50 {
            return Err(CategoryValidationError::NameTooLong(self.name.len()));
        }

        if !is_hex_color(&self.color) {
            return Err(CategoryValidationError::InvalidColor(self.color.clone()));
        }

        Ok(())
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

fn is_hex_color(color: &str) -> bool {
    match color.strip_prefix('#') {
        Some(hex) => (hex.len() == 6 || hex.len() == 3) && hex.chars().all(|c| c.is_ascii_hexdigit()),
        None => false,
    }
}

/// Starter categories written by `kuberium init`
pub fn default_categories() -> Vec<Category> {
    [
        ("food", "Food & Dining", "utensils", "#f97316"),
        ("transport", "Transportation", "car", "#0ea5e9"),
        ("housing", "Housing", "home", "#8b5cf6"),
        ("utilities", "Utilities", "zap", "#eab308"),
        ("shopping", "Shopping", "shopping-bag", "#ec4899"),
        ("entertainment", "Entertainment", "film", "#14b8a6"),
        ("health", "Healthcare", "heart", "#ef4444"),
        ("salary", "Salary", "briefcase", "#16a34a"),
    ]
    .into_iter()
    .map(|(id, name, icon, color)| Category::with_id(id, name, icon, color))
    .collect()
}

/// Validation errors for categories
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryValidationError {
    EmptyName,
    NameTooLong(usize),
    InvalidColor(String),
}

impl fmt::Display for CategoryValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Category name cannot be empty"),
            Self::NameTooLong(len) => {
                write!(f, "Category name too long ({} chars, max 50)", len)
            }
            Self::InvalidColor(color) => {
                write!(f, "Category color must be a hex value like #16a34a, got '{}'", color)
            }
        }
    }
}

impl std::error::Error for CategoryValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_category() {
        let category = Category::new("Groceries", "cart", "#16a34a");
        assert_eq!(category.name, "Groceries");
        assert!(category.validate().is_ok());
    }

    #[test]
    fn test_category_validation() {
        let mut category = Category::with_id("food", "Food", "utensils", "#f97316");
        assert!(category.validate().is_ok());

        category.name = "  ".to_string();
        assert_eq!(category.validate(), Err(CategoryValidationError::EmptyName));

        category.name = "a".repeat(51);
        assert!(matches!(
            category.validate(),
            Err(CategoryValidationError::NameTooLong(51))
        ));

        category.name = "Food".to_string();
        category.color = "orange".to_string();
        assert!(matches!(
            category.validate(),
            Err(CategoryValidationError::InvalidColor(_))
        ));
    }

    #[test]
    fn test_missing_color_defaults_on_deserialize() {
        let json = r#"{"id": "misc", "name": "Misc"}"#;
        let category: Category = serde_json::from_str(json).unwrap();
        assert_eq!(category.color, FALLBACK_CATEGORY_COLOR);
        assert_eq!(category.icon, "");
    }

    #[test]
    fn test_default_categories_are_valid_and_unique() {
        let defaults = default_categories();
        assert_eq!(defaults.len(), 8);
        for category in &defaults {
            assert!(category.validate().is_ok(), "{} invalid", category.name);
        }
        let mut ids: Vec<_> = defaults.iter().map(|c| c.id.clone()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), defaults.len());
    }
}
