//! Category repository for JSON storage

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::KuberiumError;
use crate::models::{Category, CategoryId};

use super::file_io::{decode_rows, read_json, write_json_atomic};

/// Serializable category data structure
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct CategoryData {
    #[serde(default)]
    pub categories: Vec<Category>,
}

/// Repository for category persistence
pub struct CategoryRepository {
    path: PathBuf,
    categories: RwLock<HashMap<CategoryId, Category>>,
}

impl CategoryRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            categories: RwLock::new(HashMap::new()),
        }
    }

    /// Load categories from disk; rows that don't decode are skipped
    pub fn load(&self) -> Result<(), KuberiumError> {
        #[derive(Default, serde::Deserialize)]
        struct RawCategoryData {
            #[serde(default)]
            categories: Vec<serde_json::Value>,
        }

        let file_data: RawCategoryData = read_json(&self.path)
            .map_err(|e| KuberiumError::fetch("categories", e.to_string()))?;
        let decoded = decode_rows::<Category>("categories", file_data.categories);

        let mut categories = self
            .categories
            .write()
            .map_err(|e| KuberiumError::fetch("categories", format!("lock poisoned: {}", e)))?;

        categories.clear();
        for category in decoded.valid {
            categories.insert(category.id.clone(), category);
        }

        Ok(())
    }

    /// Save categories to disk
    pub fn save(&self) -> Result<(), KuberiumError> {
        let categories = self.get_all().map_err(|e| KuberiumError::Storage(e.to_string()))?;
        write_json_atomic(&self.path, &CategoryData { categories })
    }

    /// All categories, sorted by name
    pub fn get_all(&self) -> Result<Vec<Category>, KuberiumError> {
        let categories = self
            .categories
            .read()
            .map_err(|e| KuberiumError::fetch("categories", format!("lock poisoned: {}", e)))?;

        let mut list: Vec<_> = categories.values().cloned().collect();
        list.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()).then(a.id.cmp(&b.id)));
        Ok(list)
    }

    pub fn get(&self, id: &CategoryId) -> Result<Option<Category>, KuberiumError> {
        let categories = self
            .categories
            .read()
            .map_err(|e| KuberiumError::fetch("categories", format!("lock poisoned: {}", e)))?;
        Ok(categories.get(id).cloned())
    }

    /// Case-insensitive lookup by display name
    pub fn get_by_name(&self, name: &str) -> Result<Option<Category>, KuberiumError> {
        let categories = self
            .categories
            .read()
            .map_err(|e| KuberiumError::fetch("categories", format!("lock poisoned: {}", e)))?;

        let name_lower = name.to_lowercase();
        Ok(categories
            .values()
            .find(|c| c.name.to_lowercase() == name_lower)
            .cloned())
    }

    /// Add a category; ids and names must be unique
    pub fn insert(&self, category: Category) -> Result<(), KuberiumError> {
        let mut categories = self
            .categories
            .write()
            .map_err(|e| KuberiumError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        let name_lower = category.name.to_lowercase();
        if categories.contains_key(&category.id)
            || categories
                .values()
                .any(|c| c.name.to_lowercase() == name_lower)
        {
            return Err(KuberiumError::Duplicate {
                entity_type: "Category",
                identifier: category.name,
            });
        }

        categories.insert(category.id.clone(), category);
        Ok(())
    }

    pub fn is_empty(&self) -> Result<bool, KuberiumError> {
        let categories = self
            .categories
            .read()
            .map_err(|e| KuberiumError::fetch("categories", format!("lock poisoned: {}", e)))?;
        Ok(categories.is_empty())
    }
}
