//! Category service

use std::str::FromStr;

use tracing::info;

use crate::error::{KuberiumError, KuberiumResult};
use crate::models::{Category, CategoryId};
use crate::storage::DataStore;

use super::match_id;

/// Service for category management
pub struct CategoryService<'a> {
    store: &'a dyn DataStore,
}

impl<'a> CategoryService<'a> {
    pub fn new(store: &'a dyn DataStore) -> Self {
        Self { store }
    }

    /// Create a category
    ///
    /// `id` lets callers pick a readable slug such as `"food"`; a UUID is
    /// generated otherwise.
    pub fn create(
        &self,
        name: &str,
        icon: &str,
        color: &str,
        id: Option<&str>,
    ) -> KuberiumResult<Category> {
        let name = name.trim();
        let category = match id.map(str::trim).filter(|s| !s.is_empty()) {
            Some(id) => Category::with_id(id, name, icon, color),
            None => Category::new(name, icon, color),
        };

        category
            .validate()
            .map_err(|e| KuberiumError::Validation(e.to_string()))?;

        let name_lower = name.to_lowercase();
        let taken = self
            .store
            .fetch_categories()?
            .iter()
            .any(|c| c.id == category.id || c.name.to_lowercase() == name_lower);
        if taken {
            return Err(KuberiumError::Duplicate {
                entity_type: "Category",
                identifier: name.to_string(),
            });
        }

        self.store.insert_category(&category)?;
        info!(id = %category.id, name = %category.name, "created category");
        Ok(category)
    }

    /// All categories
    pub fn list(&self) -> KuberiumResult<Vec<Category>> {
        self.store.fetch_categories()
    }

    /// Find a category by id, unique id prefix or case-insensitive name
    pub fn find(&self, identifier: &str) -> KuberiumResult<Option<Category>> {
        let categories = self.store.fetch_categories()?;
        let wanted = CategoryId::from_str(identifier)
            .map(|id| id.as_str().to_string())
            .unwrap_or_default();

        if let Some(id) = match_id(&wanted, categories.iter().map(|c| c.id.as_str()), "Category")? {
            return Ok(categories.into_iter().find(|c| c.id.as_str() == id));
        }

        let name_lower = identifier.trim().to_lowercase();
        Ok(categories
            .into_iter()
            .find(|c| c.name.to_lowercase() == name_lower))
    }

    /// Like [`find`](Self::find) but a miss is an error
    pub fn resolve(&self, identifier: &str) -> KuberiumResult<Category> {
        self.find(identifier)?
            .ok_or_else(|| KuberiumError::category_not_found(identifier))
    }
}
