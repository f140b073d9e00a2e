//! Storage initialization
//!
//! Handles first-run setup and default data creation

use tracing::info;

use crate::config::paths::KuberiumPaths;
use crate::error::KuberiumError;
use crate::models::default_categories;

use super::categories::CategoryData;
use super::file_io::write_json_atomic;

/// Initialize storage for a fresh installation
///
/// Creates the data directory and writes the starter categories if no
/// category file exists yet. Existing data is never touched.
pub fn initialize_storage(paths: &KuberiumPaths) -> Result<(), KuberiumError> {
    paths.ensure_directories()?;

    if !paths.categories_file().exists() {
        let data = CategoryData {
            categories: default_categories(),
        };
        write_json_atomic(paths.categories_file(), &data)?;
        info!(count = data.categories.len(), "created default categories");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::file_io::read_json;
    use tempfile::TempDir;

    #[test]
    fn test_initialize_creates_default_categories() {
        let temp_dir = TempDir::new().unwrap();
        let paths = KuberiumPaths::with_base_dir(temp_dir.path().to_path_buf());

        initialize_storage(&paths).unwrap();

        let data: CategoryData = read_json(paths.categories_file()).unwrap();
        assert_eq!(data.categories.len(), default_categories().len());
    }

    #[test]
    fn test_initialize_keeps_existing_categories() {
        let temp_dir = TempDir::new().unwrap();
        let paths = KuberiumPaths::with_base_dir(temp_dir.path().to_path_buf());
        paths.ensure_directories().unwrap();
        write_json_atomic(paths.categories_file(), &CategoryData::default()).unwrap();

        initialize_storage(&paths).unwrap();

        let data: CategoryData = read_json(paths.categories_file()).unwrap();
        assert!(data.categories.is_empty());
    }
}
