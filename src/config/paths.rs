//! Path management for Kuberium
//!
//! Provides XDG-compliant path resolution for settings, data and the audit log.
//!
//! ## Path Resolution Order
//!
//! 1. `KUBERIUM_DATA_DIR` environment variable (if set)
//! 2. Unix (Linux/macOS): `$XDG_CONFIG_HOME/kuberium` or `~/.config/kuberium`
//! 3. Windows: `%APPDATA%\kuberium`

use std::ffi::OsString;
use std::path::PathBuf;

use crate::error::KuberiumError;

/// Environment variable that overrides the base directory
pub const DATA_DIR_ENV: &str = "KUBERIUM_DATA_DIR";

const APP_DIR: &str = "kuberium";

/// Manages all paths used by Kuberium
#[derive(Debug, Clone)]
pub struct KuberiumPaths {
    /// Base directory for all Kuberium data
    base_dir: PathBuf,
}

impl KuberiumPaths {
    /// Resolve paths from the environment
    ///
    /// # Errors
    ///
    /// Returns an error if no override is set and the home directory cannot be
    /// determined.
    pub fn new() -> Result<Self, KuberiumError> {
        Self::resolve(std::env::var_os(DATA_DIR_ENV))
    }

    /// Resolve paths from an explicit override, falling back to the platform default
    pub fn resolve(override_dir: Option<OsString>) -> Result<Self, KuberiumError> {
        let base_dir = match override_dir.filter(|dir| !dir.is_empty()) {
            Some(dir) => PathBuf::from(dir),
            None => resolve_default_path()?,
        };
        Ok(Self { base_dir })
    }

    /// Create paths with a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    /// Get the base directory (~/.config/kuberium/ or equivalent)
    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Get the data directory (~/.config/kuberium/data/)
    pub fn data_dir(&self) -> PathBuf {
        self.base_dir.join("data")
    }

    /// Get the path to the settings file
    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    /// Get the path to the audit log
    pub fn audit_log(&self) -> PathBuf {
        self.base_dir.join("audit.log")
    }

    pub fn transactions_file(&self) -> PathBuf {
        self.data_dir().join("transactions.json")
    }

    pub fn categories_file(&self) -> PathBuf {
        self.data_dir().join("categories.json")
    }

    pub fn budgets_file(&self) -> PathBuf {
        self.data_dir().join("budgets.json")
    }

    pub fn goals_file(&self) -> PathBuf {
        self.data_dir().join("goals.json")
    }

    /// Ensure the base and data directories exist
    pub fn ensure_directories(&self) -> Result<(), KuberiumError> {
        std::fs::create_dir_all(&self.base_dir)
            .map_err(|e| KuberiumError::Io(format!("Failed to create base directory: {}", e)))?;

        std::fs::create_dir_all(self.data_dir())
            .map_err(|e| KuberiumError::Io(format!("Failed to create data directory: {}", e)))?;

        Ok(())
    }

    /// Check if Kuberium has been initialized (config file exists)
    pub fn is_initialized(&self) -> bool {
        self.settings_file().exists()
    }
}

#[cfg(not(windows))]
fn resolve_default_path() -> Result<PathBuf, KuberiumError> {
    let config_base = match std::env::var_os("XDG_CONFIG_HOME").filter(|v| !v.is_empty()) {
        Some(xdg) => PathBuf::from(xdg),
        None => {
            let home = std::env::var_os("HOME").ok_or_else(|| {
                KuberiumError::Config("Could not determine home directory".into())
            })?;
            PathBuf::from(home).join(".config")
        }
    };
    Ok(config_base.join(APP_DIR))
}

#[cfg(windows)]
fn resolve_default_path() -> Result<PathBuf, KuberiumError> {
    let appdata = std::env::var_os("APPDATA")
        .ok_or_else(|| KuberiumError::Config("Could not determine APPDATA directory".into()))?;
    Ok(PathBuf::from(appdata).join(APP_DIR))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_custom_base_dir() {
        let temp_dir = TempDir::new().unwrap();
        let paths = KuberiumPaths::with_base_dir(temp_dir.path().to_path_buf());

        assert_eq!(paths.base_dir(), temp_dir.path());
        assert_eq!(paths.data_dir(), temp_dir.path().join("data"));
    }

    #[test]
    fn test_explicit_override() {
        let temp_dir = TempDir::new().unwrap();
        let paths = KuberiumPaths::resolve(Some(temp_dir.path().as_os_str().to_owned())).unwrap();
        assert_eq!(paths.base_dir(), temp_dir.path());
    }

    #[test]
    fn test_empty_override_falls_back() {
        let paths = KuberiumPaths::resolve(Some(OsString::new())).unwrap();
        assert!(paths.base_dir().ends_with(APP_DIR));
    }

    #[test]
    fn test_ensure_directories() {
        let temp_dir = TempDir::new().unwrap();
        let paths = KuberiumPaths::with_base_dir(temp_dir.path().join("nested"));

        paths.ensure_directories().unwrap();

        assert!(paths.base_dir().exists());
        assert!(paths.data_dir().exists());
        assert!(!paths.is_initialized());
    }

    #[test]
    fn test_file_paths() {
        let temp_dir = TempDir::new().unwrap();
        let paths = KuberiumPaths::with_base_dir(temp_dir.path().to_path_buf());
        let data = temp_dir.path().join("data");

        assert_eq!(paths.settings_file(), temp_dir.path().join("config.json"));
        assert_eq!(paths.audit_log(), temp_dir.path().join("audit.log"));
        assert_eq!(paths.transactions_file(), data.join("transactions.json"));
        assert_eq!(paths.categories_file(), data.join("categories.json"));
        assert_eq!(paths.budgets_file(), data.join("budgets.json"));
        assert_eq!(paths.goals_file(), data.join("goals.json"));
    }
}
