//! Definition loader
//!
//! Fills a [`ViewRegistry`] from disk, either from a directory with one
//! SQL file per view or from a JSON manifest mapping names to SQL.

use crate::error::{Result, ViewError};
use crate::registry::ViewRegistry;
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub struct DefinitionLoader;

impl DefinitionLoader {
    /// Load `path` into the registry, as a manifest if it is a file and
    /// as a view directory otherwise. Returns the number of views registered.
    pub fn load_into(registry: &mut ViewRegistry, path: &Path) -> Result<usize> {
        if path.is_file() {
            Self::from_manifest(registry, path)
        } else {
            Self::from_directory(registry, path)
        }
    }

    /// Find view files in a directory
    /// Supports .sql, .pgsql and .pssql files
    pub fn find_view_files(views_dir: &Path) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();

        for entry in fs::read_dir(views_dir).map_err(|e| load_failed(views_dir, e))? {
            let entry = entry.map_err(|e| load_failed(views_dir, e))?;

            let path = entry.path();
            if path.is_file() {
                if let Some(ext) = path.extension() {
                    if ext == "sql" || ext == "pgsql" || ext == "pssql" {
                        files.push(path);
                    }
                }
            }
        }

        // Sort for consistent ordering
        files.sort();

        Ok(files)
    }

    /// Register one view per file, named after the file stem
    pub fn from_directory(registry: &mut ViewRegistry, views_dir: &Path) -> Result<usize> {
        let files = Self::find_view_files(views_dir)?;
        debug!("Found {} view files in {:?}", files.len(), views_dir);

        for file_path in &files {
            let name = file_path
                .file_stem()
                .and_then(|n| n.to_str())
                .ok_or_else(|| ViewError::LoadFailed {
                    path: file_path.clone(),
                    cause: "file name is not valid UTF-8".to_string(),
                })?;

            let sql = fs::read_to_string(file_path).map_err(|e| load_failed(file_path, e))?;
            registry.register(name, &sql)?;
        }

        info!("Loaded {} view definitions from {:?}", files.len(), views_dir);
        Ok(files.len())
    }

    /// Register every entry of a `{ "name": "sql" }` JSON manifest
    pub fn from_manifest(registry: &mut ViewRegistry, manifest: &Path) -> Result<usize> {
        let content = fs::read_to_string(manifest).map_err(|e| load_failed(manifest, e))?;

        let entries: Map<String, Value> =
            serde_json::from_str(&content).map_err(|e| load_failed(manifest, e))?;

        for (name, definition) in &entries {
            registry.register_value(name, definition)?;
        }

        info!("Loaded {} view definitions from {:?}", entries.len(), manifest);
        Ok(entries.len())
    }
}

fn load_failed(path: &Path, err: impl std::fmt::Display) -> ViewError {
    ViewError::LoadFailed {
        path: path.to_path_buf(),
        cause: err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use tokio_test::assert_err;

    #[test]
    fn test_load_directory() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("active_users.sql"), "SELECT * FROM users WHERE active;\n").unwrap();
        fs::write(temp_dir.path().join("order_totals.pgsql"), "SELECT order_id, SUM(amount) FROM lines GROUP BY 1").unwrap();
        fs::write(temp_dir.path().join("README.md"), "not a view").unwrap();

        let mut registry = ViewRegistry::new();
        let count = DefinitionLoader::load_into(&mut registry, temp_dir.path()).unwrap();

        assert_eq!(count, 2);
        assert_eq!(registry.names(), vec!["active_users", "order_totals"]);
        assert_eq!(
            registry.get_definition("active_users"),
            Some("SELECT * FROM users WHERE active")
        );
    }

    #[test]
    fn test_load_manifest() {
        let temp_dir = TempDir::new().unwrap();
        let manifest = temp_dir.path().join("views.json");
        fs::write(&manifest, r#"{ "a": "SELECT 1;", "b": " SELECT 2 " }"#).unwrap();

        let mut registry = ViewRegistry::new();
        let count = DefinitionLoader::load_into(&mut registry, &manifest).unwrap();

        assert_eq!(count, 2);
        assert_eq!(registry.get_definition("a"), Some("SELECT 1"));
        assert_eq!(registry.get_definition("b"), Some("SELECT 2"));
    }

    #[test]
    fn test_manifest_non_string_definition() {
        let temp_dir = TempDir::new().unwrap();
        let manifest = temp_dir.path().join("views.json");
        fs::write(&manifest, r#"{ "a": 123 }"#).unwrap();

        let mut registry = ViewRegistry::new();
        let err = assert_err!(DefinitionLoader::from_manifest(&mut registry, &manifest));
        assert!(matches!(err, ViewError::InvalidDefinition { .. }));
    }

    #[test]
    fn test_missing_directory() {
        let temp_dir = TempDir::new().unwrap();
        let mut registry = ViewRegistry::new();

        let err = assert_err!(DefinitionLoader::load_into(
            &mut registry,
            &temp_dir.path().join("missing")
        ));
        assert!(matches!(err, ViewError::LoadFailed { .. }));
    }
}
