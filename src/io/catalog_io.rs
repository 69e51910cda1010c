use std::fs;
use std::path::{Path, PathBuf};

use crate::model::{Column, ColumnCatalog, EditorConfig};

/// Error type for catalog and config loading
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("could not read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse catalog: {0}")]
    CatalogParseError(#[from] serde_json::Error),
    #[error("could not parse config: {0}")]
    ConfigParseError(#[from] toml::de::Error),
    #[error("duplicate column key '{0}' in catalog")]
    DuplicateKey(String),
    #[error("catalog is empty")]
    EmptyCatalog,
}

/// Load a column catalog from a JSON file: an array of
/// `{key, title, category?, locked?, required?}` objects.
pub fn load_catalog(path: &Path) -> Result<ColumnCatalog, CatalogError> {
    let text = fs::read_to_string(path).map_err(|e| CatalogError::ReadError {
        path: path.to_path_buf(),
        source: e,
    })?;
    let columns: Vec<Column> = serde_json::from_str(&text)?;
    catalog_from_columns(columns)
}

/// Build a catalog, rejecting duplicate keys and empty input
pub fn catalog_from_columns(columns: Vec<Column>) -> Result<ColumnCatalog, CatalogError> {
    if columns.is_empty() {
        return Err(CatalogError::EmptyCatalog);
    }
    let mut seen = std::collections::HashSet::new();
    for col in &columns {
        if !seen.insert(col.key.as_str()) {
            return Err(CatalogError::DuplicateKey(col.key.clone()));
        }
    }
    Ok(ColumnCatalog::from_columns(columns))
}

/// Load arranger.toml, falling back to defaults when the file is absent
pub fn load_config(path: Option<&Path>) -> Result<EditorConfig, CatalogError> {
    let Some(path) = path else {
        return Ok(EditorConfig::default());
    };
    let text = fs::read_to_string(path).map_err(|e| CatalogError::ReadError {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(toml::from_str(&text)?)
}
