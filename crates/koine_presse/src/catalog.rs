//! Catalog files and catalog loading.
//!
//! A catalog file holds the `message -> translated text` entries for one
//! (language, category) pair; which pair is encoded in its path, not in its
//! content. The storage format is pluggable through [`CatalogLoader`] so the
//! pipeline never commits to one on-disk representation: the built-in loaders
//! cover flat JSON objects and flat TOML tables.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use crate::config::CatalogFormat;
use crate::error::PresseError;

/// Flat `message -> translated text` entries of one catalog file.
///
/// Ordered so that merged mappings serialize deterministically.
pub type CatalogEntries = BTreeMap<String, String>;

/// One discovered catalog file.
///
/// Ephemeral: the set is recomputed on every run and never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogFile {
    /// Location of the file
    pub path: PathBuf,
    /// The base directory it was found under; key derivation strips this
    pub base: PathBuf,
    /// Modification time captured at scan time
    pub modified: SystemTime,
}

/// Source of catalog entries, given a file path.
///
/// The message-catalog storage format is a collaborator, not part of the
/// pipeline: implement this to plug in another representation.
pub trait CatalogLoader {
    /// Load the flat entries of one catalog file.
    fn load(&self, path: &Path) -> Result<CatalogEntries, PresseError>;
}

fn read_catalog(path: &Path) -> Result<String, PresseError> {
    fs::read_to_string(path).map_err(|source| PresseError::CatalogRead {
        path: path.to_path_buf(),
        source,
    })
}

/// Loader for flat JSON object catalogs: `{"Hello": "Bonjour"}`.
///
/// Values must be strings; a catalog holding anything else is an authoring
/// error and fails the build.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCatalogLoader;

impl CatalogLoader for JsonCatalogLoader {
    fn load(&self, path: &Path) -> Result<CatalogEntries, PresseError> {
        let text = read_catalog(path)?;
        let value: serde_json::Value =
            serde_json::from_str(&text).map_err(|e| PresseError::Catalog {
                path: path.to_path_buf(),
                detail: e.to_string(),
            })?;

        let object = value.as_object().ok_or_else(|| PresseError::Catalog {
            path: path.to_path_buf(),
            detail: "top-level value must be an object".to_string(),
        })?;

        let mut entries = CatalogEntries::new();
        for (message, translated) in object {
            match translated {
                serde_json::Value::String(text) => {
                    entries.insert(message.clone(), text.clone());
                }
                other => {
                    return Err(PresseError::Catalog {
                        path: path.to_path_buf(),
                        detail: format!("value for {message:?} must be a string, got {other}"),
                    });
                }
            }
        }
        Ok(entries)
    }
}

/// Loader for flat TOML table catalogs: `Hello = "Bonjour"`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TomlCatalogLoader;

impl CatalogLoader for TomlCatalogLoader {
    fn load(&self, path: &Path) -> Result<CatalogEntries, PresseError> {
        let text = read_catalog(path)?;
        let table: toml::Table = text.parse().map_err(|e: toml::de::Error| {
            PresseError::Catalog {
                path: path.to_path_buf(),
                detail: e.message().to_string(),
            }
        })?;

        let mut entries = CatalogEntries::new();
        for (message, translated) in table {
            match translated {
                toml::Value::String(text) => {
                    entries.insert(message, text);
                }
                other => {
                    return Err(PresseError::Catalog {
                        path: path.to_path_buf(),
                        detail: format!(
                            "value for {message:?} must be a string, got {}",
                            other.type_str()
                        ),
                    });
                }
            }
        }
        Ok(entries)
    }
}

/// The built-in loader for a configured catalog format.
pub fn loader_for(format: CatalogFormat) -> Box<dyn CatalogLoader> {
    match format {
        CatalogFormat::Json => Box::new(JsonCatalogLoader),
        CatalogFormat::Toml => Box::new(TomlCatalogLoader),
    }
}
