//! Minimal JSON document store
//!
//! Documents live in a single `_default` table keyed by increasing integer
//! ids, e.g. `{"_default": {"1": {"INITIALIZED": true}}}`.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

const INITIALIZED: &str = "INITIALIZED";

#[derive(Debug, Default, Serialize, Deserialize)]
struct Tables {
    #[serde(rename = "_default", default)]
    default: BTreeMap<u64, Map<String, Value>>,
}

/// File-backed document store
#[derive(Debug, Clone)]
pub struct Store {
    path: PathBuf,
}

impl Store {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<Tables> {
        if !self.path.exists() {
            return Ok(Tables::default());
        }
        let content = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read store: {}", self.path.display()))?;
        if content.trim().is_empty() {
            return Ok(Tables::default());
        }
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse store: {}", self.path.display()))
    }

    fn write(&self, tables: &Tables) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create store directory: {}", parent.display())
            })?;
        }
        let json = serde_json::to_string(tables)?;
        std::fs::write(&self.path, json)
            .with_context(|| format!("Failed to write store: {}", self.path.display()))
    }

    /// Append a document and return its id
    ///
    /// # Errors
    /// Returns an error if the store cannot be read or written
    pub fn insert(&self, document: Map<String, Value>) -> Result<u64> {
        let mut tables = self.read()?;
        let id = tables.default.keys().next_back().map_or(1, |last| last + 1);
        tables.default.insert(id, document);
        self.write(&tables)?;
        tracing::debug!(id, path = %self.path.display(), "inserted document");
        Ok(id)
    }

    /// All documents in id order
    ///
    /// # Errors
    /// Returns an error if the store exists but cannot be read or parsed
    pub fn all(&self) -> Result<Vec<Map<String, Value>>> {
        Ok(self.read()?.default.into_values().collect())
    }

    /// Record the first-run flag
    ///
    /// # Errors
    /// Returns an error if the store cannot be written
    pub fn mark_initialized(&self) -> Result<u64> {
        let mut document = Map::new();
        document.insert(INITIALIZED.to_string(), Value::Bool(true));
        self.insert(document)
    }

    /// Whether any document carries `INITIALIZED: true`
    ///
    /// # Errors
    /// Returns an error if the store exists but cannot be read or parsed
    pub fn is_initialized(&self) -> Result<bool> {
        Ok(self
            .all()?
            .iter()
            .any(|doc| doc.get(INITIALIZED) == Some(&Value::Bool(true))))
    }
}
