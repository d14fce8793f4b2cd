//! Quality Catalog
//!
//! Static quality prototypes (display metadata per quality id), loaded from a
//! TOML table before any tool using those qualities spawns.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::components::tool::QualityId;

/// Errors from loading a quality catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read quality catalog: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse quality catalog: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("duplicate quality id `{0}`")]
    DuplicateId(String),
}

/// Declared metadata for one tool quality.
#[derive(Debug, Clone, Deserialize)]
pub struct QualityPrototype {
    pub id: String,
    /// Display name, e.g. "Cutting".
    pub name: String,
    /// Name of a canonical tool providing this quality, for help text.
    #[serde(default)]
    pub tool_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CatalogDoc {
    #[serde(default)]
    quality: Vec<QualityPrototype>,
}

/// Lookup of quality prototypes by id.
#[derive(Debug, Clone, Default)]
pub struct QualityCatalog {
    prototypes: BTreeMap<QualityId, QualityPrototype>,
}

impl QualityCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a catalog from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        Self::from_toml_str(&fs::read_to_string(path)?)
    }

    /// Parse a catalog from a TOML document with `[[quality]]` entries.
    pub fn from_toml_str(doc: &str) -> Result<Self, CatalogError> {
        let doc: CatalogDoc = toml::from_str(doc)?;
        let mut catalog = Self::new();
        for prototype in doc.quality {
            let id = QualityId::new(prototype.id.clone());
            if catalog.prototypes.contains_key(&id) {
                return Err(CatalogError::DuplicateId(prototype.id));
            }
            catalog.prototypes.insert(id, prototype);
        }
        tracing::debug!(qualities = catalog.len(), "loaded quality catalog");
        Ok(catalog)
    }

    /// Register a prototype directly, replacing any existing entry.
    pub fn register(&mut self, prototype: QualityPrototype) {
        self.prototypes
            .insert(QualityId::new(prototype.id.clone()), prototype);
    }

    pub fn get(&self, id: &QualityId) -> Option<&QualityPrototype> {
        self.prototypes.get(id)
    }

    pub fn len(&self) -> usize {
        self.prototypes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prototypes.is_empty()
    }
}
