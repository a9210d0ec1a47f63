//! Checklist catalogs for compliance gap analysis.
//!
//! The catalog is configuration data supplied by the caller. The engine
//! never carries a built-in checklist; the binary embeds one data file as
//! its default.

use crate::core::{EntityKind, Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecklistItem {
    pub id: String,
    pub category: String,
    pub item: String,
    pub clause: String,
    #[serde(default)]
    pub critical: bool,
}

#[derive(Debug, Deserialize)]
struct CatalogDocument {
    #[serde(default)]
    items: Vec<ChecklistItem>,
}

/// Fixed, ordered set of checklist items with unique ids.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChecklistCatalog {
    items: Vec<ChecklistItem>,
    index: HashMap<String, usize>,
}

impl ChecklistCatalog {
    pub fn new(items: Vec<ChecklistItem>) -> Result<Self> {
        let mut index = HashMap::with_capacity(items.len());
        for (position, item) in items.iter().enumerate() {
            if index.insert(item.id.clone(), position).is_some() {
                return Err(Error::duplicate(EntityKind::ChecklistItem, &item.id));
            }
        }
        Ok(Self { items, index })
    }

    /// Parse a TOML document with an `[[items]]` array.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let document: CatalogDocument = toml::from_str(content)?;
        Self::new(document.items)
    }

    /// Parse a JSON array of items.
    pub fn from_json_str(content: &str) -> Result<Self> {
        Self::new(serde_json::from_str(content)?)
    }

    /// Load a catalog file, choosing the format by extension.
    pub fn load(path: &Path) -> Result<Self> {
        let content = crate::io::read_file(path)?;
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::from_json_str(&content),
            _ => Self::from_toml_str(&content),
        }
    }

    pub fn items(&self) -> &[ChecklistItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn get(&self, id: &str) -> Result<&ChecklistItem> {
        self.index
            .get(id)
            .map(|&position| &self.items[position])
            .ok_or_else(|| Error::not_found(EntityKind::ChecklistItem, id))
    }

    /// Categories in order of first appearance.
    pub fn categories(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.items
            .iter()
            .map(|item| item.category.as_str())
            .filter(|category| seen.insert(*category))
            .collect()
    }
}
