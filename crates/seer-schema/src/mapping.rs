//! Model-name → resolved-item tables produced by one reconciliation pass.

use std::collections::BTreeMap;

use seer_core::{ClassDef, SchemaItem, TagDef};
use serde::Serialize;

use crate::error::SchemaError;

/// Resolved items keyed by the model item's trimmed name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct NameMapping<T> {
    entries: BTreeMap<String, T>,
}

impl<T> Default for NameMapping<T> {
    fn default() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }
}

impl<T: SchemaItem> NameMapping<T> {
    pub(crate) fn insert(&mut self, model_name: &str, resolved: T) {
        self.entries.insert(model_name.trim().to_string(), resolved);
    }

    #[must_use]
    pub fn get(&self, model_name: &str) -> Option<&T> {
        self.entries.get(model_name.trim())
    }

    /// Like [`Self::get`], failing with a lookup error.
    pub fn resolve(&self, model_name: &str) -> Result<&T, SchemaError> {
        self.get(model_name).ok_or_else(|| SchemaError::Lookup {
            kind: T::LABEL,
            name: model_name.trim().to_string(),
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &T)> {
        self.entries.iter().map(|(name, item)| (name.as_str(), item))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Class and tag mappings of one pass. Not persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Mapping {
    pub classes: NameMapping<ClassDef>,
    pub tags: NameMapping<TagDef>,
}
