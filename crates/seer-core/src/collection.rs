//! Name-keyed collections of class or tag definitions.
//!
//! Keys are the trimmed item names and are unique. On the wire a collection
//! is a plain JSON array of items; decoding rejects empty and duplicate names.

use std::collections::BTreeMap;
use std::collections::BTreeSet;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::errors::CoreError;
use crate::schema::SchemaItem;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaCollection<T> {
    items: BTreeMap<String, T>,
}

impl<T> Default for SchemaCollection<T> {
    fn default() -> Self {
        Self {
            items: BTreeMap::new(),
        }
    }
}

impl<T: SchemaItem> SchemaCollection<T> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a collection, failing on the first empty or duplicate name.
    pub fn from_items(items: impl IntoIterator<Item = T>) -> Result<Self, CoreError> {
        let mut collection = Self::new();
        for item in items {
            collection.insert(item)?;
        }
        Ok(collection)
    }

    /// Look up an item by name. Surrounding whitespace in `name` is ignored.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&T> {
        self.items.get(name.trim())
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.items.contains_key(name.trim())
    }

    /// Insert an item under its trimmed name.
    pub fn insert(&mut self, item: T) -> Result<(), CoreError> {
        let key = item.key();
        if key.is_empty() {
            return Err(CoreError::EmptyName { kind: T::LABEL });
        }
        if self.items.contains_key(key) {
            return Err(CoreError::Duplicate {
                kind: T::LABEL,
                name: key.to_string(),
            });
        }
        self.items.insert(key.to_string(), item);
        Ok(())
    }

    /// Items whose names appear in `names`, in key order.
    ///
    /// Returns the first requested name that has no item.
    pub fn select<'a>(&self, names: &'a BTreeSet<String>) -> Result<Self, &'a str> {
        let mut selected = BTreeMap::new();
        for name in names {
            let item = self.get(name).ok_or(name.as_str())?;
            selected.insert(item.key().to_string(), item.clone());
        }
        Ok(Self { items: selected })
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.items.values()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.items.keys().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<T: Serialize> Serialize for SchemaCollection<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.items.values())
    }
}

impl<'de, T> Deserialize<'de> for SchemaCollection<T>
where
    T: SchemaItem + Deserialize<'de>,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let items = Vec::<T>::deserialize(deserializer)?;
        Self::from_items(items).map_err(D::Error::custom)
    }
}
