//! Project vocabulary and the class/tag name sets an apply keeps.

use std::collections::BTreeSet;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::collection::SchemaCollection;
use crate::schema::{ClassDef, SchemaItem, TagDef};

/// The classes and tags known to a project, or reported by a model.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Vocabulary {
    #[serde(default)]
    #[schemars(with = "Vec<ClassDef>")]
    pub classes: SchemaCollection<ClassDef>,
    #[serde(default)]
    #[schemars(with = "Vec<TagDef>")]
    pub tags: SchemaCollection<TagDef>,
}

impl Vocabulary {
    #[must_use]
    pub fn new(classes: SchemaCollection<ClassDef>, tags: SchemaCollection<TagDef>) -> Self {
        Self { classes, tags }
    }

    /// Every class and tag name, i.e. the default "select all" set.
    #[must_use]
    pub fn keep_all(&self) -> KeepSet {
        KeepSet {
            classes: self.classes.names().map(ToString::to_string).collect(),
            tags: self.tags.names().map(ToString::to_string).collect(),
        }
    }

    /// Restrict to the names in `keep`. Returns the first unknown name.
    pub fn select<'a>(&self, keep: &'a KeepSet) -> Result<Self, (&'static str, &'a str)> {
        let classes = self
            .classes
            .select(&keep.classes)
            .map_err(|name| (ClassDef::LABEL, name))?;
        let tags = self
            .tags
            .select(&keep.tags)
            .map_err(|name| (TagDef::LABEL, name))?;
        Ok(Self { classes, tags })
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty() && self.tags.is_empty()
    }
}

/// Class and tag names selected for an apply.
///
/// Names are stored trimmed so membership checks match vocabulary lookups.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct KeepSet {
    #[serde(default)]
    pub classes: BTreeSet<String>,
    #[serde(default)]
    pub tags: BTreeSet<String>,
}

impl KeepSet {
    #[must_use]
    pub fn new<C, T>(classes: C, tags: T) -> Self
    where
        C: IntoIterator,
        C::Item: AsRef<str>,
        T: IntoIterator,
        T::Item: AsRef<str>,
    {
        Self {
            classes: classes
                .into_iter()
                .map(|name| name.as_ref().trim().to_string())
                .collect(),
            tags: tags
                .into_iter()
                .map(|name| name.as_ref().trim().to_string())
                .collect(),
        }
    }

    #[must_use]
    pub fn keeps_class(&self, name: &str) -> bool {
        self.classes.contains(name.trim())
    }

    #[must_use]
    pub fn keeps_tag(&self, name: &str) -> bool {
        self.tags.contains(name.trim())
    }

    /// Names present in both sets.
    #[must_use]
    pub fn intersect(&self, classes: &BTreeSet<String>, tags: &BTreeSet<String>) -> Self {
        Self::new(
            self.classes.iter().filter(|name| classes.contains(*name)),
            self.tags.iter().filter(|name| tags.contains(*name)),
        )
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty() && self.tags.is_empty()
    }
}
