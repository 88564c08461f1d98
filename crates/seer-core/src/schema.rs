//! Class and tag definitions.
//!
//! A definition's name is a mutable label: two definitions describe the same
//! concept when their *kind* matches, whatever they are called. Reconciliation
//! relies on [`SchemaItem::same_kind`] rather than `PartialEq`, which also
//! compares names.

use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::{GeometryKind, TagValueType};

/// Behaviour shared by class and tag definitions.
pub trait SchemaItem: Clone + fmt::Debug {
    /// Name-independent semantics of the item.
    type Kind: PartialEq + fmt::Debug;

    /// Human-readable item family, used in errors and logs.
    const LABEL: &'static str;

    fn name(&self) -> &str;

    fn kind(&self) -> &Self::Kind;

    /// Copy of this item under a different name.
    #[must_use]
    fn renamed(&self, name: &str) -> Self;

    /// Name with surrounding whitespace removed. All lookups use this form.
    fn key(&self) -> &str {
        self.name().trim()
    }

    /// Semantic equality: same kind, any name.
    fn same_kind(&self, other: &Self) -> bool {
        self.kind() == other.kind()
    }
}

/// An object class: a name and the geometry its labels are drawn with.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub struct ClassDef {
    pub name: String,
    pub shape: GeometryKind,
}

impl ClassDef {
    #[must_use]
    pub fn new(name: impl Into<String>, shape: GeometryKind) -> Self {
        Self {
            name: name.into(),
            shape,
        }
    }
}

impl SchemaItem for ClassDef {
    type Kind = GeometryKind;

    const LABEL: &'static str = "class";

    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> &GeometryKind {
        &self.shape
    }

    fn renamed(&self, name: &str) -> Self {
        Self {
            name: name.to_string(),
            shape: self.shape,
        }
    }
}

/// A tag definition: a name and the type of value a tag carries.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub struct TagDef {
    pub name: String,
    pub value_type: TagValueType,
}

impl TagDef {
    #[must_use]
    pub fn new(name: impl Into<String>, value_type: TagValueType) -> Self {
        Self {
            name: name.into(),
            value_type,
        }
    }
}

impl SchemaItem for TagDef {
    type Kind = TagValueType;

    const LABEL: &'static str = "tag";

    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> &TagValueType {
        &self.value_type
    }

    fn renamed(&self, name: &str) -> Self {
        Self {
            name: name.to_string(),
            value_type: self.value_type.clone(),
        }
    }
}
