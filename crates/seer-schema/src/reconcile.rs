//! Merge model classes/tags into a project vocabulary.
//!
//! Each model item resolves to either an existing project item (same kind,
//! possibly under a suffixed name) or a new item inserted into a working copy
//! of the vocabulary. A project item is never reused for a model item of a
//! different kind under the same name; such collisions move on to
//! `{name}-{suffix}`, `{name}-{suffix}-1`, ... until a free or same-kind slot
//! turns up. Every step tries a name not tried before, so the search ends.

use seer_core::{SchemaCollection, SchemaItem, Vocabulary};

use crate::error::SchemaError;
use crate::mapping::{Mapping, NameMapping};
use crate::suffix::suffixed_name;

/// How names are suffixed during reconciliation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuffixPolicy {
    pub suffix: String,
    /// Resolve to a suffixed slot even when the plain name is free.
    pub force: bool,
}

impl SuffixPolicy {
    #[must_use]
    pub fn new(suffix: impl Into<String>, force: bool) -> Self {
        Self {
            suffix: suffix.into(),
            force,
        }
    }
}

impl Default for SuffixPolicy {
    fn default() -> Self {
        Self::new("model", false)
    }
}

/// Outcome of a reconciliation pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconciliation {
    pub vocabulary: Vocabulary,
    pub mapping: Mapping,
}

impl Reconciliation {
    /// Whether the pass inserted anything relative to `original`.
    #[must_use]
    pub fn changed(&self, original: &Vocabulary) -> bool {
        self.vocabulary != *original
    }
}

enum Resolution<T> {
    Reuse(T),
    Insert(String),
}

/// Reconcile the classes and the tags of `model_items` into `project`.
///
/// Classes and tags are resolved independently with the same rules.
///
/// # Errors
///
/// [`SchemaError::Lookup`] when a model item name is blank,
/// [`SchemaError::Insert`] when the working vocabulary rejects an item.
pub fn reconcile(
    project: &Vocabulary,
    model_items: &Vocabulary,
    policy: &SuffixPolicy,
) -> Result<Reconciliation, SchemaError> {
    let (classes, class_mapping) =
        reconcile_items(&project.classes, model_items.classes.iter(), policy)?;
    let (tags, tag_mapping) = reconcile_items(&project.tags, model_items.tags.iter(), policy)?;

    Ok(Reconciliation {
        vocabulary: Vocabulary::new(classes, tags),
        mapping: Mapping {
            classes: class_mapping,
            tags: tag_mapping,
        },
    })
}

/// Reconcile one family of items into `collection`.
///
/// Returns the updated copy of `collection` and the mapping from each model
/// item's trimmed name to the item it resolved to.
pub fn reconcile_items<'a, T>(
    collection: &SchemaCollection<T>,
    model_items: impl IntoIterator<Item = &'a T>,
    policy: &SuffixPolicy,
) -> Result<(SchemaCollection<T>, NameMapping<T>), SchemaError>
where
    T: SchemaItem + 'a,
{
    let mut working = collection.clone();
    let mut mapping = NameMapping::default();

    for item in model_items {
        let key = item.key();
        if key.is_empty() {
            return Err(SchemaError::Lookup {
                kind: T::LABEL,
                name: item.name().to_string(),
            });
        }

        let resolved = match resolve(&working, item, policy) {
            Resolution::Reuse(existing) => {
                tracing::debug!(kind = T::LABEL, model = key, resolved = existing.name(), "reusing project item");
                existing
            }
            Resolution::Insert(name) => {
                let fresh = item.renamed(&name);
                working
                    .insert(fresh.clone())
                    .map_err(|source| SchemaError::Insert {
                        kind: T::LABEL,
                        name: name.clone(),
                        source,
                    })?;
                tracing::debug!(kind = T::LABEL, model = key, resolved = %name, "inserting new item");
                fresh
            }
        };
        mapping.insert(key, resolved);
    }

    Ok((working, mapping))
}

fn resolve<T: SchemaItem>(
    collection: &SchemaCollection<T>,
    item: &T,
    policy: &SuffixPolicy,
) -> Resolution<T> {
    let base = item.key();
    let mut candidate = base.to_string();
    let mut index = 0;

    loop {
        match collection.get(&candidate) {
            None => {
                if !policy.force {
                    return Resolution::Insert(candidate);
                }
                // An occupied suffixed slot is taken as-is, whatever its kind.
                let probe = suffixed_name(base, &policy.suffix, index);
                if let Some(existing) = collection.get(&probe) {
                    return Resolution::Reuse(existing.clone());
                }
                if candidate == base {
                    return Resolution::Insert(probe);
                }
                return Resolution::Insert(candidate);
            }
            Some(existing) if existing.same_kind(item) => {
                if policy.force && candidate == base {
                    return separate_slot(collection, item, policy, index);
                }
                return Resolution::Reuse(existing.clone());
            }
            Some(_) => {
                candidate = suffixed_name(base, &policy.suffix, index);
                index += 1;
            }
        }
    }
}

/// First suffixed slot that is free or already holds the same kind.
fn separate_slot<T: SchemaItem>(
    collection: &SchemaCollection<T>,
    item: &T,
    policy: &SuffixPolicy,
    mut index: u32,
) -> Resolution<T> {
    loop {
        let probe = suffixed_name(item.key(), &policy.suffix, index);
        match collection.get(&probe) {
            None => return Resolution::Insert(probe),
            Some(existing) if existing.same_kind(item) => {
                return Resolution::Reuse(existing.clone());
            }
            Some(_) => index += 1,
        }
    }
}
