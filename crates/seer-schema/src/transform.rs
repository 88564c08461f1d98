//! Filter a prediction to the kept classes/tags and remap its definitions.

use seer_core::{KeepSet, Label, PredictionAnnotation, SchemaItem, Tag, Vocabulary};

use crate::error::SchemaError;
use crate::mapping::Mapping;

/// Produce a filtered, remapped copy of `prediction`.
///
/// Frame tags and label tags survive when their name is in `keep.tags`,
/// labels when their class is in `keep.classes`. Every surviving definition
/// is replaced by its entry in `mapping`, which must exist in `vocabulary`.
/// Geometry and tag values are carried over unchanged.
///
/// # Errors
///
/// [`SchemaError::Lookup`] when a kept name has no mapping entry, or the
/// mapped item is missing from `vocabulary`.
pub fn transform(
    prediction: &PredictionAnnotation,
    vocabulary: &Vocabulary,
    mapping: &Mapping,
    keep: &KeepSet,
) -> Result<PredictionAnnotation, SchemaError> {
    let frame_tags = remap_tags(&prediction.frame_tags, vocabulary, mapping, keep)?;

    let mut labels = Vec::new();
    for label in &prediction.labels {
        if !keep.keeps_class(label.class.name()) {
            continue;
        }
        let class = mapping.classes.resolve(label.class.name())?;
        ensure_present(vocabulary.classes.contains(class.name()), class)?;
        labels.push(Label {
            class: class.clone(),
            geometry: label.geometry.clone(),
            tags: remap_tags(&label.tags, vocabulary, mapping, keep)?,
        });
    }

    Ok(PredictionAnnotation { frame_tags, labels })
}

fn remap_tags(
    tags: &[Tag],
    vocabulary: &Vocabulary,
    mapping: &Mapping,
    keep: &KeepSet,
) -> Result<Vec<Tag>, SchemaError> {
    tags.iter()
        .filter(|tag| keep.keeps_tag(tag.def.name()))
        .map(|tag| {
            let def = mapping.tags.resolve(tag.def.name())?;
            ensure_present(vocabulary.tags.contains(def.name()), def)?;
            Ok(Tag::new(def.clone(), tag.value.clone()))
        })
        .collect()
}

fn ensure_present<T: SchemaItem>(present: bool, item: &T) -> Result<(), SchemaError> {
    if present {
        Ok(())
    } else {
        Err(SchemaError::Lookup {
            kind: T::LABEL,
            name: item.key().to_string(),
        })
    }
}
