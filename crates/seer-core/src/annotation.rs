//! Prediction annotations returned by a model for a single frame.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::GeometryKind;
use crate::schema::{ClassDef, TagDef};

/// Value carried by a tag. `Empty` is encoded as JSON `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum TagValue {
    Number(f64),
    Text(String),
    Empty,
}

/// A tag instance referencing its definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Tag {
    pub def: TagDef,
    #[serde(default = "empty_value")]
    pub value: TagValue,
}

const fn empty_value() -> TagValue {
    TagValue::Empty
}

impl Tag {
    #[must_use]
    pub const fn new(def: TagDef, value: TagValue) -> Self {
        Self { def, value }
    }
}

/// Geometry payload of a label. The coordinates are opaque to seer and are
/// handed to the annotation store untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Geometry {
    pub shape: GeometryKind,
    #[serde(default)]
    pub data: serde_json::Value,
}

/// One detected object: its class, geometry and label-level tags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Label {
    pub class: ClassDef,
    pub geometry: Geometry,
    #[serde(default)]
    pub tags: Vec<Tag>,
}

/// Model output for one frame.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PredictionAnnotation {
    #[serde(default)]
    pub frame_tags: Vec<Tag>,
    #[serde(default)]
    pub labels: Vec<Label>,
}

impl PredictionAnnotation {
    /// Number of tags across the frame and all labels.
    #[must_use]
    pub fn tag_count(&self) -> usize {
        self.frame_tags.len() + self.labels.iter().map(|l| l.tags.len()).sum::<usize>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enums::TagValueType;

    #[test]
    fn tag_values_decode_untagged() {
        let tags: Vec<Tag> = serde_json::from_str(
            r#"[
                {"def":{"name":"speed","value_type":{"type":"any_number"}},"value":42.5},
                {"def":{"name":"plate","value_type":{"type":"any_string"}},"value":"AB123"},
                {"def":{"name":"parked","value_type":{"type":"none"}},"value":null},
                {"def":{"name":"moving","value_type":{"type":"none"}}}
            ]"#,
        )
        .unwrap();

        assert_eq!(tags[0].value, TagValue::Number(42.5));
        assert_eq!(tags[1].value, TagValue::Text("AB123".into()));
        assert_eq!(tags[2].value, TagValue::Empty);
        assert_eq!(tags[3].value, TagValue::Empty);
        assert_eq!(tags[3].def.value_type, TagValueType::None);
    }

    #[test]
    fn tag_count_spans_frame_and_labels() {
        let speed = Tag::new(
            TagDef::new("speed", TagValueType::AnyNumber),
            TagValue::Number(3.0),
        );
        let annotation = PredictionAnnotation {
            frame_tags: vec![speed.clone()],
            labels: vec![Label {
                class: ClassDef::new("car", GeometryKind::Rectangle),
                geometry: Geometry {
                    shape: GeometryKind::Rectangle,
                    data: serde_json::json!({"points": [[0, 0], [10, 10]]}),
                },
                tags: vec![speed.clone(), speed],
            }],
        };
        assert_eq!(annotation.tag_count(), 3);
    }
}
