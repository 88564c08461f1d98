//! Behavioural guarantees of reconciliation and remapping.

use pretty_assertions::assert_eq;
use rstest::{fixture, rstest};
use seer_core::{
    ClassDef, Geometry, GeometryKind, KeepSet, Label, PredictionAnnotation, SchemaCollection,
    SchemaItem, Tag, TagDef, TagValue, TagValueType, Vocabulary,
};
use seer_schema::{SuffixPolicy, generate, reconcile, transform};

fn vocabulary(classes: &[(&str, GeometryKind)], tags: &[(&str, TagValueType)]) -> Vocabulary {
    Vocabulary::new(
        SchemaCollection::from_items(classes.iter().map(|(n, k)| ClassDef::new(*n, *k))).unwrap(),
        SchemaCollection::from_items(tags.iter().map(|(n, t)| TagDef::new(*n, t.clone())))
            .unwrap(),
    )
}

fn label(class: &str, shape: GeometryKind) -> Label {
    Label {
        class: ClassDef::new(class, shape),
        geometry: Geometry {
            shape,
            data: serde_json::json!({"exterior": [[0, 0], [4, 0], [4, 4]]}),
        },
        tags: vec![],
    }
}

#[fixture]
fn project() -> Vocabulary {
    vocabulary(
        &[
            ("car", GeometryKind::Rectangle),
            ("person", GeometryKind::Polygon),
            ("sign", GeometryKind::Point),
        ],
        &[
            ("speed", TagValueType::AnyString),
            ("occluded", TagValueType::None),
        ],
    )
}

#[fixture]
fn model() -> Vocabulary {
    vocabulary(
        &[
            ("car", GeometryKind::Polygon),
            ("person", GeometryKind::Polygon),
            ("bike", GeometryKind::Rectangle),
        ],
        &[
            ("speed", TagValueType::AnyNumber),
            ("occluded", TagValueType::None),
        ],
    )
}

#[rstest]
fn reconciling_twice_without_force_is_idempotent(project: Vocabulary, model: Vocabulary) {
    let policy = SuffixPolicy::new("model", false);

    let first = reconcile(&project, &model, &policy).unwrap();
    let second = reconcile(&first.vocabulary, &model, &policy).unwrap();

    assert!(!second.changed(&first.vocabulary));
    assert_eq!(second.mapping, first.mapping);
}

#[rstest]
#[case(false)]
#[case(true)]
fn colliding_kinds_never_resolve_to_the_colliding_item(
    project: Vocabulary,
    model: Vocabulary,
    #[case] force: bool,
) {
    let result = reconcile(&project, &model, &SuffixPolicy::new("model", force)).unwrap();

    for item in model.classes.iter() {
        if let Some(existing) = project.classes.get(item.key()) {
            if !existing.same_kind(item) {
                let resolved = result.mapping.classes.get(item.key()).unwrap();
                assert_ne!(resolved, existing);
                assert!(resolved.name.starts_with("car-model"), "{resolved:?}");
                assert!(!project.classes.contains(&resolved.name));
            }
        }
    }
    for item in model.tags.iter() {
        if let Some(existing) = project.tags.get(item.key()) {
            if !existing.same_kind(item) {
                let resolved = result.mapping.tags.get(item.key()).unwrap();
                assert_ne!(resolved, existing);
                assert_eq!(resolved.value_type, item.value_type);
            }
        }
    }
}

#[test]
fn suffix_generation_is_deterministic() {
    let car = ClassDef::new("car", GeometryKind::Rectangle);
    assert_eq!(generate(&car, "model", 0), "car-model");
    assert_eq!(generate(&car, "model", 2), "car-model-2");
}

#[rstest]
fn mapping_covers_every_kept_item(project: Vocabulary, model: Vocabulary) {
    let keep = KeepSet::new(["car", "bike"], ["speed"]);
    let selected = model.select(&keep).unwrap();
    let result = reconcile(&project, &selected, &SuffixPolicy::default()).unwrap();

    for name in &keep.classes {
        let resolved = result.mapping.classes.get(name).unwrap();
        assert!(result.vocabulary.classes.contains(&resolved.name));
    }
    for name in &keep.tags {
        let resolved = result.mapping.tags.get(name).unwrap();
        assert!(result.vocabulary.tags.contains(&resolved.name));
    }

    let mut car = label("car", GeometryKind::Polygon);
    car.tags.push(Tag::new(
        TagDef::new("speed", TagValueType::AnyNumber),
        TagValue::Number(88.0),
    ));
    let prediction = PredictionAnnotation {
        frame_tags: vec![],
        labels: vec![car, label("bike", GeometryKind::Rectangle)],
    };
    let out = transform(&prediction, &result.vocabulary, &result.mapping, &keep).unwrap();
    for label in &out.labels {
        assert_eq!(result.vocabulary.classes.get(&label.class.name), Some(&label.class));
        for tag in &label.tags {
            assert_eq!(result.vocabulary.tags.get(&tag.def.name), Some(&tag.def));
        }
    }
}

#[rstest]
#[case(&["car"], 1)]
#[case(&[], 0)]
#[case(&["car", "person"], 3)]
fn filter_keeps_only_selected_classes(
    model: Vocabulary,
    #[case] keep_classes: &[&str],
    #[case] expected: usize,
) {
    let keep = KeepSet::new(keep_classes.iter().copied(), Vec::<String>::new());
    let selected = model.select(&keep).unwrap();
    let result = reconcile(&Vocabulary::default(), &selected, &SuffixPolicy::default()).unwrap();

    let prediction = PredictionAnnotation {
        frame_tags: vec![],
        labels: vec![
            label("car", GeometryKind::Polygon),
            label("person", GeometryKind::Polygon),
            label("person", GeometryKind::Polygon),
        ],
    };
    let out = transform(&prediction, &result.vocabulary, &result.mapping, &keep).unwrap();

    assert_eq!(out.labels.len(), expected);
    assert!(out.labels.iter().all(|l| keep.keeps_class(&l.class.name)));
}

/// Project has `car` (box); model reports `car` (polygon) and `speed`
/// (numeric); suffix `model`, forced.
fn end_to_end(project: &Vocabulary, policy: &SuffixPolicy) -> (Vocabulary, PredictionAnnotation) {
    let model = vocabulary(
        &[("car", GeometryKind::Polygon)],
        &[("speed", TagValueType::AnyNumber)],
    );
    let result = reconcile(project, &model, policy).unwrap();

    let mut car = label("car", GeometryKind::Polygon);
    car.tags.push(Tag::new(
        TagDef::new("speed", TagValueType::AnyNumber),
        TagValue::Number(54.0),
    ));
    let prediction = PredictionAnnotation {
        frame_tags: vec![],
        labels: vec![car],
    };
    let out = transform(&prediction, &result.vocabulary, &result.mapping, &model.keep_all()).unwrap();
    (result.vocabulary, out)
}

#[test]
fn end_to_end_forced_suffix() {
    let project = vocabulary(&[("car", GeometryKind::Rectangle)], &[]);
    let (vocab, out) = end_to_end(&project, &SuffixPolicy::new("model", true));

    assert_eq!(
        vocab.classes.get("car"),
        Some(&ClassDef::new("car", GeometryKind::Rectangle))
    );
    assert_eq!(
        vocab.classes.get("car-model"),
        Some(&ClassDef::new("car-model", GeometryKind::Polygon))
    );
    assert_eq!(
        vocab.tags.get("speed-model"),
        Some(&TagDef::new("speed-model", TagValueType::AnyNumber))
    );
    assert!(!vocab.tags.contains("speed"));
    assert_eq!(out.labels[0].class.name, "car-model");
    assert_eq!(out.labels[0].tags[0].def.name, "speed-model");
    assert_eq!(out.labels[0].tags[0].value, TagValue::Number(54.0));
}

#[test]
fn end_to_end_forced_suffix_with_colliding_tag() {
    let project = vocabulary(
        &[("car", GeometryKind::Rectangle)],
        &[("speed", TagValueType::AnyString)],
    );
    let (vocab, out) = end_to_end(&project, &SuffixPolicy::new("model", true));

    assert_eq!(
        vocab.tags.get("speed-model"),
        Some(&TagDef::new("speed-model", TagValueType::AnyNumber))
    );
    assert_eq!(out.labels[0].class.name, "car-model");
    assert_eq!(out.labels[0].tags[0].def.name, "speed-model");
}
