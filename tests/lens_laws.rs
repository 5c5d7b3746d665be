#![cfg(feature = "optics")]
//! Property-based tests for Lens laws.
//!
//! Tests that property lenses built from the global, scoped, and member
//! isomorphisms satisfy GetPut, PutGet, and PutPut.

use lambars_union::optics::Lens;
use lambars_union::{Entity, Payload, Schema, Shape, UnionBundle};
use proptest::prelude::*;
use serde_json::{Value, json};

// =============================================================================
// Fixtures
// =============================================================================

const NAMES: [&str; 2] = ["Text", "Image"];
const VARIATIONS: [&str; 3] = ["Pending", "Sent", "Failed"];

fn bundle() -> UnionBundle {
    let schema = Schema::from_value(&json!({
        "Text": { "Pending": ["id", "body"], "Sent": ["id", "body"], "Failed": ["id", "body"] },
        "Image": { "Pending": ["id", "url"], "Sent": ["id", "url"], "Failed": ["id", "url"] }
    }))
    .unwrap();
    UnionBundle::generate(schema).unwrap()
}

fn value_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::from),
        any::<i64>().prop_map(Value::from),
        "[a-z ]{0,12}".prop_map(Value::from),
    ]
}

fn entity_strategy() -> impl Strategy<Value = (usize, usize, i64, String)> {
    (0..NAMES.len(), 0..VARIATIONS.len(), any::<i64>(), "[a-z]{0,8}")
}

fn entity(bundle: &UnionBundle, name: usize, variation: usize, id: i64, text: String) -> Entity {
    let payload = Payload::new().with("id", id).with("body", text);
    bundle
        .of()
        .make(NAMES[name], VARIATIONS[variation], payload)
        .unwrap()
}

// =============================================================================
// Global lens
// =============================================================================

proptest! {
    #[test]
    fn prop_get_put_law((name, variation, id, text) in entity_strategy()) {
        let bundle = bundle();
        let lens = bundle.lens_from_prop("id").unwrap();
        let source = entity(&bundle, name, variation, id, text);

        let current = lens.get(&source).clone();
        prop_assert_eq!(lens.set(source.clone(), current), source);
    }

    #[test]
    fn prop_put_get_law((name, variation, id, text) in entity_strategy(), value in value_strategy()) {
        let bundle = bundle();
        let lens = bundle.lens_from_prop("id").unwrap();
        let source = entity(&bundle, name, variation, id, text);

        let updated = lens.set(source, value.clone());
        prop_assert_eq!(lens.get(&updated), &value);
    }

    #[test]
    fn prop_put_put_law(
        (name, variation, id, text) in entity_strategy(),
        first in value_strategy(),
        second in value_strategy(),
    ) {
        let bundle = bundle();
        let lens = bundle.lens_from_prop("id").unwrap();
        let source = entity(&bundle, name, variation, id, text);

        let twice = lens.set(lens.set(source.clone(), first), second.clone());
        prop_assert_eq!(twice, lens.set(source, second));
    }

    #[test]
    fn prop_set_preserves_tags((name, variation, id, text) in entity_strategy(), value in value_strategy()) {
        let bundle = bundle();
        let lens = bundle.lens_from_prop("id").unwrap();
        let source = entity(&bundle, name, variation, id, text);

        let updated = lens.set(source.clone(), value);
        prop_assert_eq!(updated.name(), source.name());
        prop_assert_eq!(updated.variation(), source.variation());
        prop_assert!(bundle.is().check(&updated));
    }
}

// =============================================================================
// Scoped and member lenses
// =============================================================================

proptest! {
    #[test]
    fn prop_name_scoped_lens_laws(
        (variation, id, text) in (0..VARIATIONS.len(), any::<i64>(), "[a-z]{0,8}"),
        value in value_strategy(),
    ) {
        let bundle = bundle();
        let lens = bundle.name("Text").unwrap().lens_from_prop("body").unwrap();
        let source = entity(&bundle, 0, variation, id, text);

        let current = lens.get(&source).clone();
        prop_assert_eq!(lens.set(source.clone(), current), source.clone());
        let updated = lens.set(source, value.clone());
        prop_assert_eq!(lens.get(&updated), &value);
    }

    #[test]
    fn prop_member_lens_laws(
        (id, text) in (any::<i64>(), "[a-z]{0,8}"),
        first in value_strategy(),
        second in value_strategy(),
    ) {
        let bundle = bundle();
        let member = bundle.name("Image").unwrap().variation("Failed").unwrap();
        let lens = member.lens_from_prop("id").unwrap();
        let source = entity(&bundle, 1, 2, id, text);

        let current = lens.get(&source).clone();
        prop_assert_eq!(lens.set(source.clone(), current), source.clone());
        let updated = lens.set(source.clone(), first.clone());
        prop_assert_eq!(lens.get(&updated), &first);
        prop_assert_eq!(
            lens.set(lens.set(source.clone(), first), second.clone()),
            lens.set(source, second)
        );
    }
}

// =============================================================================
// Entities outside the lens scope
// =============================================================================

proptest! {
    #[test]
    fn prop_member_lens_keeps_other_members_intact(
        (name, variation, id, text) in entity_strategy(),
        value in value_strategy(),
    ) {
        prop_assume!(!(name == 1 && variation == 2));
        let bundle = bundle();
        let lens = bundle
            .name("Image")
            .unwrap()
            .variation("Failed")
            .unwrap()
            .lens_from_prop("id")
            .unwrap();
        let source = entity(&bundle, name, variation, id, text);

        prop_assert_eq!(lens.set(source.clone(), value.clone()), source.clone());
        prop_assert!(lens.try_set(source, value).is_err());
    }

    #[test]
    fn prop_name_scoped_lens_keeps_other_names_intact(
        (variation, id, text) in (0..VARIATIONS.len(), any::<i64>(), "[a-z]{0,8}"),
        value in value_strategy(),
    ) {
        let bundle = bundle();
        let lens = bundle.name("Text").unwrap().lens_from_prop("id").unwrap();
        let image = entity(&bundle, 1, variation, id, text);

        let result = lens.set(image.clone(), value);
        prop_assert_eq!(result.name(), "Image");
        prop_assert_eq!(result.variation(), VARIATIONS[variation]);
        prop_assert_eq!(result, image);
    }

    #[test]
    fn prop_try_set_agrees_with_set_inside_scope(
        (name, variation, id, text) in entity_strategy(),
        value in value_strategy(),
    ) {
        let bundle = bundle();
        let lens = bundle
            .variation(VARIATIONS[variation])
            .unwrap()
            .lens_from_prop("id")
            .unwrap();
        let source = entity(&bundle, name, variation, id, text);

        let expected = lens.set(source.clone(), value.clone());
        prop_assert_eq!(lens.try_set(source, value), Ok(expected));
    }
}
