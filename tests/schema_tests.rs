//! Unit tests for schema documents and normalization.

use lambars_union::schema::{DEFAULT_VARIATION, normalize};
use lambars_union::{Schema, Shape, UnionBundle, UnionError};
use rstest::rstest;
use serde_json::json;

// =============================================================================
// Schema Documents
// =============================================================================

#[rstest]
fn test_bare_shapes_get_the_default_variation() {
    let schema = Schema::from_json_str(r#"{ "One": ["value"], "Two": "*", "Three": null }"#).unwrap();
    let index = normalize(&schema).unwrap();

    assert_eq!(index.names(), ["One", "Two", "Three"]);
    assert_eq!(index.variations(), [DEFAULT_VARIATION]);
    assert!(index.is_simple());
    assert!(schema.shape("Two", "default").unwrap().is_any());
}

#[rstest]
fn test_document_order_is_preserved() {
    let schema = Schema::from_value(&json!({
        "Zeta": { "Sent": null, "Pending": null },
        "Alpha": { "Pending": null, "Sent": null }
    }))
    .unwrap();
    let index = normalize(&schema).unwrap();

    assert_eq!(index.names(), ["Zeta", "Alpha"]);
    assert_eq!(index.variations(), ["Sent", "Pending"]);
}

#[rstest]
#[case("not json")]
#[case("[1, 2]")]
#[case(r#"{ "One": 3 }"#)]
#[case(r#"{ "One": [1] }"#)]
#[case(r#"{ "One": { "Sent": true } }"#)]
fn test_malformed_documents_are_rejected(#[case] document: &str) {
    assert!(matches!(
        Schema::from_json_str(document),
        Err(UnionError::MalformedSchema(_))
    ));
}

// =============================================================================
// Normalization Failures
// =============================================================================

#[rstest]
fn test_empty_schema_is_rejected() {
    let schema = Schema::from_json_str("{}").unwrap();
    assert_eq!(normalize(&schema), Err(UnionError::EmptySchema));
    assert_eq!(
        UnionBundle::generate(schema).map(|_| ()),
        Err(UnionError::EmptySchema)
    );
}

#[rstest]
fn test_name_without_variations_is_rejected() {
    let schema = Schema::from_value(&json!({ "One": {} })).unwrap();
    assert_eq!(
        normalize(&schema),
        Err(UnionError::NoVariations {
            name: "One".to_string()
        })
    );
}

#[rstest]
fn test_non_rectangular_table_is_rejected() {
    let schema = Schema::from_value(&json!({
        "Text": { "Pending": null, "Sent": null },
        "Image": { "Pending": null, "Failed": null }
    }))
    .unwrap();
    assert_eq!(
        normalize(&schema),
        Err(UnionError::NonRectangular {
            name: "Image".to_string(),
            expected: "Pending, Sent".to_string(),
            found: "Pending, Failed".to_string(),
        })
    );
}

#[rstest]
fn test_duplicate_keys_are_rejected_by_the_builder() {
    assert_eq!(
        Schema::builder()
            .simple("One", Shape::any())
            .simple("One", Shape::any())
            .build(),
        Err(UnionError::DuplicateName("One".to_string()))
    );
    assert!(matches!(
        Schema::builder()
            .varied("One", [("Sent", Shape::any()), ("Sent", Shape::any())])
            .build(),
        Err(UnionError::DuplicateVariation { .. })
    ));
}

#[rstest]
fn test_label_may_be_both_name_and_variation() {
    let bundle = UnionBundle::generate(
        Schema::from_value(&json!({
            "Pending": { "Pending": null, "Done": null },
            "Other": { "Pending": null, "Done": null }
        }))
        .unwrap(),
    )
    .unwrap();

    let name = bundle.name("Pending").unwrap();
    let variation = bundle.variation("Pending").unwrap();
    let entity = bundle
        .of()
        .make("Other", "Pending", lambars_union::Payload::new())
        .unwrap();

    assert!(!name.is().check(&entity));
    assert!(variation.is().check(&entity));
}
