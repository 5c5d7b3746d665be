//! Isomorphisms between entities and their unwrapped forms.
//!
//! # Laws
//!
//! Every Iso must satisfy two laws:
//!
//! 1. **`GetReverseGet` Law**: Converting forward then backward yields the original.
//!    ```text
//!    iso.reverse_get(iso.get(source)) == source
//!    ```
//!
//! 2. **`ReverseGetGet` Law**: Converting backward then forward yields the original.
//!    ```text
//!    iso.get(iso.reverse_get(value)) == value
//!    ```
//!
//! Two isomorphisms are generated for a bundle:
//!
//! - [`UnionIso`] (global, per name, per variation): [`Entity`] ⇄ [`TaggedValue`].
//! - [`MemberIso`] (per (name, variation)): [`Entity`] ⇄ [`Payload`]. Both tags
//!   are pinned by the scope, so the bare payload is enough to rebuild the entity.

use std::sync::Arc;

use serde_json::Value;

use super::lens::PropLens;
use super::tagged::{TaggedValue, TAG_KEY, VARIATION_KEY};
use crate::entity::{Entity, Payload};
use crate::error::UnionError;
use crate::schema::{Name, Variation};
use crate::table::{Scope, Table};

/// An Iso represents a lossless, bidirectional conversion between two types.
///
/// # Type Parameters
///
/// - `S`: The source type
/// - `A`: The target type
///
/// # Laws
///
/// 1. **`GetReverseGet` Law**: `iso.reverse_get(iso.get(source)) == source`
/// 2. **`ReverseGetGet` Law**: `iso.get(iso.reverse_get(value)) == value`
pub trait Iso<S, A> {
    /// Converts from the source type to the target type.
    fn get(&self, source: S) -> A;

    /// Converts from the target type back to the source type.
    fn reverse_get(&self, value: A) -> S;

    /// Applies a function to the converted value and converts back.
    ///
    /// This is equivalent to: `iso.reverse_get(function(iso.get(source)))`
    fn modify<F>(&self, source: S, function: F) -> S
    where
        F: FnOnce(A) -> A,
    {
        let converted = self.get(source);
        self.reverse_get(function(converted))
    }
}

fn outside(entity: &Entity, scope: String) -> UnionError {
    UnionError::OutsideScope {
        name: entity.name().to_string(),
        variation: entity.variation().to_string(),
        scope,
    }
}

/// Entity ⇄ [`TaggedValue`], for the whole union or a name/variation slice.
///
/// The scope does not change the conversion itself. It bounds which tagged
/// values [`UnionIso::tagged`] and [`UnionIso::parse`] accept, and which
/// payload shapes [`UnionIso::lens_from_prop`] checks.
///
/// # Examples
///
/// ```
/// use lambars_union::optics::Iso;
/// use lambars_union::{Payload, Schema, Shape, UnionBundle};
/// use serde_json::json;
///
/// let bundle = UnionBundle::generate(
///     Schema::builder()
///         .varied("Text", [("Pending", Shape::any()), ("Sent", Shape::any())])
///         .build()
///         .unwrap(),
/// )
/// .unwrap();
///
/// let entity = bundle.of().make("Text", "Sent", Payload::new().with("body", "hi")).unwrap();
/// let tagged = bundle.iso().get(entity.clone());
/// assert_eq!(
///     tagged.clone().into_value(),
///     json!({ "_tag": "Text", "_variation": "Sent", "body": "hi" })
/// );
/// assert_eq!(bundle.iso().reverse_get(tagged), entity);
/// ```
#[derive(Debug, Clone)]
pub struct UnionIso {
    table: Arc<Table>,
    scope: Scope,
}

impl UnionIso {
    pub(crate) const fn new(table: Arc<Table>, scope: Scope) -> Self {
        Self { table, scope }
    }

    /// Builds a tagged value, checking the tags against the schema and scope.
    ///
    /// # Errors
    ///
    /// [`UnionError::UnknownName`] or [`UnionError::UnknownVariation`] for
    /// tags outside the schema, [`UnionError::MalformedTaggedValue`] for tags
    /// outside this iso's scope or for fields named `_tag` or `_variation`.
    pub fn tagged(
        &self,
        name: &str,
        variation: &str,
        fields: Payload,
    ) -> Result<TaggedValue, UnionError> {
        let name = self.table.resolve_name(name)?;
        let variation = self.table.resolve_variation(variation)?;
        if let Some(reserved) = [TAG_KEY, VARIATION_KEY]
            .into_iter()
            .find(|key| fields.contains(key))
        {
            return Err(UnionError::MalformedTaggedValue(format!(
                "payload field `{reserved}` collides with a discriminator"
            )));
        }
        if !self.scope.pins(name.as_str(), variation.as_str()) {
            return Err(UnionError::MalformedTaggedValue(format!(
                "`{name}`/`{variation}` lies outside `{}`",
                self.scope
            )));
        }
        Ok(TaggedValue::new(name, variation, fields))
    }

    /// Reads the plain JSON form of a tagged value: an object carrying string
    /// `_tag` and `_variation` properties next to the payload's properties.
    ///
    /// # Errors
    ///
    /// [`UnionError::MalformedTaggedValue`] if `value` is not such an object,
    /// plus the errors of [`UnionIso::tagged`].
    pub fn parse(&self, value: &Value) -> Result<TaggedValue, UnionError> {
        let Value::Object(object) = value else {
            return Err(UnionError::MalformedTaggedValue(format!(
                "expected an object, got {value}"
            )));
        };
        let discriminator = |key: &str| {
            object.get(key).and_then(Value::as_str).ok_or_else(|| {
                UnionError::MalformedTaggedValue(format!("missing string `{key}`"))
            })
        };
        let name = discriminator(TAG_KEY)?;
        let variation = discriminator(VARIATION_KEY)?;
        let fields = object
            .iter()
            .filter(|(key, _)| key.as_str() != TAG_KEY && key.as_str() != VARIATION_KEY)
            .map(|(key, field)| (key.clone(), field.clone()))
            .collect();
        self.tagged(name, variation, fields)
    }

    /// Checks that `entity` lies inside this iso's scope.
    pub(crate) fn admit(&self, entity: &Entity) -> Result<(), UnionError> {
        let name = entity.name().as_str();
        let variation = entity.variation().as_str();
        if self.scope.pins(name, variation) {
            Ok(())
        } else {
            Err(outside(entity, self.scope.to_string()))
        }
    }

    /// A lens on `property` of every entity in this iso's scope.
    ///
    /// # Errors
    ///
    /// [`UnionError::MissingProperty`] if some payload shape in scope does
    /// not declare `property`.
    pub fn lens_from_prop(&self, property: &str) -> Result<PropLens<Self>, UnionError> {
        self.table.require_property(&self.scope, property)?;
        Ok(PropLens::new(property, self.clone()))
    }
}

impl Iso<Entity, TaggedValue> for UnionIso {
    fn get(&self, source: Entity) -> TaggedValue {
        let (name, variation, payload) = source.into_parts();
        TaggedValue::new(name, variation, payload)
    }

    fn reverse_get(&self, value: TaggedValue) -> Entity {
        let (name, variation, fields) = value.into_parts();
        Entity::new(name, variation, fields)
    }
}

/// Entity ⇄ bare [`Payload`] for one (name, variation) member.
///
/// `get` does not look at the entity's tags: it is meant for entities already
/// narrowed to this member. `reverse_get` always tags with this member, so
/// `get` followed by `reverse_get` re-tags an entity of another member.
/// Property lenses built from this iso check the tags first.
///
/// # Examples
///
/// ```
/// use lambars_union::optics::Iso;
/// use lambars_union::{Payload, Schema, Shape, UnionBundle};
///
/// let bundle = UnionBundle::generate(
///     Schema::builder().simple("One", Shape::fields(["value"])).build().unwrap(),
/// )
/// .unwrap();
///
/// let iso = bundle.name("One").unwrap().variation("default").unwrap().iso();
/// let entity = iso.reverse_get(Payload::new().with("value", "one"));
/// assert_eq!(entity.name(), "One");
/// assert_eq!(iso.get(entity), Payload::new().with("value", "one"));
/// ```
#[derive(Debug, Clone)]
pub struct MemberIso {
    table: Arc<Table>,
    name: Name,
    variation: Variation,
}

impl MemberIso {
    pub(crate) const fn new(table: Arc<Table>, name: Name, variation: Variation) -> Self {
        Self {
            table,
            name,
            variation,
        }
    }

    /// Checks that `entity` is this member.
    pub(crate) fn admit(&self, entity: &Entity) -> Result<(), UnionError> {
        if *entity.name() == self.name && *entity.variation() == self.variation {
            Ok(())
        } else {
            Err(outside(entity, format!("{}/{}", self.name, self.variation)))
        }
    }

    /// A lens on `property` of this member's payload.
    ///
    /// # Errors
    ///
    /// [`UnionError::MissingProperty`] if the member's shape does not declare
    /// `property`.
    pub fn lens_from_prop(&self, property: &str) -> Result<PropLens<Self>, UnionError> {
        let scope = Scope::member(self.name.clone(), self.variation.clone());
        self.table.require_property(&scope, property)?;
        Ok(PropLens::new(property, self.clone()))
    }
}

impl Iso<Entity, Payload> for MemberIso {
    fn get(&self, source: Entity) -> Payload {
        source.into_payload()
    }

    fn reverse_get(&self, value: Payload) -> Entity {
        Entity::new(self.name.clone(), self.variation.clone(), value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constructor::Constructors;
    use crate::schema::{Schema, Shape};
    use rstest::rstest;
    use serde_json::json;

    fn table() -> Arc<Table> {
        Table::generate(
            Schema::builder()
                .varied(
                    "Text",
                    [
                        ("Pending", Shape::fields(["body"])),
                        ("Sent", Shape::fields(["body", "sent_at"])),
                    ],
                )
                .varied(
                    "Image",
                    [
                        ("Pending", Shape::fields(["url"])),
                        ("Sent", Shape::fields(["url", "sent_at"])),
                    ],
                )
                .build()
                .unwrap(),
        )
        .unwrap()
    }

    #[rstest]
    fn test_union_iso_round_trips_entities() {
        let table = table();
        let iso = UnionIso::new(Arc::clone(&table), Scope::everything());
        let entity = Constructors::new(table)
            .make("Image", "Sent", Payload::new().with("url", "a.png").with("sent_at", 7))
            .unwrap();

        let tagged = iso.get(entity.clone());
        assert_eq!(tagged.tag(), "Image");
        assert_eq!(tagged.variation(), "Sent");
        assert_eq!(tagged.get("url"), Some(&json!("a.png")));
        assert_eq!(iso.reverse_get(tagged), entity);
    }

    #[rstest]
    fn test_union_iso_modify_rewrites_fields() {
        let table = table();
        let iso = UnionIso::new(Arc::clone(&table), Scope::everything());
        let entity = Constructors::new(table)
            .make("Text", "Pending", Payload::new().with("body", "hi"))
            .unwrap();

        let shouted = iso.modify(entity, |tagged| tagged.with("body", "HI"));
        assert_eq!(shouted.payload().get("body"), Some(&json!("HI")));
        assert_eq!(shouted.name(), "Text");
    }

    #[rstest]
    fn test_parse_reads_plain_tagged_values() {
        let iso = UnionIso::new(table(), Scope::everything());
        let tagged = iso
            .parse(&json!({ "_tag": "Text", "_variation": "Sent", "body": "hi", "sent_at": 3 }))
            .unwrap();
        assert_eq!(tagged.tag(), "Text");
        assert_eq!(tagged.fields(), &Payload::new().with("body", "hi").with("sent_at", 3));
    }

    #[rstest]
    #[case(json!(1))]
    #[case(json!({ "_variation": "Sent" }))]
    #[case(json!({ "_tag": 4, "_variation": "Sent" }))]
    fn test_parse_rejects_malformed_values(#[case] value: Value) {
        let iso = UnionIso::new(table(), Scope::everything());
        assert!(matches!(
            iso.parse(&value),
            Err(UnionError::MalformedTaggedValue(_))
        ));
    }

    #[rstest]
    fn test_tagged_respects_scope() {
        let scope = Scope::everything().with_name(Name::from("Text"));
        let iso = UnionIso::new(table(), scope);
        assert!(iso.tagged("Text", "Sent", Payload::new()).is_ok());
        assert!(matches!(
            iso.tagged("Image", "Sent", Payload::new()),
            Err(UnionError::MalformedTaggedValue(_))
        ));
        assert_eq!(
            iso.tagged("Audio", "Sent", Payload::new()),
            Err(UnionError::UnknownName("Audio".to_string()))
        );
    }

    #[rstest]
    #[case("_tag")]
    #[case("_variation")]
    fn test_tagged_rejects_discriminator_fields(#[case] field: &str) {
        let iso = UnionIso::new(table(), Scope::everything());
        assert!(matches!(
            iso.tagged("Text", "Sent", Payload::new().with(field, "x")),
            Err(UnionError::MalformedTaggedValue(_))
        ));
    }

    #[rstest]
    fn test_plain_form_drops_discriminator_fields() {
        let table = table();
        let iso = UnionIso::new(Arc::clone(&table), Scope::everything());
        let entity = Constructors::new(table)
            .make("Text", "Sent", Payload::new().with("_tag", "x").with("body", "hi"))
            .unwrap();

        let plain = iso.get(entity).into_value();
        assert_eq!(plain["_tag"], json!("Text"));
        let reparsed = iso.parse(&plain).unwrap();
        assert_eq!(reparsed.fields(), &Payload::new().with("body", "hi"));
    }

    #[rstest]
    fn test_admit_follows_scope() {
        let table = table();
        let of = Constructors::new(Arc::clone(&table));
        let image = of.make("Image", "Pending", Payload::new()).unwrap();
        let text = of.make("Text", "Sent", Payload::new()).unwrap();

        let by_name = UnionIso::new(
            Arc::clone(&table),
            Scope::everything().with_name(Name::from("Text")),
        );
        assert_eq!(by_name.admit(&text), Ok(()));
        assert_eq!(
            by_name.admit(&image),
            Err(UnionError::OutsideScope {
                name: "Image".to_string(),
                variation: "Pending".to_string(),
                scope: "Text".to_string(),
            })
        );

        let member = MemberIso::new(table, Name::from("Text"), Variation::from("Sent"));
        assert_eq!(member.admit(&text), Ok(()));
        assert!(member.admit(&image).is_err());
    }

    #[rstest]
    fn test_member_iso_pins_both_tags() {
        let iso = MemberIso::new(table(), Name::from("Text"), Variation::from("Sent"));
        let entity = iso.reverse_get(Payload::new().with("body", "hi"));
        assert_eq!(entity.name(), "Text");
        assert_eq!(entity.variation(), "Sent");
        assert_eq!(iso.get(entity), Payload::new().with("body", "hi"));
    }

    #[rstest]
    fn test_lens_from_prop_checks_every_shape_in_scope() {
        let table = table();
        let everything = UnionIso::new(Arc::clone(&table), Scope::everything());
        let sent = UnionIso::new(
            Arc::clone(&table),
            Scope::everything().with_variation(Variation::from("Sent")),
        );

        assert!(matches!(
            everything.lens_from_prop("sent_at"),
            Err(UnionError::MissingProperty { name, variation, .. })
                if name == "Text" && variation == "Pending"
        ));
        assert!(sent.lens_from_prop("sent_at").is_ok());

        let member = MemberIso::new(table, Name::from("Image"), Variation::from("Pending"));
        assert!(member.lens_from_prop("url").is_ok());
        assert!(member.lens_from_prop("body").is_err());
    }
}
