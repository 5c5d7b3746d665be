//! The unwrapped counterpart of an entity.

use serde_json::Value;

use crate::entity::Payload;
use crate::schema::{Name, Variation};

/// Property carrying the name tag in the plain form of a tagged value.
pub const TAG_KEY: &str = "_tag";

/// Property carrying the variation tag in the plain form of a tagged value.
pub const VARIATION_KEY: &str = "_variation";

/// An entity's payload fields together with its `_tag` and `_variation`.
///
/// Produced by [`UnionIso`](super::UnionIso) and turned back into an entity
/// by the same iso. The tags cannot be edited; the fields can.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaggedValue {
    tag: Name,
    variation: Variation,
    fields: Payload,
}

impl TaggedValue {
    pub(crate) const fn new(tag: Name, variation: Variation, fields: Payload) -> Self {
        Self {
            tag,
            variation,
            fields,
        }
    }

    /// The `_tag` discriminator.
    #[must_use]
    pub const fn tag(&self) -> &Name {
        &self.tag
    }

    /// The `_variation` discriminator.
    #[must_use]
    pub const fn variation(&self) -> &Variation {
        &self.variation
    }

    /// The payload fields.
    #[must_use]
    pub const fn fields(&self) -> &Payload {
        &self.fields
    }

    /// The value of a payload field.
    #[must_use]
    pub fn get(&self, property: &str) -> Option<&Value> {
        self.fields.get(property)
    }

    /// Returns a tagged value with `property` set to `value`.
    #[must_use]
    pub fn with(self, property: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            fields: self.fields.with(property, value),
            ..self
        }
    }

    pub(crate) fn into_parts(self) -> (Name, Variation, Payload) {
        (self.tag, self.variation, self.fields)
    }

    /// The plain JSON form: payload fields spread alongside `_tag` and
    /// `_variation`.
    ///
    /// The discriminators win if the payload has fields of the same name, and
    /// [`UnionIso::parse`](super::UnionIso::parse) drops them, so such fields do
    /// not survive the plain form. [`UnionIso::tagged`](super::UnionIso::tagged)
    /// refuses them.
    #[must_use]
    pub fn into_value(self) -> Value {
        let mut object = self.fields.into_map();
        object.insert(TAG_KEY.to_string(), Value::String(self.tag.to_string()));
        object.insert(
            VARIATION_KEY.to_string(),
            Value::String(self.variation.to_string()),
        );
        Value::Object(object)
    }
}
