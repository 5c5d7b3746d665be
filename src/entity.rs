//! The opaque representation of union members.
//!
//! An [`Entity`] carries a name tag, a variation tag and a [`Payload`]. Its
//! fields are private and it has no public constructor: values only come out
//! of a bundle's constructors and isomorphisms, so the tags of every entity
//! are members of the index sets of the bundle that built it.
//!
//! ```compile_fail
//! use lambars_union::{Entity, Name, Payload, Variation};
//!
//! // Entities cannot be assembled outside the crate.
//! let forged = Entity::new(Name::from("Text"), Variation::from("default"), Payload::new());
//! ```

use serde_json::{Map, Value};

use crate::error::UnionError;
use crate::schema::{Name, Variation};

/// Key of the fixed marker in the wire shape of an entity.
pub const MARKER_KEY: &str = "marker";

/// The fixed marker value identifying the wire shape of an entity.
///
/// A JSON object is recognized by guards as an entity when it carries
/// `MARKER_KEY: MARKER` together with string `name` and `variation` fields.
pub const MARKER: &str = "lambars-union/opaque";

/// The record carried by an entity.
///
/// The engine never inspects a payload except through property lenses.
/// Field order is insertion order.
///
/// # Examples
///
/// ```
/// use lambars_union::Payload;
/// use serde_json::json;
///
/// let payload = Payload::new().with("body", "hello").with("length", 5);
/// assert_eq!(payload.get("body"), Some(&json!("hello")));
///
/// let same = Payload::try_from(json!({ "body": "hello", "length": 5 })).unwrap();
/// assert_eq!(payload, same);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Payload(Map<String, Value>);

impl Payload {
    /// Creates an empty payload.
    #[must_use]
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// The value of `property`, if present.
    #[must_use]
    pub fn get(&self, property: &str) -> Option<&Value> {
        self.0.get(property)
    }

    /// Returns a payload with `property` set to `value`.
    ///
    /// An existing property keeps its position.
    #[must_use]
    pub fn with(mut self, property: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(property.into(), value.into());
        self
    }

    /// Returns `true` if `property` is present.
    #[must_use]
    pub fn contains(&self, property: &str) -> bool {
        self.0.contains_key(property)
    }

    /// Number of properties.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the payload has no properties.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over the properties in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    /// Borrows the underlying JSON map.
    #[must_use]
    pub const fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Unwraps the underlying JSON map.
    #[must_use]
    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }
}

impl From<Map<String, Value>> for Payload {
    fn from(fields: Map<String, Value>) -> Self {
        Self(fields)
    }
}

impl TryFrom<Value> for Payload {
    type Error = UnionError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(fields) => Ok(Self(fields)),
            other => Err(UnionError::NotARecord(other.to_string())),
        }
    }
}

impl From<Payload> for Value {
    fn from(payload: Payload) -> Self {
        Self::Object(payload.0)
    }
}

impl<K, V> FromIterator<(K, V)> for Payload
where
    K: Into<String>,
    V: Into<Value>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iterator: I) -> Self {
        Self(
            iterator
                .into_iter()
                .map(|(property, value)| (property.into(), value.into()))
                .collect(),
        )
    }
}

/// A member of a union: a name tag, a variation tag and an opaque payload.
///
/// Entities are never mutated in place; every transform builds a new one.
/// Equality is structural equality of the triple.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entity {
    name: Name,
    variation: Variation,
    payload: Payload,
}

impl Entity {
    pub(crate) const fn new(name: Name, variation: Variation, payload: Payload) -> Self {
        Self {
            name,
            variation,
            payload,
        }
    }

    /// The fixed marker shared by every entity.
    #[must_use]
    pub const fn marker() -> &'static str {
        MARKER
    }

    /// The name tag.
    #[must_use]
    pub const fn name(&self) -> &Name {
        &self.name
    }

    /// The variation tag.
    #[must_use]
    pub const fn variation(&self) -> &Variation {
        &self.variation
    }

    /// Borrows the payload.
    #[must_use]
    pub const fn payload(&self) -> &Payload {
        &self.payload
    }

    /// Consumes the entity, returning its payload.
    #[must_use]
    pub fn into_payload(self) -> Payload {
        self.payload
    }

    /// Consumes the entity, returning the triple.
    #[must_use]
    pub fn into_parts(self) -> (Name, Variation, Payload) {
        (self.name, self.variation, self.payload)
    }
}
