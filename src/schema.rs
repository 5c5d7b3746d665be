//! Schema description and normalization.
//!
//! A [`Schema`] is a two-dimensional table: every [`Name`] maps to a table of
//! [`Variation`]s, and every (name, variation) cell holds a [`Shape`], the
//! placeholder for the payload type of that member. The table must be
//! rectangular: every name declares the same variation keys.
//!
//! [`normalize`] checks the table and derives the two ordered index sets
//! everything else is generated from.
//!
//! # Examples
//!
//! ```
//! use lambars_union::schema::{normalize, Schema, Shape};
//!
//! let schema = Schema::builder()
//!     .varied("Text", [("Pending", Shape::fields(["body"])), ("Sent", Shape::fields(["body"]))])
//!     .varied("Image", [("Pending", Shape::fields(["url"])), ("Sent", Shape::fields(["url"]))])
//!     .build()
//!     .unwrap();
//!
//! let index = normalize(&schema).unwrap();
//! assert_eq!(index.names(), ["Text", "Image"]);
//! assert_eq!(index.variations(), ["Pending", "Sent"]);
//! ```

use std::borrow::Borrow;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;
use smallvec::SmallVec;

use crate::error::UnionError;

/// The variation every name carries when a schema declares bare shapes.
pub const DEFAULT_VARIATION: &str = "default";

macro_rules! label {
    ($(#[$meta:meta])* $label:ident) => {
        $(#[$meta])*
        #[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $label(Arc<str>);

        impl $label {
            /// Creates a label from any string-like value.
            #[must_use]
            pub fn new(label: impl AsRef<str>) -> Self {
                Self(Arc::from(label.as_ref()))
            }

            /// Returns the label as a string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Debug for $label {
            fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(formatter, "{:?}", &*self.0)
            }
        }

        impl fmt::Display for $label {
            fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
                formatter.write_str(&self.0)
            }
        }

        impl From<&str> for $label {
            fn from(label: &str) -> Self {
                Self::new(label)
            }
        }

        impl From<String> for $label {
            fn from(label: String) -> Self {
                Self(Arc::from(label))
            }
        }

        impl AsRef<str> for $label {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl Borrow<str> for $label {
            fn borrow(&self) -> &str {
                &self.0
            }
        }

        impl PartialEq<str> for $label {
            fn eq(&self, other: &str) -> bool {
                &*self.0 == other
            }
        }

        impl PartialEq<&str> for $label {
            fn eq(&self, other: &&str) -> bool {
                &*self.0 == *other
            }
        }
    };
}

label!(
    /// The primary discriminator of a union member, e.g. `Text` or `Image`.
    Name
);

label!(
    /// A secondary discriminator applied uniformly across all names,
    /// e.g. `Pending` or `Sent`.
    Variation
);

impl Variation {
    /// The implicit variation of schemas built from bare shapes.
    ///
    /// ```
    /// use lambars_union::schema::Variation;
    ///
    /// assert_eq!(Variation::default_variation(), "default");
    /// ```
    #[must_use]
    pub fn default_variation() -> Self {
        Self::new(DEFAULT_VARIATION)
    }
}

/// Placeholder for the payload type of one (name, variation) member.
///
/// Shapes never validate payloads. They only record which properties the
/// payload type declares, so that property lenses can be refused up front
/// when some member in scope lacks the property.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Shape {
    fields: Option<SmallVec<[Arc<str>; 4]>>,
}

impl Shape {
    /// An unspecified payload type. Every property is assumed present.
    #[must_use]
    pub const fn any() -> Self {
        Self { fields: None }
    }

    /// A payload type declaring exactly the given properties.
    #[must_use]
    pub fn fields<I, K>(fields: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: AsRef<str>,
    {
        Self {
            fields: Some(
                fields
                    .into_iter()
                    .map(|field| Arc::from(field.as_ref()))
                    .collect(),
            ),
        }
    }

    /// Returns `true` if the payload type is unspecified.
    #[must_use]
    pub const fn is_any(&self) -> bool {
        self.fields.is_none()
    }

    /// Returns `true` if the payload type declares `property`.
    #[must_use]
    pub fn declares(&self, property: &str) -> bool {
        self.fields
            .as_ref()
            .is_none_or(|fields| fields.iter().any(|field| &**field == property))
    }

    /// The declared properties, or `None` for [`Shape::any`].
    pub fn declared(&self) -> Option<impl Iterator<Item = &str>> {
        self.fields
            .as_ref()
            .map(|fields| fields.iter().map(|field| &**field))
    }

    fn from_placeholder(placeholder: &Value) -> Result<Self, UnionError> {
        match placeholder {
            Value::Null => Ok(Self::any()),
            Value::String(wildcard) if wildcard == "*" => Ok(Self::any()),
            Value::Array(fields) => fields
                .iter()
                .map(|field| {
                    field.as_str().ok_or_else(|| {
                        UnionError::MalformedSchema(format!(
                            "property names must be strings, got {field}"
                        ))
                    })
                })
                .collect::<Result<Vec<_>, _>>()
                .map(Self::fields),
            other => Err(UnionError::MalformedSchema(format!(
                "expected null, \"*\" or an array of property names, got {other}"
            ))),
        }
    }
}

/// One row of a [`Schema`]: a name and its variation table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaEntry {
    name: Name,
    variations: Vec<(Variation, Shape)>,
}

impl SchemaEntry {
    /// The row's name.
    #[must_use]
    pub const fn name(&self) -> &Name {
        &self.name
    }

    /// The row's variation table, in declaration order.
    #[must_use]
    pub fn variations(&self) -> &[(Variation, Shape)] {
        &self.variations
    }

    /// The shape declared for `variation`, if any.
    #[must_use]
    pub fn shape(&self, variation: &str) -> Option<&Shape> {
        self.variations
            .iter()
            .find(|(candidate, _)| candidate == variation)
            .map(|(_, shape)| shape)
    }
}

/// An insertion-ordered name × variation table of payload shapes.
///
/// A `Schema` is raw input: [`SchemaBuilder::build`] rejects duplicate keys,
/// but rectangularity is only checked by [`normalize`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    entries: Vec<SchemaEntry>,
}

impl Schema {
    /// Starts an empty [`SchemaBuilder`].
    #[must_use]
    pub fn builder() -> SchemaBuilder {
        SchemaBuilder::default()
    }

    pub(crate) const fn from_entries(entries: Vec<SchemaEntry>) -> Self {
        Self { entries }
    }

    /// Reads a schema document.
    ///
    /// The document is an object from name to either a shape placeholder
    /// (the name gets the single `default` variation) or an object from
    /// variation to shape placeholder. A placeholder is `null` or `"*"` for an
    /// unspecified payload type, or an array of property names.
    ///
    /// # Errors
    ///
    /// [`UnionError::MalformedSchema`] if the document has any other shape.
    ///
    /// # Examples
    ///
    /// ```
    /// use lambars_union::schema::Schema;
    /// use serde_json::json;
    ///
    /// let schema = Schema::from_value(&json!({
    ///     "Text": { "Pending": ["body"], "Sent": ["body", "sent_at"] },
    ///     "Image": { "Pending": ["url"], "Sent": "*" },
    /// }))
    /// .unwrap();
    /// assert_eq!(schema.len(), 2);
    /// assert!(schema.shape("Text", "Sent").unwrap().declares("sent_at"));
    /// ```
    pub fn from_value(document: &Value) -> Result<Self, UnionError> {
        let Value::Object(names) = document else {
            return Err(UnionError::MalformedSchema(format!(
                "expected an object of names, got {document}"
            )));
        };
        let mut builder = Self::builder();
        for (name, declaration) in names {
            builder = match declaration {
                Value::Object(variations) => {
                    let variations = variations
                        .iter()
                        .map(|(variation, placeholder)| {
                            Shape::from_placeholder(placeholder)
                                .map(|shape| (Variation::new(variation), shape))
                        })
                        .collect::<Result<Vec<_>, _>>()?;
                    builder.varied(name.as_str(), variations)
                }
                placeholder => builder.simple(name.as_str(), Shape::from_placeholder(placeholder)?),
            };
        }
        builder.build()
    }

    /// Parses and reads a schema document from JSON text.
    ///
    /// # Errors
    ///
    /// [`UnionError::MalformedSchema`] if the text is not JSON or the document
    /// is malformed (see [`Schema::from_value`]).
    pub fn from_json_str(document: &str) -> Result<Self, UnionError> {
        let document: Value = serde_json::from_str(document)
            .map_err(|error| UnionError::MalformedSchema(error.to_string()))?;
        Self::from_value(&document)
    }

    /// The rows, in declaration order.
    #[must_use]
    pub fn entries(&self) -> &[SchemaEntry] {
        &self.entries
    }

    /// The names, in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &Name> {
        self.entries.iter().map(SchemaEntry::name)
    }

    /// Number of names.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the schema declares no names.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns `true` if `name` is declared.
    #[must_use]
    pub fn contains_name(&self, name: &str) -> bool {
        self.entry(name).is_some()
    }

    /// The row for `name`, if declared.
    #[must_use]
    pub fn entry(&self, name: &str) -> Option<&SchemaEntry> {
        self.entries.iter().find(|entry| entry.name == name)
    }

    /// The shape declared for (`name`, `variation`), if any.
    #[must_use]
    pub fn shape(&self, name: &str, variation: &str) -> Option<&Shape> {
        self.entry(name).and_then(|entry| entry.shape(variation))
    }

    pub(crate) fn retain_names<P>(&self, mut keep: P) -> Self
    where
        P: FnMut(&Name) -> bool,
    {
        Self::from_entries(
            self.entries
                .iter()
                .filter(|entry| keep(&entry.name))
                .cloned()
                .collect(),
        )
    }

    pub(crate) fn retain_variations<P>(&self, mut keep: P) -> Self
    where
        P: FnMut(&Variation) -> bool,
    {
        Self::from_entries(
            self.entries
                .iter()
                .map(|entry| SchemaEntry {
                    name: entry.name.clone(),
                    variations: entry
                        .variations
                        .iter()
                        .filter(|(variation, _)| keep(variation))
                        .cloned()
                        .collect(),
                })
                .collect(),
        )
    }

    /// Rows of `other` replace same-named rows in place; new rows are appended.
    pub(crate) fn merged(&self, other: &Self) -> Self {
        let mut entries: Vec<SchemaEntry> = self
            .entries
            .iter()
            .map(|entry| other.entry(entry.name.as_str()).unwrap_or(entry).clone())
            .collect();
        entries.extend(
            other
                .entries
                .iter()
                .filter(|entry| !self.contains_name(entry.name.as_str()))
                .cloned(),
        );
        Self::from_entries(entries)
    }
}

/// Builds a [`Schema`] row by row.
#[derive(Debug, Default)]
pub struct SchemaBuilder {
    entries: Vec<SchemaEntry>,
}

impl SchemaBuilder {
    /// Declares a name with the single `default` variation.
    #[must_use]
    pub fn simple(self, name: impl Into<Name>, shape: Shape) -> Self {
        self.varied(name, [(Variation::default_variation(), shape)])
    }

    /// Declares a name with an explicit variation table.
    #[must_use]
    pub fn varied<I, V>(mut self, name: impl Into<Name>, variations: I) -> Self
    where
        I: IntoIterator<Item = (V, Shape)>,
        V: Into<Variation>,
    {
        self.entries.push(SchemaEntry {
            name: name.into(),
            variations: variations
                .into_iter()
                .map(|(variation, shape)| (variation.into(), shape))
                .collect(),
        });
        self
    }

    /// Finishes the schema.
    ///
    /// # Errors
    ///
    /// [`UnionError::DuplicateName`] or [`UnionError::DuplicateVariation`] for
    /// the first repeated key.
    pub fn build(self) -> Result<Schema, UnionError> {
        for (position, entry) in self.entries.iter().enumerate() {
            if self.entries[..position]
                .iter()
                .any(|earlier| earlier.name == entry.name)
            {
                return Err(UnionError::DuplicateName(entry.name.to_string()));
            }
            for (inner, (variation, _)) in entry.variations.iter().enumerate() {
                if entry.variations[..inner]
                    .iter()
                    .any(|(earlier, _)| earlier == variation)
                {
                    return Err(UnionError::DuplicateVariation {
                        name: entry.name.to_string(),
                        variation: variation.to_string(),
                    });
                }
            }
        }
        Ok(Schema::from_entries(self.entries))
    }
}

/// The ordered index sets derived from a rectangular [`Schema`].
///
/// Order matters only for iteration; every accessor is keyed by value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexSets {
    names: SmallVec<[Name; 8]>,
    variations: SmallVec<[Variation; 4]>,
}

impl IndexSets {
    /// Names, in schema order.
    #[must_use]
    pub fn names(&self) -> &[Name] {
        &self.names
    }

    /// Variations, in the first name's declaration order.
    #[must_use]
    pub fn variations(&self) -> &[Variation] {
        &self.variations
    }

    /// Position of `name` in [`IndexSets::names`].
    #[must_use]
    pub fn name_position(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|candidate| candidate == name)
    }

    /// Position of `variation` in [`IndexSets::variations`].
    #[must_use]
    pub fn variation_position(&self, variation: &str) -> Option<usize> {
        self.variations
            .iter()
            .position(|candidate| candidate == variation)
    }

    /// Returns `true` if the only variation is [`DEFAULT_VARIATION`].
    #[must_use]
    pub fn is_simple(&self) -> bool {
        self.variations.len() == 1 && self.variations[0] == DEFAULT_VARIATION
    }
}

fn joined(variations: &[(Variation, Shape)]) -> String {
    variations
        .iter()
        .map(|(variation, _)| variation.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Checks that `schema` is non-empty and rectangular and derives its index sets.
///
/// # Errors
///
/// - [`UnionError::EmptySchema`] if no name is declared.
/// - [`UnionError::NoVariations`] if a name has an empty variation table.
/// - [`UnionError::NonRectangular`] if a name's variation keys differ from the
///   first name's.
pub fn normalize(schema: &Schema) -> Result<IndexSets, UnionError> {
    let first = schema.entries.first().ok_or(UnionError::EmptySchema)?;
    let variations: SmallVec<[Variation; 4]> = first
        .variations
        .iter()
        .map(|(variation, _)| variation.clone())
        .collect();

    for entry in &schema.entries {
        if entry.variations.is_empty() {
            return Err(UnionError::NoVariations {
                name: entry.name.to_string(),
            });
        }
        let rectangular = entry.variations.len() == variations.len()
            && variations
                .iter()
                .all(|variation| entry.shape(variation.as_str()).is_some());
        if !rectangular {
            return Err(UnionError::NonRectangular {
                name: entry.name.to_string(),
                expected: joined(&first.variations),
                found: joined(&entry.variations),
            });
        }
    }

    Ok(IndexSets {
        names: schema.names().cloned().collect(),
        variations,
    })
}
