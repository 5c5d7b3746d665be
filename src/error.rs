//! Error type shared by every generated component.
//!
//! Guards never fail: a value that is not a member of the union is reported
//! as `false`. Everything else that can go wrong is a programming error on the
//! caller's side (a malformed schema, an unknown tag, a handler map that is
//! not exhaustive) and is reported as a [`UnionError`].

use thiserror::Error;

/// Errors produced while generating or using a union bundle.
///
/// # Examples
///
/// ```rust
/// use lambars_union::UnionError;
///
/// let error = UnionError::UnknownName("Audio".to_string());
/// assert_eq!(error.to_string(), "unknown name `Audio`");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UnionError {
    /// The schema declares no names at all.
    #[error("schema declares no names")]
    EmptySchema,

    /// A name declares an empty variation table.
    #[error("name `{name}` declares no variations")]
    NoVariations {
        /// The offending name.
        name: String,
    },

    /// The same name was declared twice.
    #[error("name `{0}` is declared more than once")]
    DuplicateName(String),

    /// The same variation was declared twice under one name.
    #[error("variation `{variation}` is declared more than once for name `{name}`")]
    DuplicateVariation {
        /// The name whose table repeats the variation.
        name: String,
        /// The repeated variation.
        variation: String,
    },

    /// A name's variation keys differ from the first name's variation keys.
    #[error("name `{name}` declares variations [{found}] but the schema expects [{expected}]")]
    NonRectangular {
        /// The offending name.
        name: String,
        /// The canonical variation keys, comma separated.
        expected: String,
        /// The keys found for `name`, comma separated.
        found: String,
    },

    /// A schema document could not be read.
    #[error("malformed schema: {0}")]
    MalformedSchema(String),

    /// A name that is not part of the schema.
    #[error("unknown name `{0}`")]
    UnknownName(String),

    /// A variation that is not part of the schema.
    #[error("unknown variation `{0}`")]
    UnknownVariation(String),

    /// The single-argument constructor was used on a schema with explicit variations.
    #[error("name `{name}` has variations [{variations}]; pass a variation explicitly")]
    NotSimple {
        /// The name the constructor was scoped to.
        name: String,
        /// The schema's variation keys, comma separated.
        variations: String,
    },

    /// A payload was built from a JSON value that is not an object.
    #[error("payload must be a JSON object, got {0}")]
    NotARecord(String),

    /// A plain tagged value is missing `_tag`/`_variation` or carries unknown tags.
    #[error("malformed tagged value: {0}")]
    MalformedTaggedValue(String),

    /// A property lens was requested for a property some payload shape in scope does not declare.
    #[error("property `{property}` is not declared by the payload of `{name}`/`{variation}`")]
    MissingProperty {
        /// The requested property.
        property: String,
        /// Name of the member lacking the property.
        name: String,
        /// Variation of the member lacking the property.
        variation: String,
    },

    /// A scoped optic was handed an entity outside its scope.
    #[error("entity `{name}`/`{variation}` lies outside `{scope}`")]
    OutsideScope {
        /// Name tag of the entity.
        name: String,
        /// Variation tag of the entity.
        variation: String,
        /// The optic's scope, as `name/variation`, `name`, `variation` or `*`.
        scope: String,
    },

    /// A fold was built without a handler for one of the keys in its scope.
    #[error("fold has no handler for `{0}`")]
    MissingHandler(String),

    /// A fold was applied to an entity whose tags match none of its handlers.
    #[error("no handler matches entity `{name}`/`{variation}`")]
    NoMatchingHandler {
        /// Name tag of the entity.
        name: String,
        /// Variation tag of the entity.
        variation: String,
    },
}
