//! Property lenses over entities.
//!
//! A Lens is an optic that provides get/set access to one part of a larger
//! structure. Here the structure is an [`Entity`] and the part is one property
//! of its payload.
//!
//! # Laws
//!
//! Every Lens must satisfy three laws:
//!
//! 1. **GetPut Law**: Getting and setting back yields the original.
//!    ```text
//!    lens.set(source, lens.get(&source).clone()) == source
//!    ```
//!
//! 2. **PutGet Law**: Setting then getting yields the set value.
//!    ```text
//!    lens.get(&lens.set(source, value)) == &value
//!    ```
//!
//! 3. **PutPut Law**: Two consecutive sets is equivalent to the last set.
//!    ```text
//!    lens.set(lens.set(source, v1), v2) == lens.set(source, v2)
//!    ```
//!
//! GetPut holds for entities whose payload carries the property; for an
//! absent property `get` yields `null` and setting it back adds the property.
//! PutGet and PutPut hold for entities inside the lens's scope. `set` returns
//! an entity outside the scope unchanged; `try_set` rejects it.

use std::sync::Arc;

use serde_json::Value;

use super::iso::{MemberIso, UnionIso};
use crate::entity::Entity;
use crate::error::UnionError;

static ABSENT: Value = Value::Null;

/// A Lens focuses on a single part within a larger structure.
///
/// # Type Parameters
///
/// - `S`: The source type (the whole structure)
/// - `A`: The target type (the focused part)
pub trait Lens<S, A> {
    /// Gets a reference to the focused part.
    fn get<'a>(&self, source: &'a S) -> &'a A;

    /// Sets the focused part to a new value, returning a new source.
    fn set(&self, source: S, value: A) -> S;

    /// Modifies the focused part by applying a function.
    ///
    /// This is equivalent to getting the current value, applying the function,
    /// and setting the result.
    fn modify<F>(&self, source: S, function: F) -> S
    where
        F: FnOnce(A) -> A,
        A: Clone,
    {
        let current = self.get(&source).clone();
        self.set(source, function(current))
    }
}

/// A lens on one payload property, built by composing a scope's isomorphism
/// with a plain property accessor.
///
/// Obtained from `lens_from_prop` on a bundle, sub-bundle, or isomorphism,
/// which checks that every payload shape in scope declares the property.
///
/// # Examples
///
/// ```
/// use lambars_union::optics::Lens;
/// use lambars_union::{Payload, Schema, Shape, UnionBundle};
/// use serde_json::json;
///
/// let bundle = UnionBundle::generate(
///     Schema::builder()
///         .simple("One", Shape::fields(["value"]))
///         .simple("Two", Shape::fields(["value"]))
///         .build()
///         .unwrap(),
/// )
/// .unwrap();
///
/// let value = bundle.lens_from_prop("value").unwrap();
/// let two = bundle.of().name("Two").unwrap().simple(Payload::new().with("value", 2)).unwrap();
///
/// assert_eq!(value.get(&two), &json!(2));
/// let doubled = value.modify(two, |current| json!(current.as_i64().unwrap_or(0) * 2));
/// assert_eq!(value.get(&doubled), &json!(4));
/// ```
#[derive(Debug, Clone)]
pub struct PropLens<I> {
    property: Arc<str>,
    iso: I,
}

impl<I> PropLens<I> {
    pub(crate) fn new(property: &str, iso: I) -> Self {
        Self {
            property: Arc::from(property),
            iso,
        }
    }

    /// The focused property.
    #[must_use]
    pub fn property(&self) -> &str {
        &self.property
    }

    /// Rewrites the property, keeping the entity's own tags.
    fn rewrite(&self, source: Entity, value: Value) -> Entity {
        let (name, variation, payload) = source.into_parts();
        Entity::new(name, variation, payload.with(&*self.property, value))
    }
}

impl PropLens<UnionIso> {
    /// Like [`Lens::set`], but rejects entities outside the lens's scope.
    ///
    /// # Errors
    ///
    /// [`UnionError::OutsideScope`] if `source` lies outside the scope.
    pub fn try_set(&self, source: Entity, value: Value) -> Result<Entity, UnionError> {
        self.iso.admit(&source)?;
        Ok(self.rewrite(source, value))
    }
}

impl PropLens<MemberIso> {
    /// Like [`Lens::set`], but rejects entities of other members.
    ///
    /// # Errors
    ///
    /// [`UnionError::OutsideScope`] if `source` is not this lens's member.
    pub fn try_set(&self, source: Entity, value: Value) -> Result<Entity, UnionError> {
        self.iso.admit(&source)?;
        Ok(self.rewrite(source, value))
    }
}

impl Lens<Entity, Value> for PropLens<UnionIso> {
    fn get<'a>(&self, source: &'a Entity) -> &'a Value {
        source.payload().get(&self.property).unwrap_or(&ABSENT)
    }

    fn set(&self, source: Entity, value: Value) -> Entity {
        if self.iso.admit(&source).is_err() {
            return source;
        }
        self.rewrite(source, value)
    }
}

impl Lens<Entity, Value> for PropLens<MemberIso> {
    fn get<'a>(&self, source: &'a Entity) -> &'a Value {
        source.payload().get(&self.property).unwrap_or(&ABSENT)
    }

    fn set(&self, source: Entity, value: Value) -> Entity {
        if self.iso.admit(&source).is_err() {
            return source;
        }
        self.rewrite(source, value)
    }
}
