//! Narrowing guards mirroring the constructor paths.
//!
//! Every guard applies the same rule. A candidate is a member of the union if
//! it is either
//!
//! - an [`Entity`] whose name and variation belong to the schema, or
//! - a [`serde_json::Value`] object in the wire shape: `MARKER_KEY: MARKER`
//!   plus string `name` and `variation` fields belonging to the schema.
//!
//! Scoped guards additionally require the tags they are scoped to. Guards
//! accept any `'static` value through `&dyn Any` and are total: anything
//! else, including primitives and malformed objects, is simply `false`.
//!
//! # Examples
//!
//! ```
//! use lambars_union::{Payload, Schema, Shape, UnionBundle};
//! use serde_json::json;
//!
//! let bundle = UnionBundle::generate(
//!     Schema::builder()
//!         .simple("One", Shape::fields(["value"]))
//!         .simple("Two", Shape::fields(["value"]))
//!         .build()
//!         .unwrap(),
//! )
//! .unwrap();
//!
//! let one = bundle.of().name("One").unwrap().simple(Payload::new().with("value", "one")).unwrap();
//! assert!(bundle.is().check(&one));
//! assert!(bundle.is().name("One").unwrap().check(&one));
//! assert!(!bundle.is().name("Two").unwrap().check(&one));
//! assert!(!bundle.is().check(&42));
//! assert!(!bundle.is().check(&json!({ "name": "One" })));
//! ```

use std::any::Any;
use std::sync::Arc;

use serde_json::Value;

use crate::entity::{Entity, MARKER, MARKER_KEY};
use crate::error::UnionError;
use crate::table::{Scope, Table};

/// The single validation rule behind every guard.
#[derive(Debug, Clone)]
struct Predicate {
    table: Arc<Table>,
    scope: Scope,
}

impl Predicate {
    fn admits_tags(&self, name: &str, variation: &str) -> bool {
        self.table.admits(name, variation) && self.scope.pins(name, variation)
    }

    fn admits_wire(&self, value: &Value) -> bool {
        let Some(fields) = value.as_object() else {
            return false;
        };
        if fields.get(MARKER_KEY).and_then(Value::as_str) != Some(MARKER) {
            return false;
        }
        match (
            fields.get("name").and_then(Value::as_str),
            fields.get("variation").and_then(Value::as_str),
        ) {
            (Some(name), Some(variation)) => self.admits_tags(name, variation),
            _ => false,
        }
    }

    fn check(&self, thing: &dyn Any) -> bool {
        if let Some(entity) = thing.downcast_ref::<Entity>() {
            return self.check_entity(entity);
        }
        thing
            .downcast_ref::<Value>()
            .is_some_and(|value| self.admits_wire(value))
    }

    fn check_entity(&self, entity: &Entity) -> bool {
        self.admits_tags(entity.name().as_str(), entity.variation().as_str())
    }

    fn narrow<'a>(&self, thing: &'a dyn Any) -> Option<&'a Entity> {
        thing
            .downcast_ref::<Entity>()
            .filter(|entity| self.check_entity(entity))
    }

    fn with_name(&self, name: &str) -> Result<Self, UnionError> {
        Ok(Self {
            scope: self.scope.with_name(self.table.resolve_name(name)?),
            table: Arc::clone(&self.table),
        })
    }

    fn with_variation(&self, variation: &str) -> Result<Self, UnionError> {
        Ok(Self {
            scope: self.scope.with_variation(self.table.resolve_variation(variation)?),
            table: Arc::clone(&self.table),
        })
    }
}

macro_rules! guard_methods {
    () => {
        /// Returns `true` if `thing` is a member of this guard's slice of the union.
        ///
        /// Never panics, whatever the shape of `thing`. Only an [`Entity`] or a
        /// wire-shaped [`serde_json::Value`] passed directly can match: a
        /// `&&Entity`, `Box<Entity>` or `Arc<Entity>` is a different type behind
        /// `dyn Any` and yields `false`. Dereference first.
        #[must_use]
        pub fn check(&self, thing: &dyn Any) -> bool {
            self.predicate.check(thing)
        }

        /// Typed fast path of [`Self::check`].
        #[must_use]
        pub fn check_entity(&self, entity: &Entity) -> bool {
            self.predicate.check_entity(entity)
        }

        /// Returns the entity behind `thing` if it passes this guard.
        ///
        /// Wire-shaped JSON values pass [`Self::check`] but cannot be narrowed
        /// to an entity, so they yield `None` here.
        #[must_use]
        pub fn narrow<'a>(&self, thing: &'a dyn Any) -> Option<&'a Entity> {
            self.predicate.narrow(thing)
        }
    };
}

/// The global guard of a bundle.
#[derive(Debug, Clone)]
pub struct Guards {
    predicate: Predicate,
}

impl Guards {
    pub(crate) const fn new(table: Arc<Table>) -> Self {
        Self {
            predicate: Predicate {
                table,
                scope: Scope::everything(),
            },
        }
    }

    guard_methods!();

    /// The guard for one name.
    ///
    /// # Errors
    ///
    /// [`UnionError::UnknownName`] if `name` is not part of the schema.
    pub fn name(&self, name: &str) -> Result<NameGuard, UnionError> {
        self.predicate
            .with_name(name)
            .map(|predicate| NameGuard { predicate })
    }

    /// The guard for one variation.
    ///
    /// # Errors
    ///
    /// [`UnionError::UnknownVariation`] if `variation` is not part of the schema.
    pub fn variation(&self, variation: &str) -> Result<VariationGuard, UnionError> {
        self.predicate
            .with_variation(variation)
            .map(|predicate| VariationGuard { predicate })
    }
}

/// A guard scoped to one name.
#[derive(Debug, Clone)]
pub struct NameGuard {
    predicate: Predicate,
}

impl NameGuard {
    pub(crate) const fn new(table: Arc<Table>, scope: Scope) -> Self {
        Self {
            predicate: Predicate { table, scope },
        }
    }

    guard_methods!();

    /// The guard for one (name, variation) member.
    ///
    /// # Errors
    ///
    /// [`UnionError::UnknownVariation`] if `variation` is not part of the schema.
    pub fn variation(&self, variation: &str) -> Result<MemberGuard, UnionError> {
        self.predicate
            .with_variation(variation)
            .map(|predicate| MemberGuard { predicate })
    }
}

/// A guard scoped to one variation.
#[derive(Debug, Clone)]
pub struct VariationGuard {
    predicate: Predicate,
}

impl VariationGuard {
    pub(crate) const fn new(table: Arc<Table>, scope: Scope) -> Self {
        Self {
            predicate: Predicate { table, scope },
        }
    }

    guard_methods!();

    /// The guard for one (name, variation) member.
    ///
    /// # Errors
    ///
    /// [`UnionError::UnknownName`] if `name` is not part of the schema.
    pub fn name(&self, name: &str) -> Result<MemberGuard, UnionError> {
        self.predicate
            .with_name(name)
            .map(|predicate| MemberGuard { predicate })
    }
}

/// A guard scoped to one (name, variation) member.
#[derive(Debug, Clone)]
pub struct MemberGuard {
    predicate: Predicate,
}

impl MemberGuard {
    pub(crate) const fn new(table: Arc<Table>, scope: Scope) -> Self {
        Self {
            predicate: Predicate { table, scope },
        }
    }

    guard_methods!();
}
