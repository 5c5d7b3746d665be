//! Exhaustive dispatch over names, variations, or (name, variation) members.
//!
//! A fold is built from a handler per key of a closed key set and applied to
//! an [`Entity`]. The key set depends on where the builder came from:
//!
//! | builder | keys |
//! |---------|------|
//! | `bundle.fold()` | every name |
//! | `bundle.fold_variations()` | every variation |
//! | `bundle.fold_members()` | every (name, variation) pair |
//! | `name_bundle.fold()` | every variation of that name |
//! | `variation_bundle.fold()` | every name under that variation |
//!
//! [`NameFold::build`] and friends refuse handler maps that miss a key, so a
//! built [`Fold`] is exhaustive over its scope. Applying it to an entity that
//! still matches no handler (an entity built by another bundle) is reported as
//! [`UnionError::NoMatchingHandler`].
//!
//! # Examples
//!
//! ```
//! use lambars_union::{Payload, Schema, Shape, UnionBundle};
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
//! let fold = bundle
//!     .fold()
//!     .on("One", |_| 1)
//!     .on("Two", |_| 2)
//!     .build()
//!     .unwrap();
//!
//! let one = bundle.of().name("One").unwrap().simple(Payload::new()).unwrap();
//! assert_eq!(fold.apply(&one), Ok(1));
//! ```

use std::fmt;
use std::sync::Arc;

use tracing::{debug, error};

use crate::entity::Entity;
use crate::error::UnionError;
use crate::table::{Scope, Table};

type Handler<R> = Box<dyn Fn(&Entity) -> R + Send + Sync>;

/// An exhaustive dispatch function over a slice of the union.
pub struct Fold<R> {
    table: Arc<Table>,
    cases: Vec<(Scope, Handler<R>)>,
}

impl<R> Fold<R> {
    /// Calls the handler whose key matches `entity`.
    ///
    /// Cases are scanned in registration order and the first match wins.
    ///
    /// # Errors
    ///
    /// [`UnionError::NoMatchingHandler`] if no case matches, which only
    /// happens for entities whose tags lie outside this fold's scope.
    pub fn apply(&self, entity: &Entity) -> Result<R, UnionError> {
        let name = entity.name().as_str();
        let variation = entity.variation().as_str();
        if self.table.admits(name, variation) {
            if let Some((_, handler)) = self.cases.iter().find(|(key, _)| key.pins(name, variation)) {
                return Ok(handler(entity));
            }
        }
        error!(
            entity_name = name,
            entity_variation = variation,
            "no fold handler matches entity"
        );
        Err(UnionError::NoMatchingHandler {
            name: name.to_string(),
            variation: variation.to_string(),
        })
    }
}

impl<R> fmt::Debug for Fold<R> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("Fold")
            .field(
                "keys",
                &self
                    .cases
                    .iter()
                    .map(|(key, _)| key.to_string())
                    .collect::<Vec<_>>(),
            )
            .finish_non_exhaustive()
    }
}

/// Handlers registered so far, keyed by raw (unresolved) tags.
struct Cases<R> {
    table: Arc<Table>,
    scope: Scope,
    handlers: Vec<(Option<String>, Option<String>, Handler<R>)>,
}

impl<R> Cases<R> {
    const fn new(table: Arc<Table>, scope: Scope) -> Self {
        Self {
            table,
            scope,
            handlers: Vec::new(),
        }
    }

    fn push(&mut self, name: Option<&str>, variation: Option<&str>, handler: Handler<R>) {
        self.handlers
            .push((name.map(str::to_string), variation.map(str::to_string), handler));
    }

    fn build(self, expected: Vec<Scope>) -> Result<Fold<R>, UnionError> {
        let mut cases: Vec<(Scope, Handler<R>)> = Vec::with_capacity(self.handlers.len());
        for (name, variation, handler) in self.handlers {
            let mut key = self.scope.clone();
            if let Some(name) = name {
                key = key.with_name(self.table.resolve_name(&name)?);
            }
            if let Some(variation) = variation {
                key = key.with_variation(self.table.resolve_variation(&variation)?);
            }
            match cases.iter_mut().find(|(existing, _)| *existing == key) {
                Some(case) => case.1 = handler,
                None => cases.push((key, handler)),
            }
        }
        if let Some(missing) = expected
            .iter()
            .find(|key| !cases.iter().any(|(existing, _)| existing == *key))
        {
            return Err(UnionError::MissingHandler(missing.to_string()));
        }
        debug!(scope = %self.scope, cases = cases.len(), "built fold");
        Ok(Fold {
            table: self.table,
            cases,
        })
    }
}

/// Builds a fold keyed by name.
pub struct NameFold<R> {
    cases: Cases<R>,
}

impl<R> NameFold<R> {
    pub(crate) const fn new(table: Arc<Table>, scope: Scope) -> Self {
        Self {
            cases: Cases::new(table, scope),
        }
    }

    /// Registers the handler for `name`, replacing an earlier one.
    #[must_use]
    pub fn on<F>(mut self, name: &str, handler: F) -> Self
    where
        F: Fn(&Entity) -> R + Send + Sync + 'static,
    {
        self.cases.push(Some(name), None, Box::new(handler));
        self
    }

    /// Checks the handler map and builds the fold.
    ///
    /// # Errors
    ///
    /// [`UnionError::UnknownName`] for a key outside the schema,
    /// [`UnionError::MissingHandler`] for a name without a handler.
    pub fn build(self) -> Result<Fold<R>, UnionError> {
        let expected = self
            .cases
            .table
            .index()
            .names()
            .iter()
            .map(|name| self.cases.scope.with_name(name.clone()))
            .collect();
        self.cases.build(expected)
    }
}

/// Builds a fold keyed by variation.
pub struct VariationFold<R> {
    cases: Cases<R>,
}

impl<R> VariationFold<R> {
    pub(crate) const fn new(table: Arc<Table>, scope: Scope) -> Self {
        Self {
            cases: Cases::new(table, scope),
        }
    }

    /// Registers the handler for `variation`, replacing an earlier one.
    #[must_use]
    pub fn on<F>(mut self, variation: &str, handler: F) -> Self
    where
        F: Fn(&Entity) -> R + Send + Sync + 'static,
    {
        self.cases.push(None, Some(variation), Box::new(handler));
        self
    }

    /// Checks the handler map and builds the fold.
    ///
    /// # Errors
    ///
    /// [`UnionError::UnknownVariation`] for a key outside the schema,
    /// [`UnionError::MissingHandler`] for a variation without a handler.
    pub fn build(self) -> Result<Fold<R>, UnionError> {
        let expected = self
            .cases
            .table
            .index()
            .variations()
            .iter()
            .map(|variation| self.cases.scope.with_variation(variation.clone()))
            .collect();
        self.cases.build(expected)
    }
}

/// Builds a fold keyed by (name, variation) pair.
pub struct MemberFold<R> {
    cases: Cases<R>,
}

impl<R> MemberFold<R> {
    pub(crate) const fn new(table: Arc<Table>) -> Self {
        Self {
            cases: Cases::new(table, Scope::everything()),
        }
    }

    /// Registers the handler for (`name`, `variation`), replacing an earlier one.
    #[must_use]
    pub fn on<F>(mut self, name: &str, variation: &str, handler: F) -> Self
    where
        F: Fn(&Entity) -> R + Send + Sync + 'static,
    {
        self.cases.push(Some(name), Some(variation), Box::new(handler));
        self
    }

    /// Checks the handler map and builds the fold.
    ///
    /// # Errors
    ///
    /// [`UnionError::UnknownName`] or [`UnionError::UnknownVariation`] for a
    /// key outside the schema, [`UnionError::MissingHandler`] for a pair
    /// without a handler.
    pub fn build(self) -> Result<Fold<R>, UnionError> {
        let scope = Scope::everything();
        let expected = self
            .cases
            .table
            .members(&scope)
            .map(|(name, variation)| Scope::member(name.clone(), variation.clone()))
            .collect();
        self.cases.build(expected)
    }
}
