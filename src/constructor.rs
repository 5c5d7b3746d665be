//! Constructors reachable through five equivalent access paths.
//!
//! For identical (name, variation, payload) triples every path builds an
//! identical [`Entity`]:
//!
//! | path | call |
//! |------|------|
//! | global | `of().make(name, variation, payload)` |
//! | name | `of().name(name)?.with(variation, payload)` or `.simple(payload)` |
//! | name, variation | `of().name(name)?.variation(variation)?.make(payload)` |
//! | variation | `of().variation(variation)?.with(name, payload)` |
//! | variation, name | `of().variation(variation)?.name(name)?.make(payload)` |
//!
//! Resolving a scope validates the tags once; a fully resolved
//! [`MemberConstructor`] cannot fail.
//!
//! # Examples
//!
//! ```
//! use lambars_union::{Payload, Schema, Shape, UnionBundle};
//!
//! let bundle = UnionBundle::generate(
//!     Schema::builder()
//!         .varied("Text", [("Pending", Shape::any()), ("Sent", Shape::any())])
//!         .varied("Image", [("Pending", Shape::any()), ("Sent", Shape::any())])
//!         .build()
//!         .unwrap(),
//! )
//! .unwrap();
//!
//! let payload = Payload::new().with("body", "hi");
//! let of = bundle.of();
//! let global = of.make("Text", "Sent", payload.clone()).unwrap();
//! let scoped = of.variation("Sent").unwrap().name("Text").unwrap().make(payload);
//! assert_eq!(global, scoped);
//! ```

use std::sync::Arc;

use crate::entity::{Entity, Payload};
use crate::error::UnionError;
use crate::schema::{Name, Variation};
use crate::table::Table;

/// The global constructor family of a bundle.
#[derive(Debug, Clone)]
pub struct Constructors {
    table: Arc<Table>,
}

impl Constructors {
    pub(crate) const fn new(table: Arc<Table>) -> Self {
        Self { table }
    }

    /// Builds an entity from a full triple.
    ///
    /// # Errors
    ///
    /// [`UnionError::UnknownName`] or [`UnionError::UnknownVariation`] if a
    /// tag is not part of the schema.
    pub fn make(&self, name: &str, variation: &str, payload: Payload) -> Result<Entity, UnionError> {
        let name = self.table.resolve_name(name)?;
        let variation = self.table.resolve_variation(variation)?;
        Ok(Entity::new(name, variation, payload))
    }

    /// Scopes the family to one name.
    ///
    /// # Errors
    ///
    /// [`UnionError::UnknownName`] if `name` is not part of the schema.
    pub fn name(&self, name: &str) -> Result<NameConstructor, UnionError> {
        let name = self.table.resolve_name(name)?;
        Ok(NameConstructor::new(Arc::clone(&self.table), name))
    }

    /// Scopes the family to one variation.
    ///
    /// # Errors
    ///
    /// [`UnionError::UnknownVariation`] if `variation` is not part of the schema.
    pub fn variation(&self, variation: &str) -> Result<VariationConstructor, UnionError> {
        let variation = self.table.resolve_variation(variation)?;
        Ok(VariationConstructor::new(Arc::clone(&self.table), variation))
    }
}

/// Constructors scoped to one name.
#[derive(Debug, Clone)]
pub struct NameConstructor {
    table: Arc<Table>,
    name: Name,
}

impl NameConstructor {
    pub(crate) const fn new(table: Arc<Table>, name: Name) -> Self {
        Self { table, name }
    }

    /// Builds an entity of this name with an explicit variation.
    ///
    /// # Errors
    ///
    /// [`UnionError::UnknownVariation`] if `variation` is not part of the schema.
    pub fn with(&self, variation: &str, payload: Payload) -> Result<Entity, UnionError> {
        let variation = self.table.resolve_variation(variation)?;
        Ok(Entity::new(self.name.clone(), variation, payload))
    }

    /// Builds an entity of this name with the `default` variation.
    ///
    /// Only available for schemas whose sole variation is `default`.
    ///
    /// # Errors
    ///
    /// [`UnionError::NotSimple`] if the schema declares explicit variations.
    pub fn simple(&self, payload: Payload) -> Result<Entity, UnionError> {
        let index = self.table.index();
        if !index.is_simple() {
            return Err(UnionError::NotSimple {
                name: self.name.to_string(),
                variations: index
                    .variations()
                    .iter()
                    .map(Variation::as_str)
                    .collect::<Vec<_>>()
                    .join(", "),
            });
        }
        Ok(Entity::new(
            self.name.clone(),
            index.variations()[0].clone(),
            payload,
        ))
    }

    /// Narrows further to one (name, variation) member.
    ///
    /// # Errors
    ///
    /// [`UnionError::UnknownVariation`] if `variation` is not part of the schema.
    pub fn variation(&self, variation: &str) -> Result<MemberConstructor, UnionError> {
        let variation = self.table.resolve_variation(variation)?;
        Ok(MemberConstructor::new(self.name.clone(), variation))
    }
}

/// Constructors scoped to one variation.
#[derive(Debug, Clone)]
pub struct VariationConstructor {
    table: Arc<Table>,
    variation: Variation,
}

impl VariationConstructor {
    pub(crate) const fn new(table: Arc<Table>, variation: Variation) -> Self {
        Self { table, variation }
    }

    /// Builds an entity of this variation with an explicit name.
    ///
    /// # Errors
    ///
    /// [`UnionError::UnknownName`] if `name` is not part of the schema.
    pub fn with(&self, name: &str, payload: Payload) -> Result<Entity, UnionError> {
        let name = self.table.resolve_name(name)?;
        Ok(Entity::new(name, self.variation.clone(), payload))
    }

    /// Narrows further to one (name, variation) member.
    ///
    /// # Errors
    ///
    /// [`UnionError::UnknownName`] if `name` is not part of the schema.
    pub fn name(&self, name: &str) -> Result<MemberConstructor, UnionError> {
        let name = self.table.resolve_name(name)?;
        Ok(MemberConstructor::new(name, self.variation.clone()))
    }
}

/// The constructor of a single (name, variation) member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberConstructor {
    name: Name,
    variation: Variation,
}

impl MemberConstructor {
    pub(crate) const fn new(name: Name, variation: Variation) -> Self {
        Self { name, variation }
    }

    /// Wraps `payload` into a fresh entity.
    #[must_use]
    pub fn make(&self, payload: Payload) -> Entity {
        Entity::new(self.name.clone(), self.variation.clone(), payload)
    }
}
