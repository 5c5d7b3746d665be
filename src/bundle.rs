//! The generated API bundle and its scoped sub-bundles.
//!
//! [`UnionBundle::generate`] normalizes a [`Schema`] once into an immutable
//! member table. Every handle the bundle hands out (constructors, guards,
//! folds, isomorphisms, lenses, sub-bundles) shares that table, so handles are
//! cheap to clone, `Send + Sync`, and independent of each other.
//!
//! | bundle | scope | `fold` keys |
//! |--------|-------|-------------|
//! | [`UnionBundle`] | whole union | names |
//! | [`NameBundle`] | one name | variations |
//! | [`VariationBundle`] | one variation | names |
//! | [`MemberBundle`] | one (name, variation) | none |
//!
//! The owning module usually keeps the bundle private and re-exports only the
//! handles it wants outside code to reach.
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
//! let one = bundle.of().name("One").unwrap().simple(Payload::new().with("value", "one")).unwrap();
//! assert_eq!(one.name(), "One");
//! assert_eq!(one.variation(), "default");
//! assert!(bundle.is().name("One").unwrap().check(&one));
//! assert!(!bundle.is().name("Two").unwrap().check(&one));
//!
//! let fold = bundle.fold().on("One", |_| 1).on("Two", |_| 2).build().unwrap();
//! assert_eq!(fold.apply(&one), Ok(1));
//! ```

use std::sync::Arc;

use crate::constructor::{Constructors, MemberConstructor, NameConstructor, VariationConstructor};
use crate::error::UnionError;
use crate::fold::{MemberFold, NameFold, VariationFold};
use crate::guard::{Guards, MemberGuard, NameGuard, VariationGuard};
#[cfg(feature = "optics")]
use crate::optics::{MemberIso, PropLens, UnionIso};
use crate::schema::{IndexSets, Name, Schema, Shape, Variation};
use crate::table::{Scope, Table};

/// Everything generated from one schema.
#[derive(Debug, Clone)]
pub struct UnionBundle {
    table: Arc<Table>,
}

impl UnionBundle {
    /// Normalizes `schema` and generates its bundle.
    ///
    /// # Errors
    ///
    /// The errors of [`normalize`](crate::schema::normalize): an empty schema,
    /// a name without variations, or a non-rectangular table.
    pub fn generate(schema: Schema) -> Result<Self, UnionError> {
        Ok(Self {
            table: Table::generate(schema)?,
        })
    }

    /// The schema the bundle was generated from.
    #[must_use]
    pub fn types(&self) -> &Schema {
        self.table.schema()
    }

    /// The derived index sets.
    #[must_use]
    pub fn index(&self) -> &IndexSets {
        self.table.index()
    }

    /// Names, in schema order.
    #[must_use]
    pub fn names(&self) -> &[Name] {
        self.table.index().names()
    }

    /// Variations, in schema order.
    #[must_use]
    pub fn variations(&self) -> &[Variation] {
        self.table.index().variations()
    }

    /// The constructor family.
    #[must_use]
    pub fn of(&self) -> Constructors {
        Constructors::new(Arc::clone(&self.table))
    }

    /// The guard family.
    #[must_use]
    pub fn is(&self) -> Guards {
        Guards::new(Arc::clone(&self.table))
    }

    /// Starts a fold keyed by name.
    #[must_use]
    pub fn fold<R>(&self) -> NameFold<R> {
        NameFold::new(Arc::clone(&self.table), Scope::everything())
    }

    /// Starts a fold keyed by variation.
    #[must_use]
    pub fn fold_variations<R>(&self) -> VariationFold<R> {
        VariationFold::new(Arc::clone(&self.table), Scope::everything())
    }

    /// Starts a fold keyed by (name, variation) pair.
    #[must_use]
    pub fn fold_members<R>(&self) -> MemberFold<R> {
        MemberFold::new(Arc::clone(&self.table))
    }

    /// The global isomorphism, entity ⇄ tagged value.
    #[cfg(feature = "optics")]
    #[must_use]
    pub fn iso(&self) -> UnionIso {
        UnionIso::new(Arc::clone(&self.table), Scope::everything())
    }

    /// A lens on a property every payload shape of the schema declares.
    ///
    /// # Errors
    ///
    /// [`UnionError::MissingProperty`] if some member's shape lacks `property`.
    #[cfg(feature = "optics")]
    pub fn lens_from_prop(&self, property: &str) -> Result<PropLens<UnionIso>, UnionError> {
        self.iso().lens_from_prop(property)
    }

    /// The sub-bundle of one name.
    ///
    /// # Errors
    ///
    /// [`UnionError::UnknownName`] if `name` is not part of the schema.
    pub fn name(&self, name: &str) -> Result<NameBundle, UnionError> {
        Ok(NameBundle {
            name: self.table.resolve_name(name)?,
            table: Arc::clone(&self.table),
        })
    }

    /// The sub-bundle of one variation.
    ///
    /// # Errors
    ///
    /// [`UnionError::UnknownVariation`] if `variation` is not part of the schema.
    pub fn variation(&self, variation: &str) -> Result<VariationBundle, UnionError> {
        Ok(VariationBundle {
            variation: self.table.resolve_variation(variation)?,
            table: Arc::clone(&self.table),
        })
    }

    /// Every member sub-bundle, row-major by name then variation.
    pub fn members(&self) -> impl Iterator<Item = MemberBundle> + '_ {
        let names = self.table.index().names();
        names.iter().flat_map(move |name| {
            self.table
                .index()
                .variations()
                .iter()
                .map(move |variation| MemberBundle::new(&self.table, name.clone(), variation.clone()))
        })
    }
}

/// The slice of a bundle for one name.
#[derive(Debug, Clone)]
pub struct NameBundle {
    table: Arc<Table>,
    name: Name,
}

impl NameBundle {
    /// The name this sub-bundle is scoped to.
    #[must_use]
    pub const fn name(&self) -> &Name {
        &self.name
    }

    fn scope(&self) -> Scope {
        Scope::everything().with_name(self.name.clone())
    }

    /// Constructors for this name.
    #[must_use]
    pub fn of(&self) -> NameConstructor {
        NameConstructor::new(Arc::clone(&self.table), self.name.clone())
    }

    /// The guard for this name.
    #[must_use]
    pub fn is(&self) -> NameGuard {
        NameGuard::new(Arc::clone(&self.table), self.scope())
    }

    /// Starts a fold over this name's variations.
    #[must_use]
    pub fn fold<R>(&self) -> VariationFold<R> {
        VariationFold::new(Arc::clone(&self.table), self.scope())
    }

    /// The isomorphism scoped to this name.
    #[cfg(feature = "optics")]
    #[must_use]
    pub fn iso(&self) -> UnionIso {
        UnionIso::new(Arc::clone(&self.table), self.scope())
    }

    /// A lens on a property every variation of this name declares.
    ///
    /// # Errors
    ///
    /// [`UnionError::MissingProperty`] if some variation's shape lacks `property`.
    #[cfg(feature = "optics")]
    pub fn lens_from_prop(&self, property: &str) -> Result<PropLens<UnionIso>, UnionError> {
        self.iso().lens_from_prop(property)
    }

    /// The member sub-bundle for (this name, `variation`).
    ///
    /// # Errors
    ///
    /// [`UnionError::UnknownVariation`] if `variation` is not part of the schema.
    pub fn variation(&self, variation: &str) -> Result<MemberBundle, UnionError> {
        let variation = self.table.resolve_variation(variation)?;
        Ok(MemberBundle::new(&self.table, self.name.clone(), variation))
    }
}

/// The slice of a bundle for one variation.
#[derive(Debug, Clone)]
pub struct VariationBundle {
    table: Arc<Table>,
    variation: Variation,
}

impl VariationBundle {
    /// The variation this sub-bundle is scoped to.
    #[must_use]
    pub const fn variation(&self) -> &Variation {
        &self.variation
    }

    fn scope(&self) -> Scope {
        Scope::everything().with_variation(self.variation.clone())
    }

    /// Constructors for this variation.
    #[must_use]
    pub fn of(&self) -> VariationConstructor {
        VariationConstructor::new(Arc::clone(&self.table), self.variation.clone())
    }

    /// The guard for this variation.
    #[must_use]
    pub fn is(&self) -> VariationGuard {
        VariationGuard::new(Arc::clone(&self.table), self.scope())
    }

    /// Starts a fold over the names under this variation.
    #[must_use]
    pub fn fold<R>(&self) -> NameFold<R> {
        NameFold::new(Arc::clone(&self.table), self.scope())
    }

    /// The isomorphism scoped to this variation.
    #[cfg(feature = "optics")]
    #[must_use]
    pub fn iso(&self) -> UnionIso {
        UnionIso::new(Arc::clone(&self.table), self.scope())
    }

    /// A lens on a property every name declares under this variation.
    ///
    /// # Errors
    ///
    /// [`UnionError::MissingProperty`] if some name's shape lacks `property`.
    #[cfg(feature = "optics")]
    pub fn lens_from_prop(&self, property: &str) -> Result<PropLens<UnionIso>, UnionError> {
        self.iso().lens_from_prop(property)
    }

    /// The member sub-bundle for (`name`, this variation).
    ///
    /// # Errors
    ///
    /// [`UnionError::UnknownName`] if `name` is not part of the schema.
    pub fn name(&self, name: &str) -> Result<MemberBundle, UnionError> {
        let name = self.table.resolve_name(name)?;
        Ok(MemberBundle::new(&self.table, name, self.variation.clone()))
    }
}

/// The slice of a bundle for one (name, variation) member.
#[derive(Debug, Clone)]
pub struct MemberBundle {
    table: Arc<Table>,
    name: Name,
    variation: Variation,
    shape: Shape,
}

impl MemberBundle {
    fn new(table: &Arc<Table>, name: Name, variation: Variation) -> Self {
        let shape = table
            .schema()
            .shape(name.as_str(), variation.as_str())
            .cloned()
            .unwrap_or_default();
        Self {
            table: Arc::clone(table),
            name,
            variation,
            shape,
        }
    }

    /// The member's name.
    #[must_use]
    pub const fn name(&self) -> &Name {
        &self.name
    }

    /// The member's variation.
    #[must_use]
    pub const fn variation(&self) -> &Variation {
        &self.variation
    }

    /// The member's declared payload shape.
    #[must_use]
    pub const fn shape(&self) -> &Shape {
        &self.shape
    }

    /// The member's constructor.
    #[must_use]
    pub fn of(&self) -> MemberConstructor {
        MemberConstructor::new(self.name.clone(), self.variation.clone())
    }

    /// The member's guard.
    #[must_use]
    pub fn is(&self) -> MemberGuard {
        MemberGuard::new(
            Arc::clone(&self.table),
            Scope::member(self.name.clone(), self.variation.clone()),
        )
    }

    /// The member's isomorphism, entity ⇄ bare payload.
    #[cfg(feature = "optics")]
    #[must_use]
    pub fn iso(&self) -> MemberIso {
        MemberIso::new(
            Arc::clone(&self.table),
            self.name.clone(),
            self.variation.clone(),
        )
    }

    /// A lens on a property of the member's payload.
    ///
    /// # Errors
    ///
    /// [`UnionError::MissingProperty`] if the member's shape lacks `property`.
    #[cfg(feature = "optics")]
    pub fn lens_from_prop(&self, property: &str) -> Result<PropLens<MemberIso>, UnionError> {
        self.iso().lens_from_prop(property)
    }
}

static_assertions::assert_impl_all!(UnionBundle: Send, Sync, Clone);
static_assertions::assert_impl_all!(NameBundle: Send, Sync, Clone);
static_assertions::assert_impl_all!(VariationBundle: Send, Sync, Clone);
static_assertions::assert_impl_all!(MemberBundle: Send, Sync, Clone);
static_assertions::assert_impl_all!(crate::fold::Fold<i32>: Send, Sync);
static_assertions::assert_impl_all!(crate::entity::Entity: Send, Sync, Clone);
