//! # lambars-union
//!
//! Opaque, variation-aware discriminated unions generated at runtime from a
//! schema.
//!
//! ## Overview
//!
//! A module author declares a closed family of variant **names**, each crossed
//! with the same set of orthogonal **variations** (states). From that schema
//! the crate generates a complete API over hidden values:
//!
//! - **Constructors**: build [`Entity`] values through five equivalent paths
//! - **Guards**: narrow arbitrary values to members of the union
//! - **Folds**: exhaustive dispatch by name, by variation, or by member
//! - **Optics**: isomorphisms and property lenses over entities
//! - **Algebra**: `pick`, `omit`, `merge`, and `omit_variations` on schemas
//!
//! An [`Entity`] has private fields, so code outside the owning module can only
//! reach its contents through the handles the module chooses to hand out.
//!
//! ## Feature Flags
//!
//! - `optics`: Isomorphisms and property lenses (enabled by default)
//!
//! ## Example
//!
//! ```rust
//! use lambars_union::prelude::*;
//!
//! let schema = Schema::from_json_str(
//!     r#"{
//!         "Text":  { "Pending": ["body"], "Sent": ["body"] },
//!         "Image": { "Pending": ["url"],  "Sent": ["url"] }
//!     }"#,
//! )
//! .unwrap();
//! let messages = UnionBundle::generate(schema).unwrap();
//!
//! let sent = messages
//!     .of()
//!     .name("Text")
//!     .unwrap()
//!     .with("Sent", Payload::new().with("body", "hello"))
//!     .unwrap();
//!
//! assert!(messages.is().variation("Sent").unwrap().check(&sent));
//!
//! let label = messages
//!     .fold()
//!     .on("Text", |entity| format!("text ({})", entity.variation()))
//!     .on("Image", |_| "image".to_string())
//!     .build()
//!     .unwrap();
//! assert_eq!(label.apply(&sent).unwrap(), "text (Sent)");
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
// Note: Disabling redundant_closure_for_method_calls due to clippy 0.1.92 panic bug
#![allow(clippy::redundant_closure_for_method_calls)]

/// Prelude module for convenient imports.
///
/// Re-exports commonly used types and traits.
///
/// # Usage
///
/// ```rust
/// use lambars_union::prelude::*;
/// ```
pub mod prelude {
    pub use crate::bundle::*;
    pub use crate::constructor::*;
    pub use crate::entity::*;
    pub use crate::error::*;
    pub use crate::fold::*;
    pub use crate::guard::*;
    pub use crate::schema::*;

    #[cfg(feature = "optics")]
    pub use crate::optics::*;
}

mod algebra;
mod table;

pub mod bundle;
pub mod constructor;
pub mod entity;
pub mod error;
pub mod fold;
pub mod guard;
pub mod schema;

#[cfg(feature = "optics")]
pub mod optics;

pub use bundle::{MemberBundle, NameBundle, UnionBundle, VariationBundle};
pub use entity::{Entity, Payload};
pub use error::UnionError;
pub use fold::Fold;
pub use schema::{Name, Schema, Shape, Variation};
