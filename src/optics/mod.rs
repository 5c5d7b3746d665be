//! Optics over union entities.
//!
//! Optics here are stateless and allocation-only:
//!
//! - [`Iso`]: lossless conversion between an [`Entity`](crate::Entity) and its
//!   unwrapped form. [`UnionIso`] unwraps into a [`TaggedValue`];
//!   [`MemberIso`] unwraps a single (name, variation) member into its bare
//!   [`Payload`](crate::Payload).
//! - [`Lens`]: get/set/modify access to one payload property, via
//!   [`PropLens`], composed from the isomorphism of the scope it was built in.
//!
//! # Optics Hierarchy
//!
//! ```text
//! PropLens = Iso ∘ property accessor
//! ```
//!
//! # Iso Laws
//!
//! 1. **GetReverseGet Law**: `iso.reverse_get(iso.get(source)) == source`
//! 2. **ReverseGetGet Law**: `iso.get(iso.reverse_get(value)) == value`
//!
//! # Lens Laws
//!
//! 1. **GetPut Law**: `lens.set(source, lens.get(&source).clone()) == source`
//! 2. **PutGet Law**: `lens.get(&lens.set(source, value)) == &value`
//! 3. **PutPut Law**: `lens.set(lens.set(source, v1), v2) == lens.set(source, v2)`

mod iso;
mod lens;
mod tagged;

pub use iso::Iso;
pub use iso::MemberIso;
pub use iso::UnionIso;

pub use lens::Lens;
pub use lens::PropLens;

pub use tagged::TaggedValue;
pub use tagged::TAG_KEY;
pub use tagged::VARIATION_KEY;
