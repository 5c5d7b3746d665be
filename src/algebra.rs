//! Schema algebra: derive a new schema from a bundle and regenerate.
//!
//! Each operation builds a new [`Schema`] and runs
//! [`UnionBundle::generate`] on it. The result shares nothing mutable with
//! the input bundle; the input is left untouched.
//!
//! # Examples
//!
//! ```
//! use lambars_union::{Schema, Shape, UnionBundle};
//!
//! let bundle = UnionBundle::generate(
//!     Schema::builder()
//!         .simple("Text", Shape::fields(["body"]))
//!         .simple("Image", Shape::fields(["url"]))
//!         .simple("Audio", Shape::fields(["url"]))
//!         .build()
//!         .unwrap(),
//! )
//! .unwrap();
//!
//! let media = bundle.omit(["Text"]).unwrap();
//! assert_eq!(media.names(), ["Image", "Audio"]);
//! assert!(media.lens_from_prop("url").is_ok());
//! ```

use tracing::trace;

use crate::bundle::UnionBundle;
use crate::error::UnionError;

fn listed<S: AsRef<str>>(keys: &[S], key: &str) -> bool {
    keys.iter().any(|candidate| candidate.as_ref() == key)
}

impl UnionBundle {
    /// Regenerates the bundle with only the listed names.
    ///
    /// Listed names the schema does not declare are ignored.
    ///
    /// # Errors
    ///
    /// [`UnionError::EmptySchema`] if no declared name is listed.
    pub fn pick<I, S>(&self, names: I) -> Result<Self, UnionError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let names: Vec<S> = names.into_iter().collect();
        trace!(count = names.len(), "picking names");
        Self::generate(
            self.types()
                .retain_names(|name| listed(&names, name.as_str())),
        )
    }

    /// Regenerates the bundle without the listed names.
    ///
    /// # Errors
    ///
    /// [`UnionError::EmptySchema`] if every name is listed.
    pub fn omit<I, S>(&self, names: I) -> Result<Self, UnionError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let names: Vec<S> = names.into_iter().collect();
        trace!(count = names.len(), "omitting names");
        Self::generate(
            self.types()
                .retain_names(|name| !listed(&names, name.as_str())),
        )
    }

    /// Regenerates the bundle with every name's table stripped of the listed
    /// variations.
    ///
    /// # Errors
    ///
    /// [`UnionError::NoVariations`] if every variation is listed.
    pub fn omit_variations<I, S>(&self, variations: I) -> Result<Self, UnionError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let variations: Vec<S> = variations.into_iter().collect();
        trace!(count = variations.len(), "omitting variations");
        Self::generate(
            self.types()
                .retain_variations(|variation| !listed(&variations, variation.as_str())),
        )
    }

    /// Regenerates a bundle from both schemas' names. On a name collision the
    /// table of `other` wins, in the position the name had in `self`.
    ///
    /// # Errors
    ///
    /// [`UnionError::NonRectangular`] if the two schemas' variation sets differ.
    pub fn merge(&self, other: &Self) -> Result<Self, UnionError> {
        trace!(
            left = self.names().len(),
            right = other.names().len(),
            "merging schemas"
        );
        Self::generate(self.types().merged(other.types()))
    }
}
