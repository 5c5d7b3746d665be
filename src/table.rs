//! The generated member table shared by every handle of a bundle.

use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::error::UnionError;
use crate::schema::{normalize, IndexSets, Name, Schema, Variation};

/// Normalized schema plus its index sets, behind one `Arc`.
#[derive(Debug)]
pub(crate) struct Table {
    schema: Schema,
    index: IndexSets,
}

impl Table {
    pub(crate) fn generate(schema: Schema) -> Result<Arc<Self>, UnionError> {
        let index = normalize(&schema)?;
        debug!(
            names = index.names().len(),
            variations = index.variations().len(),
            "generated union table"
        );
        Ok(Arc::new(Self { schema, index }))
    }

    pub(crate) const fn schema(&self) -> &Schema {
        &self.schema
    }

    pub(crate) const fn index(&self) -> &IndexSets {
        &self.index
    }

    pub(crate) fn resolve_name(&self, name: &str) -> Result<Name, UnionError> {
        self.index
            .name_position(name)
            .map(|position| self.index.names()[position].clone())
            .ok_or_else(|| UnionError::UnknownName(name.to_string()))
    }

    pub(crate) fn resolve_variation(&self, variation: &str) -> Result<Variation, UnionError> {
        self.index
            .variation_position(variation)
            .map(|position| self.index.variations()[position].clone())
            .ok_or_else(|| UnionError::UnknownVariation(variation.to_string()))
    }

    pub(crate) fn admits(&self, name: &str, variation: &str) -> bool {
        self.index.name_position(name).is_some() && self.index.variation_position(variation).is_some()
    }

    /// Row-major walk over the (name, variation) cells inside `scope`.
    pub(crate) fn members<'a>(
        &'a self,
        scope: &'a Scope,
    ) -> impl Iterator<Item = (&'a Name, &'a Variation)> + 'a {
        self.index.names().iter().flat_map(move |name| {
            self.index
                .variations()
                .iter()
                .filter(move |variation| scope.pins(name.as_str(), variation.as_str()))
                .map(move |variation| (name, variation))
        })
    }

    #[cfg(feature = "optics")]
    pub(crate) fn require_property(&self, scope: &Scope, property: &str) -> Result<(), UnionError> {
        for (name, variation) in self.members(scope) {
            let declared = self
                .schema
                .shape(name.as_str(), variation.as_str())
                .is_some_and(|shape| shape.declares(property));
            if !declared {
                return Err(UnionError::MissingProperty {
                    property: property.to_string(),
                    name: name.to_string(),
                    variation: variation.to_string(),
                });
            }
        }
        Ok(())
    }
}

/// The slice of the table a handle is restricted to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct Scope {
    pub(crate) name: Option<Name>,
    pub(crate) variation: Option<Variation>,
}

impl Scope {
    pub(crate) const fn everything() -> Self {
        Self {
            name: None,
            variation: None,
        }
    }

    pub(crate) const fn member(name: Name, variation: Variation) -> Self {
        Self {
            name: Some(name),
            variation: Some(variation),
        }
    }

    pub(crate) fn with_name(&self, name: Name) -> Self {
        Self {
            name: Some(name),
            variation: self.variation.clone(),
        }
    }

    pub(crate) fn with_variation(&self, variation: Variation) -> Self {
        Self {
            name: self.name.clone(),
            variation: Some(variation),
        }
    }

    pub(crate) fn pins(&self, name: &str, variation: &str) -> bool {
        self.name.as_ref().is_none_or(|pinned| pinned == name)
            && self.variation.as_ref().is_none_or(|pinned| pinned == variation)
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.name, &self.variation) {
            (Some(name), Some(variation)) => write!(formatter, "{name}/{variation}"),
            (Some(name), None) => write!(formatter, "{name}"),
            (None, Some(variation)) => write!(formatter, "{variation}"),
            (None, None) => formatter.write_str("*"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Shape;
    use rstest::rstest;

    fn table() -> Arc<Table> {
        Table::generate(
            Schema::builder()
                .varied("Text", [("Pending", Shape::any()), ("Sent", Shape::any())])
                .varied("Image", [("Pending", Shape::any()), ("Sent", Shape::any())])
                .build()
                .unwrap(),
        )
        .unwrap()
    }

    #[rstest]
    fn test_members_walks_row_major() {
        let table = table();
        let scope = Scope::everything();
        let members: Vec<String> = table
            .members(&scope)
            .map(|(name, variation)| format!("{name}/{variation}"))
            .collect();
        assert_eq!(
            members,
            ["Text/Pending", "Text/Sent", "Image/Pending", "Image/Sent"]
        );
    }

    #[rstest]
    fn test_members_respects_scope() {
        let table = table();
        let scope = Scope::everything().with_variation(Variation::from("Sent"));
        let members: Vec<String> = table
            .members(&scope)
            .map(|(name, variation)| format!("{name}/{variation}"))
            .collect();
        assert_eq!(members, ["Text/Sent", "Image/Sent"]);
    }

    #[rstest]
    fn test_resolve_unknown_tags() {
        let table = table();
        assert_eq!(
            table.resolve_name("Audio"),
            Err(UnionError::UnknownName("Audio".to_string()))
        );
        assert_eq!(
            table.resolve_variation("Failed"),
            Err(UnionError::UnknownVariation("Failed".to_string()))
        );
        assert!(table.admits("Image", "Sent"));
        assert!(!table.admits("Image", "Failed"));
    }

    #[rstest]
    #[case(Scope::everything(), "*")]
    #[case(Scope::everything().with_name(Name::from("Text")), "Text")]
    #[case(Scope::member(Name::from("Text"), Variation::from("Sent")), "Text/Sent")]
    fn test_scope_display(#[case] scope: Scope, #[case] expected: &str) {
        assert_eq!(scope.to_string(), expected);
    }
}
