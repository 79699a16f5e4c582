//! Attribute classification
//!
//! Columns are classified exactly once per dataset load: a column is
//! Numeric iff every row's value is non-empty and parses as a finite
//! number, otherwise Categorical. The classification is total over the
//! non-ignored columns, so selectors can route attributes without any
//! further runtime checks.

use bl_core::data::{parse_numeric, Attribute, AttributeKind, Dataset};

/// Columns that carry identifiers or free text and never make sense as
/// plot attributes.
pub const DEFAULT_IGNORED: &[&str] = &["#", "Name", "Type 2"];

/// The inferred schema of the current dataset.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AttributeSchema {
    attributes: Vec<Attribute>,
}

impl AttributeSchema {
    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    /// Names of numeric attributes, in column order.
    pub fn numeric(&self) -> impl Iterator<Item = &str> {
        self.attributes
            .iter()
            .filter(|a| a.kind == AttributeKind::Numeric)
            .map(|a| a.name.as_str())
    }

    /// Names of categorical attributes, in column order.
    pub fn categorical(&self) -> impl Iterator<Item = &str> {
        self.attributes
            .iter()
            .filter(|a| a.kind == AttributeKind::Categorical)
            .map(|a| a.name.as_str())
    }

    pub fn kind_of(&self, name: &str) -> Option<AttributeKind> {
        self.attributes
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.kind)
    }
}

/// Classifies dataset columns as numeric or categorical.
pub struct SchemaInferencer {
    ignored: Vec<String>,
}

impl SchemaInferencer {
    pub fn new() -> Self {
        Self {
            ignored: DEFAULT_IGNORED.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn with_ignored(mut self, ignored: impl IntoIterator<Item = String>) -> Self {
        self.ignored = ignored.into_iter().collect();
        self
    }

    /// Infer the schema of a dataset. An empty dataset yields a schema
    /// with zero attributes; callers disable every selector.
    pub fn infer(&self, dataset: &Dataset) -> AttributeSchema {
        if dataset.is_empty() {
            return AttributeSchema::default();
        }

        let attributes = dataset
            .columns()
            .iter()
            .enumerate()
            .filter(|(_, name)| !self.ignored.iter().any(|ig| ig == *name))
            .map(|(col, name)| {
                let numeric = dataset
                    .rows()
                    .iter()
                    .all(|row| row.value(col).map_or(false, |v| parse_numeric(v).is_some()));
                Attribute {
                    name: name.clone(),
                    kind: if numeric {
                        AttributeKind::Numeric
                    } else {
                        AttributeKind::Categorical
                    },
                }
            })
            .collect();

        AttributeSchema { attributes }
    }
}

impl Default for SchemaInferencer {
    fn default() -> Self {
        Self::new()
    }
}
