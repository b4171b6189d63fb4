//! Ordered source → output column mapping.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// One `source_column → output_column` rename.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnRename {
    pub source_column: String,
    pub output_column: String,
}

/// An ordered mapping from canonical source labels to output labels.
///
/// Insertion order is preserved and defines the column order produced by the
/// mapper. Source labels are unique: inserting an existing source label
/// replaces its output label in place.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnMapping {
    entries: Vec<ColumnRename>,
}

impl ColumnMapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a mapping where every label keeps its name.
    pub fn identity<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut mapping = Self::new();
        for label in labels {
            let label = label.into();
            mapping.insert(label.clone(), label);
        }
        mapping
    }

    pub fn insert(&mut self, source: impl Into<String>, output: impl Into<String>) {
        let source = source.into();
        let output = output.into();
        if let Some(entry) = self
            .entries
            .iter_mut()
            .find(|entry| entry.source_column == source)
        {
            entry.output_column = output;
        } else {
            self.entries.push(ColumnRename {
                source_column: source,
                output_column: output,
            });
        }
    }

    #[must_use]
    pub fn with(mut self, source: impl Into<String>, output: impl Into<String>) -> Self {
        self.insert(source, output);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn entries(&self) -> &[ColumnRename] {
        &self.entries
    }

    /// Source labels in declaration order.
    pub fn source_columns(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.source_column.as_str())
    }

    /// Output labels in declaration order.
    pub fn output_columns(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.output_column.as_str())
    }

    pub fn source_set(&self) -> BTreeSet<String> {
        self.source_columns().map(str::to_string).collect()
    }

    pub fn output_for(&self, source: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|entry| entry.source_column == source)
            .map(|entry| entry.output_column.as_str())
    }
}

impl<S, O> FromIterator<(S, O)> for ColumnMapping
where
    S: Into<String>,
    O: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (S, O)>>(iter: T) -> Self {
        let mut mapping = Self::new();
        for (source, output) in iter {
            mapping.insert(source, output);
        }
        mapping
    }
}
