//! Column analysis for semicolon-delimited source headers
//!
//! Identifies status columns by their name prefix and associates each data
//! column with the status column that immediately follows it.

use crate::constants::STATUS_COLUMN_PREFIX;
use std::collections::HashMap;

/// Position and status association of one header column
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSpec {
    /// Trimmed column name
    pub name: String,

    /// Zero-based ordinal position in the header
    pub position: usize,

    /// Name of the companion status column, if one follows this column
    pub status_column: Option<String>,

    /// Whether this column itself carries status codes
    pub is_status: bool,
}

/// Whether a header name denotes a status column
pub fn is_status_column(name: &str) -> bool {
    name.trim().starts_with(STATUS_COLUMN_PREFIX)
}

/// Ordered header with name lookup
#[derive(Debug, Clone, Default)]
pub struct ColumnLayout {
    /// Columns in header order
    pub columns: Vec<ColumnSpec>,

    /// Column name to index mapping (first occurrence wins)
    pub name_to_index: HashMap<String, usize>,
}

impl ColumnLayout {
    /// Analyze header names, pairing data columns with their status neighbours
    pub fn analyze<S: AsRef<str>>(headers: &[S]) -> Self {
        let names: Vec<String> = headers.iter().map(|h| h.as_ref().trim().to_string()).collect();
        let mut name_to_index = HashMap::with_capacity(names.len());
        let mut columns = Vec::with_capacity(names.len());

        for (position, name) in names.iter().enumerate() {
            name_to_index.entry(name.clone()).or_insert(position);

            let is_status = is_status_column(name);
            let status_column = if is_status {
                None
            } else {
                names
                    .get(position + 1)
                    .filter(|next| is_status_column(next))
                    .cloned()
            };

            columns.push(ColumnSpec {
                name: name.clone(),
                position,
                status_column,
                is_status,
            });
        }

        Self {
            columns,
            name_to_index,
        }
    }

    /// Get the index for a given column name
    pub fn get_index(&self, column_name: &str) -> Option<usize> {
        self.name_to_index.get(column_name).copied()
    }

    pub fn has_column(&self, column_name: &str) -> bool {
        self.name_to_index.contains_key(column_name)
    }

    /// Column spec by name
    pub fn get(&self, column_name: &str) -> Option<&ColumnSpec> {
        self.get_index(column_name).and_then(|i| self.columns.get(i))
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Column names in header order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    /// Number of data columns paired with a status column
    pub fn status_association_count(&self) -> usize {
        self.columns
            .iter()
            .filter(|c| c.status_column.is_some())
            .count()
    }
}
