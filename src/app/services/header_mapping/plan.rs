//! Binding a mapping table to the header of one data file
//!
//! The status association recorded in the mapping resource is checked by
//! name against the actual data header before any row is read, so a
//! reordered export cannot pair a value with the wrong status column.

use super::columns::ColumnLayout;
use super::table::{HeaderMappingEntry, HeaderMappingTable};
use crate::app::models::LayoutVariant;
use crate::constants::{FIXED_SCHEMA_DATE_MARKER, FIXED_SCHEMA_SAMPLE_MARKER};
use tracing::{debug, warn};

/// A data column of one file, resolved against the mapping table
#[derive(Debug, Clone, PartialEq)]
pub struct BoundColumn {
    /// Column name as it appears in the data header
    pub name: String,

    /// Position of the value cell in each row
    pub index: usize,

    /// Mapping entry, `None` when the table does not know the column
    pub entry: Option<HeaderMappingEntry>,

    /// Position of the companion status cell, if the column has one
    pub status_index: Option<usize>,
}

impl BoundColumn {
    pub fn is_included(&self) -> bool {
        self.entry.as_ref().is_some_and(|e| e.included)
    }
}

/// Columns of one data file that the row loop visits, in header order
#[derive(Debug, Clone)]
pub struct ColumnPlan {
    pub layout: LayoutVariant,

    pub columns: Vec<BoundColumn>,

    /// Data columns with no mapping entry
    pub unmapped: Vec<String>,

    /// Included columns absent from the data header
    pub missing: Vec<String>,

    /// Included columns dropped because their status column is absent
    pub missing_status: Vec<String>,
}

impl ColumnPlan {
    pub fn included_count(&self) -> usize {
        self.columns.iter().filter(|c| c.is_included()).count()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

impl HeaderMappingTable {
    /// Resolve this table against the header of a data file
    pub fn bind<S: AsRef<str>>(&self, data_header: &[S]) -> ColumnPlan {
        let data = ColumnLayout::analyze(data_header);
        let mut plan = ColumnPlan {
            layout: self.layout(),
            columns: Vec::new(),
            unmapped: Vec::new(),
            missing: Vec::new(),
            missing_status: Vec::new(),
        };

        match self.layout() {
            LayoutVariant::FixedSchema => self.bind_fixed_schema(&data, &mut plan),
            LayoutVariant::Automatic | LayoutVariant::Manual => {
                self.bind_with_status(&data, &mut plan)
            }
        }

        plan.missing = self
            .columns()
            .iter()
            .filter(|spec| self.is_included(&spec.name) && !data.has_column(&spec.name))
            .map(|spec| spec.name.clone())
            .collect();

        if !plan.missing.is_empty() {
            debug!(
                "{} included columns of {} are absent from this file",
                plan.missing.len(),
                self.resource()
            );
        }

        plan
    }

    fn bind_with_status(&self, data: &ColumnLayout, plan: &mut ColumnPlan) {
        for spec in data.columns.iter().filter(|spec| !spec.is_status) {
            let Some(entry) = self.entry(&spec.name) else {
                plan.unmapped.push(spec.name.clone());
                continue;
            };

            let status_name = match (self.status_column_for(&spec.name), &spec.status_column) {
                (Some(expected), _) => Some(expected.to_string()),
                (None, Some(observed)) => {
                    if entry.included {
                        warn!(
                            "Column '{}' is followed by '{}' in the data file but has no status column in {}",
                            spec.name,
                            observed,
                            self.resource()
                        );
                    }
                    Some(observed.clone())
                }
                (None, None) => None,
            };

            // The adjacent status column wins over a lookup by name, which
            // would resolve repeated status names to their first occurrence
            let adjacent = spec
                .status_column
                .as_ref()
                .filter(|observed| status_name.as_ref() == Some(*observed))
                .map(|_| spec.position + 1);

            let status_index = match status_name {
                Some(_) if adjacent.is_some() => adjacent,
                Some(name) => match data.get_index(&name) {
                    Some(index) => Some(index),
                    None => {
                        if entry.included {
                            warn!(
                                "Status column '{}' for '{}' is missing from the data file, column skipped",
                                name, spec.name
                            );
                            plan.missing_status.push(spec.name.clone());
                        }
                        continue;
                    }
                },
                None => None,
            };

            plan.columns.push(BoundColumn {
                name: spec.name.clone(),
                index: spec.position,
                entry: Some(entry.clone()),
                status_index,
            });
        }
    }

    fn bind_fixed_schema(&self, data: &ColumnLayout, plan: &mut ColumnPlan) {
        for spec in &data.columns {
            if spec.name.contains(FIXED_SCHEMA_DATE_MARKER)
                || spec.name.contains(FIXED_SCHEMA_SAMPLE_MARKER)
            {
                continue;
            }

            match self.entry(&spec.name) {
                Some(entry) => plan.columns.push(BoundColumn {
                    name: spec.name.clone(),
                    index: spec.position,
                    entry: Some(entry.clone()),
                    status_index: None,
                }),
                None => {
                    if !spec.name.is_empty() {
                        plan.unmapped.push(spec.name.clone());
                    }
                }
            }
        }

        if !plan.unmapped.is_empty() {
            warn!(
                "Unknown element codes treated as not included: {}",
                plan.unmapped.join(", ")
            );
        }
    }
}
