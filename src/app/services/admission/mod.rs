//! Admission filter
//!
//! Decides per (row, column) whether a cell yields a measurement. Rules are
//! evaluated in a fixed order and the first failing rule names the reason:
//!
//! 1. the column is mapped and marked as included
//! 2. manual layout only: the row's matrix type is allowed
//! 3. a companion status cell, when the column has one, carries an accepted code
//! 4. the value cell is not empty

pub mod status;

#[cfg(test)]
pub mod tests;

pub use status::{has_accepted_status, parse_status_codes};

use crate::app::models::LayoutVariant;
use crate::app::services::header_mapping::BoundColumn;
use crate::constants::{DEFAULT_ALLOWED_MATRICES, FIXED_SCHEMA_MISSING_VALUE, MATRIX_COLUMN_INDEX};
use csv::StringRecord;
use std::fmt;

/// Why a cell was not admitted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RejectionReason {
    /// Column unmapped or not marked for inclusion
    NotIncluded,
    /// Row matrix type outside the allowed set
    MatrixType,
    /// Status cell empty or without an accepted code
    Status,
    /// Included, status-admitted column with an empty value cell
    VoidMeasurement,
}

impl fmt::Display for RejectionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::NotIncluded => "not included",
            Self::MatrixType => "matrix type not allowed",
            Self::Status => "status not accepted",
            Self::VoidMeasurement => "void measurement",
        };
        f.write_str(text)
    }
}

/// Outcome of evaluating one cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    Admitted,
    Rejected(RejectionReason),
}

impl Admission {
    pub fn is_admitted(&self) -> bool {
        matches!(self, Self::Admitted)
    }

    pub fn reason(&self) -> Option<RejectionReason> {
        match self {
            Self::Admitted => None,
            Self::Rejected(reason) => Some(*reason),
        }
    }
}

/// Per-cell admission policy
#[derive(Debug, Clone)]
pub struct AdmissionFilter {
    allowed_matrices: Vec<String>,
}

impl Default for AdmissionFilter {
    fn default() -> Self {
        Self::new(DEFAULT_ALLOWED_MATRICES.iter().copied())
    }
}

impl AdmissionFilter {
    /// Create a filter admitting the given matrix types for the manual layout
    pub fn new<I, S>(allowed_matrices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            allowed_matrices: allowed_matrices.into_iter().map(Into::into).collect(),
        }
    }

    pub fn allowed_matrices(&self) -> &[String] {
        &self.allowed_matrices
    }

    /// Whether a row passes the matrix-type constraint of its layout
    pub fn matrix_allowed(&self, row: &StringRecord, layout: LayoutVariant) -> bool {
        if !layout.filters_matrix() {
            return true;
        }
        let matrix = row.get(MATRIX_COLUMN_INDEX).unwrap_or("").trim();
        self.allowed_matrices.iter().any(|allowed| allowed == matrix)
    }

    /// Evaluate the admission rules for one cell
    pub fn evaluate(
        &self,
        row: &StringRecord,
        column: &BoundColumn,
        layout: LayoutVariant,
    ) -> Admission {
        if !column.is_included() {
            return Admission::Rejected(RejectionReason::NotIncluded);
        }

        if !self.matrix_allowed(row, layout) {
            return Admission::Rejected(RejectionReason::MatrixType);
        }

        if let Some(status_index) = column.status_index {
            let status = row.get(status_index).unwrap_or("");
            if !has_accepted_status(status) {
                return Admission::Rejected(RejectionReason::Status);
            }
        }

        if is_void(row.get(column.index).unwrap_or(""), layout) {
            return Admission::Rejected(RejectionReason::VoidMeasurement);
        }

        Admission::Admitted
    }

    /// Boolean form of [`AdmissionFilter::evaluate`]
    pub fn admit(&self, row: &StringRecord, column: &BoundColumn, layout: LayoutVariant) -> bool {
        self.evaluate(row, column, layout).is_admitted()
    }
}

/// Empty value cell; UNESP tables also write `-` for "not measured"
fn is_void(value: &str, layout: LayoutVariant) -> bool {
    let value = value.trim();
    value.is_empty() || (layout == LayoutVariant::FixedSchema && value == FIXED_SCHEMA_MISSING_VALUE)
}
