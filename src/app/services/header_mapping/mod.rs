//! Header mapping tables
//!
//! Binds the columns of a data file to quantity kinds and units taken from a
//! side-loaded mapping resource (Renova layouts) or from the fixed element
//! code table (UNESP), together with each column's companion status column.

pub mod columns;
pub mod plan;
pub mod table;

#[cfg(test)]
pub mod tests;

pub use columns::{ColumnLayout, ColumnSpec, is_status_column};
pub use plan::{BoundColumn, ColumnPlan};
pub use table::{HeaderMappingEntry, HeaderMappingTable};
