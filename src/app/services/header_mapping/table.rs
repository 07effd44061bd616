//! Header mapping table loading
//!
//! A mapping resource mirrors the data header of one layout and adds three
//! rows in fixed order: quantity-kind reference, unit reference and the
//! inclusion flag (`x` marks an included column).

use super::columns::{ColumnLayout, ColumnSpec};
use crate::app::adapters::filesystem::{csv_reader, header_names, read_text};
use crate::app::models::LayoutVariant;
use crate::constants::{
    AUTOMATIC_MAPPING_FILE, FIXED_SCHEMA_DATE_MARKER, FIXED_SCHEMA_QUANTITY_KINDS,
    FIXED_SCHEMA_SAMPLE_MARKER, FIXED_SCHEMA_UNIT, INCLUSION_MARKER, MANUAL_MAPPING_FILE,
    MAPPING_METADATA_ROWS,
};
use crate::{Error, Result};
use csv::StringRecord;
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, warn};

/// Resolved metadata of one mapped column
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderMappingEntry {
    /// Quantity-kind reference (IRI, CURIE or bare local name)
    pub quantity_kind: String,

    /// Unit reference
    pub unit: String,

    /// Whether cells of this column may yield measurements
    pub included: bool,
}

/// Column name to mapping entry table for one layout variant
#[derive(Debug, Clone)]
pub struct HeaderMappingTable {
    resource: String,
    layout: LayoutVariant,
    columns: ColumnLayout,
    entries: HashMap<String, HeaderMappingEntry>,
}

const ROW_LABELS: [&str; MAPPING_METADATA_ROWS] = ["quantity kind", "unit", "inclusion"];

impl HeaderMappingTable {
    /// File name of the mapping resource for a layout, if it uses one
    pub fn resource_file(layout: LayoutVariant) -> Option<&'static str> {
        match layout {
            LayoutVariant::Automatic => Some(AUTOMATIC_MAPPING_FILE),
            LayoutVariant::Manual => Some(MANUAL_MAPPING_FILE),
            LayoutVariant::FixedSchema => None,
        }
    }

    /// Load the table governing a layout
    ///
    /// Renova layouts read their resource from `mapping_dir`; the fixed schema
    /// is built from the element code table.
    pub fn load(layout: LayoutVariant, mapping_dir: &Path) -> Result<Self> {
        match Self::resource_file(layout) {
            Some(file) => Self::from_path(layout, &mapping_dir.join(file)),
            None => Ok(Self::fixed_schema()),
        }
    }

    /// Load a mapping resource from disk
    pub fn from_path(layout: LayoutVariant, path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::structural_mapping(
                path.display().to_string(),
                "mapping resource not found",
            ));
        }
        let text = read_text(path)?;
        Self::parse(layout, &path.display().to_string(), &text)
    }

    /// Parse mapping resource text
    pub fn parse(layout: LayoutVariant, resource: &str, text: &str) -> Result<Self> {
        let mut reader = csv_reader(text);
        let headers = header_names(&mut reader, resource)?;
        if headers.iter().all(|h| h.is_empty()) {
            return Err(Error::structural_mapping(resource, "empty header row"));
        }

        let mut rows: Vec<StringRecord> = Vec::with_capacity(MAPPING_METADATA_ROWS);
        for (index, record) in reader.records().enumerate() {
            let record = record.map_err(|e| {
                Error::csv_parsing(resource, format!("Failed to read row {}", index + 2), Some(e))
            })?;
            // Spreadsheet exports pad the sheet with separator-only lines
            if record.iter().all(|field| field.trim().is_empty()) {
                continue;
            }
            rows.push(record);
        }

        if rows.len() != MAPPING_METADATA_ROWS {
            return Err(Error::structural_mapping(
                resource,
                format!(
                    "expected {} metadata rows (quantity kind, unit, inclusion), found {}",
                    MAPPING_METADATA_ROWS,
                    rows.len()
                ),
            ));
        }

        for (row, label) in rows.iter().zip(ROW_LABELS) {
            if row.len() != headers.len() {
                return Err(Error::structural_mapping(
                    resource,
                    format!(
                        "{} row has {} columns but the header declares {}",
                        label,
                        row.len(),
                        headers.len()
                    ),
                ));
            }
        }

        let columns = ColumnLayout::analyze(&headers);
        let mut entries = HashMap::with_capacity(headers.len());

        for (position, name) in headers.iter().enumerate() {
            if name.is_empty() {
                continue;
            }

            let cell = |row: usize| rows[row].get(position).unwrap_or("").trim().to_string();
            let quantity_kind = cell(0);
            let unit = cell(1);
            let mut included = cell(2).eq_ignore_ascii_case(INCLUSION_MARKER);

            if included && (quantity_kind.is_empty() || unit.is_empty()) {
                return Err(Error::structural_mapping(
                    resource,
                    format!("included column '{}' lacks a quantity kind or unit", name),
                ));
            }

            if included && columns.columns[position].is_status {
                warn!(
                    "Status column '{}' is marked as included in {}, ignoring the flag",
                    name, resource
                );
                included = false;
            }

            let entry = HeaderMappingEntry {
                quantity_kind,
                unit,
                included,
            };

            // Renova exports repeat some status names; only value columns must be unique
            if entries.insert(name.clone(), entry).is_some() && !columns.columns[position].is_status {
                return Err(Error::structural_mapping(
                    resource,
                    format!("duplicate column '{}'", name),
                ));
            }
        }

        let table = Self {
            resource: resource.to_string(),
            layout,
            columns,
            entries,
        };

        debug!(
            "Loaded {} mapping from {}: {} columns, {} included, {} status associations",
            layout,
            resource,
            table.len(),
            table.included_count(),
            table.status_association_count()
        );

        Ok(table)
    }

    /// Table for the UNESP fixed schema, built from the element code table
    pub fn fixed_schema() -> Self {
        let mut headers = vec![
            FIXED_SCHEMA_DATE_MARKER.to_string(),
            FIXED_SCHEMA_SAMPLE_MARKER.to_string(),
        ];
        let mut entries = HashMap::with_capacity(FIXED_SCHEMA_QUANTITY_KINDS.len());

        for (code, quantity_kind) in FIXED_SCHEMA_QUANTITY_KINDS {
            headers.push(code.to_string());
            entries.insert(
                code.to_string(),
                HeaderMappingEntry {
                    quantity_kind: quantity_kind.to_string(),
                    unit: FIXED_SCHEMA_UNIT.to_string(),
                    included: true,
                },
            );
        }

        Self {
            resource: "fixed-schema code table".to_string(),
            layout: LayoutVariant::FixedSchema,
            columns: ColumnLayout::analyze(&headers),
            entries,
        }
    }

    /// Entry for a column name; `None` means the column is not mapped
    pub fn entry(&self, column_name: &str) -> Option<&HeaderMappingEntry> {
        self.entries.get(column_name.trim())
    }

    /// Whether a column is mapped and marked as included
    pub fn is_included(&self, column_name: &str) -> bool {
        self.entry(column_name).is_some_and(|e| e.included)
    }

    /// Status column associated with a data column in the resource
    pub fn status_column_for(&self, column_name: &str) -> Option<&str> {
        self.columns
            .get(column_name.trim())
            .and_then(|spec| spec.status_column.as_deref())
    }

    /// Column specs in resource order
    pub fn columns(&self) -> &[ColumnSpec] {
        &self.columns.columns
    }

    pub fn resource(&self) -> &str {
        &self.resource
    }

    pub fn layout(&self) -> LayoutVariant {
        self.layout
    }

    /// Number of mapped columns
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn included_count(&self) -> usize {
        self.entries.values().filter(|e| e.included).count()
    }

    /// Number of included columns bound to a status column
    pub fn status_association_count(&self) -> usize {
        self.columns
            .columns
            .iter()
            .filter(|spec| spec.status_column.is_some() && self.is_included(&spec.name))
            .count()
    }
}
