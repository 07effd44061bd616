//! Test fixtures for the admission filter

use crate::app::services::header_mapping::{BoundColumn, HeaderMappingEntry};
use csv::StringRecord;


/// Turbidity column at index 4 with its status at index 5
pub fn turbidity_column() -> BoundColumn {
    BoundColumn {
        name: "Turbidez (NTU)".to_string(),
        index: 4,
        entry: Some(HeaderMappingEntry {
            quantity_kind: "TurbidityX".to_string(),
            unit: "NTU".to_string(),
            included: true,
        }),
        status_index: Some(5),
    }
}

/// Manual-layout row: matrix, point, date, time, value, status
pub fn row(matrix: &str, value: &str, status: &str) -> StringRecord {
    StringRecord::from(vec![matrix, "RCA-01", "01/08/2017", "00:30", value, status])
}
