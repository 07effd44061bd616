//! Tests for mapping resource loading

use super::*;
use crate::Error;
use crate::app::services::header_mapping::{ColumnLayout, is_status_column};
use std::fs;
use tempfile::TempDir;

#[test]
fn test_entries_and_inclusion() {
    let table = manual_table();

    let turbidity = table.entry("Turbidez (NTU)").unwrap();
    assert_eq!(turbidity.quantity_kind, "TurbidityX");
    assert_eq!(turbidity.unit, "NTU");
    assert!(turbidity.included);

    // Mapped but not marked with "x"
    assert!(!table.is_included("pH lab"));
    assert!(table.entry("pH lab").is_some());

    // Unknown column
    assert!(table.entry("Cor verdadeira (UC)").is_none());
    assert!(!table.is_included("Cor verdadeira (UC)"));

    assert_eq!(table.included_count(), 2);
}

#[test]
fn test_column_order_and_status_association() {
    let table = manual_table();
    let names: Vec<&str> = table.columns().iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names[4], "Turbidez (NTU)");
    assert_eq!(table.columns()[4].position, 4);

    assert_eq!(table.status_column_for("Turbidez (NTU)"), Some("Status_Turbidez"));
    assert_eq!(table.status_column_for("pH lab"), Some("Status_pH lab"));
    // Last column has no neighbour
    assert_eq!(table.status_column_for("Vazao (m³/s)"), None);

    // Only included columns count
    assert_eq!(table.status_association_count(), 1);
}

#[test]
fn test_too_few_metadata_rows() {
    let text = "A;Status_A\nqk;\nunit;\n";
    let err = HeaderMappingTable::parse(LayoutVariant::Manual, "short.csv", text).unwrap_err();
    assert!(matches!(err, Error::StructuralMapping { .. }));
    assert!(err.to_string().contains("found 2"));
}

#[test]
fn test_extra_metadata_rows() {
    let text = "A\nqk\nunit\nx\nsurprise\n";
    let err = HeaderMappingTable::parse(LayoutVariant::Manual, "long.csv", text).unwrap_err();
    assert!(matches!(err, Error::StructuralMapping { .. }));
}

#[test]
fn test_separator_only_padding_is_ignored() {
    let text = "A;B\nqkA;\nunitA;\nx;\n;\n;\n";
    let table = HeaderMappingTable::parse(LayoutVariant::Automatic, "padded.csv", text).unwrap();
    assert!(table.is_included("A"));
    assert!(!table.is_included("B"));
}

#[test]
fn test_column_count_mismatch() {
    let text = "A;B;C\nqkA;qkB;qkC\nu;u\nx;x;x\n";
    let err = HeaderMappingTable::parse(LayoutVariant::Automatic, "ragged.csv", text).unwrap_err();
    match err {
        Error::StructuralMapping { resource, message } => {
            assert_eq!(resource, "ragged.csv");
            assert!(message.contains("unit row has 2 columns"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_included_column_requires_references() {
    let text = "A;B\nqkA;\nunitA;unitB\nx;x\n";
    let err = HeaderMappingTable::parse(LayoutVariant::Automatic, "incomplete.csv", text).unwrap_err();
    assert!(err.to_string().contains("'B'"));
}

#[test]
fn test_included_status_column_is_ignored() {
    let text = "A;Status_A\nqkA;qkS\nunitA;unitS\nx;x\n";
    let table = HeaderMappingTable::parse(LayoutVariant::Automatic, "status.csv", text).unwrap();
    assert!(table.is_included("A"));
    assert!(!table.is_included("Status_A"));
}

#[test]
fn test_duplicate_column() {
    let text = "A;A\nq;q\nu;u\nx;\n";
    assert!(HeaderMappingTable::parse(LayoutVariant::Manual, "dup.csv", text).is_err());

    // Repeated status names occur in real exports
    let text = "A;Status_A;B;Status_A\nq;;q;\nu;;u;\nx;;x;\n";
    assert!(HeaderMappingTable::parse(LayoutVariant::Automatic, "dup.csv", text).is_ok());
}

#[test]
fn test_load_from_directory() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("header-manual.csv"), MANUAL_RESOURCE).unwrap();

    let table = HeaderMappingTable::load(LayoutVariant::Manual, dir.path()).unwrap();
    assert_eq!(table.layout(), LayoutVariant::Manual);
    assert!(table.resource().ends_with("header-manual.csv"));

    let missing = HeaderMappingTable::load(LayoutVariant::Automatic, dir.path()).unwrap_err();
    assert!(matches!(missing, Error::StructuralMapping { .. }));
}

#[test]
fn test_fixed_schema_table() {
    let table = HeaderMappingTable::load(LayoutVariant::FixedSchema, std::path::Path::new("unused")).unwrap();
    assert_eq!(table.layout(), LayoutVariant::FixedSchema);

    let iron = table.entry("Fe").unwrap();
    assert_eq!(iron.quantity_kind, "doce:TotalIronConcentration");
    assert_eq!(iron.unit, "unit:MilliGM-PER-L");
    assert_eq!(table.entry("Fe-tot"), Some(iron));
    assert!(table.entry("Hg").is_none());
    assert_eq!(table.status_association_count(), 0);
}

#[test]
fn test_column_layout_analysis() {
    let layout = ColumnLayout::analyze(&header("Cor;Status_Cor;Status_Extra;pH;Status_pH"));
    assert_eq!(layout.len(), 5);
    assert_eq!(layout.columns[0].status_column.as_deref(), Some("Status_Cor"));
    assert!(layout.columns[1].is_status);
    assert_eq!(layout.columns[1].status_column, None);
    assert_eq!(layout.get("pH").unwrap().status_column.as_deref(), Some("Status_pH"));
    assert_eq!(layout.status_association_count(), 2);

    assert!(is_status_column(" Status_Turbidez"));
    assert!(!is_status_column("Turbidez (NTU)"));
}
