//! Shared fixtures for header mapping tests

use crate::app::models::LayoutVariant;
use crate::app::services::header_mapping::HeaderMappingTable;

mod table_tests;

/// Small manual-layout mapping resource
pub const MANUAL_RESOURCE: &str = "\
Matriz;CodigoDoPonto;DataAmostra;HoraAmostra;Turbidez (NTU);Status_Turbidez;pH lab;Status_pH lab;Vazao (m³/s)
;;;;TurbidityX;;pH;;doce:WaterFlowRate
;;;;NTU;;unit:PH;;unit:M3-PER-SEC
;;;;x;;;;x
";

pub fn manual_table() -> HeaderMappingTable {
    HeaderMappingTable::parse(LayoutVariant::Manual, "header-manual.csv", MANUAL_RESOURCE).unwrap()
}

/// Split a `;`-joined header into owned names
pub fn header(line: &str) -> Vec<String> {
    line.split(';').map(str::to_string).collect()
}
