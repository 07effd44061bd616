//! Fixtures for extraction tests

use crate::app::services::extractor::{Extractor, FileStats};
use crate::app::services::fact_emitter::{CounterAllocator, FactEmitter, MemorySink};
use crate::app::services::header_mapping::HeaderMappingTable;
use crate::app::services::location_registry::LocationRegistry;
use crate::app::vocabulary::Vocabulary;
use crate::config::Config;

mod extraction_tests;
mod row_tests;

pub const DOCE: &str = "http://purl.org/nemo/doce#";
pub const GUFO: &str = "http://purl.org/nemo/gufo#";
pub const INTEGRADOCE: &str = "http://purl.org/nemo/integradoce#";

pub const MANUAL_HEADER: &str =
    "Matriz;CodigoDoPonto;DataAmostra;HoraAmostra;Turbidez (NTU);Status_Turbidez";

/// Manual-layout file made of the short header and the given rows
pub fn manual_file(rows: &[&str]) -> String {
    let mut text = String::from(MANUAL_HEADER);
    for row in rows {
        text.push('\n');
        text.push_str(row);
    }
    text.push('\n');
    text
}

pub fn extractor() -> Extractor {
    Extractor::from_config(&Config::default()).unwrap()
}

/// Run one extraction into a fresh in-memory sink
pub fn run(
    extractor: &Extractor,
    table: &HeaderMappingTable,
    text: &str,
    registry: &LocationRegistry,
) -> (crate::Result<FileStats>, MemorySink) {
    let vocabulary = Vocabulary::new();
    let mut sink = MemorySink::new();
    let mut emitter = FactEmitter::new(&vocabulary, &mut sink, Box::new(CounterAllocator::new()));
    let stats = extractor.extract_text(text, "test.csv", table, registry, &mut emitter);
    drop(emitter);
    (stats, sink)
}
