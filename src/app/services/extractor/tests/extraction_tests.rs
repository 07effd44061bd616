use super::*;
use crate::app::models::GeographicPoint;
use crate::app::services::fact_emitter::{Literal, Object};
use crate::app::services::header_mapping::tests::manual_table;
use crate::app::services::location_registry::LocationRegistry;
use crate::config::DecodePolicy;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_manual_row_yields_one_measurement() {
    let text = manual_file(&[
        "Agua;RCA-01;01/08/2017;00:30;15.8;1",
        "Solo;RCA-01;01/08/2017;00:30;20.1;1",
    ]);
    let (stats, sink) = run(&extractor(), &manual_table(), &text, &LocationRegistry::new());
    let stats = stats.unwrap();

    assert_eq!(stats.rows, 2);
    assert_eq!(stats.facts_emitted, 1);
    assert_eq!(stats.skipped_rows, 1);
    assert!(!stats.is_aborted());

    let subject = format!("{INTEGRADOCE}TurbidityXMeasurement1");
    assert_eq!(sink.instances_of(&format!("{DOCE}Measurement")), vec![subject.as_str()]);

    let value = sink.objects(&subject, &format!("{GUFO}hasQualityValue"));
    assert_eq!(value, vec![&Object::Literal(Literal::Double(15.8))]);

    let begin = sink.objects(&subject, &format!("{GUFO}hasBeginPointInXSDDateTimeStamp"));
    assert_eq!(
        begin[0].as_literal().unwrap().lexical(),
        "2017-08-01T00:30:00-03:00"
    );

    let located = sink.objects(&subject, &format!("{DOCE}locatedIn"));
    assert_eq!(located[0].as_iri(), Some(format!("{INTEGRADOCE}RCA-01").as_str()));
}

#[test]
fn test_status_codes_gate_cells() {
    let text = manual_file(&[
        "Agua;RCA-01;01/08/2017;00:30;15.8;2",
        "Agua;RCA-01;02/08/2017;00:30;16.1;1,4",
        "Agua;RCA-01;03/08/2017;00:30;16.4;",
    ]);
    let (stats, sink) = run(&extractor(), &manual_table(), &text, &LocationRegistry::new());
    let stats = stats.unwrap();

    assert_eq!(stats.facts_emitted, 1);
    assert_eq!(stats.rejected_status, 2);
    assert_eq!(sink.instances_of(&format!("{DOCE}Measurement")).len(), 1);
}

#[test]
fn test_void_measurement_counted() {
    let text = manual_file(&["Agua;RCA-01;01/08/2017;00:30;;1"]);
    let (stats, sink) = run(&extractor(), &manual_table(), &text, &LocationRegistry::new());
    let stats = stats.unwrap();

    assert_eq!(stats.void_measurements, 1);
    assert_eq!(stats.facts_emitted, 0);
    assert!(sink.is_empty());
}

#[test]
fn test_skip_policy_continues_after_bad_cell() {
    let text = manual_file(&[
        "Agua;RCA-01;01/08/2017;00:30;abc;1",
        "Agua;RCA-01;02/08/2017;00:30;12.0;1",
    ]);
    let (stats, _) = run(&extractor(), &manual_table(), &text, &LocationRegistry::new());
    let stats = stats.unwrap();

    assert_eq!(stats.decode_failures, 1);
    assert_eq!(stats.facts_emitted, 1);
    assert!(!stats.is_aborted());
}

#[test]
fn test_bad_date_skips_row() {
    let text = manual_file(&[
        "Agua;RCA-01;31/02/2017;00:30;12.0;1",
        "Agua;RCA-01;01/03/2017;25:99;12.0;1",
        "Agua;RCA-01;01/03/2017;;12.0;1",
    ]);
    let (stats, sink) = run(&extractor(), &manual_table(), &text, &LocationRegistry::new());
    let stats = stats.unwrap();

    assert_eq!(stats.decode_failures, 2);
    assert_eq!(stats.facts_emitted, 1);

    // A blank time falls back to noon
    let subject = format!("{INTEGRADOCE}TurbidityXMeasurement1");
    let begin = sink.objects(&subject, &format!("{GUFO}hasBeginPointInXSDDateTimeStamp"));
    assert_eq!(
        begin[0].as_literal().unwrap().lexical(),
        "2017-03-01T12:00:00-03:00"
    );
}

#[test]
fn test_strict_policy_abandons_file_and_keeps_prior_facts() {
    let text = manual_file(&[
        "Agua;RCA-01;01/08/2017;00:30;15.8;1",
        "Agua;RCA-01;02/08/2017;00:30;n/d;1",
        "Agua;RCA-01;03/08/2017;00:30;16.0;1",
    ]);
    let extractor = extractor().with_decode_policy(DecodePolicy::Strict);
    let (stats, sink) = run(&extractor, &manual_table(), &text, &LocationRegistry::new());
    let stats = stats.unwrap();

    assert_eq!(stats.facts_emitted, 1);
    assert_eq!(stats.decode_failures, 1);
    assert!(stats.aborted.as_deref().unwrap().starts_with("line 3"));
    assert_eq!(sink.instances_of(&format!("{DOCE}Measurement")).len(), 1);
}

#[test]
fn test_unregistered_locations_are_emitted_and_counted() {
    let mut registry = LocationRegistry::new();
    registry.register(
        GeographicPoint::new("RCA-01".into(), "Carmo".into(), String::new(), -20.3, -43.1)
            .unwrap(),
    );

    let text = manual_file(&[
        "Agua;RCA-01;01/08/2017;00:30;15.8;1",
        "Agua;RCA 02;01/08/2017;00:30;15.9;1",
        "Agua;RCA 02;02/08/2017;00:30;16.0;1",
    ]);
    let (stats, _) = run(&extractor(), &manual_table(), &text, &registry);
    let stats = stats.unwrap();

    assert_eq!(stats.facts_emitted, 3);
    assert_eq!(stats.unknown_location_facts, 2);
    assert_eq!(
        stats.unknown_locations.iter().collect::<Vec<_>>(),
        vec!["RCA-02"]
    );
    assert!(stats.summary().contains("1 unregistered locations"));
}

#[test]
fn test_missing_key_column_is_fatal() {
    let text = "Matriz;DataAmostra;Turbidez (NTU);Status_Turbidez\nAgua;01/08/2017;1.0;1\n";
    let (stats, _) = run(&extractor(), &manual_table(), text, &LocationRegistry::new());
    assert!(stats.is_err());
}

#[test]
fn test_extract_file_from_disk() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("manual.csv");
    fs::write(&path, manual_file(&["Agua;RCA-01;01/08/2017;00:30;15.8;1"])).unwrap();

    let vocabulary = Vocabulary::new();
    let mut sink = MemorySink::new();
    let mut emitter = FactEmitter::new(&vocabulary, &mut sink, Box::new(CounterAllocator::new()));
    let stats = extractor()
        .extract_file(&path, &manual_table(), &LocationRegistry::new(), &mut emitter)
        .unwrap();

    assert_eq!(stats.facts_emitted, 1);
    assert!(stats.file.ends_with("manual.csv"));
}
