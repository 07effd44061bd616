//! Tests for numeric cell decoding

use super::super::numeric::{DecodedValue, parse_value};
use crate::app::models::NumericLocale;

fn value(raw: &str, locale: NumericLocale) -> f64 {
    parse_value(raw, "col", locale, true)
        .unwrap()
        .value()
        .unwrap()
}

#[test]
fn test_comma_decimal_recovers_value() {
    let parsed = value("12,34", NumericLocale::CommaDecimal);
    assert_eq!(parsed as f32, 12.34_f32);

    assert!((value("-20,27638884", NumericLocale::CommaDecimal) + 20.27638884).abs() < 1e-9);
    assert_eq!(value("1.234,5", NumericLocale::CommaDecimal), 1234.5);
    assert_eq!(value("7", NumericLocale::CommaDecimal), 7.0);
}

#[test]
fn test_dot_decimal_recovers_value() {
    let parsed = value("12.34", NumericLocale::DotDecimal);
    assert_eq!(parsed as f32, 12.34_f32);

    assert_eq!(value("0.00154", NumericLocale::DotDecimal), 0.00154);
    assert_eq!(value("15564", NumericLocale::DotDecimal), 15564.0);
    assert_eq!(value("1,234.5", NumericLocale::DotDecimal), 1234.5);
    assert_eq!(value("1.5E-3", NumericLocale::DotDecimal), 0.0015);
}

#[test]
fn test_locale_is_not_inferred_per_cell() {
    // A dot-decimal literal is malformed under the comma convention, not regrouped
    assert!(parse_value("0.05", "Ferro", NumericLocale::CommaDecimal, false).is_err());
    // A comma-decimal literal is malformed under the dot convention
    assert!(parse_value("1,4", "Ferro", NumericLocale::DotDecimal, false).is_err());
}

#[test]
fn test_below_detection_marker() {
    let decoded = parse_value("<5.0", "Cd", NumericLocale::DotDecimal, true).unwrap();
    assert_eq!(decoded, DecodedValue::BelowDetection);
    assert_eq!(decoded.value(), None);

    let decoded = parse_value("<0,001", "Cd", NumericLocale::CommaDecimal, true).unwrap();
    assert_eq!(decoded, DecodedValue::BelowDetection);
}

#[test]
fn test_above_limit_marker_is_stripped() {
    let decoded = parse_value(">5.0", "Mn", NumericLocale::DotDecimal, true).unwrap();
    assert_eq!(decoded, DecodedValue::Value(5.0));

    let decoded = parse_value("> 2,5", "Mn", NumericLocale::CommaDecimal, true).unwrap();
    assert_eq!(decoded, DecodedValue::Value(2.5));
}

#[test]
fn test_markers_rejected_when_disabled() {
    assert!(parse_value("<5.0", "Mn", NumericLocale::DotDecimal, false).is_err());
    assert!(parse_value(">5.0", "Mn", NumericLocale::DotDecimal, false).is_err());
}

#[test]
fn test_malformed_values_carry_context() {
    let err = parse_value("abc", "Turbidez (NTU)", NumericLocale::DotDecimal, false).unwrap_err();
    match err {
        crate::Error::Decode { column, raw, .. } => {
            assert_eq!(column, "Turbidez (NTU)");
            assert_eq!(raw, "abc");
        }
        other => panic!("unexpected error: {other:?}"),
    }

    assert!(parse_value("", "c", NumericLocale::DotDecimal, false).is_err());
    assert!(parse_value("-", "c", NumericLocale::DotDecimal, false).is_err());
    assert!(parse_value("1.2.3", "c", NumericLocale::DotDecimal, false).is_err());
    assert!(parse_value("1e", "c", NumericLocale::DotDecimal, false).is_err());
    assert!(parse_value("NaN", "c", NumericLocale::DotDecimal, false).is_err());
}

#[test]
fn test_signs_and_whitespace() {
    assert_eq!(value(" -0.5 ", NumericLocale::DotDecimal), -0.5);
    assert_eq!(value("+3", NumericLocale::DotDecimal), 3.0);
    assert_eq!(value(",5", NumericLocale::CommaDecimal), 0.5);
}
