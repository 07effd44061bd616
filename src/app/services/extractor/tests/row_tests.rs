use crate::app::models::LayoutVariant;
use crate::app::services::decoder::TimestampDecoder;
use crate::app::services::extractor::RowKeys;
use csv::StringRecord;

fn decoder() -> TimestampDecoder {
    TimestampDecoder::from_settings("-03:00", "12:00").unwrap()
}

#[test]
fn test_renova_keys_by_name() {
    let header = ["Matriz", "DataAmostra", "CodigoDoPonto", "HoraAmostra"];
    let keys = RowKeys::locate(LayoutVariant::Automatic, &header, "a.csv").unwrap();
    let row = StringRecord::from(vec!["Agua", "08/08/2018", " EBN 01 ", "13:45"]);

    assert_eq!(keys.location(&row).unwrap(), "EBN-01");
    assert_eq!(
        keys.timestamp(&row, &decoder()).unwrap().to_rfc3339(),
        "2018-08-08T13:45:00-03:00"
    );
}

#[test]
fn test_renova_time_column_optional() {
    let header = ["CodigoDoPonto", "DataAmostra"];
    let keys = RowKeys::locate(LayoutVariant::Manual, &header, "m.csv").unwrap();
    let row = StringRecord::from(vec!["RCA-01", "01/08/2017"]);

    assert_eq!(
        keys.timestamp(&row, &decoder()).unwrap().to_rfc3339(),
        "2017-08-01T12:00:00-03:00"
    );
}

#[test]
fn test_missing_point_column() {
    let header = ["Matriz", "DataAmostra"];
    assert!(RowKeys::locate(LayoutVariant::Manual, &header, "m.csv").is_err());
}

#[test]
fn test_fixed_schema_keys_positional() {
    let header = ["Data (dd/mm/aa)", "Amostra"];
    let keys = RowKeys::locate(LayoutVariant::FixedSchema, &header, "u.csv").unwrap();
    let row = StringRecord::from(vec!["30/04/16", "M 2"]);

    assert_eq!(keys.location(&row).unwrap(), "UNESP_M-2");
    assert_eq!(
        keys.timestamp(&row, &decoder()).unwrap().to_rfc3339(),
        "2016-04-30T12:00:00-03:00"
    );
}

#[test]
fn test_empty_point_code_is_decode_error() {
    let header = ["CodigoDoPonto", "DataAmostra"];
    let keys = RowKeys::locate(LayoutVariant::Manual, &header, "m.csv").unwrap();
    let row = StringRecord::from(vec!["  ", "01/08/2017"]);
    assert!(keys.location(&row).unwrap_err().is_decode());
}
