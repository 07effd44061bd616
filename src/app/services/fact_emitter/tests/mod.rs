//! Fixtures for fact emitter tests

use crate::app::models::{Agent, Reading, TimeInterval};
use chrono::{FixedOffset, TimeZone};


pub const INTEGRADOCE: &str = "http://purl.org/nemo/integradoce#";
pub const DOCE: &str = "http://purl.org/nemo/doce#";
pub const GUFO: &str = "http://purl.org/nemo/gufo#";

/// Turbidity reading at RCA-01, 2017-08-01 00:30 Brasília time
pub fn turbidity_reading() -> Reading {
    let at = FixedOffset::west_opt(3 * 3600)
        .unwrap()
        .with_ymd_and_hms(2017, 8, 1, 0, 30, 0)
        .unwrap();
    Reading {
        location: "RCA-01".to_string(),
        quantity_kind: "TurbidityX".to_string(),
        unit: "NTU".to_string(),
        value: 15.8,
        interval: TimeInterval::instant(at),
        agent: Agent::Renova,
        source_column: "Turbidez (NTU)".to_string(),
    }
}
