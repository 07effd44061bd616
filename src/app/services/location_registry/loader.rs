//! Point catalogue parsing
//!
//! Renova columns are located by name; the UNESP catalogue is positional
//! (code, reference, latitude, longitude). Both write comma-decimal
//! coordinates.

use crate::app::adapters::filesystem::{csv_reader, header_names};
use crate::app::models::{GeographicPoint, NumericLocale};
use crate::app::services::decoder::parse_value;
use crate::app::services::dispatcher::MetadataKind;
use crate::constants::{UNESP_POINT_PREFIX, renova_points};
use crate::{Error, Result};
use csv::StringRecord;
use tracing::warn;

/// Points read from one catalogue
#[derive(Debug, Clone, Default)]
pub struct ParsedPoints {
    pub points: Vec<GeographicPoint>,
    pub rows: usize,
    pub invalid: usize,
}

/// Column positions of the fields a point is built from
struct PointColumns {
    code: usize,
    label: usize,
    description: usize,
    latitude: usize,
    longitude: usize,
}

/// Replace whitespace in a point code with `-`
pub fn normalize_code(raw: &str) -> String {
    raw.trim()
        .chars()
        .map(|c| if c.is_whitespace() { '-' } else { c })
        .collect()
}

/// Code of a UNESP point, kept apart from Renova codes by a prefix
pub fn unesp_code(raw: &str) -> String {
    format!("{}{}", UNESP_POINT_PREFIX, normalize_code(raw))
}

/// Parse a point catalogue of the given kind
pub fn parse_points(text: &str, kind: MetadataKind, resource: &str) -> Result<ParsedPoints> {
    let mut reader = csv_reader(text);
    let headers = header_names(&mut reader, resource)?;

    let columns = match kind {
        MetadataKind::RenovaPoints => {
            let find = |name: &str| {
                headers.iter().position(|h| h == name).ok_or_else(|| {
                    Error::csv_parsing(resource, format!("Missing column {}", name), None)
                })
            };
            PointColumns {
                code: find(renova_points::CODE)?,
                label: find(renova_points::NAME)?,
                description: find(renova_points::DESCRIPTION)?,
                latitude: find(renova_points::LATITUDE)?,
                longitude: find(renova_points::LONGITUDE)?,
            }
        }
        MetadataKind::UnespPoints => PointColumns {
            code: 0,
            label: 1,
            description: 1,
            latitude: 2,
            longitude: 3,
        },
    };

    let mut parsed = ParsedPoints::default();
    for (index, record) in reader.records().enumerate() {
        let record = record.map_err(|e| {
            Error::csv_parsing(resource, format!("Failed to read row {}", index + 2), Some(e))
        })?;
        if record.iter().all(|field| field.trim().is_empty()) {
            continue;
        }
        parsed.rows += 1;

        match build_point(&record, &columns, kind) {
            Ok(point) => parsed.points.push(point),
            Err(e) => {
                warn!("Skipping row {} of {}: {}", index + 2, resource, e);
                parsed.invalid += 1;
            }
        }
    }

    Ok(parsed)
}

fn build_point(record: &StringRecord, columns: &PointColumns, kind: MetadataKind) -> Result<GeographicPoint> {
    let field = |i: usize| record.get(i).unwrap_or("").trim();

    let code = match kind {
        MetadataKind::RenovaPoints => normalize_code(field(columns.code)),
        MetadataKind::UnespPoints if field(columns.code).is_empty() => String::new(),
        MetadataKind::UnespPoints => unesp_code(field(columns.code)),
    };

    let coordinate = |i: usize, name: &str| -> Result<f32> {
        let value = parse_value(field(i), name, NumericLocale::CommaDecimal, false)?;
        value
            .value()
            .map(|v| v as f32)
            .ok_or_else(|| Error::decode(name, field(i), "coordinate out of detection range"))
    };

    GeographicPoint::new(
        code,
        field(columns.label).to_string(),
        field(columns.description).to_string(),
        coordinate(columns.latitude, "latitude")?,
        coordinate(columns.longitude, "longitude")?,
    )
}
