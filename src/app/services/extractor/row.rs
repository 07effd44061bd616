//! Location and sampling-instant cells of a data row

use crate::app::models::LayoutVariant;
use crate::app::services::decoder::TimestampDecoder;
use crate::app::services::location_registry::{normalize_code, unesp_code};
use crate::constants::{POINT_CODE_COLUMN, SAMPLE_DATE_COLUMN, SAMPLE_TIME_COLUMN};
use crate::{Error, Result};
use chrono::{DateTime, FixedOffset};
use csv::StringRecord;

/// Positions of the cells that identify where and when a row was sampled
#[derive(Debug, Clone, PartialEq)]
pub struct RowKeys {
    layout: LayoutVariant,
    point: (usize, String),
    date: (usize, String),
    time: Option<(usize, String)>,
}

impl RowKeys {
    /// Locate the key columns in a data header
    ///
    /// Renova files name them explicitly. UNESP tables put the date first
    /// and the sample code second, and carry no time.
    pub fn locate<S: AsRef<str>>(layout: LayoutVariant, header: &[S], file: &str) -> Result<Self> {
        match layout {
            LayoutVariant::Automatic | LayoutVariant::Manual => {
                let find = |name: &str| {
                    header
                        .iter()
                        .position(|h| h.as_ref().trim() == name)
                        .map(|index| (index, name.to_string()))
                };
                let required = |name: &str| {
                    find(name).ok_or_else(|| {
                        Error::csv_parsing(file, format!("Missing required column '{}'", name), None)
                    })
                };

                Ok(Self {
                    layout,
                    point: required(POINT_CODE_COLUMN)?,
                    date: required(SAMPLE_DATE_COLUMN)?,
                    time: find(SAMPLE_TIME_COLUMN),
                })
            }
            LayoutVariant::FixedSchema => {
                if header.len() < 2 {
                    return Err(Error::csv_parsing(
                        file,
                        "Fixed-schema header needs a date and a sample column",
                        None,
                    ));
                }
                let name = |index: usize| header[index].as_ref().trim().to_string();
                Ok(Self {
                    layout,
                    point: (1, name(1)),
                    date: (0, name(0)),
                    time: None,
                })
            }
        }
    }

    /// Location code of the row, normalized the way the point catalogues are
    pub fn location(&self, row: &StringRecord) -> Result<String> {
        let (index, column) = &self.point;
        let raw = row.get(*index).unwrap_or("");
        if raw.trim().is_empty() {
            return Err(Error::decode(column, raw, "empty sampling point code"));
        }

        Ok(match self.layout {
            LayoutVariant::FixedSchema => unesp_code(raw),
            LayoutVariant::Automatic | LayoutVariant::Manual => normalize_code(raw),
        })
    }

    /// Sampling instant of the row
    pub fn timestamp(
        &self,
        row: &StringRecord,
        decoder: &TimestampDecoder,
    ) -> Result<DateTime<FixedOffset>> {
        let (date_index, date_column) = &self.date;
        let date = row.get(*date_index).unwrap_or("");

        match &self.time {
            Some((time_index, time_column)) => decoder.parse_timestamp(
                date,
                row.get(*time_index),
                date_column,
                time_column,
            ),
            None => decoder.parse_timestamp(date, None, date_column, ""),
        }
    }
}
