//! Sampling date and time decoding
//!
//! Sources split the sampling instant into a `dd/MM/yyyy` (or `dd/MM/yy`)
//! date and an optional `HH:mm` time. Missing times fall back to a fixed
//! time-of-day; the instant carries the configured UTC offset.

use crate::constants::DEFAULT_UTC_OFFSET;
use crate::{Error, Result};
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Offset, Utc};

/// Composes sampling instants from separate date and time fields
#[derive(Debug, Clone, Copy)]
pub struct TimestampDecoder {
    offset: FixedOffset,
    default_time: NaiveTime,
}

impl TimestampDecoder {
    /// Create a decoder with an explicit offset and default time-of-day
    pub fn new(offset: FixedOffset, default_time: NaiveTime) -> Self {
        Self {
            offset,
            default_time,
        }
    }

    /// Create a decoder from textual settings (`"-03:00"`, `"12:00"`)
    pub fn from_settings(utc_offset: &str, default_time: &str) -> Result<Self> {
        let offset = parse_utc_offset(utc_offset)?;
        let default_time = parse_time(default_time, "default_time")?;
        Ok(Self::new(offset, default_time))
    }

    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    pub fn default_time(&self) -> NaiveTime {
        self.default_time
    }

    /// Compose the sampling instant from a date cell and an optional time cell
    ///
    /// An absent or blank time uses the default time-of-day.
    pub fn parse_timestamp(
        &self,
        date: &str,
        time: Option<&str>,
        date_column: &str,
        time_column: &str,
    ) -> Result<DateTime<FixedOffset>> {
        let date = parse_date(date, date_column)?;
        let time = match time.map(str::trim).filter(|t| !t.is_empty()) {
            Some(raw) => parse_time(raw, time_column)?,
            None => self.default_time,
        };

        NaiveDateTime::new(date, time)
            .and_local_timezone(self.offset)
            .single()
            .ok_or_else(|| {
                Error::decode(
                    date_column,
                    date.to_string(),
                    "ambiguous local time for configured offset",
                )
            })
    }
}

/// Parse `dd/MM/yyyy` or `dd/MM/yy`
///
/// A trailing time component left by spreadsheet exports
/// (`08/08/2018 00:00:00`) is ignored.
pub fn parse_date(raw: &str, column: &str) -> Result<NaiveDate> {
    let trimmed = raw.trim();
    let date_part = trimmed.split_whitespace().next().unwrap_or("");

    let year_len = date_part.rsplit('/').next().map(str::len).unwrap_or(0);
    let format = match year_len {
        2 => "%d/%m/%y",
        4 => "%d/%m/%Y",
        _ => {
            return Err(Error::decode(
                column,
                raw,
                "expected date as dd/MM/yyyy or dd/MM/yy",
            ));
        }
    };

    NaiveDate::parse_from_str(date_part, format)
        .map_err(|e| Error::decode(column, raw, format!("invalid date: {}", e)))
}

/// Parse `HH:mm` or `HH:mm:ss`
pub fn parse_time(raw: &str, column: &str) -> Result<NaiveTime> {
    let trimmed = raw.trim();
    NaiveTime::parse_from_str(trimmed, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(trimmed, "%H:%M:%S"))
        .map_err(|e| Error::decode(column, raw, format!("invalid time: {}", e)))
}

/// Parse a UTC offset written as `±HH:MM` (or `Z`)
pub fn parse_utc_offset(raw: &str) -> Result<FixedOffset> {
    let trimmed = raw.trim();
    if trimmed.eq_ignore_ascii_case("z") || trimmed.eq_ignore_ascii_case("utc") {
        return Ok(Utc.fix());
    }

    let invalid = || {
        Error::configuration(format!(
            "Invalid UTC offset '{}', expected e.g. '{}'",
            raw, DEFAULT_UTC_OFFSET
        ))
    };

    let (sign, rest) = match trimmed.chars().next() {
        Some('+') => (1, &trimmed[1..]),
        Some('-') => (-1, &trimmed[1..]),
        _ => return Err(invalid()),
    };

    let (hours, minutes) = rest.split_once(':').ok_or_else(invalid)?;
    let hours: i32 = hours.parse().map_err(|_| invalid())?;
    let minutes: i32 = minutes.parse().map_err(|_| invalid())?;
    if !(0..60).contains(&minutes) {
        return Err(invalid());
    }

    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60)).ok_or_else(invalid)
}
