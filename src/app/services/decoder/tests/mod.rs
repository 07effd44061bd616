//! Tests for cell decoding
//!
//! Shared helpers for building decoders with the Brasília offset used by
//! the source spreadsheets.

use chrono::{FixedOffset, NaiveTime};

use super::TimestampDecoder;

mod numeric_tests;

/// Offset used throughout the monitoring data (UTC-3)
pub fn brasilia() -> FixedOffset {
    FixedOffset::west_opt(3 * 3600).unwrap()
}

/// Decoder with noon as the default time-of-day
pub fn noon_decoder() -> TimestampDecoder {
    TimestampDecoder::new(brasilia(), NaiveTime::from_hms_opt(12, 0, 0).unwrap())
}
