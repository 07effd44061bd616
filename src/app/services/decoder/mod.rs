//! Locale-aware decoding of spreadsheet cells
//!
//! Every source family declares its own decimal convention up front; the
//! decoder never guesses per cell.
//!
//! ## Architecture
//!
//! - [`numeric`] - numeric literals and limit-of-detection markers
//! - [`timestamp`] - date and time fields composed into a sampling instant

pub mod numeric;
pub mod timestamp;

#[cfg(test)]
pub mod tests;

pub use numeric::{DecodedValue, parse_value};
pub use timestamp::{TimestampDecoder, parse_utc_offset};
