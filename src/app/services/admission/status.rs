//! Status cell parsing
//!
//! A status cell may hold several codes joined by commas (`"1,4"`).
//! Admission only asks whether an accepted digit occurs anywhere in the
//! cell; the parsed code list is kept for diagnostics.

use crate::app::models::StatusCode;
use crate::constants::status_codes::ACCEPTED;

/// Codes present in a status cell, in order, ignoring unknown tokens
pub fn parse_status_codes(raw: &str) -> Vec<StatusCode> {
    raw.split(|c: char| !c.is_ascii_digit())
        .filter(|token| !token.is_empty())
        .filter_map(|token| token.parse::<u8>().ok())
        .filter_map(StatusCode::from_code)
        .collect()
}

/// Whether the cell contains an accepted code digit; an empty cell never does
pub fn has_accepted_status(raw: &str) -> bool {
    raw.chars()
        .filter_map(|c| c.to_digit(10))
        .any(|digit| ACCEPTED.contains(&(digit as u8)))
}
