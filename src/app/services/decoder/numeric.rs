//! Numeric cell decoding
//!
//! Handles comma- and dot-decimal literals, optional digit grouping and the
//! `<`/`>` limit-of-detection markers.

use crate::app::models::NumericLocale;
use crate::{Error, Result};

/// Outcome of decoding a value cell
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DecodedValue {
    /// A measurable value
    Value(f64),
    /// The true value lies below the detection limit; no measurement
    BelowDetection,
}

impl DecodedValue {
    pub fn value(&self) -> Option<f64> {
        match self {
            Self::Value(v) => Some(*v),
            Self::BelowDetection => None,
        }
    }
}

/// Parse a cell into a value under the declared locale
///
/// With `limit_markers` enabled a leading `<` yields
/// [`DecodedValue::BelowDetection`] and a leading `>` is stripped before
/// parsing the remainder. Without it both markers are malformed input.
pub fn parse_value(
    raw: &str,
    column: &str,
    locale: NumericLocale,
    limit_markers: bool,
) -> Result<DecodedValue> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(Error::decode(column, raw, "empty numeric cell"));
    }

    let body = if limit_markers {
        if trimmed.starts_with('<') {
            return Ok(DecodedValue::BelowDetection);
        }
        trimmed.strip_prefix('>').map(str::trim).unwrap_or(trimmed)
    } else {
        trimmed
    };

    let normalized = normalize(body, locale).ok_or_else(|| {
        Error::decode(
            column,
            raw,
            format!(
                "not a {} number",
                match locale {
                    NumericLocale::CommaDecimal => "comma-decimal",
                    NumericLocale::DotDecimal => "dot-decimal",
                }
            ),
        )
    })?;

    normalized
        .parse::<f64>()
        .map(DecodedValue::Value)
        .map_err(|e| Error::decode(column, raw, e.to_string()))
}

/// Rewrite a locale literal into Rust's float syntax, or `None` if malformed
fn normalize(body: &str, locale: NumericLocale) -> Option<String> {
    let (mantissa, exponent) = match body.find(['e', 'E']) {
        Some(i) => (&body[..i], Some(&body[i + 1..])),
        None => (body, None),
    };

    let (sign, digits) = match mantissa.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", mantissa.strip_prefix('+').unwrap_or(mantissa)),
    };

    let (int_part, frac_part) = match digits.split_once(locale.decimal_separator()) {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (digits, None),
    };

    let int_digits = ungroup(int_part, locale.grouping_separator())?;

    if let Some(frac) = frac_part {
        if !frac.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }
        if int_digits.is_empty() && frac.is_empty() {
            return None;
        }
    } else if int_digits.is_empty() {
        return None;
    }

    let mut normalized = String::with_capacity(body.len() + 2);
    normalized.push_str(sign);
    normalized.push_str(if int_digits.is_empty() { "0" } else { &int_digits });
    if let Some(frac) = frac_part.filter(|f| !f.is_empty()) {
        normalized.push('.');
        normalized.push_str(frac);
    }

    if let Some(exp) = exponent {
        let exp_digits = exp.strip_prefix(['-', '+']).unwrap_or(exp);
        if exp_digits.is_empty() || !exp_digits.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }
        normalized.push('e');
        normalized.push_str(exp);
    }

    Some(normalized)
}

/// Strip grouping separators from an integer part
///
/// Groups after the first must hold exactly three digits, so `0.05` is not
/// mistaken for a grouped `5` under the comma-decimal convention.
fn ungroup(int_part: &str, grouping: char) -> Option<String> {
    if !int_part.contains(grouping) {
        return int_part
            .chars()
            .all(|c| c.is_ascii_digit())
            .then(|| int_part.to_string());
    }

    let mut groups = int_part.split(grouping);
    let first = groups.next()?;
    if first.is_empty() || first.len() > 3 || !first.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }

    let mut digits = first.to_string();
    for group in groups {
        if group.len() != 3 || !group.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }
        digits.push_str(group);
    }
    Some(digits)
}
