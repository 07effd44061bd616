//! Data models for Rio Doce monitoring data
//!
//! This module contains the core data structures shared by the extraction
//! engine: layout variants, data-provider agents, status codes, sampling
//! locations and the measurement facts emitted for admitted cells.

use crate::constants::status_codes;
use crate::{Error, Result};
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// =============================================================================
// Layout Variants
// =============================================================================

/// Column layouts recognised by the format dispatcher
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LayoutVariant {
    /// Renova automatic/telemetric stations
    Automatic,
    /// Renova manual sampling campaigns (field and laboratory)
    Manual,
    /// UNESP campaign tables with one column per element
    FixedSchema,
}

impl LayoutVariant {
    /// All variants in dispatch order
    pub const ALL: [LayoutVariant; 3] = [Self::Automatic, Self::Manual, Self::FixedSchema];

    /// Provider responsible for files of this layout
    pub fn agent(&self) -> Agent {
        match self {
            Self::Automatic | Self::Manual => Agent::Renova,
            Self::FixedSchema => Agent::IntegradoceUnesp,
        }
    }

    /// Whether rows are restricted to an allowed set of matrix types
    pub fn filters_matrix(&self) -> bool {
        matches!(self, Self::Manual)
    }

    /// Whether the layout is driven by a side-loaded header mapping resource
    pub fn uses_mapping_resource(&self) -> bool {
        matches!(self, Self::Automatic | Self::Manual)
    }

    /// Short machine-friendly name
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Automatic => "automatic",
            Self::Manual => "manual",
            Self::FixedSchema => "fixed-schema",
        }
    }
}

impl fmt::Display for LayoutVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LayoutVariant {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "automatic" => Ok(Self::Automatic),
            "manual" => Ok(Self::Manual),
            "fixed-schema" | "fixed_schema" => Ok(Self::FixedSchema),
            other => Err(Error::data_validation(format!(
                "Unknown layout variant '{}'",
                other
            ))),
        }
    }
}

// =============================================================================
// Agents
// =============================================================================

/// Data providers participating in the measurements
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Agent {
    /// Fundação Renova monitoring programme (PMQQS)
    Renova,
    /// Integradoce team at UNESP
    IntegradoceUnesp,
}

impl Agent {
    pub const ALL: [Agent; 2] = [Self::Renova, Self::IntegradoceUnesp];

    /// Local name of the agent individual in the integradoce namespace
    pub fn local_name(&self) -> &'static str {
        match self {
            Self::Renova => "Renova",
            Self::IntegradoceUnesp => "IntegradoceUNESP",
        }
    }
}

impl fmt::Display for Agent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.local_name())
    }
}

// =============================================================================
// Status Codes
// =============================================================================

/// Quality status attached to a Renova cell through its companion column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatusCode {
    NotMeasured,
    Validated,
    Invalidated,
    Qualified,
    BelowQuantificationLimit,
    AboveQuantifiableLimit,
    NotApplicable,
}

impl StatusCode {
    /// Map a numeric code onto its status
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            status_codes::NOT_MEASURED => Some(Self::NotMeasured),
            status_codes::VALIDATED => Some(Self::Validated),
            status_codes::INVALIDATED => Some(Self::Invalidated),
            status_codes::QUALIFIED => Some(Self::Qualified),
            status_codes::BELOW_QUANTIFICATION_LIMIT => Some(Self::BelowQuantificationLimit),
            status_codes::ABOVE_QUANTIFIABLE_LIMIT => Some(Self::AboveQuantifiableLimit),
            status_codes::NOT_APPLICABLE => Some(Self::NotApplicable),
            _ => None,
        }
    }

    /// Numeric code as published by the provider
    pub fn code(&self) -> u8 {
        match self {
            Self::NotMeasured => status_codes::NOT_MEASURED,
            Self::Validated => status_codes::VALIDATED,
            Self::Invalidated => status_codes::INVALIDATED,
            Self::Qualified => status_codes::QUALIFIED,
            Self::BelowQuantificationLimit => status_codes::BELOW_QUANTIFICATION_LIMIT,
            Self::AboveQuantifiableLimit => status_codes::ABOVE_QUANTIFIABLE_LIMIT,
            Self::NotApplicable => status_codes::NOT_APPLICABLE,
        }
    }

    /// Whether a cell carrying this status yields a measurement
    pub fn is_accepted(&self) -> bool {
        status_codes::ACCEPTED.contains(&self.code())
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::NotMeasured => "not measured",
            Self::Validated => "measured and validated",
            Self::Invalidated => "measured and invalidated",
            Self::Qualified => "qualified",
            Self::BelowQuantificationLimit => "below quantification limit",
            Self::AboveQuantifiableLimit => "above quantifiable limit",
            Self::NotApplicable => "not applicable for this context",
        }
    }
}

// =============================================================================
// Numeric Locales
// =============================================================================

/// Decimal convention of a source family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NumericLocale {
    /// `12,34` with `.` as optional grouping separator (pt-BR)
    CommaDecimal,
    /// `12.34` with `,` as optional grouping separator (en-US)
    DotDecimal,
}

impl NumericLocale {
    pub fn decimal_separator(&self) -> char {
        match self {
            Self::CommaDecimal => ',',
            Self::DotDecimal => '.',
        }
    }

    pub fn grouping_separator(&self) -> char {
        match self {
            Self::CommaDecimal => '.',
            Self::DotDecimal => ',',
        }
    }
}

// =============================================================================
// Geographic Points
// =============================================================================

/// Sampling location shared by all measurements taken there
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeographicPoint {
    /// Unique point code (e.g. "RCA-01", "UNESP_M2")
    pub code: String,

    /// Human-readable label
    pub label: String,

    /// Free-text description of the site
    pub description: String,

    /// WGS84 latitude in decimal degrees
    pub latitude: f32,

    /// WGS84 longitude in decimal degrees
    pub longitude: f32,
}

impl GeographicPoint {
    /// Create a new GeographicPoint with validation
    pub fn new(
        code: String,
        label: String,
        description: String,
        latitude: f32,
        longitude: f32,
    ) -> Result<Self> {
        let point = Self {
            code,
            label,
            description,
            latitude,
            longitude,
        };

        point.validate()?;
        Ok(point)
    }

    /// Validate coordinate ranges and the point code
    pub fn validate(&self) -> Result<()> {
        if self.code.trim().is_empty() {
            return Err(Error::data_validation(
                "Geographic point code cannot be empty".to_string(),
            ));
        }

        if !(-90.0..=90.0).contains(&self.latitude) {
            return Err(Error::data_validation(format!(
                "Invalid latitude {} for point {}: must be between -90 and 90 degrees",
                self.latitude, self.code
            )));
        }

        if !(-180.0..=180.0).contains(&self.longitude) {
            return Err(Error::data_validation(format!(
                "Invalid longitude {} for point {}: must be between -180 and 180 degrees",
                self.longitude, self.code
            )));
        }

        Ok(())
    }
}

// =============================================================================
// Measurements
// =============================================================================

/// Time interval of a measurement
///
/// Sampling is point-in-time, so both endpoints hold the same instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimeInterval {
    pub begin: DateTime<FixedOffset>,
    pub end: DateTime<FixedOffset>,
}

impl TimeInterval {
    /// Interval collapsed onto a single instant
    pub fn instant(at: DateTime<FixedOffset>) -> Self {
        Self { begin: at, end: at }
    }

    pub fn is_instant(&self) -> bool {
        self.begin == self.end
    }
}

/// Decoded content of one admitted cell, ready to become a measurement fact
#[derive(Debug, Clone, PartialEq)]
pub struct Reading {
    /// Point code of the sampling location
    pub location: String,

    /// Quantity-kind reference from the mapping table
    pub quantity_kind: String,

    /// Unit reference from the mapping table
    pub unit: String,

    /// Decoded numeric value
    pub value: f64,

    /// Sampling instant
    pub interval: TimeInterval,

    /// Provider of the row
    pub agent: Agent,

    /// Column the value was read from
    pub source_column: String,
}

/// Measurement fact handed to the sink
#[derive(Debug, Clone, PartialEq)]
pub struct Measurement {
    /// Individual identity, unique within the run
    pub id: String,

    pub location: String,
    pub quantity_kind: String,
    pub unit: String,
    pub value: f64,
    pub interval: TimeInterval,
    pub agent: Agent,

    /// Always true for emitted instances
    pub admitted: bool,
}

impl Measurement {
    /// Build the fact for an admitted reading under an allocated identity
    pub fn from_reading(id: String, reading: &Reading) -> Self {
        Self {
            id,
            location: reading.location.clone(),
            quantity_kind: reading.quantity_kind.clone(),
            unit: reading.unit.clone(),
            value: reading.value,
            interval: reading.interval,
            agent: reading.agent,
            admitted: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_layout_agents() {
        assert_eq!(LayoutVariant::Automatic.agent(), Agent::Renova);
        assert_eq!(LayoutVariant::Manual.agent(), Agent::Renova);
        assert_eq!(LayoutVariant::FixedSchema.agent(), Agent::IntegradoceUnesp);
        assert!(LayoutVariant::Manual.filters_matrix());
        assert!(!LayoutVariant::Automatic.filters_matrix());
    }

    #[test]
    fn test_layout_from_str() {
        assert_eq!(
            "manual".parse::<LayoutVariant>().unwrap(),
            LayoutVariant::Manual
        );
        assert_eq!(
            "fixed_schema".parse::<LayoutVariant>().unwrap(),
            LayoutVariant::FixedSchema
        );
        assert!("telemetric".parse::<LayoutVariant>().is_err());
    }

    #[test]
    fn test_status_code_table() {
        let accepted: Vec<u8> = (0..=6)
            .filter_map(StatusCode::from_code)
            .filter(|s| s.is_accepted())
            .map(|s| s.code())
            .collect();
        assert_eq!(accepted, vec![1, 4, 5]);

        assert_eq!(StatusCode::from_code(0).unwrap().description(), "not measured");
        assert_eq!(
            StatusCode::from_code(6).unwrap().description(),
            "not applicable for this context"
        );
        assert!(StatusCode::from_code(7).is_none());
    }

    #[test]
    fn test_geographic_point_validation() {
        let point = GeographicPoint::new(
            "RCA-01".to_string(),
            "Acaiaca - Carmo 01".to_string(),
            "Ponte férrea sobre o rio do Carmo".to_string(),
            -20.3471,
            -43.1127,
        );
        assert!(point.is_ok());

        let bad = GeographicPoint::new(
            "X".to_string(),
            String::new(),
            String::new(),
            -120.0,
            0.0,
        );
        assert!(bad.is_err());

        let unnamed = GeographicPoint::new(" ".to_string(), String::new(), String::new(), 0.0, 0.0);
        assert!(unnamed.is_err());
    }

    #[test]
    fn test_measurement_from_reading() {
        let at = FixedOffset::west_opt(3 * 3600)
            .unwrap()
            .with_ymd_and_hms(2017, 8, 1, 0, 30, 0)
            .unwrap();
        let reading = Reading {
            location: "RCA-01".to_string(),
            quantity_kind: "TurbidityX".to_string(),
            unit: "NTU".to_string(),
            value: 15.8,
            interval: TimeInterval::instant(at),
            agent: Agent::Renova,
            source_column: "Turbidez (NTU)".to_string(),
        };

        let measurement = Measurement::from_reading("TurbidityXMeasurement1".to_string(), &reading);
        assert!(measurement.admitted);
        assert!(measurement.interval.is_instant());
        assert_eq!(measurement.location, "RCA-01");
        assert_eq!(measurement.value, 15.8);
    }
}
