//! Format dispatcher
//!
//! Selects the column layout governing a file by probing its header for
//! discriminator columns. Headers matching no layout are offered to the
//! geographic metadata path before the file is reported as unroutable.

use crate::app::adapters::filesystem::read_header;
use crate::app::models::LayoutVariant;
use crate::constants::{
    AUTOMATIC_DISCRIMINATOR, FIXED_SCHEMA_DATE_MARKER, FIXED_SCHEMA_QUANTITY_KINDS,
    FIXED_SCHEMA_SAMPLE_MARKER, MANUAL_DISCRIMINATOR, UNESP_POINTS_MARKER, renova_points,
};
use crate::{Error, Result};
use std::fmt;
use std::path::Path;
use tracing::debug;

/// Geographic metadata file families
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetadataKind {
    /// Renova point catalogue (`CODIGO_PONTO`, `LATITUTE`, ...)
    RenovaPoints,
    /// UNESP sampling points (`ID amostras;Referência;...`)
    UnespPoints,
}

impl fmt::Display for MetadataKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RenovaPoints => f.write_str("renova-points"),
            Self::UnespPoints => f.write_str("unesp-points"),
        }
    }
}

/// What a discovered file turned out to be
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileKind {
    Data(LayoutVariant),
    Metadata(MetadataKind),
}

impl fmt::Display for FileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Data(layout) => write!(f, "{}", layout),
            Self::Metadata(kind) => write!(f, "{}", kind),
        }
    }
}

/// Classify a data header into a layout variant; first match wins
pub fn classify<S: AsRef<str>>(header: &[S]) -> Option<LayoutVariant> {
    let has = |name: &str| header.iter().any(|h| h.as_ref().trim() == name);

    if has(AUTOMATIC_DISCRIMINATOR) {
        Some(LayoutVariant::Automatic)
    } else if has(MANUAL_DISCRIMINATOR) {
        Some(LayoutVariant::Manual)
    } else if is_fixed_schema(header) {
        Some(LayoutVariant::FixedSchema)
    } else {
        None
    }
}

/// UNESP tables: date column, sample column, then at least one known element code
fn is_fixed_schema<S: AsRef<str>>(header: &[S]) -> bool {
    let [date, sample, rest @ ..] = header else {
        return false;
    };

    date.as_ref().contains(FIXED_SCHEMA_DATE_MARKER)
        && sample.as_ref().contains(FIXED_SCHEMA_SAMPLE_MARKER)
        && rest.iter().any(|column| {
            let column = column.as_ref().trim();
            FIXED_SCHEMA_QUANTITY_KINDS
                .iter()
                .any(|(code, _)| *code == column)
        })
}

/// Recognise geographic metadata headers
pub fn detect_metadata<S: AsRef<str>>(header: &[S]) -> Option<MetadataKind> {
    let has = |name: &str| header.iter().any(|h| h.as_ref().trim() == name);

    if has(renova_points::CODE) && has(renova_points::LATITUDE) && has(renova_points::LONGITUDE) {
        return Some(MetadataKind::RenovaPoints);
    }

    let first = header.first().map(|h| h.as_ref().trim()).unwrap_or("");
    if first.contains(UNESP_POINTS_MARKER) && header.len() >= 4 {
        return Some(MetadataKind::UnespPoints);
    }

    None
}

/// Route a header: data layouts first, then metadata, else unroutable
pub fn route<S: AsRef<str>>(path: &Path, header: &[S]) -> Result<FileKind> {
    if let Some(layout) = classify(header) {
        debug!("{} classified as {}", path.display(), layout);
        return Ok(FileKind::Data(layout));
    }

    if let Some(kind) = detect_metadata(header) {
        debug!("{} recognised as {} metadata", path.display(), kind);
        return Ok(FileKind::Metadata(kind));
    }

    Err(Error::unroutable_file(path.display().to_string()))
}

/// Read the header of a file and route it
pub fn classify_file(path: &Path) -> Result<FileKind> {
    let header = read_header(path)?;
    route(path, &header)
}
