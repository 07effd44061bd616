//! Location registry for geographic sampling points
//!
//! Loads the point catalogues published by both providers, emits each point
//! once and keeps the set of known codes so measurements referring to an
//! unregistered location can be counted.

use crate::app::adapters::filesystem::read_text;
use crate::app::models::GeographicPoint;
use crate::app::services::dispatcher::MetadataKind;
use crate::app::services::fact_emitter::FactEmitter;
use crate::Result;
use std::collections::HashMap;
use std::path::Path;
use std::time::{Duration, Instant};
use tracing::{info, warn};

pub mod loader;

#[cfg(test)]
pub mod tests;

pub use loader::{ParsedPoints, normalize_code, parse_points, unesp_code};

/// Statistics of one metadata ingestion pass
#[derive(Debug, Clone, Default)]
pub struct IngestStats {
    /// Data rows read from the file
    pub rows: usize,

    /// New points registered and emitted
    pub registered: usize,

    /// Rows whose code was already registered
    pub duplicates: usize,

    /// Rows skipped because of unreadable coordinates or codes
    pub invalid: usize,

    pub duration: Duration,
}

impl IngestStats {
    pub fn summary(&self) -> String {
        format!(
            "{} rows, {} points registered, {} duplicates, {} invalid in {:.2}s",
            self.rows,
            self.registered,
            self.duplicates,
            self.invalid,
            self.duration.as_secs_f64()
        )
    }
}

/// Known sampling locations indexed by code
#[derive(Debug, Clone, Default)]
pub struct LocationRegistry {
    points: HashMap<String, GeographicPoint>,
}

impl LocationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a point; returns false (and keeps the first) for a repeated code
    pub fn register(&mut self, point: GeographicPoint) -> bool {
        if self.points.contains_key(&point.code) {
            warn!("Geographic point {} already registered, ignoring repeat", point.code);
            return false;
        }
        self.points.insert(point.code.clone(), point);
        true
    }

    pub fn contains(&self, code: &str) -> bool {
        self.points.contains_key(code)
    }

    pub fn get(&self, code: &str) -> Option<&GeographicPoint> {
        self.points.get(code)
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Registered codes, sorted
    pub fn codes(&self) -> Vec<&str> {
        let mut codes: Vec<&str> = self.points.keys().map(String::as_str).collect();
        codes.sort_unstable();
        codes
    }

    /// Parse a point catalogue, register new points and emit them
    pub fn ingest(
        &mut self,
        path: &Path,
        kind: MetadataKind,
        emitter: &mut FactEmitter<'_>,
    ) -> Result<IngestStats> {
        let start = Instant::now();
        let text = read_text(path)?;
        let parsed = parse_points(&text, kind, &path.display().to_string())?;

        let mut stats = IngestStats {
            rows: parsed.rows,
            invalid: parsed.invalid,
            ..IngestStats::default()
        };

        for point in parsed.points {
            if self.contains(&point.code) {
                warn!("Geographic point {} already registered, ignoring repeat", point.code);
                stats.duplicates += 1;
                continue;
            }
            emitter.emit_point(&point)?;
            self.register(point);
            stats.registered += 1;
        }

        stats.duration = start.elapsed();
        info!("Ingested {} from {}: {}", kind, path.display(), stats.summary());
        Ok(stats)
    }
}
