//! Per-file extraction statistics

use crate::app::models::LayoutVariant;
use crate::app::services::admission::RejectionReason;
use std::collections::BTreeSet;
use std::time::Duration;

/// Counts reported for every processed data file
#[derive(Debug, Clone)]
pub struct FileStats {
    /// File the counts belong to
    pub file: String,

    pub layout: LayoutVariant,

    /// Non-blank data rows read
    pub rows: usize,

    /// Measurement facts emitted
    pub facts_emitted: usize,

    /// Included, status-admitted cells with an empty value
    pub void_measurements: usize,

    /// Rows skipped as a whole (disallowed matrix type, unreadable record)
    pub skipped_rows: usize,

    /// Cells or rows that failed numeric or date/time decoding
    pub decode_failures: usize,

    /// Cells carrying a below-detection marker
    pub below_detection: usize,

    /// Cells of unmapped or excluded columns
    pub rejected_not_included: usize,

    /// Cells whose status cell carried no accepted code
    pub rejected_status: usize,

    /// Facts whose location is not in the registry
    pub unknown_location_facts: usize,

    /// Distinct unregistered location codes
    pub unknown_locations: BTreeSet<String>,

    /// Reason the file was abandoned under the strict decode policy
    pub aborted: Option<String>,

    pub duration: Duration,
}

impl FileStats {
    pub fn new(file: impl Into<String>, layout: LayoutVariant) -> Self {
        Self {
            file: file.into(),
            layout,
            rows: 0,
            facts_emitted: 0,
            void_measurements: 0,
            skipped_rows: 0,
            decode_failures: 0,
            below_detection: 0,
            rejected_not_included: 0,
            rejected_status: 0,
            unknown_location_facts: 0,
            unknown_locations: BTreeSet::new(),
            aborted: None,
            duration: Duration::ZERO,
        }
    }

    /// Count a rejected cell under its reason
    pub fn record_rejection(&mut self, reason: RejectionReason) {
        match reason {
            RejectionReason::NotIncluded => self.rejected_not_included += 1,
            RejectionReason::Status => self.rejected_status += 1,
            RejectionReason::VoidMeasurement => self.void_measurements += 1,
            // Only reachable if a caller skips the row-level check
            RejectionReason::MatrixType => {}
        }
    }

    pub fn is_aborted(&self) -> bool {
        self.aborted.is_some()
    }

    /// One-line summary for the per-file log entry
    pub fn summary(&self) -> String {
        let mut line = format!(
            "{} facts emitted, {} void measurements, {} skipped rows, {} decode failures, {} below detection, {} rejected by status ({} rows, {} layout, {:.2}s)",
            self.facts_emitted,
            self.void_measurements,
            self.skipped_rows,
            self.decode_failures,
            self.below_detection,
            self.rejected_status,
            self.rows,
            self.layout,
            self.duration.as_secs_f64()
        );
        if !self.unknown_locations.is_empty() {
            line.push_str(&format!(
                ", {} facts at {} unregistered locations",
                self.unknown_location_facts,
                self.unknown_locations.len()
            ));
        }
        if self.aborted.is_some() {
            line.push_str(", aborted");
        }
        line
    }
}

/// Totals over a batch of files
#[derive(Debug, Clone, Default)]
pub struct BatchStats {
    pub files_processed: usize,
    pub files_aborted: usize,
    pub files_unroutable: usize,
    pub files_failed: usize,
    pub facts_emitted: usize,
    pub void_measurements: usize,
    pub skipped_rows: usize,
    pub decode_failures: usize,
    pub below_detection: usize,
    pub unknown_locations: BTreeSet<String>,
}

impl BatchStats {
    pub fn add(&mut self, file: &FileStats) {
        self.files_processed += 1;
        if file.is_aborted() {
            self.files_aborted += 1;
        }
        self.facts_emitted += file.facts_emitted;
        self.void_measurements += file.void_measurements;
        self.skipped_rows += file.skipped_rows;
        self.decode_failures += file.decode_failures;
        self.below_detection += file.below_detection;
        self.unknown_locations
            .extend(file.unknown_locations.iter().cloned());
    }
}
