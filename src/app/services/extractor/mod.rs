//! Measurement extraction engine
//!
//! Walks the rows of a routed data file and turns every admitted cell into
//! one measurement fact. Per row:
//!
//! 1. rows with a disallowed matrix type are skipped as a whole (manual layout)
//! 2. each bound column is evaluated by the [`AdmissionFilter`]
//! 3. admitted cells are decoded under the layout's numeric locale
//! 4. the sampling instant is composed once per row, on first need
//! 5. the reading is handed to the [`FactEmitter`]
//!
//! Decode failures either skip the offending cell or abandon the rest of the
//! file, depending on the configured [`DecodePolicy`]. Facts emitted before
//! an abort are kept.

pub mod row;
pub mod stats;

#[cfg(test)]
pub mod tests;

pub use row::RowKeys;
pub use stats::{BatchStats, FileStats};

use crate::app::adapters::filesystem::{csv_reader, header_names, read_text};
use crate::app::models::{LayoutVariant, Reading, TimeInterval};
use crate::app::services::admission::{Admission, AdmissionFilter, RejectionReason};
use crate::app::services::decoder::{DecodedValue, TimestampDecoder, parse_value};
use crate::app::services::fact_emitter::FactEmitter;
use crate::app::services::header_mapping::{BoundColumn, ColumnPlan, HeaderMappingTable};
use crate::app::services::location_registry::LocationRegistry;
use crate::config::{Config, DecodePolicy, LayoutSettings};
use crate::{Error, Result};
use chrono::{DateTime, FixedOffset};
use csv::StringRecord;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// Row-level extraction driven by a header mapping table
#[derive(Debug, Clone)]
pub struct Extractor {
    filter: AdmissionFilter,
    timestamps: TimestampDecoder,
    decode_policy: DecodePolicy,
    automatic: LayoutSettings,
    manual: LayoutSettings,
    fixed_schema: LayoutSettings,
}

/// Everything one row needs besides the record itself
struct RowContext<'p> {
    line: usize,
    layout: LayoutVariant,
    settings: LayoutSettings,
    plan: &'p ColumnPlan,
    keys: &'p RowKeys,
}

impl Extractor {
    /// Build an extractor from the extraction section of the configuration
    pub fn from_config(config: &Config) -> Result<Self> {
        let extraction = &config.extraction;
        Ok(Self {
            filter: AdmissionFilter::new(extraction.allowed_matrices.iter().cloned()),
            timestamps: config.timestamp_decoder()?,
            decode_policy: extraction.decode_policy,
            automatic: extraction.automatic,
            manual: extraction.manual,
            fixed_schema: extraction.fixed_schema,
        })
    }

    pub fn with_decode_policy(mut self, policy: DecodePolicy) -> Self {
        self.decode_policy = policy;
        self
    }

    pub fn decode_policy(&self) -> DecodePolicy {
        self.decode_policy
    }

    pub fn filter(&self) -> &AdmissionFilter {
        &self.filter
    }

    fn settings(&self, layout: LayoutVariant) -> LayoutSettings {
        match layout {
            LayoutVariant::Automatic => self.automatic,
            LayoutVariant::Manual => self.manual,
            LayoutVariant::FixedSchema => self.fixed_schema,
        }
    }

    /// Extract all measurements of a data file on disk
    pub fn extract_file(
        &self,
        path: &Path,
        table: &HeaderMappingTable,
        registry: &LocationRegistry,
        emitter: &mut FactEmitter<'_>,
    ) -> Result<FileStats> {
        let text = read_text(path)?;
        self.extract_text(&text, &path.display().to_string(), table, registry, emitter)
    }

    /// Extract all measurements of an in-memory data file
    ///
    /// The layout is taken from the mapping table. Errors returned here are
    /// fatal to the file: a missing key column or a sink failure. Decode
    /// failures under the strict policy end the file early and are reported
    /// through [`FileStats::aborted`].
    pub fn extract_text(
        &self,
        text: &str,
        file: &str,
        table: &HeaderMappingTable,
        registry: &LocationRegistry,
        emitter: &mut FactEmitter<'_>,
    ) -> Result<FileStats> {
        let start = Instant::now();
        let layout = table.layout();
        let mut stats = FileStats::new(file, layout);

        let mut reader = csv_reader(text);
        let header = header_names(&mut reader, file)?;
        let keys = RowKeys::locate(layout, &header, file)?;
        let plan = table.bind(&header);

        if !plan.missing.is_empty() {
            warn!(
                "{}: {} included columns of {} are absent: {}",
                file,
                plan.missing.len(),
                table.resource(),
                plan.missing.join(", ")
            );
        }
        if !plan.missing_status.is_empty() {
            warn!(
                "{}: skipping columns whose status column is absent: {}",
                file,
                plan.missing_status.join(", ")
            );
        }
        debug!(
            "{}: {} bound columns, {} included, {} unmapped",
            file,
            plan.len(),
            plan.included_count(),
            plan.unmapped.len()
        );

        for (index, record) in reader.records().enumerate() {
            // Header is line 1
            let line = index + 2;
            let record = match record {
                Ok(record) => record,
                Err(e) => {
                    warn!("{}:{}: unreadable record: {}", file, line, e);
                    stats.skipped_rows += 1;
                    continue;
                }
            };
            if record.iter().all(|cell| cell.trim().is_empty()) {
                continue;
            }
            stats.rows += 1;

            if !self.filter.matrix_allowed(&record, layout) {
                stats.skipped_rows += 1;
                continue;
            }

            let context = RowContext {
                line,
                layout,
                settings: self.settings(layout),
                plan: &plan,
                keys: &keys,
            };

            match self.extract_row(&record, &context, registry, emitter, &mut stats) {
                Ok(()) => {}
                Err(e) if e.is_decode() => {
                    error!("{}:{}: {}; abandoning file under strict decode policy", file, line, e);
                    stats.aborted = Some(format!("line {}: {}", line, e));
                    break;
                }
                Err(e) => return Err(e),
            }
        }

        for code in &stats.unknown_locations {
            warn!("{}: location {} is not a registered geographic point", file, code);
        }

        stats.duration = start.elapsed();
        info!("{}: {}", file, stats.summary());
        Ok(stats)
    }

    fn extract_row(
        &self,
        record: &StringRecord,
        context: &RowContext<'_>,
        registry: &LocationRegistry,
        emitter: &mut FactEmitter<'_>,
        stats: &mut FileStats,
    ) -> Result<()> {
        let mut location: Option<String> = None;
        let mut instant: Option<DateTime<FixedOffset>> = None;

        for column in &context.plan.columns {
            match self.filter.evaluate(record, column, context.layout) {
                Admission::Admitted => {}
                Admission::Rejected(RejectionReason::VoidMeasurement) => {
                    warn!("line {}: void measurement in '{}'", context.line, column.name);
                    stats.record_rejection(RejectionReason::VoidMeasurement);
                    continue;
                }
                Admission::Rejected(reason) => {
                    stats.record_rejection(reason);
                    continue;
                }
            }

            let value = match self.decode_cell(record, column, context) {
                Ok(DecodedValue::Value(value)) => value,
                Ok(DecodedValue::BelowDetection) => {
                    stats.below_detection += 1;
                    continue;
                }
                Err(e) => {
                    self.decode_failure(e, context.line, stats)?;
                    continue;
                }
            };

            // Key cells are only decoded once a row actually yields a value
            if location.is_none() {
                let keys = context.keys.location(record).and_then(|code| {
                    let at = context.keys.timestamp(record, &self.timestamps)?;
                    Ok((code, at))
                });
                match keys {
                    Ok((code, at)) => {
                        location = Some(code);
                        instant = Some(at);
                    }
                    // Without a location or instant no cell of the row can be used
                    Err(e) => return self.decode_failure(e, context.line, stats),
                }
            }
            let (Some(location), Some(at), Some(entry)) =
                (location.clone(), instant, column.entry.as_ref())
            else {
                continue;
            };

            if !registry.contains(&location) {
                stats.unknown_location_facts += 1;
                stats.unknown_locations.insert(location.clone());
            }

            let reading = Reading {
                location,
                quantity_kind: entry.quantity_kind.clone(),
                unit: entry.unit.clone(),
                value,
                interval: TimeInterval::instant(at),
                agent: context.layout.agent(),
                source_column: column.name.clone(),
            };
            emitter.emit(&reading)?;
            stats.facts_emitted += 1;
        }

        Ok(())
    }

    fn decode_cell(
        &self,
        record: &StringRecord,
        column: &BoundColumn,
        context: &RowContext<'_>,
    ) -> Result<DecodedValue> {
        parse_value(
            record.get(column.index).unwrap_or(""),
            &column.name,
            context.settings.locale,
            context.settings.limit_markers,
        )
    }

    /// Count a decode failure and apply the decode policy
    fn decode_failure(&self, error: Error, line: usize, stats: &mut FileStats) -> Result<()> {
        stats.decode_failures += 1;
        match self.decode_policy {
            DecodePolicy::Skip => {
                warn!("line {}: {}", line, error);
                Ok(())
            }
            DecodePolicy::Strict => Err(error),
        }
    }
}
