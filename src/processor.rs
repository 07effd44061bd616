//! Batch processing engine.
//!
//! Orchestrates one run over the configured input roots: file discovery,
//! routing by header, geographic point ingestion, per-layout mapping table
//! loading and row-level extraction into a single fact sink.

use crate::app::adapters::filesystem::{discover_files, read_header};
use crate::app::models::LayoutVariant;
use crate::app::services::dispatcher::{FileKind, MetadataKind, route};
use crate::app::services::extractor::{BatchStats, Extractor, FileStats};
use crate::app::services::fact_emitter::{FactEmitter, FactSink};
use crate::app::services::header_mapping::HeaderMappingTable;
use crate::app::services::location_registry::{IngestStats, LocationRegistry};
use crate::app::vocabulary::Vocabulary;
use crate::config::Config;
use crate::{Error, Result};

use indicatif::{ProgressBar, ProgressStyle};
use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

/// Files of one run, grouped by what the dispatcher made of them
#[derive(Debug, Clone, Default)]
pub struct RoutedFiles {
    pub metadata: Vec<(PathBuf, MetadataKind)>,
    pub data: Vec<(PathBuf, LayoutVariant)>,
    pub unroutable: Vec<PathBuf>,
    /// Files whose header could not be read
    pub unreadable: Vec<(PathBuf, String)>,
}

impl RoutedFiles {
    pub fn len(&self) -> usize {
        self.metadata.len() + self.data.len() + self.unroutable.len() + self.unreadable.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Outcome of a batch run
#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    pub files: Vec<FileStats>,
    pub points: Vec<IngestStats>,
    pub points_registered: usize,
    pub totals: BatchStats,
    pub unroutable: Vec<PathBuf>,
    /// Files abandoned with a file-level error
    pub failed: Vec<(PathBuf, String)>,
    pub duration: Duration,
}

/// Runs the extraction pipeline over every discovered file
pub struct BatchProcessor {
    config: Config,
    extractor: Extractor,
    show_progress: bool,
}

impl BatchProcessor {
    /// Create a processor for a validated configuration
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        let extractor = Extractor::from_config(&config)?;
        Ok(Self {
            config,
            extractor,
            show_progress: false,
        })
    }

    /// Show a progress bar while data files are extracted
    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Candidate files under every input root
    ///
    /// Roots that are files are taken as given; directories are searched
    /// with the configured pattern. Overlapping roots yield each file once.
    pub fn discover(&self) -> Result<Vec<PathBuf>> {
        if self.config.input.roots.is_empty() {
            return Err(Error::configuration("No input roots configured"));
        }

        let mut unique = BTreeSet::new();
        for root in &self.config.input.roots {
            let found = if root.is_file() {
                vec![root.clone()]
            } else {
                discover_files(root, &self.config.input.file_pattern)?
            };
            unique.extend(
                found
                    .into_iter()
                    .map(|path| path.canonicalize().unwrap_or(path)),
            );
        }
        let files: Vec<PathBuf> = unique.into_iter().collect();
        info!(
            "Discovered {} candidate files under {} roots",
            files.len(),
            self.config.input.roots.len()
        );
        Ok(files)
    }

    /// Route every file by its header
    pub fn route_files(&self, files: &[PathBuf]) -> RoutedFiles {
        let mut routed = RoutedFiles::default();

        for path in files {
            let header = match read_header(path) {
                Ok(header) => header,
                Err(e) => {
                    warn!("Cannot read header of {}: {}", path.display(), e);
                    routed.unreadable.push((path.clone(), e.to_string()));
                    continue;
                }
            };

            match route(path, &header) {
                Ok(FileKind::Data(layout)) => routed.data.push((path.clone(), layout)),
                Ok(FileKind::Metadata(kind)) => routed.metadata.push((path.clone(), kind)),
                Err(_) => {
                    warn!("Skipping unroutable file {}", path.display());
                    routed.unroutable.push(path.clone());
                }
            }
        }

        debug!(
            "Routed {} data files, {} metadata files, {} unroutable",
            routed.data.len(),
            routed.metadata.len(),
            routed.unroutable.len()
        );
        routed
    }

    /// Discover, route and process every input file into `sink`
    pub fn run(&self, sink: &mut dyn FactSink) -> Result<BatchReport> {
        let files = self.discover()?;
        let routed = self.route_files(&files);
        self.process(routed, sink)
    }

    /// Process already routed files
    ///
    /// Point catalogues are ingested before any data file so measurements
    /// can be checked against the registry. Sink failures end the run;
    /// every other error only abandons the file it occurred in.
    pub fn process(&self, routed: RoutedFiles, sink: &mut dyn FactSink) -> Result<BatchReport> {
        let start = Instant::now();
        let mut report = BatchReport {
            unroutable: routed.unroutable,
            failed: routed.unreadable,
            ..BatchReport::default()
        };

        let vocabulary = Vocabulary::new();
        let mut emitter =
            FactEmitter::new(&vocabulary, sink, self.config.extraction.identity.allocator());
        emitter.seed_well_known_entities()?;

        let mut registry = LocationRegistry::new();
        for (path, kind) in &routed.metadata {
            match registry.ingest(path, *kind, &mut emitter) {
                Ok(stats) => report.points.push(stats),
                Err(e) if is_fatal(&e) => return Err(e),
                Err(e) => {
                    error!("Failed to ingest {}: {}", path.display(), e);
                    report.failed.push((path.clone(), e.to_string()));
                }
            }
        }
        report.points_registered = registry.len();

        let progress = self.progress_bar(routed.data.len());
        let mut tables = MappingCache::new(&self.config.mapping.directory);

        for (path, layout) in &routed.data {
            if let Some(name) = path.file_name() {
                progress.set_message(name.to_string_lossy().to_string());
            }

            let result = tables.get(*layout).and_then(|table| {
                self.extractor
                    .extract_file(path, table, &registry, &mut emitter)
            });
            progress.inc(1);

            match result {
                Ok(stats) => {
                    report.totals.add(&stats);
                    report.files.push(stats);
                }
                Err(e) if is_fatal(&e) => {
                    progress.abandon();
                    return Err(e);
                }
                Err(e) => {
                    error!("Failed to process {}: {}", path.display(), e);
                    report.failed.push((path.clone(), e.to_string()));
                }
            }
        }
        progress.finish_and_clear();

        emitter.commit()?;

        report.totals.files_unroutable = report.unroutable.len();
        report.totals.files_failed = report.failed.len();
        report.duration = start.elapsed();
        info!(
            "Batch complete: {} files, {} facts, {} points in {:.2}s",
            report.totals.files_processed,
            report.totals.facts_emitted,
            report.points_registered,
            report.duration.as_secs_f64()
        );
        Ok(report)
    }

    fn progress_bar(&self, len: usize) -> ProgressBar {
        if !self.show_progress || len == 0 {
            return ProgressBar::hidden();
        }

        let pb = ProgressBar::new(len as u64);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}")
            .map(|style| style.progress_chars("#>-"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        pb.set_style(style);
        pb
    }
}

/// Errors that end the whole run rather than one file
fn is_fatal(error: &Error) -> bool {
    matches!(error, Error::Sink { .. })
}

/// Mapping tables loaded once per layout
///
/// A layout whose resource fails to load keeps its error, so every file of
/// that layout is reported without re-reading the resource.
struct MappingCache<'a> {
    directory: &'a Path,
    tables: HashMap<LayoutVariant, std::result::Result<HeaderMappingTable, String>>,
}

impl<'a> MappingCache<'a> {
    fn new(directory: &'a Path) -> Self {
        Self {
            directory,
            tables: HashMap::new(),
        }
    }

    fn get(&mut self, layout: LayoutVariant) -> Result<&HeaderMappingTable> {
        let directory = self.directory;
        let entry = self.tables.entry(layout).or_insert_with(|| {
            match HeaderMappingTable::load(layout, directory) {
                Ok(table) => {
                    info!(
                        "Loaded {} mapping from {}: {} columns, {} included",
                        layout,
                        table.resource(),
                        table.len(),
                        table.included_count()
                    );
                    Ok(table)
                }
                Err(e) => {
                    error!("Mapping for {} layout unavailable: {}", layout, e);
                    Err(e.to_string())
                }
            }
        });

        entry.as_ref().map_err(|message| {
            Error::structural_mapping(layout.to_string(), message.clone())
        })
    }
}
