//! Command implementations for the Rio Doce ETL CLI
//!
//! Each subcommand loads the layered configuration, sets up logging and
//! prints a colored summary to stdout. Diagnostics go to stderr through
//! `tracing`.

use crate::app::adapters::filesystem::{discover_files, read_header};
use crate::app::models::LayoutVariant;
use crate::app::services::dispatcher::{FileKind, route};
use crate::app::services::fact_emitter::{MemorySink, NTriplesSink};
use crate::app::services::header_mapping::HeaderMappingTable;
use crate::cli::args::{Args, CheckMappingsArgs, ClassifyArgs, Commands, CommonArgs, ProcessArgs};
use crate::config::Config;
use crate::processor::{BatchProcessor, BatchReport};
use crate::{Error, Result};
use colored::*;
use indicatif::HumanDuration;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Main command runner
///
/// Returns without doing anything when no subcommand was given; the binary
/// prints usage in that case.
pub fn run(args: Args) -> Result<()> {
    let Some(command) = args.command else {
        return Ok(());
    };

    let config = command.common().load_config()?;
    setup_logging(command.common(), &config)?;
    debug!("Command line arguments: {:?}", command);

    match command {
        Commands::Process(args) => process(&args, config).map(|_| ()),
        Commands::Classify(args) => classify(&args, &config),
        Commands::CheckMappings(args) => check_mappings(&args, &config),
    }
}

/// Set up structured logging to stderr
///
/// `RUST_LOG` wins over the verbosity flags and the configured level.
pub fn setup_logging(common: &CommonArgs, config: &Config) -> Result<()> {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let log_level = common.get_log_level(&config.logging.level);
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("doce_etl={}", log_level)));

    let layer = fmt::layer()
        .with_target(false)
        .with_level(true)
        .with_writer(std::io::stderr);

    let result = if common.quiet {
        tracing_subscriber::registry()
            .with(filter)
            .with(layer.compact())
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(layer.with_timer(fmt::time::uptime()))
            .try_init()
    };
    result.map_err(|e| Error::configuration(format!("Failed to initialise logging: {}", e)))?;

    debug!("Logging initialized at level: {}", log_level);
    Ok(())
}

/// Run the extraction pipeline and report the outcome
pub fn process(args: &ProcessArgs, mut config: Config) -> Result<BatchReport> {
    args.validate()?;
    args.apply_to(&mut config);
    config.validate()?;

    let quiet = args.common.quiet;
    if !quiet {
        println!("{}", "Rio Doce measurement extraction".bright_green().bold());
        for root in &config.input.roots {
            println!("  {} {}", "Input:".bright_cyan(), root.display());
        }
        println!("  {} {}", "Mappings:".bright_cyan(), config.mapping.directory.display());
        if args.dry_run {
            println!("  {} {}", "Output:".bright_cyan(), "(dry run)".bright_yellow());
        } else {
            println!("  {} {}", "Output:".bright_cyan(), config.output.path.display());
        }
    }

    let output = config.output.path.clone();
    let processor = BatchProcessor::new(config)?.with_progress(args.common.show_progress());

    let (report, triples) = if args.dry_run {
        let mut sink = MemorySink::new();
        let report = processor.run(&mut sink)?;
        (report, sink.len())
    } else {
        let mut sink = NTriplesSink::create(&output)?;
        let report = processor.run(&mut sink)?;
        (report, sink.triples_written())
    };

    info!("{} triples {}", triples, if args.dry_run { "generated" } else { "written" });
    if !quiet {
        print_report(&report, triples, args.dry_run);
    }
    Ok(report)
}

fn print_report(report: &BatchReport, triples: usize, dry_run: bool) {
    let totals = &report.totals;

    println!("\n{}", "Processing Summary".bright_green().bold());
    println!(
        "  {} {}",
        "Time elapsed:".bright_cyan(),
        HumanDuration(report.duration).to_string().bright_white()
    );
    println!(
        "  {} {}",
        "Points registered:".bright_cyan(),
        report.points_registered.to_string().bright_white()
    );
    println!(
        "  {} {}",
        "Files processed:".bright_cyan(),
        totals.files_processed.to_string().bright_white()
    );
    println!(
        "  {} {}",
        "Facts emitted:".bright_cyan(),
        totals.facts_emitted.to_string().bright_white().bold()
    );
    println!(
        "  {} {}",
        if dry_run { "Triples generated:" } else { "Triples written:" }.bright_cyan(),
        triples.to_string().bright_white()
    );
    println!(
        "  {} {} void, {} below detection, {} skipped rows",
        "Not emitted:".bright_cyan(),
        totals.void_measurements,
        totals.below_detection,
        totals.skipped_rows
    );

    if totals.decode_failures > 0 {
        println!(
            "  {} {}",
            "Decode failures:".bright_yellow(),
            totals.decode_failures.to_string().bright_yellow()
        );
    }
    if !totals.unknown_locations.is_empty() {
        println!(
            "  {} {}",
            "Unregistered locations:".bright_yellow(),
            totals
                .unknown_locations
                .iter()
                .cloned()
                .collect::<Vec<_>>()
                .join(", ")
        );
    }
    if totals.files_aborted > 0 {
        println!(
            "  {} {}",
            "Files aborted:".bright_red(),
            totals.files_aborted.to_string().bright_red().bold()
        );
        for file in report.files.iter().filter(|f| f.is_aborted()) {
            println!(
                "    {} ({})",
                file.file,
                file.aborted.as_deref().unwrap_or_default()
            );
        }
    }
    if !report.unroutable.is_empty() {
        println!(
            "  {} {}",
            "Unroutable files:".bright_yellow(),
            report.unroutable.len().to_string().bright_yellow()
        );
    }
    if !report.failed.is_empty() {
        println!(
            "  {} {}",
            "Files failed:".bright_red(),
            report.failed.len().to_string().bright_red().bold()
        );
        for (path, reason) in &report.failed {
            println!("    {}: {}", path.display(), reason);
        }
    }
}

/// Print the layout each input file routes to
pub fn classify(args: &ClassifyArgs, config: &Config) -> Result<()> {
    let pattern = args
        .pattern
        .as_deref()
        .unwrap_or(&config.input.file_pattern);
    let files = expand_inputs(&args.inputs, pattern)?;

    let mut unroutable = 0usize;
    for path in &files {
        let outcome = read_header(path).and_then(|header| route(path, &header));
        match outcome {
            Ok(FileKind::Data(layout)) => {
                println!("{:<14} {}", layout.to_string().bright_green(), path.display())
            }
            Ok(FileKind::Metadata(kind)) => {
                println!("{:<14} {}", kind.to_string().bright_cyan(), path.display())
            }
            Err(e) => {
                unroutable += 1;
                let label = if matches!(e, Error::UnroutableFile { .. }) {
                    "unroutable"
                } else {
                    "unreadable"
                };
                println!("{:<14} {}", label.bright_red(), path.display());
                debug!("{}: {}", path.display(), e);
            }
        }
    }

    if !args.common.quiet {
        println!(
            "\n{} files, {} not routable",
            files.len().to_string().bright_white().bold(),
            unroutable
        );
    }
    Ok(())
}

/// Load every mapping resource and optionally bind data files against it
pub fn check_mappings(args: &CheckMappingsArgs, config: &Config) -> Result<()> {
    let directory = args
        .mapping_dir
        .as_deref()
        .unwrap_or(&config.mapping.directory);

    let mut failures = 0usize;
    let mut tables = Vec::new();
    for layout in LayoutVariant::ALL
        .into_iter()
        .filter(LayoutVariant::uses_mapping_resource)
    {
        match HeaderMappingTable::load(layout, directory) {
            Ok(table) => {
                println!(
                    "{} {} ({}): {} columns, {} included, {} status associations",
                    "ok".bright_green().bold(),
                    table.resource(),
                    layout,
                    table.len(),
                    table.included_count(),
                    table.status_association_count()
                );
                tables.push(table);
            }
            Err(e) => {
                failures += 1;
                println!("{} {}: {}", "error".bright_red().bold(), layout, e);
            }
        }
    }
    tables.push(HeaderMappingTable::fixed_schema());

    for path in &args.files {
        bind_report(path, &tables)?;
    }

    if failures > 0 {
        return Err(Error::configuration(format!(
            "{} mapping resources failed to load from {}",
            failures,
            directory.display()
        )));
    }
    Ok(())
}

fn bind_report(path: &Path, tables: &[HeaderMappingTable]) -> Result<()> {
    let header = read_header(path)?;
    let layout = match route(path, &header)? {
        FileKind::Data(layout) => layout,
        FileKind::Metadata(kind) => {
            println!("\n{} is {} metadata, nothing to bind", path.display(), kind);
            return Ok(());
        }
    };
    let Some(table) = tables.iter().find(|t| t.layout() == layout) else {
        println!("\n{}: no mapping loaded for {} layout", path.display(), layout);
        return Ok(());
    };

    let plan = table.bind(&header);
    println!(
        "\n{} ({}): {} bound, {} included",
        path.display().to_string().bright_white().bold(),
        layout,
        plan.len(),
        plan.included_count()
    );
    let sections = [
        ("Unmapped columns:", &plan.unmapped),
        ("Included columns absent from file:", &plan.missing),
        ("Skipped for missing status column:", &plan.missing_status),
    ];
    for (label, names) in sections {
        if !names.is_empty() {
            println!("  {} {}", label.bright_yellow(), names.join(", "));
        }
    }
    Ok(())
}

/// Files named directly plus files discovered under directories
fn expand_inputs(inputs: &[PathBuf], pattern: &str) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for input in inputs {
        if input.is_file() {
            files.push(input.clone());
        } else {
            files.extend(discover_files(input, pattern)?);
        }
    }
    Ok(files)
}
