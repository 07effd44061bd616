//! Command-line argument definitions for the Rio Doce ETL
//!
//! Defines the CLI using the clap derive API. Flags override the layered
//! configuration (defaults, config file, environment).

use crate::app::services::fact_emitter::IdentityStrategy;
use crate::config::{Config, DecodePolicy};
use crate::{Error, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// CLI arguments for the Rio Doce ETL
///
/// Turns the water-quality spreadsheets of the Rio Doce monitoring
/// programmes into measurement facts for the Doce knowledge graph.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "doce-etl",
    version,
    about = "Extract Rio Doce water-quality spreadsheets into semantic measurement facts",
    long_about = "Classifies Renova and UNESP monitoring spreadsheets by their column layout, \
                  binds each column to a quantity kind and unit through header mapping tables, \
                  filters cells on status codes and matrix type, and writes every admitted \
                  value as a measurement fact in N-Triples."
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Extract measurement facts from data files (main command)
    Process(ProcessArgs),
    /// Report the layout each file would be routed to
    Classify(ClassifyArgs),
    /// Load the header mapping tables and report their shape
    CheckMappings(CheckMappingsArgs),
}

impl Commands {
    pub fn common(&self) -> &CommonArgs {
        match self {
            Self::Process(args) => &args.common,
            Self::Classify(args) => &args.common,
            Self::CheckMappings(args) => &args.common,
        }
    }
}

/// Flags shared by every subcommand
#[derive(Debug, Clone, Default, clap::Args)]
pub struct CommonArgs {
    /// Path to configuration file
    ///
    /// TOML configuration file. If not specified, looks for
    /// ~/.config/doce-etl/config.toml
    #[arg(
        short = 'c',
        long = "config",
        value_name = "FILE",
        help = "Path to configuration file (TOML format)"
    )]
    pub config_file: Option<PathBuf>,

    /// Logging verbosity level
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        help = "Increase logging verbosity (-v: info, -vv: debug, -vvv: trace)"
    )]
    pub verbose: u8,

    /// Only show errors. Overrides verbose settings.
    #[arg(
        short = 'q',
        long = "quiet",
        help = "Suppress output except errors",
        conflicts_with = "verbose"
    )]
    pub quiet: bool,
}

impl CommonArgs {
    /// Log level from the verbosity flags, falling back to the configured level
    pub fn get_log_level(&self, configured: &str) -> String {
        if self.quiet {
            return "error".to_string();
        }
        match self.verbose {
            0 => configured.to_ascii_lowercase(),
            1 => "info".to_string(),
            2 => "debug".to_string(),
            _ => "trace".to_string(),
        }
    }

    /// Progress bars are hidden in quiet mode
    pub fn show_progress(&self) -> bool {
        !self.quiet
    }

    /// Load the layered configuration named by `--config`
    pub fn load_config(&self) -> Result<Config> {
        if let Some(path) = &self.config_file {
            if !path.exists() {
                return Err(Error::configuration(format!(
                    "Config file does not exist: {}",
                    path.display()
                )));
            }
        }
        Config::load(self.config_file.as_deref())
    }
}

/// Arguments for the process command
#[derive(Debug, Clone, Parser)]
pub struct ProcessArgs {
    /// Input directories or files
    ///
    /// Directories are searched to one level of sub-directories for files
    /// matching the configured pattern. Point catalogues found among the
    /// inputs are ingested before any data file.
    #[arg(value_name = "PATH", help = "Input directories or files")]
    pub inputs: Vec<PathBuf>,

    /// Output file for the generated facts
    #[arg(
        short = 'o',
        long = "output",
        value_name = "FILE",
        help = "Output N-Triples file"
    )]
    pub output_path: Option<PathBuf>,

    /// Directory holding header-automatico.csv and header-manual.csv
    #[arg(
        short = 'm',
        long = "mapping-dir",
        value_name = "DIR",
        help = "Directory holding the header mapping resources"
    )]
    pub mapping_dir: Option<PathBuf>,

    /// File name pattern used when scanning directories
    #[arg(
        short = 'p',
        long = "pattern",
        value_name = "GLOB",
        help = "File name pattern for data discovery (default *.csv)"
    )]
    pub pattern: Option<String>,

    /// Abandon a file on its first decode failure
    ///
    /// By default undecodable cells are counted and skipped. Facts emitted
    /// before the failure are kept either way.
    #[arg(long = "strict", help = "Abandon a file on its first decode failure")]
    pub strict: bool,

    /// Identity strategy for measurement individuals
    #[arg(
        long = "identity",
        value_name = "STRATEGY",
        help = "Measurement identity strategy: counter or content-hash"
    )]
    pub identity: Option<IdentityStrategy>,

    /// Perform a dry run without writing output
    ///
    /// Runs the whole pipeline against an in-memory sink and reports what
    /// would have been written.
    #[arg(
        long = "dry-run",
        help = "Run the pipeline without writing the output file"
    )]
    pub dry_run: bool,

    #[command(flatten)]
    pub common: CommonArgs,
}

impl ProcessArgs {
    /// Validate the process command arguments for consistency
    pub fn validate(&self) -> Result<()> {
        for input in &self.inputs {
            if !input.exists() {
                return Err(Error::configuration(format!(
                    "Input path does not exist: {}",
                    input.display()
                )));
            }
        }

        if let Some(mapping_dir) = &self.mapping_dir {
            if !mapping_dir.is_dir() {
                return Err(Error::configuration(format!(
                    "Mapping directory is not a directory: {}",
                    mapping_dir.display()
                )));
            }
        }

        Ok(())
    }

    /// Layer the command-line flags over a loaded configuration
    pub fn apply_to(&self, config: &mut Config) {
        if !self.inputs.is_empty() {
            config.input.roots = self.inputs.clone();
        }
        if let Some(output) = &self.output_path {
            config.output.path = output.clone();
        }
        if let Some(mapping_dir) = &self.mapping_dir {
            config.mapping.directory = mapping_dir.clone();
        }
        if let Some(pattern) = &self.pattern {
            config.input.file_pattern = pattern.clone();
        }
        if self.strict {
            config.extraction.decode_policy = DecodePolicy::Strict;
        }
        if let Some(identity) = self.identity {
            config.extraction.identity = identity;
        }
    }
}

/// Arguments for the classify command
#[derive(Debug, Clone, Parser)]
pub struct ClassifyArgs {
    /// Files or directories to classify
    #[arg(value_name = "PATH", required = true, help = "Files or directories to classify")]
    pub inputs: Vec<PathBuf>,

    /// File name pattern used when scanning directories
    #[arg(short = 'p', long = "pattern", value_name = "GLOB")]
    pub pattern: Option<String>,

    #[command(flatten)]
    pub common: CommonArgs,
}

/// Arguments for the check-mappings command
#[derive(Debug, Clone, Parser)]
pub struct CheckMappingsArgs {
    /// Directory holding the header mapping resources
    #[arg(short = 'm', long = "mapping-dir", value_name = "DIR")]
    pub mapping_dir: Option<PathBuf>,

    /// Data files to bind against the loaded tables
    ///
    /// Reports unmapped columns, included columns absent from each file and
    /// columns whose status column is missing.
    #[arg(value_name = "FILE")]
    pub files: Vec<PathBuf>,

    #[command(flatten)]
    pub common: CommonArgs,
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn parse(argv: &[&str]) -> Args {
        Args::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_process_flags() {
        let args = parse(&[
            "doce-etl",
            "process",
            "data/renova",
            "data/unesp",
            "-o",
            "out/facts.nt",
            "--strict",
            "--identity",
            "content-hash",
            "-vv",
        ]);

        let Some(Commands::Process(process)) = args.command else {
            panic!("expected process command");
        };
        assert_eq!(process.inputs.len(), 2);
        assert_eq!(process.output_path, Some(PathBuf::from("out/facts.nt")));
        assert!(process.strict);
        assert_eq!(process.identity, Some(IdentityStrategy::ContentHash));
        assert_eq!(process.common.get_log_level("warn"), "debug");
    }

    #[test]
    fn test_unknown_identity_rejected() {
        assert!(Args::try_parse_from(["doce-etl", "process", "--identity", "uuid"]).is_err());
    }

    #[test]
    fn test_quiet_conflicts_with_verbose() {
        assert!(Args::try_parse_from(["doce-etl", "classify", "a.csv", "-q", "-v"]).is_err());
    }

    #[test]
    fn test_log_level() {
        let mut common = CommonArgs::default();
        assert_eq!(common.get_log_level("WARN"), "warn");

        common.verbose = 1;
        assert_eq!(common.get_log_level("warn"), "info");
        common.verbose = 3;
        assert_eq!(common.get_log_level("warn"), "trace");

        common.verbose = 0;
        common.quiet = true;
        assert_eq!(common.get_log_level("debug"), "error");
        assert!(!common.show_progress());
    }

    #[test]
    fn test_apply_to_config() {
        let args = parse(&[
            "doce-etl",
            "process",
            "input",
            "--mapping-dir",
            "maps",
            "--pattern",
            "*.CSV",
        ]);
        let Some(Commands::Process(process)) = args.command else {
            panic!("expected process command");
        };

        let mut config = Config::default();
        process.apply_to(&mut config);
        assert_eq!(config.input.roots, vec![PathBuf::from("input")]);
        assert_eq!(config.mapping.directory, PathBuf::from("maps"));
        assert_eq!(config.input.file_pattern, "*.CSV");
        assert_eq!(config.extraction.decode_policy, DecodePolicy::Skip);
    }

    #[test]
    fn test_validate_missing_input() {
        let temp_dir = TempDir::new().unwrap();
        let args = parse(&["doce-etl", "process", temp_dir.path().to_str().unwrap()]);
        let Some(Commands::Process(mut process)) = args.command else {
            panic!("expected process command");
        };
        assert!(process.validate().is_ok());

        process.inputs.push(temp_dir.path().join("missing"));
        assert!(process.validate().is_err());
    }

    #[test]
    fn test_missing_config_file() {
        let common = CommonArgs {
            config_file: Some(PathBuf::from("/nonexistent/doce-etl.toml")),
            ..CommonArgs::default()
        };
        assert!(common.load_config().is_err());
    }
}
