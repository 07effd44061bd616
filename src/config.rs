//! Configuration management and validation.
//!
//! Settings are layered: built-in defaults, then a TOML file (explicit path
//! or `~/.config/doce-etl/config.toml`), then `DOCE_ETL_*` environment
//! variables. The CLI applies its own overrides on top of the result.

use crate::app::models::{LayoutVariant, NumericLocale};
use crate::app::services::decoder::TimestampDecoder;
use crate::app::services::fact_emitter::IdentityStrategy;
use crate::constants::{
    DATA_FILE_PATTERN, DEFAULT_ALLOWED_MATRICES, DEFAULT_MAPPING_DIR, DEFAULT_OUTPUT_FILE,
    DEFAULT_SAMPLE_TIME, DEFAULT_UTC_OFFSET,
};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::debug;

/// Environment variable overriding the output path
pub const ENV_OUTPUT: &str = "DOCE_ETL_OUTPUT";

/// Environment variable overriding the mapping resource directory
pub const ENV_MAPPING_DIR: &str = "DOCE_ETL_MAPPING_DIR";

/// Environment variable overriding the decode error policy
pub const ENV_DECODE_POLICY: &str = "DOCE_ETL_DECODE_POLICY";

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// What happens to a file when a cell fails to decode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DecodePolicy {
    /// Abort the rest of the file; facts already emitted stay
    Strict,
    /// Log and count the cell, continue with the next column
    #[default]
    Skip,
}

impl FromStr for DecodePolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "strict" => Ok(Self::Strict),
            "skip" => Ok(Self::Skip),
            other => Err(Error::configuration(format!(
                "Unknown decode policy '{}', expected 'strict' or 'skip'",
                other
            ))),
        }
    }
}

impl fmt::Display for DecodePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Strict => f.write_str("strict"),
            Self::Skip => f.write_str("skip"),
        }
    }
}

impl FromStr for IdentityStrategy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "counter" => Ok(Self::Counter),
            "content-hash" | "content_hash" | "hash" => Ok(Self::ContentHash),
            other => Err(Error::configuration(format!(
                "Unknown identity strategy '{}', expected 'counter' or 'content-hash'",
                other
            ))),
        }
    }
}

/// Top-level configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub input: InputConfig,
    pub output: OutputConfig,
    pub mapping: MappingConfig,
    pub extraction: ExtractionConfig,
    pub logging: LoggingConfig,
}

/// Where data and metadata files are discovered
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Root directories; each is searched together with its immediate sub-directories
    pub roots: Vec<PathBuf>,

    /// File name pattern of candidate files
    pub file_pattern: String,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            roots: Vec::new(),
            file_pattern: DATA_FILE_PATTERN.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// N-Triples file, truncated at the start of every run
    pub path: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_OUTPUT_FILE),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MappingConfig {
    /// Directory holding `header-automatico.csv` and `header-manual.csv`
    pub directory: PathBuf,
}

impl Default for MappingConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from(DEFAULT_MAPPING_DIR),
        }
    }
}

/// Decoding conventions of one layout family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutSettings {
    pub locale: NumericLocale,
    pub limit_markers: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    pub decode_policy: DecodePolicy,
    pub identity: IdentityStrategy,

    /// Offset of source timestamps, `±HH:MM`
    pub utc_offset: String,

    /// Time-of-day used when a row has no time
    pub default_time: String,

    /// Matrix types admitted for the manual layout
    pub allowed_matrices: Vec<String>,

    pub automatic: LayoutSettings,
    pub manual: LayoutSettings,
    pub fixed_schema: LayoutSettings,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        // Renova exports use dot decimals; UNESP tables use pt-BR commas and < / > markers
        let renova = LayoutSettings {
            locale: NumericLocale::DotDecimal,
            limit_markers: false,
        };
        Self {
            decode_policy: DecodePolicy::default(),
            identity: IdentityStrategy::default(),
            utc_offset: DEFAULT_UTC_OFFSET.to_string(),
            default_time: DEFAULT_SAMPLE_TIME.to_string(),
            allowed_matrices: DEFAULT_ALLOWED_MATRICES.iter().map(|m| m.to_string()).collect(),
            automatic: renova,
            manual: renova,
            fixed_schema: LayoutSettings {
                locale: NumericLocale::CommaDecimal,
                limit_markers: true,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default level when neither `RUST_LOG` nor a verbosity flag is given
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from defaults, a TOML file and the environment
    ///
    /// An explicit `path` must exist; the default location is optional.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => match default_config_path().filter(|p| p.exists()) {
                Some(default_path) => Self::from_file(&default_path)?,
                None => Self::default(),
            },
        };

        config.apply_env_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a TOML configuration file
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            Error::io(format!("Failed to read configuration {}", path.display()), e)
        })?;
        debug!("Loaded configuration from {}", path.display());
        Self::from_toml_str(&raw, &path.display().to_string())
    }

    /// Parse TOML text; `source` names the origin in error messages
    pub fn from_toml_str(raw: &str, source: &str) -> Result<Self> {
        toml::from_str(raw)
            .map_err(|e| Error::configuration(format!("Failed to parse {}: {}", source, e)))
    }

    /// Apply `DOCE_ETL_*` overrides using the given variable lookup
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let value = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(output) = value(ENV_OUTPUT) {
            self.output.path = PathBuf::from(output);
        }
        if let Some(directory) = value(ENV_MAPPING_DIR) {
            self.mapping.directory = PathBuf::from(directory);
        }
        if let Some(policy) = value(ENV_DECODE_POLICY) {
            self.extraction.decode_policy = policy.parse()?;
        }
        Ok(())
    }

    /// Reject settings the engine cannot run with
    pub fn validate(&self) -> Result<()> {
        self.timestamp_decoder()?;

        if self.extraction.allowed_matrices.iter().all(|m| m.trim().is_empty()) {
            return Err(Error::configuration(
                "extraction.allowed_matrices must name at least one matrix type",
            ));
        }

        glob::Pattern::new(&self.input.file_pattern).map_err(|e| {
            Error::configuration(format!(
                "Invalid input.file_pattern '{}': {}",
                self.input.file_pattern, e
            ))
        })?;

        if self.output.path.as_os_str().is_empty() {
            return Err(Error::configuration("output.path cannot be empty"));
        }

        if !LOG_LEVELS.contains(&self.logging.level.to_ascii_lowercase().as_str()) {
            return Err(Error::configuration(format!(
                "Invalid logging.level '{}', expected one of {}",
                self.logging.level,
                LOG_LEVELS.join(", ")
            )));
        }

        Ok(())
    }

    /// Decoding conventions for a layout
    pub fn layout_settings(&self, layout: LayoutVariant) -> LayoutSettings {
        match layout {
            LayoutVariant::Automatic => self.extraction.automatic,
            LayoutVariant::Manual => self.extraction.manual,
            LayoutVariant::FixedSchema => self.extraction.fixed_schema,
        }
    }

    /// Timestamp decoder for the configured offset and default time
    pub fn timestamp_decoder(&self) -> Result<TimestampDecoder> {
        TimestampDecoder::from_settings(&self.extraction.utc_offset, &self.extraction.default_time)
    }
}

/// `~/.config/doce-etl/config.toml` (platform configuration directory)
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("doce-etl").join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.extraction.decode_policy, DecodePolicy::Skip);
        assert_eq!(config.extraction.identity, IdentityStrategy::ContentHash);
        assert_eq!(config.extraction.allowed_matrices, vec!["Agua", "Descarga_liquida"]);
        assert_eq!(
            config.layout_settings(LayoutVariant::Manual).locale,
            NumericLocale::DotDecimal
        );
        assert!(config.layout_settings(LayoutVariant::FixedSchema).limit_markers);
        assert_eq!(config.output.path, PathBuf::from("doce-facts.nt"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let raw = r#"
            [extraction]
            decode_policy = "strict"
            identity = "counter"
            allowed_matrices = ["Agua"]

            [extraction.manual]
            locale = "comma-decimal"
            limit_markers = true

            [output]
            path = "out/facts.nt"
        "#;
        let config = Config::from_toml_str(raw, "inline").unwrap();

        assert_eq!(config.extraction.decode_policy, DecodePolicy::Strict);
        assert_eq!(config.extraction.identity, IdentityStrategy::Counter);
        assert_eq!(config.extraction.allowed_matrices, vec!["Agua"]);
        assert_eq!(config.extraction.manual.locale, NumericLocale::CommaDecimal);
        assert_eq!(config.extraction.utc_offset, "-03:00");
        assert_eq!(config.mapping.directory, PathBuf::from("resources"));
        assert_eq!(config.output.path, PathBuf::from("out/facts.nt"));
    }

    #[test]
    fn test_invalid_toml() {
        let err = Config::from_toml_str("[extraction]\ndecode_policy = \"sometimes\"", "bad.toml")
            .unwrap_err();
        assert!(err.to_string().contains("bad.toml"));
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            (ENV_OUTPUT, "/tmp/run.nt"),
            (ENV_MAPPING_DIR, "/etc/doce"),
            (ENV_DECODE_POLICY, "STRICT"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config
            .apply_env_overrides(|key| env.get(key).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.output.path, PathBuf::from("/tmp/run.nt"));
        assert_eq!(config.mapping.directory, PathBuf::from("/etc/doce"));
        assert_eq!(config.extraction.decode_policy, DecodePolicy::Strict);

        let mut config = Config::default();
        let bad = config.apply_env_overrides(|key| {
            (key == ENV_DECODE_POLICY).then(|| "never".to_string())
        });
        assert!(bad.is_err());
    }

    #[test]
    fn test_validation_failures() {
        let mut config = Config::default();
        config.extraction.utc_offset = "Brasilia".to_string();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.extraction.allowed_matrices.clear();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.input.file_pattern = "[".to_string();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.logging.level = "loud".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_explicit_file() {
        let file = NamedTempFile::new().unwrap();
        std::fs::write(file.path(), "[mapping]\ndirectory = \"/srv/mappings\"\n").unwrap();

        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.mapping.directory, PathBuf::from("/srv/mappings"));

        assert!(Config::load(Some(Path::new("/nonexistent/doce.toml"))).is_err());
    }

    #[test]
    fn test_policy_and_strategy_parsing() {
        assert_eq!("skip".parse::<DecodePolicy>().unwrap(), DecodePolicy::Skip);
        assert!("abort".parse::<DecodePolicy>().is_err());
        assert_eq!(
            "content_hash".parse::<IdentityStrategy>().unwrap(),
            IdentityStrategy::ContentHash
        );
        assert_eq!(DecodePolicy::Strict.to_string(), "strict");
    }
}
