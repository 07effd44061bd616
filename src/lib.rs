//! Rio Doce ETL Library
//!
//! A Rust library for turning the wide-format water-quality spreadsheets
//! published by the Rio Doce monitoring programmes (Renova and the
//! Integradoce/UNESP team) into semantic measurement facts.
//!
//! This library provides tools for:
//! - Classifying data files into one of the known column layouts
//! - Loading header mapping tables that bind columns to quantity kinds and units
//! - Admitting or rejecting individual cells based on status codes and matrix type
//! - Decoding locale-specific numbers, limit-of-detection markers and timestamps
//! - Emitting measurement facts with stable identities through a fact sink
//! - Ingesting geographic sampling points and well-known agents

pub mod config;
pub mod constants;
pub mod processor;

// Core application modules
pub mod app {
    pub mod models;
    pub mod vocabulary;
    pub mod services {
        pub mod admission;
        pub mod decoder;
        pub mod dispatcher;
        pub mod extractor;
        pub mod fact_emitter;
        pub mod header_mapping;
        pub mod location_registry;
    }
    pub mod adapters {
        pub mod filesystem;
    }
}

// CLI modules
pub mod cli {
    pub mod args;
    pub mod commands;
}

// Re-export commonly used types
pub use app::models::{Agent, GeographicPoint, LayoutVariant, Measurement, StatusCode};
pub use app::vocabulary::Vocabulary;
pub use config::Config;
pub use processor::{BatchProcessor, BatchReport};

/// Result type alias for the ETL engine
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for extraction, mapping and fact emission
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// I/O operation failed
    #[error("I/O error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// CSV parsing error
    #[error("CSV parsing error in file '{file}': {message}")]
    CsvParsing {
        file: String,
        message: String,
        #[source]
        source: Option<csv::Error>,
    },

    /// Header mapping resource has the wrong shape
    #[error("Structural mapping error in '{resource}': {message}")]
    StructuralMapping { resource: String, message: String },

    /// Data file header matches no known layout
    #[error("Unroutable file: {path}")]
    UnroutableFile { path: String },

    /// A cell failed numeric or date/time decoding
    #[error("Cannot decode '{raw}' in column '{column}': {message}")]
    Decode {
        column: String,
        raw: String,
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Fact sink rejected an operation
    #[error("Fact sink error: {message}")]
    Sink {
        message: String,
        #[source]
        source: Option<std::io::Error>,
    },

    /// Data validation error
    #[error("Data validation error: {message}")]
    DataValidation { message: String },

    /// Directory traversal error
    #[error("Directory traversal error: {message}")]
    DirectoryTraversal {
        message: String,
        #[source]
        source: walkdir::Error,
    },
}

impl Error {
    /// Create an I/O error with context
    pub fn io(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source,
        }
    }

    /// Create a CSV parsing error with context
    pub fn csv_parsing(
        file: impl Into<String>,
        message: impl Into<String>,
        source: Option<csv::Error>,
    ) -> Self {
        Self::CsvParsing {
            file: file.into(),
            message: message.into(),
            source,
        }
    }

    /// Create a structural mapping error
    pub fn structural_mapping(resource: impl Into<String>, message: impl Into<String>) -> Self {
        Self::StructuralMapping {
            resource: resource.into(),
            message: message.into(),
        }
    }

    /// Create an unroutable file error
    pub fn unroutable_file(path: impl Into<String>) -> Self {
        Self::UnroutableFile { path: path.into() }
    }

    /// Create a decode error carrying the offending cell text
    pub fn decode(
        column: impl Into<String>,
        raw: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::Decode {
            column: column.into(),
            raw: raw.into(),
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a sink error
    pub fn sink(message: impl Into<String>, source: Option<std::io::Error>) -> Self {
        Self::Sink {
            message: message.into(),
            source,
        }
    }

    /// Create a data validation error
    pub fn data_validation(message: impl Into<String>) -> Self {
        Self::DataValidation {
            message: message.into(),
        }
    }

    /// Create a directory traversal error
    pub fn directory_traversal(message: impl Into<String>, source: walkdir::Error) -> Self {
        Self::DirectoryTraversal {
            message: message.into(),
            source,
        }
    }

    /// Whether this error is a cell decode failure
    pub fn is_decode(&self) -> bool {
        matches!(self, Self::Decode { .. })
    }
}

// Automatic conversions from common error types
impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Self::Io {
            message: "I/O operation failed".to_string(),
            source: error,
        }
    }
}

impl From<csv::Error> for Error {
    fn from(error: csv::Error) -> Self {
        Self::CsvParsing {
            file: "unknown".to_string(),
            message: "CSV parsing failed".to_string(),
            source: Some(error),
        }
    }
}

impl From<walkdir::Error> for Error {
    fn from(error: walkdir::Error) -> Self {
        Self::DirectoryTraversal {
            message: "Directory traversal failed".to_string(),
            source: error,
        }
    }
}
