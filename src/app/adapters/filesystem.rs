//! Filesystem access for spreadsheet exports
//!
//! Reads legacy Excel exports (UTF-8 with BOM or Windows-1252), builds CSV
//! readers for the semicolon dialect and discovers data files under the
//! configured input roots.

use crate::constants::{DISCOVERY_MAX_DEPTH, FIELD_DELIMITER};
use crate::{Error, Result};
use csv::{Reader, ReaderBuilder, StringRecord};
use encoding_rs::WINDOWS_1252;
use glob::Pattern;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

const UTF8_BOM: [u8; 3] = [0xEF, 0xBB, 0xBF];

/// Read a text file, tolerating the encodings produced by spreadsheet exports
pub fn read_text(path: &Path) -> Result<String> {
    let bytes = std::fs::read(path)
        .map_err(|e| Error::io(format!("Failed to read file {}", path.display()), e))?;
    Ok(decode_text(bytes))
}

/// Decode raw bytes as UTF-8 (BOM stripped) or, failing that, Windows-1252
pub fn decode_text(bytes: Vec<u8>) -> String {
    let bytes = if bytes.starts_with(&UTF8_BOM) {
        bytes[UTF8_BOM.len()..].to_vec()
    } else {
        bytes
    };

    match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(e) => {
            debug!("Input is not valid UTF-8, decoding as Windows-1252");
            let bytes = e.into_bytes();
            let (text, _) = WINDOWS_1252.decode_without_bom_handling(&bytes);
            text.into_owned()
        }
    }
}

/// CSV reader for the semicolon-delimited, Excel-quoted dialect
pub fn csv_reader(text: &str) -> Reader<&[u8]> {
    ReaderBuilder::new()
        .delimiter(FIELD_DELIMITER)
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes())
}

/// Trimmed header names of a reader, preserving column order
pub fn header_names(reader: &mut Reader<&[u8]>, file: &str) -> Result<Vec<String>> {
    let headers: &StringRecord = reader.headers().map_err(|e| {
        Error::csv_parsing(file, "Failed to read CSV header", Some(e))
    })?;
    Ok(headers.iter().map(|h| h.trim().to_string()).collect())
}

/// Read only the header row of a file
pub fn read_header(path: &Path) -> Result<Vec<String>> {
    let text = read_text(path)?;
    let mut reader = csv_reader(&text);
    header_names(&mut reader, &path.display().to_string())
}

/// Discover data files under a root directory and its immediate sub-directories
///
/// Results are sorted so that repeated runs visit files in the same order.
pub fn discover_files(root: &Path, pattern: &str) -> Result<Vec<PathBuf>> {
    if !root.exists() {
        return Err(Error::configuration(format!(
            "Input directory does not exist: {}",
            root.display()
        )));
    }

    let pattern = Pattern::new(pattern).map_err(|e| {
        Error::configuration(format!("Invalid file pattern '{}': {}", pattern, e))
    })?;

    let mut files = Vec::new();
    for entry in WalkDir::new(root).max_depth(DISCOVERY_MAX_DEPTH) {
        let entry = entry.map_err(|e| {
            Error::directory_traversal(format!("Failed to walk {}", root.display()), e)
        })?;

        if !entry.file_type().is_file() {
            continue;
        }

        let matches = entry
            .file_name()
            .to_str()
            .map(|name| pattern.matches(name))
            .unwrap_or(false);
        if matches {
            files.push(entry.into_path());
        }
    }

    files.sort();
    debug!("Discovered {} files under {}", files.len(), root.display());
    Ok(files)
}
