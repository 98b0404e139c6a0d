//! Error types for template I/O

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading or saving a template
#[derive(Error, Debug)]
pub enum TemplateError {
    /// Template file is missing or unreadable
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Workbook could not be parsed
    #[error("failed to read workbook {path}: {reason}")]
    Read {
        /// Workbook path
        path: PathBuf,
        /// Parser message
        reason: String,
    },

    /// Workbook could not be serialized
    #[error("failed to write workbook {path}: {reason}")]
    Write {
        /// Output path
        path: PathBuf,
        /// Writer message
        reason: String,
    },

    /// Workbook has no worksheet to work on
    #[error("workbook has no worksheet at index {0}")]
    MissingWorksheet(usize),

    /// File extension is not an editable spreadsheet format
    #[error("unsupported template format '{0}', expected .xlsx or .xlsm")]
    UnsupportedFormat(String),
}
