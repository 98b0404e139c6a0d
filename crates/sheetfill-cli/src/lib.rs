//! Sheetfill CLI library.
//!
//! This library provides the core functionality for the Sheetfill command-line
//! interface: configuration, document loading, the conversion pipeline and
//! output formatting.

pub mod cli;
pub mod commands;
pub mod config;
pub mod documents;
pub mod error;
pub mod output;
pub mod pipeline;

pub use cli::{Cli, Command};
pub use config::Config;
pub use error::{CliError, Result};
pub use output::Formatter;
pub use pipeline::{run_conversion, ConversionSummary};
