//! CLI command definitions and argument parsing.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Sheetfill CLI - Fill spreadsheet templates with figures from documents.
#[derive(Debug, Parser)]
#[command(name = "sheetfill")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// API key for the model provider
    #[arg(long, env = "GOOGLE_API_KEY", hide_env_values = true, global = true)]
    pub api_key: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Extract figures from documents and write them into a template
    Fill(FillArgs),

    /// Convert a template into its normalized JSON record
    Normalize(NormalizeArgs),

    /// Print the response schema derived from a template
    Schema(SchemaArgs),

    /// Write a JSON record into a template
    Rehydrate(RehydrateArgs),
}

/// Arguments for the fill command.
#[derive(Debug, Parser)]
pub struct FillArgs {
    /// Template workbook (.xlsx)
    #[arg(short, long)]
    pub template: PathBuf,

    /// Where to save the filled workbook
    #[arg(short, long)]
    pub output: PathBuf,

    /// Also save the filled record as JSON
    #[arg(long)]
    pub record_out: Option<PathBuf>,

    /// Source documents (.pdf or plain text)
    pub documents: Vec<PathBuf>,
}

/// Arguments for the normalize command.
#[derive(Debug, Parser)]
pub struct NormalizeArgs {
    /// Template workbook (.xlsx)
    pub template: PathBuf,

    /// Write the record to a JSON file instead of printing it
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Arguments for the schema command.
#[derive(Debug, Parser)]
pub struct SchemaArgs {
    /// Template workbook (.xlsx)
    pub template: PathBuf,
}

/// Arguments for the rehydrate command.
#[derive(Debug, Parser)]
pub struct RehydrateArgs {
    /// Template workbook (.xlsx)
    #[arg(short, long)]
    pub template: PathBuf,

    /// JSON record to write
    #[arg(short, long)]
    pub record: PathBuf,

    /// Where to save the filled workbook
    #[arg(short, long)]
    pub output: PathBuf,
}

impl From<CliFormat> for crate::config::OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => crate::config::OutputFormat::Table,
            CliFormat::Json => crate::config::OutputFormat::Json,
        }
    }
}
