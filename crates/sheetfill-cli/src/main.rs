//! Sheetfill CLI - fill spreadsheet templates with figures from documents.

use clap::Parser;
use sheetfill_cli::commands;
use sheetfill_cli::{Cli, Command, Config, Formatter};
use tracing::warn;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // Logs go to stderr so stdout stays parseable
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> sheetfill_cli::Result<()> {
    let cli = Cli::parse();

    let config = match Config::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) if cli.config.is_none() => {
            warn!("Ignoring unreadable config file: {}", e);
            Config::default()
        }
        Err(e) => return Err(e),
    };

    let format = cli
        .format
        .map(Into::into)
        .unwrap_or(config.settings.format);
    let color_enabled = !cli.no_color && config.settings.color;
    let formatter = Formatter::new(format, color_enabled);

    match cli.command {
        Command::Fill(args) => {
            commands::execute_fill(args, &config, cli.api_key.as_deref(), &formatter).await?;
        }
        Command::Normalize(args) => commands::execute_normalize(args, &formatter)?,
        Command::Schema(args) => commands::execute_schema(args)?,
        Command::Rehydrate(args) => commands::execute_rehydrate(args, &formatter)?,
    }

    Ok(())
}
