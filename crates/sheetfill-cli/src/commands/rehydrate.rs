//! Rehydrate command implementation.

use crate::cli::RehydrateArgs;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use sheetfill_domain::NormalizedRecord;
use sheetfill_template::fill_template;
use std::fs;

/// Execute the rehydrate command.
pub fn execute_rehydrate(args: RehydrateArgs, formatter: &Formatter) -> Result<()> {
    let json = fs::read_to_string(&args.record)?;
    let record: NormalizedRecord = serde_json::from_str(&json).map_err(|e| {
        CliError::InvalidInput(format!(
            "{} is not a row/column JSON object: {}",
            args.record.display(),
            e
        ))
    })?;

    let report = fill_template(&args.template, &record, &args.output)?;
    println!("{}", formatter.format_report(&args.output, &report)?);
    Ok(())
}
