//! Normalize command implementation.

use crate::cli::NormalizeArgs;
use crate::error::Result;
use crate::output::Formatter;
use sheetfill_template::load_record;
use std::fs;

/// Execute the normalize command.
pub fn execute_normalize(args: NormalizeArgs, formatter: &Formatter) -> Result<()> {
    let record = load_record(&args.template)?;

    match args.output {
        Some(path) => {
            fs::write(&path, serde_json::to_string_pretty(&record)?)?;
            println!(
                "{}",
                formatter.success(&format!("Wrote {} rows to {}", record.len(), path.display()))
            );
        }
        None => println!("{}", formatter.format_record(&record)?),
    }

    Ok(())
}
