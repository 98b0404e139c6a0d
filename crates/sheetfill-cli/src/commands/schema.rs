//! Schema command implementation.

use crate::cli::SchemaArgs;
use crate::error::Result;
use sheetfill_extractor::ExtractionSchema;
use sheetfill_template::load_record;

/// Execute the schema command.
///
/// The schema is JSON whatever the output format.
pub fn execute_schema(args: SchemaArgs) -> Result<()> {
    let record = load_record(&args.template)?;
    let schema = ExtractionSchema::synthesize(&record);
    println!("{}", serde_json::to_string_pretty(&schema.to_response_schema())?);
    Ok(())
}
