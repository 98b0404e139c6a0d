//! Sheetfill Extractor
//!
//! Fills a template-derived record with figures read from source documents.
//!
//! # Overview
//!
//! ```text
//! NormalizedRecord ─▶ Schema ─┐
//!                             ├─▶ LLM ─▶ parse ─▶ reconcile ─▶ filled record
//! documents ──────▶ Prompt ───┘
//! ```
//!
//! When the model path cannot produce a usable answer (no credential, no
//! documents, a failed request, an empty or malformed response) every null
//! cell is filled with a placeholder value instead, and the outcome says why.
//! Either way the filled record has exactly the rows of the input record.
//!
//! # Example Usage
//!
//! ```
//! use sheetfill_domain::{NormalizedRecord, RowValues, Scalar, SourceDocument};
//! use sheetfill_extractor::{Extractor, ExtractorConfig, ExtractionSource};
//! use sheetfill_llm::MockProvider;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let llm = MockProvider::new(
//!     r#"{"financial_data": [{"row_name": "Revenue", "values": {"2024": 150}}]}"#,
//! );
//! let extractor = Extractor::new(llm, ExtractorConfig::default())?;
//!
//! let mut row = RowValues::new();
//! row.insert("2024", None);
//! let mut record = NormalizedRecord::new();
//! record.insert("Revenue", row);
//!
//! let docs = vec![SourceDocument::new("report.pdf", "Revenue in 2024 was 150")];
//! let outcome = extractor.extract(&record, &docs).await?;
//!
//! assert_eq!(outcome.source, ExtractionSource::Model);
//! assert_eq!(
//!     outcome.record.get("Revenue").unwrap().get("2024"),
//!     Some(&Some(Scalar::Number(150.0)))
//! );
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod config;
mod error;
mod extractor;
mod parser;
mod placeholder;
mod prompt;
mod schema;
mod types;

#[cfg(test)]
mod tests;

pub use config::ExtractorConfig;
pub use error::ExtractorError;
pub use extractor::Extractor;
pub use placeholder::{placeholder_fill, placeholder_fill_with};
pub use prompt::PromptBuilder;
pub use schema::ExtractionSchema;
pub use types::{ExtractionOutcome, ExtractionSource, FallbackReason};
