//! Trait definitions for external interactions
//!
//! These traits define the boundaries between the mapping engine and the
//! spreadsheet and model backends that live in other crates.

use crate::cell::{CellValue, Scalar};

/// A mutable, 1-based cell grid
///
/// Implemented by [`crate::TabularGrid`] and by the workbook adapter in
/// sheetfill-template, so rehydration runs the same way on both.
pub trait CellSheet {
    /// Highest populated row index
    fn max_row(&self) -> u32;

    /// Highest populated column index
    fn max_column(&self) -> u32;

    /// Value at a 1-based position; unset cells are [`CellValue::Empty`]
    fn cell(&self, row: u32, col: u32) -> CellValue;

    /// Overwrite the value at a 1-based position; `None` clears the value.
    /// Cell formatting is left untouched.
    fn set_cell(&mut self, row: u32, col: u32, value: Option<&Scalar>);
}

/// Trait for LLM provider operations
///
/// Implemented by the infrastructure layer (sheetfill-llm)
pub trait LlmProvider {
    /// Error type for LLM operations
    type Error;

    /// Generate output constrained by a response schema (JSON text)
    fn generate_structured(&self, prompt: &str, schema: &str) -> Result<String, Self::Error>;
}
