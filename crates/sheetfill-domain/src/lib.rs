//! Sheetfill Domain Layer
//!
//! This crate contains the value types shared by every stage of a template
//! conversion and the trait interfaces the other layers plug into.
//!
//! ## Key Concepts
//!
//! - **Template**: the target spreadsheet whose layout must survive a conversion
//! - **TabularGrid**: a 1-based grid of cell values as read from a spreadsheet
//! - **NormalizedRecord**: the row → column → value interchange format
//! - **SourceDocument**: plain text extracted from one source file
//!
//! ## Architecture
//!
//! - Pure data and logic only, no file or network I/O
//! - Spreadsheet backends implement [`traits::CellSheet`]
//! - Model backends implement [`traits::LlmProvider`]

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod cell;
pub mod document;
pub mod grid;
pub mod record;
pub mod traits;

// Re-exports for convenience
pub use cell::{CellValue, Scalar};
pub use document::SourceDocument;
pub use grid::TabularGrid;
pub use record::{NormalizedRecord, RowValues};
pub use traits::{CellSheet, LlmProvider};
