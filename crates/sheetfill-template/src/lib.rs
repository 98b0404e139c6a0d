//! Sheetfill Template Engine
//!
//! Bidirectional mapping between a semi-structured spreadsheet template and the
//! normalized row/column record used by the rest of the pipeline.
//!
//! # Overview
//!
//! ```text
//! template.xlsx ──normalize──▶ NormalizedRecord ──(extractor)──▶ filled record
//!       │                                                              │
//!       └──────────────────────────rehydrate◀──────────────────────────┘
//! ```
//!
//! - [`normalize`] drops blank rows and columns and keys every data row by its
//!   identifier cell.
//! - [`rehydrate`] re-detects the header row and identifier column on the
//!   original template and writes record values back into the matching cells,
//!   leaving everything else as it was.
//! - [`workbook`] loads and saves `.xlsx` files so the same routines run on real
//!   workbooks.
//!
//! # Example Usage
//!
//! ```
//! use sheetfill_domain::{CellValue, TabularGrid};
//! use sheetfill_template::{normalize, rehydrate};
//!
//! let mut grid = TabularGrid::from_rows(vec![
//!     vec![CellValue::Text("Item".into()), CellValue::Number(2023.0)],
//!     vec![CellValue::Text("Revenue".into()), CellValue::Empty],
//! ]);
//!
//! let record = normalize(&grid);
//! assert!(record.contains_row("Revenue"));
//!
//! let report = rehydrate(&mut grid, &record);
//! assert_eq!(report.cells_written, 1);
//! ```

#![warn(missing_docs)]

mod error;
pub mod layout;
mod normalize;
mod rehydrate;
pub mod workbook;

pub use error::TemplateError;
pub use layout::{CompactLayout, HeaderLocation};
pub use normalize::normalize;
pub use rehydrate::{header_key, rehydrate, RehydrationReport};
pub use workbook::{fill_template, load_grid, load_record, TemplateWorkbook};
