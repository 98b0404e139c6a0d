//! Structure detection for templates
//!
//! Two strategies locate the header row and the row-identifier column, and
//! they do not always agree:
//!
//! - [`CompactLayout`] is what normalization uses. Blank rows and columns are
//!   removed first; the first remaining row holds column names and the first
//!   remaining column holds row identifiers.
//! - [`HeaderLocation::detect`] is what rehydration uses on the live template.
//!   The header is the first row with any non-blank cell, and the identifier
//!   column is column 1 only when it carries values just below the header,
//!   otherwise column 2 (templates often keep an outline column in A and the
//!   row labels in B).
//!
//! For a template whose labels sit in column B while column A is blank
//! throughout, both strategies pick the same cells. They diverge when column A
//! holds only sparse outline numbers below the first nine data rows.

use sheetfill_domain::{CellSheet, TabularGrid};

/// Number of rows below the header probed for identifier-column values
pub const ID_COLUMN_PROBE_ROWS: u32 = 9;

/// Identifier column used when column 1 carries no values below the header
pub const DEFAULT_ID_COLUMN: u32 = 2;

/// Header row and row-identifier column found on a live template (1-based)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderLocation {
    /// Row holding the column names
    pub header_row: u32,
    /// Column holding the row identifiers
    pub id_column: u32,
}

impl HeaderLocation {
    /// Detect the header row and identifier column of a sheet
    ///
    /// Returns `None` when the sheet has no non-blank cell.
    ///
    /// # Examples
    ///
    /// ```
    /// use sheetfill_domain::{CellValue, TabularGrid};
    /// use sheetfill_template::HeaderLocation;
    ///
    /// let grid = TabularGrid::from_rows(vec![
    ///     vec![],
    ///     vec![CellValue::Empty, CellValue::Text("Line".into()), CellValue::Number(2024.0)],
    ///     vec![CellValue::Empty, CellValue::Text("Revenue".into())],
    /// ]);
    /// let location = HeaderLocation::detect(&grid).unwrap();
    /// assert_eq!(location.header_row, 2);
    /// assert_eq!(location.id_column, 2);
    /// ```
    pub fn detect<S: CellSheet + ?Sized>(sheet: &S) -> Option<Self> {
        let max_row = sheet.max_row();
        let max_col = sheet.max_column();

        let header_row = (1..=max_row)
            .find(|&row| (1..=max_col).any(|col| !sheet.cell(row, col).is_blank()))?;

        let probe_end = header_row.saturating_add(ID_COLUMN_PROBE_ROWS).min(max_row);
        let column_one_used =
            (header_row + 1..=probe_end).any(|row| !sheet.cell(row, 1).is_empty());

        Some(Self {
            header_row,
            id_column: if column_one_used { 1 } else { DEFAULT_ID_COLUMN },
        })
    }
}

/// Rows and columns of a grid that survive blank-line removal
///
/// Indices refer to the original grid (1-based) and are in ascending order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CompactLayout {
    /// Rows with at least one set cell
    pub rows: Vec<u32>,
    /// Columns with at least one set cell
    pub columns: Vec<u32>,
}

impl CompactLayout {
    /// Compute the layout of a grid
    ///
    /// A row or column is dropped only when every cell in it is unset. Cells
    /// holding `0` or an empty string keep their row and column.
    pub fn detect(grid: &TabularGrid) -> Self {
        let rows = (1..=grid.max_row())
            .filter(|&row| (1..=grid.max_column()).any(|col| !grid.get(row, col).is_empty()))
            .collect();
        let columns = (1..=grid.max_column())
            .filter(|&col| (1..=grid.max_row()).any(|row| !grid.get(row, col).is_empty()))
            .collect();
        Self { rows, columns }
    }

    /// Row holding column names
    pub fn header_row(&self) -> Option<u32> {
        self.rows.first().copied()
    }

    /// Column holding row identifiers
    pub fn id_column(&self) -> Option<u32> {
        self.columns.first().copied()
    }

    /// Rows below the header
    pub fn data_rows(&self) -> &[u32] {
        self.rows.get(1..).unwrap_or(&[])
    }

    /// Columns right of the identifier column
    pub fn data_columns(&self) -> &[u32] {
        self.columns.get(1..).unwrap_or(&[])
    }
}
