//! In-memory cell grid

use crate::cell::{CellValue, Scalar};
use crate::traits::CellSheet;

/// A 2-D grid of cell values with 1-based row and column indices
///
/// Reads outside the populated area return [`CellValue::Empty`]; writes outside
/// it grow the grid.
///
/// # Examples
///
/// ```
/// use sheetfill_domain::{CellValue, TabularGrid};
///
/// let grid = TabularGrid::from_rows(vec![
///     vec![CellValue::Empty, CellValue::Text("2023".into())],
///     vec![CellValue::Text("Revenue".into()), CellValue::Number(100.0)],
/// ]);
/// assert_eq!(grid.max_row(), 2);
/// assert_eq!(grid.get(2, 2), &CellValue::Number(100.0));
/// assert_eq!(grid.get(9, 9), &CellValue::Empty);
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TabularGrid {
    rows: Vec<Vec<CellValue>>,
    width: u32,
}

static EMPTY: CellValue = CellValue::Empty;

impl TabularGrid {
    /// Create an empty grid
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a grid from row-major cells; rows may have different lengths
    pub fn from_rows(rows: Vec<Vec<CellValue>>) -> Self {
        let width = rows.iter().map(Vec::len).max().unwrap_or(0) as u32;
        Self { rows, width }
    }

    /// Number of rows
    pub fn max_row(&self) -> u32 {
        self.rows.len() as u32
    }

    /// Number of columns (length of the longest row)
    pub fn max_column(&self) -> u32 {
        self.width
    }

    /// True if the grid holds no cells at all
    pub fn is_empty(&self) -> bool {
        self.rows.iter().all(|r| r.iter().all(CellValue::is_empty))
    }

    /// Cell at a 1-based position
    pub fn get(&self, row: u32, col: u32) -> &CellValue {
        if row == 0 || col == 0 {
            return &EMPTY;
        }
        self.rows
            .get(row as usize - 1)
            .and_then(|r| r.get(col as usize - 1))
            .unwrap_or(&EMPTY)
    }

    /// Set the cell at a 1-based position, growing the grid as needed
    ///
    /// Indices of 0 are ignored.
    pub fn set(&mut self, row: u32, col: u32, value: CellValue) {
        if row == 0 || col == 0 {
            return;
        }
        let (r, c) = (row as usize - 1, col as usize - 1);
        if self.rows.len() <= r {
            self.rows.resize_with(r + 1, Vec::new);
        }
        let cells = &mut self.rows[r];
        if cells.len() <= c {
            cells.resize(c + 1, CellValue::Empty);
        }
        cells[c] = value;
        self.width = self.width.max(col);
    }
}

impl CellSheet for TabularGrid {
    fn max_row(&self) -> u32 {
        TabularGrid::max_row(self)
    }

    fn max_column(&self) -> u32 {
        TabularGrid::max_column(self)
    }

    fn cell(&self, row: u32, col: u32) -> CellValue {
        self.get(row, col).clone()
    }

    fn set_cell(&mut self, row: u32, col: u32, value: Option<&Scalar>) {
        self.set(row, col, value.into());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_out_of_range_reads_are_empty() {
        let grid = TabularGrid::from_rows(vec![vec![CellValue::Number(1.0)]]);
        assert_eq!(grid.get(0, 1), &CellValue::Empty);
        assert_eq!(grid.get(1, 0), &CellValue::Empty);
        assert_eq!(grid.get(2, 1), &CellValue::Empty);
        assert_eq!(grid.get(1, 2), &CellValue::Empty);
    }

    #[test]
    fn test_set_grows_grid() {
        let mut grid = TabularGrid::new();
        grid.set(3, 4, CellValue::Bool(true));
        assert_eq!(grid.max_row(), 3);
        assert_eq!(grid.max_column(), 4);
        assert_eq!(grid.get(3, 4), &CellValue::Bool(true));
        assert_eq!(grid.get(1, 1), &CellValue::Empty);
    }

    #[test]
    fn test_ragged_rows_width() {
        let grid = TabularGrid::from_rows(vec![
            vec![CellValue::Empty],
            vec![CellValue::Empty, CellValue::Empty, CellValue::Number(1.0)],
        ]);
        assert_eq!(grid.max_column(), 3);
        assert!(!grid.is_empty());
        assert!(TabularGrid::from_rows(vec![vec![CellValue::Empty]]).is_empty());
    }

    #[test]
    fn test_set_cell_through_trait_clears_on_none() {
        let mut grid = TabularGrid::from_rows(vec![vec![CellValue::Number(5.0)]]);
        CellSheet::set_cell(&mut grid, 1, 1, None);
        assert_eq!(grid.get(1, 1), &CellValue::Empty);
        CellSheet::set_cell(&mut grid, 1, 1, Some(&Scalar::Number(7.0)));
        assert_eq!(CellSheet::cell(&grid, 1, 1), CellValue::Number(7.0));
    }
}
