//! Tabular normalizer: spreadsheet grid → normalized record

use crate::layout::CompactLayout;
use sheetfill_domain::{NormalizedRecord, RowValues, TabularGrid};
use tracing::debug;

/// Convert a grid into a row-keyed, column-keyed record
///
/// Rows and columns whose cells are all unset are dropped. The first remaining
/// row supplies column names and the first remaining column supplies row
/// identifiers (see [`CompactLayout`]). Columns with a blank header and rows
/// with a blank identifier are skipped. Unset value cells become `null`.
///
/// Duplicate identifiers and duplicate column names resolve last-write-wins.
pub fn normalize(grid: &TabularGrid) -> NormalizedRecord {
    let layout = CompactLayout::detect(grid);
    let (Some(header_row), Some(id_column)) = (layout.header_row(), layout.id_column()) else {
        return NormalizedRecord::new();
    };

    let columns: Vec<(u32, String)> = layout
        .data_columns()
        .iter()
        .filter_map(|&col| {
            let header = grid.get(header_row, col);
            (!header.is_blank()).then(|| (col, header.label()))
        })
        .collect();

    let mut record = NormalizedRecord::new();
    for &row in layout.data_rows() {
        let identifier = grid.get(row, id_column);
        if identifier.is_blank() {
            continue;
        }

        let values: RowValues = columns
            .iter()
            .map(|(col, name)| (name.clone(), grid.get(row, *col).to_scalar()))
            .collect();

        if record.insert(identifier.label(), values).is_some() {
            debug!("Duplicate row identifier '{}' replaced an earlier row", identifier);
        }
    }

    debug!(
        "Normalized {} rows x {} columns",
        record.len(),
        columns.len()
    );
    record
}
