//! Template rehydrator: write a normalized record back into the original grid

use crate::layout::HeaderLocation;
use indexmap::{IndexMap, IndexSet};
use sheetfill_domain::{CellSheet, CellValue, NormalizedRecord};
use std::collections::HashMap;
use tracing::{debug, warn};

/// Outcome of a rehydration pass
///
/// Rows and columns of the record that have no counterpart in the template are
/// skipped, not treated as errors; they are listed here so callers can decide
/// whether to surface them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RehydrationReport {
    /// Detected header row and identifier column, if the template has any content
    pub header: Option<HeaderLocation>,
    /// Number of cells overwritten
    pub cells_written: usize,
    /// Record rows that matched no template row
    pub unmatched_rows: Vec<String>,
    /// Record columns that matched no template column
    pub unmatched_columns: Vec<String>,
}

impl RehydrationReport {
    /// True if every record row and column found a place in the template
    pub fn is_complete(&self) -> bool {
        self.unmatched_rows.is_empty() && self.unmatched_columns.is_empty()
    }
}

/// Canonical form of a column name used for header matching
///
/// Anything that parses as a finite number is rendered as a float with at least
/// one decimal (`2024` → `"2024.0"`), so numeric header cells and string column
/// keys meet in the same form. Other text is trimmed.
///
/// # Examples
///
/// ```
/// use sheetfill_template::header_key;
///
/// assert_eq!(header_key("2024"), "2024.0");
/// assert_eq!(header_key(" FY24 "), "FY24");
/// ```
pub fn header_key(name: &str) -> String {
    let trimmed = name.trim();
    match trimmed.parse::<f64>() {
        Ok(n) if n.is_finite() => format!("{:?}", n),
        _ => trimmed.to_string(),
    }
}

fn cell_header_key(value: &CellValue) -> String {
    match value {
        CellValue::Number(n) if n.is_finite() => format!("{:?}", n),
        other => header_key(&other.label()),
    }
}

fn strip_zero_suffix(key: &str) -> &str {
    key.strip_suffix(".0").unwrap_or(key)
}

/// Write record values into a template sheet in place
///
/// The header row and identifier column are re-detected on the sheet (see
/// [`HeaderLocation::detect`]). Record columns are matched to header cells by
/// [`header_key`], then with a trailing `.0` removed on both sides. Record rows
/// are matched to identifier cells exactly, then case-insensitively.
///
/// Only matched cells are touched. A `null` value clears the cell's value;
/// formatting is never changed.
pub fn rehydrate<S: CellSheet + ?Sized>(
    sheet: &mut S,
    record: &NormalizedRecord,
) -> RehydrationReport {
    let mut report = RehydrationReport::default();
    if record.is_empty() {
        return report;
    }

    let Some(location) = HeaderLocation::detect(&*sheet) else {
        warn!("Template has no header row, nothing written");
        report.unmatched_rows = record.row_names().map(String::from).collect();
        return report;
    };
    report.header = Some(location);
    debug!(
        "Header row {}, identifier column {}",
        location.header_row, location.id_column
    );

    let column_map = map_columns(&*sheet, location, &record.column_names());
    let row_map = map_rows(&*sheet, location);

    let mut unmatched_columns = IndexSet::new();
    for (row_name, values) in record.iter() {
        let Some(row) = resolve_row(&row_map, row_name) else {
            debug!("Row '{}' not found in template, skipped", row_name);
            report.unmatched_rows.push(row_name.to_string());
            continue;
        };

        for (column, value) in values.iter() {
            match column_map.get(column) {
                Some(&col) => {
                    sheet.set_cell(row, col, value.as_ref());
                    report.cells_written += 1;
                }
                None => {
                    unmatched_columns.insert(column.to_string());
                }
            }
        }
    }
    report.unmatched_columns = unmatched_columns.into_iter().collect();

    if !report.is_complete() {
        warn!(
            "Rehydration skipped {} rows and {} columns with no template match",
            report.unmatched_rows.len(),
            report.unmatched_columns.len()
        );
    }
    report
}

/// Record column name → template column index
fn map_columns<S: CellSheet + ?Sized>(
    sheet: &S,
    location: HeaderLocation,
    names: &[String],
) -> HashMap<String, u32> {
    let keys: Vec<(&String, String)> = names.iter().map(|n| (n, header_key(n))).collect();

    let mut mapping = HashMap::new();
    for col in location.id_column + 1..=sheet.max_column() {
        let header = sheet.cell(location.header_row, col);
        if header.is_blank() {
            continue;
        }
        let template_key = cell_header_key(&header);

        let matched = keys
            .iter()
            .find(|(_, key)| *key == template_key)
            .or_else(|| {
                keys.iter().find(|(_, key)| {
                    strip_zero_suffix(key) == strip_zero_suffix(&template_key)
                })
            });
        if let Some((name, _)) = matched {
            mapping.insert((*name).clone(), col);
        }
    }
    mapping
}

/// Trimmed identifier cell text → template row index (later rows win)
fn map_rows<S: CellSheet + ?Sized>(sheet: &S, location: HeaderLocation) -> IndexMap<String, u32> {
    let mut mapping = IndexMap::new();
    for row in location.header_row + 1..=sheet.max_row() {
        let cell = sheet.cell(row, location.id_column);
        if !cell.is_blank() {
            mapping.insert(cell.label().trim().to_string(), row);
        }
    }
    mapping
}

fn resolve_row(row_map: &IndexMap<String, u32>, name: &str) -> Option<u32> {
    if let Some(&row) = row_map.get(name) {
        return Some(row);
    }
    let wanted = name.trim().to_lowercase();
    row_map
        .iter()
        .find(|(template_name, _)| template_name.to_lowercase() == wanted)
        .map(|(_, &row)| row)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::normalize;
    use sheetfill_domain::{RowValues, Scalar, TabularGrid};

    fn text(s: &str) -> CellValue {
        CellValue::Text(s.to_string())
    }

    fn num(n: f64) -> CellValue {
        CellValue::Number(n)
    }

    fn record(rows: Vec<(&str, Vec<(&str, Option<f64>)>)>) -> NormalizedRecord {
        rows.into_iter()
            .map(|(name, values)| {
                let values: RowValues = values
                    .into_iter()
                    .map(|(c, v)| (c, v.map(Scalar::Number)))
                    .collect();
                (name, values)
            })
            .collect()
    }

    /// Template with a blank first row, an outline column A left empty, labels
    /// in column B and a blank spacer column C.
    fn offset_template() -> TabularGrid {
        TabularGrid::from_rows(vec![
            vec![],
            vec![CellValue::Empty, text("Line item"), CellValue::Empty, num(2023.0), num(2024.0)],
            vec![CellValue::Empty, text("Revenue"), CellValue::Empty, num(100.0), CellValue::Empty],
            vec![],
            vec![CellValue::Empty, text("Net income"), CellValue::Empty, CellValue::Empty, text("n/a")],
        ])
    }

    #[test]
    fn test_header_key_forms() {
        assert_eq!(header_key("2024"), "2024.0");
        assert_eq!(header_key("2024.0"), "2024.0");
        assert_eq!(header_key("2.50"), "2.5");
        assert_eq!(header_key("nan"), "nan");
        assert_eq!(cell_header_key(&num(2024.0)), "2024.0");
        assert_eq!(cell_header_key(&text("Q1")), "Q1");
    }

    #[test]
    fn test_writes_into_offset_template() {
        let mut grid = offset_template();
        let filled = record(vec![("Revenue", vec![("2023", Some(100.0)), ("2024", Some(150.0))])]);

        let report = rehydrate(&mut grid, &filled);

        assert_eq!(
            report.header,
            Some(HeaderLocation { header_row: 2, id_column: 2 })
        );
        assert_eq!(report.cells_written, 2);
        assert!(report.is_complete());
        assert_eq!(grid.get(3, 5), &num(150.0));
        assert_eq!(grid.get(3, 4), &num(100.0));
        // Untouched rows, blank lines and spacer column stay as they were.
        assert_eq!(grid.get(5, 5), &text("n/a"));
        assert_eq!(grid.get(4, 2), &CellValue::Empty);
        assert_eq!(grid.get(3, 3), &CellValue::Empty);
    }

    #[test]
    fn test_numeric_header_matches_float_string_key() {
        let mut grid = offset_template();
        let filled = record(vec![("Revenue", vec![("2024.0", Some(9.0))])]);
        let report = rehydrate(&mut grid, &filled);
        assert_eq!(report.cells_written, 1);
        assert_eq!(grid.get(3, 5), &num(9.0));
    }

    #[test]
    fn test_zero_suffix_fallback_on_text_headers() {
        let mut grid = TabularGrid::from_rows(vec![
            vec![text("Item"), text("FY2024.0")],
            vec![text("Revenue"), CellValue::Empty],
        ]);
        let filled = record(vec![("Revenue", vec![("FY2024", Some(1.0))])]);
        let report = rehydrate(&mut grid, &filled);
        assert_eq!(report.cells_written, 1);
        assert_eq!(grid.get(2, 2), &num(1.0));
    }

    #[test]
    fn test_case_insensitive_row_match() {
        let mut grid = offset_template();
        let filled = record(vec![("NET INCOME", vec![("2023", Some(5.0))])]);
        rehydrate(&mut grid, &filled);
        assert_eq!(grid.get(5, 4), &num(5.0));
    }

    #[test]
    fn test_unmatched_rows_and_columns_are_reported() {
        let mut grid = offset_template();
        let before = grid.clone();
        let filled = record(vec![
            ("Dividends", vec![("2023", Some(1.0))]),
            ("Revenue", vec![("2030", Some(2.0))]),
        ]);

        let report = rehydrate(&mut grid, &filled);

        assert_eq!(report.cells_written, 0);
        assert_eq!(report.unmatched_rows, vec!["Dividends"]);
        assert_eq!(report.unmatched_columns, vec!["2030"]);
        assert_eq!(grid, before);
    }

    #[test]
    fn test_null_clears_matched_cell() {
        let mut grid = offset_template();
        let filled = record(vec![("Revenue", vec![("2023", None)])]);
        rehydrate(&mut grid, &filled);
        assert_eq!(grid.get(3, 4), &CellValue::Empty);
    }

    #[test]
    fn test_empty_record_touches_nothing() {
        let mut grid = offset_template();
        let before = grid.clone();
        let report = rehydrate(&mut grid, &NormalizedRecord::new());
        assert_eq!(report, RehydrationReport::default());
        assert_eq!(grid, before);
    }

    #[test]
    fn test_blank_template_reports_all_rows() {
        let mut grid = TabularGrid::new();
        let filled = record(vec![("Revenue", vec![("2023", Some(1.0))])]);
        let report = rehydrate(&mut grid, &filled);
        assert_eq!(report.header, None);
        assert_eq!(report.unmatched_rows, vec!["Revenue"]);
    }

    #[test]
    fn test_duplicate_template_labels_last_row_wins() {
        let mut grid = TabularGrid::from_rows(vec![
            vec![text("Item"), num(2023.0)],
            vec![text("Total"), CellValue::Empty],
            vec![text("Total "), CellValue::Empty],
        ]);
        let filled = record(vec![("Total", vec![("2023", Some(3.0))])]);
        rehydrate(&mut grid, &filled);
        assert_eq!(grid.get(2, 2), &CellValue::Empty);
        assert_eq!(grid.get(3, 2), &num(3.0));
    }

    #[test]
    fn test_normalize_then_rehydrate_is_identity() {
        let original = TabularGrid::from_rows(vec![
            vec![text("Item"), num(2022.0), num(2023.0), text("Notes")],
            vec![text("Revenue"), num(90.0), num(100.0), text("audited")],
            vec![text("Costs"), num(-40.0), CellValue::Empty, CellValue::Empty],
            vec![text("Margin"), num(0.5), num(0.0), text("")],
        ]);
        let mut grid = original.clone();

        let report = rehydrate(&mut grid, &normalize(&original));

        assert!(report.is_complete());
        assert_eq!(report.cells_written, 9);
        assert_eq!(grid, original);
    }

    #[test]
    fn test_round_trip_writes_exactly_shared_cells() {
        let original = TabularGrid::from_rows(vec![
            vec![text("Item"), num(2023.0), num(2024.0)],
            vec![text("Revenue"), num(1.0), num(2.0)],
            vec![text("Costs"), num(3.0), num(4.0)],
        ]);
        let mut grid = original.clone();
        let filled = record(vec![
            ("Revenue", vec![("2024", Some(20.0)), ("2099", Some(0.0))]),
            ("Other", vec![("2023", Some(0.0))]),
        ]);

        let report = rehydrate(&mut grid, &filled);

        assert_eq!(report.cells_written, 1);
        for row in 1..=3 {
            for col in 1..=3 {
                if (row, col) == (2, 3) {
                    assert_eq!(grid.get(row, col), &num(20.0));
                } else {
                    assert_eq!(grid.get(row, col), original.get(row, col));
                }
            }
        }
    }
}
