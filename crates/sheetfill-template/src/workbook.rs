//! Workbook I/O for `.xlsx` templates
//!
//! The template is edited in place: it is loaded with all of its styles,
//! values are written into existing cells, and the whole workbook is saved to a
//! new path. Nothing outside the written cells is rebuilt.

use crate::error::TemplateError;
use crate::normalize::normalize;
use crate::rehydrate::{rehydrate, RehydrationReport};
use sheetfill_domain::{CellSheet, CellValue, NormalizedRecord, Scalar, TabularGrid};
use std::io::Cursor;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use umya_spreadsheet::{Cell, NumberingFormat, Spreadsheet, Worksheet};

/// File extensions the workbook backend can edit
pub const SUPPORTED_EXTENSIONS: &[&str] = &["xlsx", "xlsm"];

/// Built-in number format ids that display a date or a time
const DATE_FORMAT_IDS: &[u32] = &[14, 15, 16, 17, 18, 19, 20, 21, 22, 45, 46, 47];

/// A loaded template workbook
pub struct TemplateWorkbook {
    book: Spreadsheet,
    sheet_index: usize,
    path: PathBuf,
}

impl TemplateWorkbook {
    /// Load a template from disk, working on its active sheet
    pub fn open(path: impl AsRef<Path>) -> Result<Self, TemplateError> {
        let path = path.as_ref();
        check_extension(path)?;
        let book = umya_spreadsheet::reader::xlsx::read(path).map_err(|e| TemplateError::Read {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        Self::from_book(book, path.to_path_buf())
    }

    /// Load a template from in-memory `.xlsx` bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, TemplateError> {
        let book = umya_spreadsheet::reader::xlsx::read_reader(Cursor::new(bytes), true).map_err(
            |e| TemplateError::Read {
                path: PathBuf::from("<memory>"),
                reason: e.to_string(),
            },
        )?;
        Self::from_book(book, PathBuf::from("<memory>"))
    }

    fn from_book(book: Spreadsheet, path: PathBuf) -> Result<Self, TemplateError> {
        let active = *book.get_workbook_view().get_active_tab() as usize;
        let sheet_index = if book.get_sheet(&active).is_some() { active } else { 0 };
        if book.get_sheet(&sheet_index).is_none() {
            return Err(TemplateError::MissingWorksheet(sheet_index));
        }
        Ok(Self {
            book,
            sheet_index,
            path,
        })
    }

    /// Path the workbook was loaded from
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn worksheet(&self) -> Result<&Worksheet, TemplateError> {
        self.book
            .get_sheet(&self.sheet_index)
            .ok_or(TemplateError::MissingWorksheet(self.sheet_index))
    }

    /// Snapshot the active sheet as a grid
    pub fn grid(&self) -> Result<TabularGrid, TemplateError> {
        let ws = self.worksheet()?;
        let mut grid = TabularGrid::new();
        for row in 1..=ws.get_highest_row() {
            for col in 1..=ws.get_highest_column() {
                let value = ws.get_cell((col, row)).map(read_cell).unwrap_or_default();
                if !value.is_empty() {
                    grid.set(row, col, value);
                }
            }
        }
        Ok(grid)
    }

    /// Rehydrate the active sheet with a record
    pub fn apply(&mut self, record: &NormalizedRecord) -> Result<RehydrationReport, TemplateError> {
        let index = self.sheet_index;
        let ws = self
            .book
            .get_sheet_mut(&index)
            .ok_or(TemplateError::MissingWorksheet(index))?;
        let mut cells = WorksheetCells { ws };
        Ok(rehydrate(&mut cells, record))
    }

    /// Save the workbook to a path
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), TemplateError> {
        let path = path.as_ref();
        umya_spreadsheet::writer::xlsx::write(&self.book, path).map_err(|e| {
            TemplateError::Write {
                path: path.to_path_buf(),
                reason: e.to_string(),
            }
        })
    }

    /// Serialize the workbook to `.xlsx` bytes
    pub fn to_bytes(&self) -> Result<Vec<u8>, TemplateError> {
        let mut out = Vec::new();
        umya_spreadsheet::writer::xlsx::write_writer(&self.book, &mut out).map_err(|e| {
            TemplateError::Write {
                path: PathBuf::from("<memory>"),
                reason: e.to_string(),
            }
        })?;
        Ok(out)
    }
}

/// Load the active sheet of a template as a grid
pub fn load_grid(path: impl AsRef<Path>) -> Result<TabularGrid, TemplateError> {
    TemplateWorkbook::open(path)?.grid()
}

/// Load a template and normalize its active sheet
pub fn load_record(path: impl AsRef<Path>) -> Result<NormalizedRecord, TemplateError> {
    Ok(normalize(&load_grid(path)?))
}

/// Write a record into a copy of the template saved at `output`
///
/// An empty record copies the template byte for byte.
pub fn fill_template(
    template: impl AsRef<Path>,
    record: &NormalizedRecord,
    output: impl AsRef<Path>,
) -> Result<RehydrationReport, TemplateError> {
    let (template, output) = (template.as_ref(), output.as_ref());

    if record.is_empty() {
        info!("No data to write, copying template verbatim");
        std::fs::copy(template, output)?;
        return Ok(RehydrationReport::default());
    }

    let mut workbook = TemplateWorkbook::open(template)?;
    debug!("Loaded template {}", workbook.path().display());
    let report = workbook.apply(record)?;
    workbook.save(output)?;

    info!(
        "Wrote {} cells into {}",
        report.cells_written,
        output.display()
    );
    Ok(report)
}

fn check_extension(path: &Path) -> Result<(), TemplateError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    if SUPPORTED_EXTENSIONS.contains(&ext.as_str()) {
        Ok(())
    } else {
        Err(TemplateError::UnsupportedFormat(ext))
    }
}

fn read_cell(cell: &Cell) -> CellValue {
    if let Some(n) = cell.get_value_number() {
        let is_date = cell
            .get_style()
            .get_number_format()
            .is_some_and(is_date_format);
        return if is_date {
            CellValue::Date(n)
        } else {
            CellValue::Number(n)
        };
    }
    let text = cell.get_value();
    if text.is_empty() {
        return CellValue::Empty;
    }
    match cell.get_data_type() {
        "b" => CellValue::Bool(text.eq_ignore_ascii_case("true")),
        _ => CellValue::Text(text.into_owned()),
    }
}

fn is_date_format(format: &NumberingFormat) -> bool {
    DATE_FORMAT_IDS.contains(format.get_number_format_id())
        || is_date_format_code(format.get_format_code())
}

/// True if a custom format code has a date or time token outside quoted
/// literals, bracketed sections and escaped characters
fn is_date_format_code(code: &str) -> bool {
    let mut escaped = false;
    let mut literal = false;
    let mut bracket = false;
    for c in code.chars() {
        match c {
            _ if escaped => escaped = false,
            '_' | '\\' | '*' => escaped = true,
            '"' => literal = !literal,
            _ if literal => (),
            '[' => bracket = true,
            ']' => bracket = false,
            _ if bracket => (),
            'y' | 'Y' | 'd' | 'D' | 'h' | 'H' | 's' | 'S' => return true,
            _ => (),
        }
    }
    false
}

/// [`CellSheet`] view over a worksheet
struct WorksheetCells<'a> {
    ws: &'a mut Worksheet,
}

impl CellSheet for WorksheetCells<'_> {
    fn max_row(&self) -> u32 {
        self.ws.get_highest_row()
    }

    fn max_column(&self) -> u32 {
        self.ws.get_highest_column()
    }

    fn cell(&self, row: u32, col: u32) -> CellValue {
        self.ws.get_cell((col, row)).map(read_cell).unwrap_or_default()
    }

    fn set_cell(&mut self, row: u32, col: u32, value: Option<&Scalar>) {
        let cell = self.ws.get_cell_mut((col, row));
        match value {
            Some(Scalar::Number(n)) => {
                cell.set_value_number(*n);
            }
            Some(Scalar::Text(s)) => {
                cell.set_value_string(s.clone());
            }
            Some(Scalar::Bool(b)) => {
                cell.set_value_bool(*b);
            }
            None => {
                cell.set_blank();
            }
        }
    }
}
