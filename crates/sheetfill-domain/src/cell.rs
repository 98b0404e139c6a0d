//! Cell values as read from a spreadsheet, and the scalar values a record carries

use chrono::{Days, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Largest magnitude at which an integral `f64` is still rendered without a
/// fractional part. Beyond this, `i64` conversion loses precision.
const MAX_INTEGRAL_LABEL: f64 = 1e15;

/// The content of one spreadsheet cell
///
/// `Empty` means the cell was never set. It is distinct from `Number(0.0)` and
/// from `Text("")`: only `Empty` cells count as missing when rows and columns
/// are dropped during normalization.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CellValue {
    /// No value
    #[default]
    Empty,
    /// Numeric value (spreadsheets store every number as a double)
    Number(f64),
    /// Number shown with a date or time format, as a 1900-system serial
    Date(f64),
    /// Text value
    Text(String),
    /// Boolean value
    Bool(bool),
}

impl CellValue {
    /// True only for a cell that was never set
    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    /// True for an unset cell or a cell holding only whitespace
    ///
    /// # Examples
    ///
    /// ```
    /// use sheetfill_domain::CellValue;
    ///
    /// assert!(CellValue::Empty.is_blank());
    /// assert!(CellValue::Text("   ".into()).is_blank());
    /// assert!(!CellValue::Number(0.0).is_blank());
    /// ```
    pub fn is_blank(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// Render the cell as an identifier string
    ///
    /// Integral numbers lose their fractional part so that a header cell holding
    /// `2024` labels its column `"2024"`, matching how the value reads on screen.
    /// Dates render as `YYYY-MM-DD`, with ` HH:MM:SS` when they carry a time.
    ///
    /// # Examples
    ///
    /// ```
    /// use sheetfill_domain::CellValue;
    ///
    /// assert_eq!(CellValue::Number(2024.0).label(), "2024");
    /// assert_eq!(CellValue::Number(2.5).label(), "2.5");
    /// assert_eq!(CellValue::Text("Revenue".into()).label(), "Revenue");
    /// assert_eq!(CellValue::Date(45657.0).label(), "2024-12-31");
    /// ```
    pub fn label(&self) -> String {
        match self {
            CellValue::Empty => String::new(),
            CellValue::Number(n) => format_number(*n),
            CellValue::Date(serial) => format_date(*serial),
            CellValue::Text(s) => s.clone(),
            CellValue::Bool(b) => b.to_string(),
        }
    }

    /// Convert to a record value; `Empty` becomes `None`
    ///
    /// A date keeps its serial number, so writing it back into the same cell
    /// leaves the cell unchanged.
    pub fn to_scalar(&self) -> Option<Scalar> {
        match self {
            CellValue::Empty => None,
            CellValue::Number(n) | CellValue::Date(n) => Some(Scalar::Number(*n)),
            CellValue::Text(s) => Some(Scalar::Text(s.clone())),
            CellValue::Bool(b) => Some(Scalar::Bool(*b)),
        }
    }
}

impl From<Option<&Scalar>> for CellValue {
    fn from(value: Option<&Scalar>) -> Self {
        match value {
            None => CellValue::Empty,
            Some(Scalar::Number(n)) => CellValue::Number(*n),
            Some(Scalar::Text(s)) => CellValue::Text(s.clone()),
            Some(Scalar::Bool(b)) => CellValue::Bool(*b),
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

/// A non-null value inside a normalized record
///
/// Serialized untagged, so a record round-trips through plain JSON:
/// `{"Revenue": {"2023": 100, "2024": null}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    /// Boolean value
    Bool(bool),
    /// Numeric value
    Number(f64),
    /// Text value
    Text(String),
}

impl Scalar {
    /// Numeric view of the value, if it is a number
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Scalar::Number(n) => Some(*n),
            _ => None,
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Bool(b) => write!(f, "{}", b),
            Scalar::Number(n) => f.write_str(&format_number(*n)),
            Scalar::Text(s) => f.write_str(s),
        }
    }
}

/// Convert a serial in the 1900 date system to a date and time
///
/// Serials below 1 carry no date part and yield `None`. Day 60 is the
/// phantom 1900-02-29, so earlier serials count from one day later.
fn serial_to_datetime(serial: f64) -> Option<NaiveDateTime> {
    if !serial.is_finite() || serial < 1.0 {
        return None;
    }
    let days = serial.trunc();
    let epoch = if days < 60.0 {
        NaiveDate::from_ymd_opt(1899, 12, 31)?
    } else {
        NaiveDate::from_ymd_opt(1899, 12, 30)?
    };
    let date = epoch.checked_add_days(Days::new(days as u64))?;

    let seconds = (serial.fract() * 86_400.0).round().min(86_399.0) as u32;
    let time = NaiveTime::from_num_seconds_from_midnight_opt(seconds, 0)?;
    Some(date.and_time(time))
}

fn format_date(serial: f64) -> String {
    match serial_to_datetime(serial) {
        Some(dt) if dt.time().num_seconds_from_midnight() == 0 => dt.date().to_string(),
        Some(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
        None => format_number(serial),
    }
}

fn format_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < MAX_INTEGRAL_LABEL {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}
