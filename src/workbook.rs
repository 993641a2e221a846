use std::path::Path;

use calamine::{Data, Range, Reader};
use tracing::debug;

use crate::error::{Result, SnapshotError};

/// A single cell value as the classifiers see it.
#[derive(Debug, Clone, PartialEq)]
pub enum RawCell {
    Text(String),
    Number(f64),
    Empty,
}

impl RawCell {
    /// Trimmed, non-empty text form of the cell. Integral numbers render
    /// without a fractional part so numeric account codes read as `1000`.
    pub fn label(&self) -> Option<String> {
        match self {
            Self::Text(s) => {
                let s = s.trim();
                (!s.is_empty()).then(|| s.to_string())
            }
            Self::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => Some(format!("{}", *n as i64)),
            Self::Number(n) => Some(n.to_string()),
            Self::Empty => None,
        }
    }

    pub fn number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }
}

impl From<&Data> for RawCell {
    fn from(data: &Data) -> Self {
        match data {
            Data::Int(i) => Self::Number(*i as f64),
            Data::Float(f) => Self::Number(*f),
            Data::String(s) => Self::Text(s.clone()),
            Data::Bool(b) => Self::Text(b.to_string()),
            Data::DateTime(dt) => Self::Text(excel_serial_to_date(dt.as_f64())),
            Data::DateTimeIso(s) | Data::DurationIso(s) => Self::Text(s.clone()),
            Data::Error(_) | Data::Empty => Self::Empty,
        }
    }
}

pub fn excel_serial_to_date(serial: f64) -> String {
    // Excel epoch is 1899-12-30 (accounting for the 1900 leap year bug)
    let base = chrono::NaiveDate::from_ymd_opt(1899, 12, 30).unwrap_or_default();
    let date = base + chrono::Duration::days(serial as i64);
    date.format("%Y-%m-%d").to_string()
}

/// One worksheet, addressed the way the exports are documented: 1-based
/// rows and columns counted from A1.
pub struct Sheet {
    name: String,
    range: Range<Data>,
}

impl Sheet {
    pub fn open(path: &Path, sheet_name: &str) -> Result<Self> {
        if !path.exists() {
            return Err(SnapshotError::InputNotFound(path.to_path_buf()));
        }
        let mut workbook = calamine::open_workbook_auto(path)
            .map_err(|e| SnapshotError::Workbook(format!("{}: {e}", path.display())))?;
        if !workbook.sheet_names().iter().any(|n| n == sheet_name) {
            return Err(SnapshotError::MissingSheet(sheet_name.to_string()));
        }
        let range = workbook
            .worksheet_range(sheet_name)
            .map_err(|e| SnapshotError::Workbook(e.to_string()))?;
        debug!(sheet = sheet_name, rows = range.height(), "worksheet loaded");
        Ok(Self::from_range(sheet_name, range))
    }

    pub fn from_range(name: &str, range: Range<Data>) -> Self {
        Self {
            name: name.to_string(),
            range,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn cell(&self, row: u32, col: u32) -> RawCell {
        if row == 0 || col == 0 {
            return RawCell::Empty;
        }
        self.range
            .get_value((row - 1, col - 1))
            .map(RawCell::from)
            .unwrap_or(RawCell::Empty)
    }

    /// Last used row, 1-based. Zero for an empty sheet.
    pub fn max_row(&self) -> u32 {
        self.range.end().map_or(0, |(r, _)| r + 1)
    }

    /// Cells `1..=width` of every row from `first_row` to the last used row.
    pub fn rows_from(&self, first_row: u32, width: u32) -> impl Iterator<Item = Vec<RawCell>> + '_ {
        (first_row.max(1)..=self.max_row())
            .map(move |r| (1..=width).map(|c| self.cell(r, c)).collect())
    }
}
