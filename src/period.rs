use chrono::NaiveDate;
use tracing::warn;

use crate::error::{Result, SnapshotError};
use crate::workbook::RawCell;

/// Year used when a yearly report's header cell carries no readable year.
pub const DEFAULT_REPORT_YEAR: i32 = 2025;

/// What to do when an "as of" header cannot be read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateFallback {
    Reject,
    Today,
}

/// Parse `As of DD/MM/YYYY` (prefix optional) or an ISO date.
pub fn parse_as_of(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    let date = raw.strip_prefix("As of").unwrap_or(raw).trim();
    NaiveDate::parse_from_str(date, "%d/%m/%Y")
        .or_else(|_| NaiveDate::parse_from_str(date, "%Y-%m-%d"))
        .ok()
}

pub fn as_of_date(cell: &RawCell, fallback: DateFallback) -> Result<NaiveDate> {
    if let Some(date) = cell.label().as_deref().and_then(parse_as_of) {
        return Ok(date);
    }
    match fallback {
        DateFallback::Reject => Err(SnapshotError::PeriodHeader(format!(
            "expected \"As of DD/MM/YYYY\", found {}",
            describe(cell)
        ))),
        DateFallback::Today => {
            let today = chrono::Local::now().date_naive();
            warn!(cell = %describe(cell), %today, "unreadable as-of header, using today's date");
            Ok(today)
        }
    }
}

pub fn report_year(cell: &RawCell) -> i32 {
    let parsed = match cell {
        RawCell::Number(n) => Some(n.trunc() as i32),
        RawCell::Text(s) => {
            let s = s.trim();
            if !s.is_empty() && s.chars().all(|c| c.is_ascii_digit()) {
                s.parse().ok()
            } else {
                None
            }
        }
        RawCell::Empty => None,
    };
    parsed.unwrap_or_else(|| {
        warn!(cell = %describe(cell), default = DEFAULT_REPORT_YEAR, "could not parse report year");
        DEFAULT_REPORT_YEAR
    })
}

fn describe(cell: &RawCell) -> String {
    match cell {
        RawCell::Text(s) => format!("'{s}'"),
        RawCell::Number(n) => n.to_string(),
        RawCell::Empty => "an empty cell".to_string(),
    }
}
