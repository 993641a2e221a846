use tracing::info;

use crate::builder::sequence;
use crate::error::Result;
use crate::models::{AgedReceivableRow, PeriodKey, Snapshot};
use crate::period::{as_of_date, DateFallback};
use crate::reports::{amount, ReportKind};
use crate::workbook::Sheet;

/// Partner label the export uses for its grand-total line.
pub const TOTAL_LABEL: &str = "Aged Receivable";

const FIRST_DATA_ROW: u32 = 4;

/// Columns: A = partner, B = invoice date, C = at date, D..H = 1-30, 31-60,
/// 61-90, 91-120 and older buckets, I = total. B1 holds "As of DD/MM/YYYY".
pub fn parse(sheet: &Sheet, fallback: DateFallback) -> Result<Snapshot<AgedReceivableRow>> {
    let date = as_of_date(&sheet.cell(1, 2), fallback)?;
    info!(%date, "aged receivable period");

    // No sections here: the state passes through untouched.
    let rows = sequence(sheet.rows_from(FIRST_DATA_ROW, 9), |state, cells| {
        let row = cells[0].label().map(|partner| AgedReceivableRow {
            is_total: partner == TOTAL_LABEL,
            partner_name: partner,
            at_date: amount(&cells, 2),
            bucket_1_30: amount(&cells, 3),
            bucket_31_60: amount(&cells, 4),
            bucket_61_90: amount(&cells, 5),
            bucket_91_120: amount(&cells, 6),
            older: amount(&cells, 7),
            total: amount(&cells, 8),
        });
        (state, row)
    });
    info!(rows = rows.len(), "aged receivable rows read");

    Ok(Snapshot {
        report: ReportKind::AgedReceivable,
        period: PeriodKey::SnapshotDate(date),
        rows,
    })
}

pub fn grand_total(snapshot: &Snapshot<AgedReceivableRow>) -> Option<f64> {
    snapshot.rows.iter().find(|r| r.row.is_total).map(|r| r.row.total)
}
