pub mod aged_receivable;
pub mod balance_sheet;
pub mod profit_loss;
pub mod vat;

use std::path::PathBuf;

use crate::classifier::AccountLine;
use crate::models::round_to;
use crate::workbook::RawCell;

// ---------------------------------------------------------------------------
// Report kinds
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportKind {
    BalanceSheet,
    ProfitLoss,
    Vat,
    AgedReceivable,
}

impl ReportKind {
    pub fn key(&self) -> &'static str {
        match self {
            Self::BalanceSheet => "balance_sheet",
            Self::ProfitLoss => "profit_loss",
            Self::Vat => "vat",
            Self::AgedReceivable => "aged_receivable",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::BalanceSheet => "Balance Sheet",
            Self::ProfitLoss => "Profit & Loss",
            Self::Vat => "VAT3 Tax Report",
            Self::AgedReceivable => "Aged Receivable",
        }
    }

    /// Worksheet tab the export writes its single sheet to.
    pub fn sheet_name(&self) -> &'static str {
        match self {
            Self::BalanceSheet => "Balance Sheet",
            Self::ProfitLoss => "Profit and Loss",
            Self::Vat => "VAT3 Tax Report",
            Self::AgedReceivable => "Aged Receivable",
        }
    }

    /// Store table holding this report's snapshots.
    pub fn table(&self) -> &'static str {
        match self {
            Self::BalanceSheet => "odoo_bs_snapshots",
            Self::ProfitLoss => "odoo_pl_snapshots",
            Self::Vat => "odoo_vat_snapshots",
            Self::AgedReceivable => "odoo_ar_snapshots",
        }
    }

    pub fn default_path(&self) -> PathBuf {
        let file = match self {
            Self::BalanceSheet => "balance_sheet.xlsx",
            Self::ProfitLoss => "profit_and_loss.xlsx",
            Self::Vat => "vat3_tax_report.xlsx",
            Self::AgedReceivable => "aged_receivable.xlsx",
        };
        PathBuf::from(EXPORT_DIR).join(file)
    }
}

/// Where the accounting exports are dropped, relative to the working directory.
pub const EXPORT_DIR: &str = "OdooCsvFiles";

// ---------------------------------------------------------------------------
// Shared cell helpers
// ---------------------------------------------------------------------------

/// Columns A (code) and B (name) of a code/name/amount export.
pub(crate) fn account_line(cells: &[RawCell]) -> AccountLine {
    AccountLine {
        code: cells.first().and_then(RawCell::label),
        name: cells.get(1).and_then(RawCell::label),
    }
}

/// Amount column that must always balance: missing or text is zero.
pub(crate) fn amount(cells: &[RawCell], idx: usize) -> f64 {
    round_to(cells.get(idx).and_then(RawCell::number).unwrap_or(0.0), 2)
}

/// Amount column where "not applicable" differs from zero.
pub(crate) fn optional_amount(cells: &[RawCell], idx: usize, places: i32) -> Option<f64> {
    cells
        .get(idx)
        .and_then(RawCell::number)
        .map(|v| round_to(v, places))
}
