use tracing::info;

use crate::builder::sequence;
use crate::classifier::{classify_account, AccountVocabulary};
use crate::error::Result;
use crate::models::{BalanceSheetRow, Level, PeriodKey, Snapshot};
use crate::period::{as_of_date, DateFallback};
use crate::reports::{account_line, amount, ReportKind};
use crate::workbook::Sheet;

pub const SECTIONS: &[&str] = &["ASSETS", "LIABILITIES", "EQUITY"];

pub const VOCABULARY: AccountVocabulary = AccountVocabulary {
    header_label: "Account Name",
    code_header: Some("Code"),
    skip_labels: &["LIABILITIES + EQUITY"],
    sections: SECTIONS,
    category_prefix: Some("Plus "),
    named_levels: &[
        ("Current Assets", Level::Subcategory),
        ("Bank and Cash Accounts", Level::Subcategory),
        ("Receivables", Level::Subcategory),
        ("Prepayments", Level::Subcategory),
        ("Current Liabilities", Level::Subcategory),
        ("Payables", Level::Subcategory),
        ("Non-current Liabilities", Level::Subcategory),
        ("Unallocated Earnings", Level::Subcategory),
        ("Retained Earnings", Level::Subcategory),
        ("Current Year Unallocated Earnings", Level::Account),
        ("Previous Years Unallocated Earnings", Level::Account),
        ("Current Year Retained Earnings", Level::Account),
        ("Previous Years Retained Earnings", Level::Account),
    ],
    fallback: Level::Category,
    require_name: false,
};

/// Columns: A = code, B = account name, C = balance. C1 holds "As of DD/MM/YYYY".
pub fn parse(sheet: &Sheet, fallback: DateFallback) -> Result<Snapshot<BalanceSheetRow>> {
    let date = as_of_date(&sheet.cell(1, 3), fallback)?;
    info!(%date, "balance sheet period");

    let rows = sequence(sheet.rows_from(1, 3), |state, cells| {
        let (state, class) = classify_account(&account_line(&cells), state, &VOCABULARY);
        let row = class.map(|c| BalanceSheetRow {
            level: c.level,
            parent_section: c.parent_section,
            code: c.code,
            name: c.name,
            balance: amount(&cells, 2),
        });
        (state, row)
    });
    info!(rows = rows.len(), "balance sheet classified");

    Ok(Snapshot {
        report: ReportKind::BalanceSheet,
        period: PeriodKey::SnapshotDate(date),
        rows,
    })
}

/// Balance of each section header row, in section order.
pub fn section_totals(snapshot: &Snapshot<BalanceSheetRow>) -> Vec<(&'static str, f64)> {
    SECTIONS
        .iter()
        .map(|section| {
            let total = snapshot
                .rows
                .iter()
                .filter(|r| r.row.level == Level::Section && r.row.parent_section.as_deref() == Some(section))
                .map(|r| r.row.balance)
                .sum();
            (*section, total)
        })
        .collect()
}
