use tracing::info;

use crate::builder::sequence;
use crate::classifier::{classify_account, AccountVocabulary};
use crate::models::{Level, PeriodKey, ProfitLossRow, Snapshot};
use crate::period::report_year;
use crate::reports::{account_line, amount, ReportKind};
use crate::workbook::Sheet;

pub const NET_PROFIT: &str = "Net Profit";

pub const VOCABULARY: AccountVocabulary = AccountVocabulary {
    header_label: "Account Name",
    code_header: None,
    skip_labels: &[],
    sections: &[],
    category_prefix: None,
    named_levels: &[
        (NET_PROFIT, Level::Total),
        ("Gross Profit", Level::Subtotal),
        ("Operating Income (or Loss)", Level::Subtotal),
        ("Revenue", Level::Header),
        ("Less Costs of Revenue", Level::Header),
        ("Less Operating Expenses", Level::Header),
        ("Plus Other Income", Level::Header),
        ("Less Other Expenses", Level::Header),
    ],
    fallback: Level::Header,
    require_name: true,
};

/// Same columns as the balance sheet; C1 holds the report year.
pub fn parse(sheet: &Sheet) -> Snapshot<ProfitLossRow> {
    let year = report_year(&sheet.cell(1, 3));
    info!(year, "profit and loss period");

    let rows = sequence(sheet.rows_from(1, 3), |state, cells| {
        let (state, class) = classify_account(&account_line(&cells), state, &VOCABULARY);
        let row = class.map(|c| ProfitLossRow {
            level: c.level,
            code: c.code,
            name: c.name,
            balance: amount(&cells, 2),
        });
        (state, row)
    });
    info!(rows = rows.len(), "profit and loss classified");

    Snapshot {
        report: ReportKind::ProfitLoss,
        period: PeriodKey::SnapshotYear(year),
        rows,
    }
}

pub fn net_profit(snapshot: &Snapshot<ProfitLossRow>) -> f64 {
    snapshot
        .rows
        .iter()
        .find(|r| r.row.level == Level::Total && r.row.name == NET_PROFIT)
        .map_or(0.0, |r| r.row.balance)
}
