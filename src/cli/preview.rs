use colored::Colorize;
use comfy_table::{Cell, CellAlignment, Table};

use crate::fmt::{amount, optional_amount};
use crate::models::{AgedReceivableRow, BalanceSheetRow, Level, ProfitLossRow, Snapshot, VatRow};
use crate::reports::{aged_receivable, balance_sheet, profit_loss, vat};

fn indented(level_indent: usize, code: Option<&str>, name: &str) -> String {
    let code = code.map(|c| format!("[{c}] ")).unwrap_or_default();
    format!("{}{code}{name}", " ".repeat(level_indent))
}

fn right(text: String) -> Cell {
    Cell::new(text).set_alignment(CellAlignment::Right)
}

fn header<R: serde::Serialize>(snapshot: &Snapshot<R>) {
    println!(
        "{} - {} ({} rows)",
        snapshot.report.name().bold(),
        snapshot.period,
        snapshot.len()
    );
}

// ---------------------------------------------------------------------------
// Balance sheet
// ---------------------------------------------------------------------------

pub fn balance_sheet(snapshot: &Snapshot<BalanceSheetRow>) {
    header(snapshot);
    let mut table = Table::new();
    table.set_header(vec!["#", "Account", "Balance"]);
    for r in &snapshot.rows {
        let row = &r.row;
        let indent = match row.level {
            Level::Category => 2,
            Level::Subcategory => 4,
            Level::Account => 6,
            _ => 0,
        };
        let label = indented(indent, row.code.as_deref(), &row.name);
        let label = if row.level == Level::Section {
            label.bold().to_string()
        } else {
            label
        };
        table.add_row(vec![Cell::new(r.row_order), Cell::new(label), right(amount(row.balance))]);
    }
    println!("{table}");
}

pub fn balance_sheet_summary(snapshot: &Snapshot<BalanceSheetRow>) {
    for (section, total) in balance_sheet::section_totals(snapshot) {
        println!("  {:<12} {:>15}", format!("{section}:"), amount(total));
    }
}

// ---------------------------------------------------------------------------
// Profit & loss
// ---------------------------------------------------------------------------

pub fn profit_loss(snapshot: &Snapshot<ProfitLossRow>) {
    header(snapshot);
    let mut table = Table::new();
    table.set_header(vec!["#", "Line", "Balance"]);
    for r in &snapshot.rows {
        let row = &r.row;
        let indent = match row.level {
            Level::Account => 4,
            Level::Subtotal | Level::Total => 2,
            _ => 0,
        };
        let label = indented(indent, row.code.as_deref(), &row.name);
        let label = match row.level {
            Level::Total | Level::Subtotal => label.bold().to_string(),
            _ => label,
        };
        table.add_row(vec![Cell::new(r.row_order), Cell::new(label), right(amount(row.balance))]);
    }
    println!("{table}");
}

pub fn profit_loss_summary(snapshot: &Snapshot<ProfitLossRow>) {
    let net = profit_loss::net_profit(snapshot);
    let net_str = if net >= 0.0 {
        amount(net).green()
    } else {
        amount(net).red()
    };
    println!("  Net Profit: {net_str}");
}

// ---------------------------------------------------------------------------
// VAT
// ---------------------------------------------------------------------------

pub fn vat(snapshot: &Snapshot<VatRow>) {
    header(snapshot);
    let mut table = Table::new();
    table.set_header(vec!["#", "Line", "Percent", "Value", "VAT"]);
    for r in &snapshot.rows {
        let row = &r.row;
        let indent = match row.level {
            Level::Item | Level::Total => 2,
            Level::Subitem => 4,
            _ => 0,
        };
        let label = indented(indent, row.line_number.as_deref(), &row.name);
        let label = match row.level {
            Level::Section | Level::Total => label.bold().to_string(),
            _ => label,
        };
        table.add_row(vec![
            Cell::new(r.row_order),
            Cell::new(label),
            right(row.percent_value.map(|p| format!("{p}%")).unwrap_or_default()),
            right(optional_amount(row.net_value)),
            right(optional_amount(row.vat_value)),
        ]);
    }
    println!("{table}");
}

pub fn vat_summary(snapshot: &Snapshot<VatRow>) {
    for (number, caption) in vat::KEY_LINES {
        if let Some(row) = vat::line(snapshot, number) {
            println!(
                "  {caption:<13} Value: {:>14}  VAT: {:>14}",
                optional_amount(row.net_value),
                optional_amount(row.vat_value)
            );
        }
    }
}

// ---------------------------------------------------------------------------
// Aged receivable
// ---------------------------------------------------------------------------

pub fn aged_receivable(snapshot: &Snapshot<AgedReceivableRow>) {
    header(snapshot);
    let mut table = Table::new();
    table.set_header(vec![
        "#", "Partner", "At Date", "1-30", "31-60", "61-90", "91-120", "Older", "Total",
    ]);
    for r in &snapshot.rows {
        let row = &r.row;
        let partner = if row.is_total {
            row.partner_name.bold().to_string()
        } else {
            row.partner_name.clone()
        };
        table.add_row(vec![
            Cell::new(r.row_order),
            Cell::new(partner),
            right(amount(row.at_date)),
            right(amount(row.bucket_1_30)),
            right(amount(row.bucket_31_60)),
            right(amount(row.bucket_61_90)),
            right(amount(row.bucket_91_120)),
            right(amount(row.older)),
            right(amount(row.total)),
        ]);
    }
    println!("{table}");
}

pub fn aged_receivable_summary(snapshot: &Snapshot<AgedReceivableRow>) {
    match aged_receivable::grand_total(snapshot) {
        Some(total) => println!("  Total receivable: {}", amount(total)),
        None => println!("  {} partners", snapshot.len()),
    }
}
