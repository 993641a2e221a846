use tracing::info;

use crate::builder::sequence;
use crate::classifier::{classify_line, LineVocabulary, NumberedLine};
use crate::models::{Level, PeriodKey, Snapshot, VatRow};
use crate::period::report_year;
use crate::reports::{optional_amount, ReportKind};
use crate::workbook::{RawCell, Sheet};

pub const VOCABULARY: LineVocabulary = LineVocabulary {
    header_marker: "Percent",
    sections: &[
        ("OUTPUT", "OUTPUT"),
        ("INPUT - Imports and Purchases", "INPUT"),
        ("VAT ACCOUNT", "VAT_ACCOUNT"),
    ],
    total_lines: &["5.", "9.", "10.", "14.", "15.3.", "16.", "17.", "18.", "19."],
    subheader_lines: &["1.", "6.", "8.", "15."],
};

/// Key totals shown after an import: (line, caption).
pub const KEY_LINES: &[(&str, &str)] = &[
    ("5.", "Output Total"),
    ("9.", "Input Total"),
    ("19.", "VAT Payable"),
];

/// A zero in the percent column marks nothing; only text or a non-zero
/// figure keeps an unlabelled row alive.
fn marker(cell: &RawCell) -> Option<String> {
    match cell {
        RawCell::Number(n) if *n == 0.0 => None,
        other => other.label(),
    }
}

/// Columns: A = label, B = percent, C = net value, D = VAT value. B1 holds the year.
pub fn parse(sheet: &Sheet) -> Snapshot<VatRow> {
    let year = report_year(&sheet.cell(1, 2));
    info!(year, "VAT report period");

    let rows = sequence(sheet.rows_from(1, 4), |state, cells| {
        let line = NumberedLine {
            label: cells[0].label(),
            marker: cells.get(1).and_then(marker),
        };
        let (state, class) = classify_line(&line, state, &VOCABULARY);
        let row = class.map(|c| {
            // Section header rows carry no figures.
            let figures = c.level != Level::Section;
            VatRow {
                level: c.level,
                parent_section: c.parent_section,
                line_number: c.line_number,
                name: c.name,
                percent_value: optional_amount(&cells, 1, 4).filter(|_| figures),
                net_value: optional_amount(&cells, 2, 2).filter(|_| figures),
                vat_value: optional_amount(&cells, 3, 2).filter(|_| figures),
            }
        });
        (state, row)
    });
    info!(rows = rows.len(), "VAT report classified");

    Snapshot {
        report: ReportKind::Vat,
        period: PeriodKey::SnapshotYear(year),
        rows,
    }
}

/// The row printed for a numbered line, if the export contains it.
pub fn line<'a>(snapshot: &'a Snapshot<VatRow>, number: &str) -> Option<&'a VatRow> {
    snapshot
        .rows
        .iter()
        .map(|r| &r.row)
        .find(|r| r.line_number.as_deref() == Some(number))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::period::DEFAULT_REPORT_YEAR;
    use crate::workbook::tests::{sheet, text};
    use calamine::Data;

    fn export() -> Sheet {
        sheet(
            "VAT3 Tax Report",
            &[
                (1, 2, Data::Float(2025.0)),
                (2, 2, text("Percent")),
                (2, 3, text("Value")),
                (2, 4, text("VAT")),
                (3, 1, text("Company Ltd")),
                (4, 1, text("OUTPUT")),
                (5, 1, text("1. Sales of goods")),
                (6, 1, text("1.1 Standard rate")),
                (6, 2, Data::Float(23.0)),
                (6, 3, Data::Float(1000.0)),
                (6, 4, Data::Float(230.004)),
                (7, 1, text("5. Total amount of VAT due")),
                (7, 3, Data::Float(1000.0)),
                (7, 4, Data::Float(230.0)),
                (8, 1, text("INPUT - Imports and Purchases")),
                (9, 1, text("7 Purchases")),
                (9, 3, Data::Float(0.0)),
                (10, 1, text("VAT ACCOUNT")),
                (11, 1, text("19. VAT payable")),
                (11, 4, Data::Float(230.0)),
            ],
        )
    }

    #[test]
    fn test_rows_before_first_section_are_dropped() {
        let snapshot = parse(&export());
        assert_eq!(snapshot.rows[0].row.name, "OUTPUT");
        assert_eq!(snapshot.rows[0].row.level, Level::Section);
        assert_eq!(snapshot.rows[0].row_order, 1);
        assert!(snapshot.rows.iter().all(|r| r.row.name != "Company Ltd"));
        assert_eq!(snapshot.len(), 8);
    }

    #[test]
    fn test_levels_and_sections() {
        let snapshot = parse(&export());
        let summary: Vec<(Level, &str, Option<&str>)> = snapshot
            .rows
            .iter()
            .map(|r| (r.row.level, r.row.parent_section.as_str(), r.row.line_number.as_deref()))
            .collect();
        assert_eq!(
            summary,
            vec![
                (Level::Section, "OUTPUT", None),
                (Level::Item, "OUTPUT", Some("1.")),
                (Level::Subitem, "OUTPUT", Some("1.1.")),
                (Level::Total, "OUTPUT", Some("5.")),
                (Level::Section, "INPUT", None),
                (Level::Item, "INPUT", Some("7.")),
                (Level::Section, "VAT_ACCOUNT", None),
                (Level::Total, "VAT_ACCOUNT", Some("19.")),
            ]
        );
    }

    #[test]
    fn test_missing_figures_are_none_not_zero() {
        let snapshot = parse(&export());
        let standard = &snapshot.rows[2].row;
        assert_eq!(standard.percent_value, Some(23.0));
        assert_eq!(standard.net_value, Some(1000.0));
        assert_eq!(standard.vat_value, Some(230.0));

        let header = &snapshot.rows[1].row;
        assert_eq!(header.percent_value, None);
        assert_eq!(header.net_value, None);
        assert_eq!(header.vat_value, None);

        let purchases = &snapshot.rows[5].row;
        assert_eq!(purchases.net_value, Some(0.0));
        assert_eq!(purchases.vat_value, None);
    }

    #[test]
    fn test_key_line_lookup() {
        let snapshot = parse(&export());
        let total = line(&snapshot, "5.").unwrap();
        assert_eq!(total.name, "Total amount of VAT due");
        assert_eq!(total.vat_value, Some(230.0));
        assert!(line(&snapshot, "9.").is_none());
    }

    #[test]
    fn test_unlabelled_zero_percent_row_is_dropped() {
        let s = sheet(
            "VAT3 Tax Report",
            &[
                (1, 2, Data::Float(2025.0)),
                (4, 1, text("OUTPUT")),
                (5, 2, Data::Float(0.0)),
                (5, 3, Data::Float(0.0)),
                (6, 2, Data::Float(13.5)),
            ],
        );
        let snapshot = parse(&s);
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot.rows[1].row.name, "");
        assert_eq!(snapshot.rows[1].row.percent_value, Some(13.5));
    }

    #[test]
    fn test_year_fallback() {
        let s = sheet("VAT3 Tax Report", &[(1, 2, text("Tax year")), (4, 1, text("OUTPUT"))]);
        let snapshot = parse(&s);
        assert_eq!(snapshot.period, PeriodKey::SnapshotYear(DEFAULT_REPORT_YEAR));
        assert_eq!(snapshot.len(), 1);
    }
}
