use std::fmt;

use chrono::NaiveDate;
use serde::Serialize;

use crate::error::Result;
use crate::reports::ReportKind;

/// Nesting role of a classified row. Each report uses a subset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Section,
    Category,
    Subcategory,
    Account,
    Item,
    Subitem,
    Total,
    Subtotal,
    Header,
}

impl Level {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Section => "section",
            Self::Category => "category",
            Self::Subcategory => "subcategory",
            Self::Account => "account",
            Self::Item => "item",
            Self::Subitem => "subitem",
            Self::Total => "total",
            Self::Subtotal => "subtotal",
            Self::Header => "header",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The period a snapshot covers. Serialises as its own column, e.g.
/// `{"snapshot_date": "2026-02-21"}` or `{"snapshot_year": 2025}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PeriodKey {
    SnapshotDate(NaiveDate),
    SnapshotYear(i32),
}

impl PeriodKey {
    pub fn column(&self) -> &'static str {
        match self {
            Self::SnapshotDate(_) => "snapshot_date",
            Self::SnapshotYear(_) => "snapshot_year",
        }
    }
}

impl fmt::Display for PeriodKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SnapshotDate(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            Self::SnapshotYear(y) => write!(f, "{y}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BalanceSheetRow {
    pub level: Level,
    pub parent_section: Option<String>,
    pub code: Option<String>,
    pub name: String,
    pub balance: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfitLossRow {
    pub level: Level,
    pub code: Option<String>,
    pub name: String,
    pub balance: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VatRow {
    pub level: Level,
    pub parent_section: String,
    pub line_number: Option<String>,
    pub name: String,
    pub percent_value: Option<f64>,
    pub net_value: Option<f64>,
    pub vat_value: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgedReceivableRow {
    pub partner_name: String,
    pub is_total: bool,
    pub at_date: f64,
    pub bucket_1_30: f64,
    pub bucket_31_60: f64,
    pub bucket_61_90: f64,
    pub bucket_91_120: f64,
    pub older: f64,
    pub total: f64,
}

/// A row that survived filtering, numbered in source order from 1.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Sequenced<R> {
    pub row_order: u32,
    #[serde(flatten)]
    pub row: R,
}

/// Every row of one report for one period, in sheet order.
#[derive(Debug, Clone)]
pub struct Snapshot<R> {
    pub report: ReportKind,
    pub period: PeriodKey,
    pub rows: Vec<Sequenced<R>>,
}

#[derive(Serialize)]
struct Record<'a, R> {
    #[serde(flatten)]
    period: &'a PeriodKey,
    #[serde(flatten)]
    row: &'a Sequenced<R>,
}

impl<R: Serialize> Snapshot<R> {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Flat JSON records as the store receives them: period column,
    /// `row_order`, then the report's own fields.
    pub fn records(&self) -> Result<Vec<serde_json::Value>> {
        self.rows
            .iter()
            .map(|row| {
                serde_json::to_value(Record {
                    period: &self.period,
                    row,
                })
                .map_err(Into::into)
            })
            .collect()
    }
}

/// Round to `places` decimals the way the exports are stored.
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_level_serialises_lowercase() {
        assert_eq!(serde_json::to_value(Level::Subcategory).unwrap(), json!("subcategory"));
        assert_eq!(Level::Total.to_string(), "total");
    }

    #[test]
    fn test_period_key_display_and_column() {
        let d = PeriodKey::SnapshotDate(NaiveDate::from_ymd_opt(2026, 2, 21).unwrap());
        assert_eq!(d.to_string(), "2026-02-21");
        assert_eq!(d.column(), "snapshot_date");
        let y = PeriodKey::SnapshotYear(2025);
        assert_eq!(y.to_string(), "2025");
        assert_eq!(y.column(), "snapshot_year");
    }

    #[test]
    fn test_records_are_flat() {
        let snapshot = Snapshot {
            report: ReportKind::ProfitLoss,
            period: PeriodKey::SnapshotYear(2025),
            rows: vec![Sequenced {
                row_order: 1,
                row: ProfitLossRow {
                    level: Level::Account,
                    code: Some("400000".to_string()),
                    name: "Sales".to_string(),
                    balance: 100.5,
                },
            }],
        };
        let records = snapshot.records().unwrap();
        assert_eq!(
            records[0],
            json!({
                "snapshot_year": 2025,
                "row_order": 1,
                "level": "account",
                "code": "400000",
                "name": "Sales",
                "balance": 100.5,
            })
        );
    }

    #[test]
    fn test_date_period_record_column() {
        let snapshot = Snapshot {
            report: ReportKind::AgedReceivable,
            period: PeriodKey::SnapshotDate(NaiveDate::from_ymd_opt(2026, 1, 31).unwrap()),
            rows: Vec::<Sequenced<ProfitLossRow>>::new(),
        };
        assert!(snapshot.is_empty());
        assert!(snapshot.records().unwrap().is_empty());
        let value = serde_json::to_value(Record {
            period: &snapshot.period,
            row: &Sequenced { row_order: 3, row: json!({"x": 1}) },
        })
        .unwrap();
        assert_eq!(value["snapshot_date"], json!("2026-01-31"));
        assert_eq!(value["row_order"], json!(3));
        assert_eq!(value["x"], json!(1));
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(1.005_1, 2), 1.01);
        assert_eq!(round_to(23.123_456, 4), 23.1235);
        assert_eq!(round_to(-4.444, 2), -4.44);
    }
}
