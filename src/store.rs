use serde::Serialize;
use serde_json::Value;
use tracing::info;

use crate::error::Result;
use crate::models::{PeriodKey, Snapshot};

/// A tabular store that holds one snapshot per period key and table.
pub trait SnapshotStore {
    /// Remove every record of `table` whose period column equals `period`.
    fn delete_period(&mut self, table: &str, period: &PeriodKey) -> Result<()>;

    /// Append `records` to `table` in one batch.
    fn insert(&mut self, table: &str, records: &[Value]) -> Result<()>;

    /// Supersede whatever `table` holds for `period` with `records`.
    ///
    /// Delete, then insert. The two calls are not atomic: a failure between
    /// them leaves the period empty. Stores that can do better override this.
    fn replace(&mut self, table: &str, period: &PeriodKey, records: &[Value]) -> Result<()> {
        self.delete_period(table, period)?;
        if records.is_empty() {
            return Ok(());
        }
        self.insert(table, records)
    }
}

/// Publish a snapshot under its period key, replacing any earlier one.
/// Returns the number of records written.
pub fn publish<S, R>(store: &mut S, snapshot: &Snapshot<R>) -> Result<usize>
where
    S: SnapshotStore + ?Sized,
    R: Serialize,
{
    let table = snapshot.report.table();
    let records = snapshot.records()?;
    info!(report = snapshot.report.key(), table, period = %snapshot.period, rows = records.len(), "publishing snapshot");
    store.replace(table, &snapshot.period, &records)?;
    Ok(records.len())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::error::SnapshotError;
    use crate::models::{Level, ProfitLossRow, Sequenced};
    use crate::reports::ReportKind;

    /// Records kept per table in memory, with a log of calls made.
    #[derive(Default)]
    pub(crate) struct MemoryStore {
        pub tables: std::collections::HashMap<String, Vec<Value>>,
        pub calls: Vec<String>,
        pub fail_delete: bool,
        pub fail_insert: bool,
    }

    impl SnapshotStore for MemoryStore {
        fn delete_period(&mut self, table: &str, period: &PeriodKey) -> Result<()> {
            self.calls.push(format!("DELETE {table} {}={period}", period.column()));
            if self.fail_delete {
                return Err(SnapshotError::Store {
                    op: "Delete",
                    status: 500,
                    body: "boom".to_string(),
                });
            }
            let key = serde_json::to_value(period)?;
            let column = period.column();
            if let Some(rows) = self.tables.get_mut(table) {
                rows.retain(|r| r.get(column) != key.get(column));
            }
            Ok(())
        }

        fn insert(&mut self, table: &str, records: &[Value]) -> Result<()> {
            self.calls.push(format!("POST {table} {}", records.len()));
            if self.fail_insert {
                return Err(SnapshotError::Store {
                    op: "Insert",
                    status: 400,
                    body: "bad row".to_string(),
                });
            }
            self.tables.entry(table.to_string()).or_default().extend_from_slice(records);
            Ok(())
        }
    }

    pub(crate) fn pl_snapshot(year: i32, names: &[&str]) -> Snapshot<ProfitLossRow> {
        Snapshot {
            report: ReportKind::ProfitLoss,
            period: PeriodKey::SnapshotYear(year),
            rows: names
                .iter()
                .enumerate()
                .map(|(i, name)| Sequenced {
                    row_order: i as u32 + 1,
                    row: ProfitLossRow {
                        level: Level::Header,
                        code: None,
                        name: name.to_string(),
                        balance: 10.0 * (i as f64 + 1.0),
                    },
                })
                .collect(),
        }
    }

    #[test]
    fn test_publish_deletes_then_inserts() {
        let mut store = MemoryStore::default();
        let count = publish(&mut store, &pl_snapshot(2025, &["Revenue", "Net Profit"])).unwrap();
        assert_eq!(count, 2);
        assert_eq!(
            store.calls,
            vec!["DELETE odoo_pl_snapshots snapshot_year=2025", "POST odoo_pl_snapshots 2"]
        );
    }

    #[test]
    fn test_publish_twice_does_not_duplicate() {
        let mut store = MemoryStore::default();
        let snapshot = pl_snapshot(2025, &["Revenue", "Net Profit"]);
        publish(&mut store, &snapshot).unwrap();
        publish(&mut store, &snapshot).unwrap();
        assert_eq!(store.tables["odoo_pl_snapshots"].len(), 2);
    }

    #[test]
    fn test_republish_supersedes_only_same_period() {
        let mut store = MemoryStore::default();
        publish(&mut store, &pl_snapshot(2024, &["A", "B", "C"])).unwrap();
        publish(&mut store, &pl_snapshot(2025, &["A", "B"])).unwrap();
        publish(&mut store, &pl_snapshot(2025, &["Only"])).unwrap();
        let rows = &store.tables["odoo_pl_snapshots"];
        assert_eq!(rows.len(), 4);
        let for_2025: Vec<_> = rows.iter().filter(|r| r["snapshot_year"] == 2025).collect();
        assert_eq!(for_2025.len(), 1);
        assert_eq!(for_2025[0]["name"], "Only");
    }

    #[test]
    fn test_empty_snapshot_clears_period_and_succeeds() {
        let mut store = MemoryStore::default();
        publish(&mut store, &pl_snapshot(2025, &["A"])).unwrap();
        let count = publish(&mut store, &pl_snapshot(2025, &[])).unwrap();
        assert_eq!(count, 0);
        assert!(store.tables["odoo_pl_snapshots"].is_empty());
        assert_eq!(store.calls.last().unwrap(), "DELETE odoo_pl_snapshots snapshot_year=2025");
    }

    #[test]
    fn test_failed_delete_aborts_before_insert() {
        let mut store = MemoryStore {
            fail_delete: true,
            ..Default::default()
        };
        let err = publish(&mut store, &pl_snapshot(2025, &["A"])).unwrap_err();
        assert_eq!(err.to_string(), "Delete failed (500): boom");
        assert_eq!(store.calls.len(), 1);
    }

    #[test]
    fn test_failed_insert_leaves_period_empty() {
        let mut store = MemoryStore::default();
        publish(&mut store, &pl_snapshot(2025, &["A"])).unwrap();
        store.fail_insert = true;
        assert!(publish(&mut store, &pl_snapshot(2025, &["B"])).is_err());
        assert!(store.tables["odoo_pl_snapshots"].is_empty());
    }
}
