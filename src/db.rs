use std::path::Path;

use rusqlite::types::Value as SqlValue;
use rusqlite::Connection;
use serde_json::Value;

use crate::error::{Result, SnapshotError};
use crate::models::PeriodKey;
use crate::store::SnapshotStore;

pub const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS snapshot_records (
    id INTEGER PRIMARY KEY,
    table_name TEXT NOT NULL,
    row_order INTEGER,
    record TEXT NOT NULL,
    imported_at TEXT DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_snapshot_records_table ON snapshot_records(table_name);
";

pub fn get_connection(db_path: &Path) -> Result<Connection> {
    let conn = Connection::open(db_path)?;
    conn.execute_batch("PRAGMA journal_mode=WAL;")?;
    Ok(conn)
}

pub fn init_db(conn: &Connection) -> Result<()> {
    conn.execute_batch(SCHEMA)?;
    Ok(())
}

fn period_param(period: &PeriodKey) -> SqlValue {
    match period {
        PeriodKey::SnapshotDate(_) => SqlValue::Text(period.to_string()),
        PeriodKey::SnapshotYear(y) => SqlValue::Integer(i64::from(*y)),
    }
}

/// Local mirror of the reporting store: each record kept as a JSON document
/// under its table name.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    pub fn open(db_path: &Path) -> Result<Self> {
        let conn = get_connection(db_path)?;
        init_db(&conn)?;
        Ok(Self { conn })
    }

    /// Records of one period, in row order.
    pub fn fetch_period(&self, table: &str, period: &PeriodKey) -> Result<Vec<Value>> {
        let sql = format!(
            "SELECT record FROM snapshot_records \
             WHERE table_name = ?1 AND json_extract(record, '$.{}') = ?2 \
             ORDER BY row_order, id",
            period.column()
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let raw = stmt
            .query_map(rusqlite::params![table, period_param(period)], |row| {
                row.get::<_, String>(0)
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        raw.iter()
            .map(|r| serde_json::from_str(r).map_err(SnapshotError::from))
            .collect()
    }

    pub fn count(&self, table: &str) -> Result<i64> {
        Ok(self.conn.query_row(
            "SELECT count(*) FROM snapshot_records WHERE table_name = ?1",
            [table],
            |r| r.get(0),
        )?)
    }
}

fn delete_in(conn: &Connection, table: &str, period: &PeriodKey) -> Result<()> {
    let sql = format!(
        "DELETE FROM snapshot_records WHERE table_name = ?1 AND json_extract(record, '$.{}') = ?2",
        period.column()
    );
    conn.execute(&sql, rusqlite::params![table, period_param(period)])?;
    Ok(())
}

fn insert_in(conn: &Connection, table: &str, records: &[Value]) -> Result<()> {
    let mut stmt = conn.prepare_cached(
        "INSERT INTO snapshot_records (table_name, row_order, record) VALUES (?1, ?2, ?3)",
    )?;
    for record in records {
        let row_order = record.get("row_order").and_then(Value::as_i64);
        stmt.execute(rusqlite::params![table, row_order, record.to_string()])?;
    }
    Ok(())
}

impl SnapshotStore for SqliteStore {
    fn delete_period(&mut self, table: &str, period: &PeriodKey) -> Result<()> {
        delete_in(&self.conn, table, period)
    }

    fn insert(&mut self, table: &str, records: &[Value]) -> Result<()> {
        insert_in(&self.conn, table, records)
    }

    /// Delete and insert inside one transaction, so a failed insert keeps
    /// the previous snapshot.
    fn replace(&mut self, table: &str, period: &PeriodKey, records: &[Value]) -> Result<()> {
        let tx = self.conn.transaction()?;
        delete_in(&tx, table, period)?;
        insert_in(&tx, table, records)?;
        tx.commit()?;
        Ok(())
    }
}
