use std::collections::BTreeSet;
use std::path::Path;

use reqwest::blocking::Client;
use serde::Serialize;
use serde_json::{json, Value};
use tracing::{debug, info};
use zeroize::Zeroizing;

use crate::error::{Result, SnapshotError};

pub const MODEL: &str = "account.move.line";
pub const BATCH_SIZE: usize = 5000;

pub const FIELDS: &[&str] = &[
    "move_id",
    "date",
    "account_id",
    "partner_id",
    "name",
    "ref",
    "debit",
    "credit",
    "balance",
    "journal_id",
    "company_id",
];

/// Posted journal items only.
pub fn posted_domain() -> Value {
    json!([["parent_state", "=", "posted"]])
}

/// Record collections that can be counted and paged through.
pub trait LedgerSource {
    fn search_count(&mut self, model: &str, domain: &Value) -> Result<u64>;

    fn search_read(
        &mut self,
        model: &str,
        domain: &Value,
        fields: &[&str],
        offset: usize,
        limit: usize,
    ) -> Result<Vec<Value>>;
}

// ---------------------------------------------------------------------------
// Odoo JSON-RPC client
// ---------------------------------------------------------------------------

pub struct OdooClient {
    client: Client,
    endpoint: String,
    db: String,
    uid: i64,
    password: Zeroizing<String>,
}

fn rpc(client: &Client, endpoint: &str, service: &str, method: &str, args: Value) -> Result<Value> {
    let body = json!({
        "jsonrpc": "2.0",
        "method": "call",
        "params": { "service": service, "method": method, "args": args },
    });
    let response: Value = client.post(endpoint).json(&body).send()?.error_for_status()?.json()?;
    rpc_result(response)
}

fn rpc_result(mut response: Value) -> Result<Value> {
    if let Some(error) = response.get("error") {
        let message = error
            .pointer("/data/message")
            .or_else(|| error.get("message"))
            .and_then(Value::as_str)
            .unwrap_or("unknown error");
        return Err(SnapshotError::Rpc(message.to_string()));
    }
    Ok(response.get_mut("result").map(Value::take).unwrap_or(Value::Null))
}

/// `common.authenticate` answers with the user id, or `false` when refused.
fn session_uid(result: &Value) -> Result<i64> {
    result
        .as_i64()
        .filter(|uid| *uid > 0)
        .ok_or(SnapshotError::AuthenticationFailed)
}

impl OdooClient {
    /// Log in and keep the session's user id. A `false` uid means the
    /// credentials were refused.
    pub fn authenticate(url: &str, db: &str, username: &str, password: Zeroizing<String>) -> Result<Self> {
        let client = Client::builder().build()?;
        let endpoint = format!("{}/jsonrpc", url.trim_end_matches('/'));
        let result = rpc(
            &client,
            &endpoint,
            "common",
            "authenticate",
            json!([db, username, password.as_str(), {}]),
        )?;
        let uid = session_uid(&result)?;
        info!(uid, "authenticated with Odoo");
        Ok(Self {
            client,
            endpoint,
            db: db.to_string(),
            uid,
            password,
        })
    }

    fn execute_kw(&self, model: &str, method: &str, args: Value, kwargs: Value) -> Result<Value> {
        rpc(
            &self.client,
            &self.endpoint,
            "object",
            "execute_kw",
            json!([self.db, self.uid, self.password.as_str(), model, method, args, kwargs]),
        )
    }
}

impl LedgerSource for OdooClient {
    fn search_count(&mut self, model: &str, domain: &Value) -> Result<u64> {
        self.execute_kw(model, "search_count", json!([domain]), json!({}))?
            .as_u64()
            .ok_or_else(|| SnapshotError::Rpc("search_count did not return a number".to_string()))
    }

    fn search_read(
        &mut self,
        model: &str,
        domain: &Value,
        fields: &[&str],
        offset: usize,
        limit: usize,
    ) -> Result<Vec<Value>> {
        let kwargs = json!({ "fields": fields, "limit": limit, "offset": offset, "order": "date asc" });
        match self.execute_kw(model, "search_read", json!([domain]), kwargs)? {
            Value::Array(rows) => Ok(rows),
            other => Err(SnapshotError::Rpc(format!("search_read returned {other}"))),
        }
    }
}

// ---------------------------------------------------------------------------
// Extraction
// ---------------------------------------------------------------------------

/// Page through every posted journal item, `batch` at a time, in date order.
/// Stops early if the source hands back an empty page.
pub fn fetch_all<S: LedgerSource + ?Sized>(source: &mut S, batch: usize) -> Result<Vec<Value>> {
    let domain = posted_domain();
    let total = source.search_count(MODEL, &domain)? as usize;
    info!(total, "posted journal items");

    let mut entries = Vec::with_capacity(total);
    while entries.len() < total {
        let page = source.search_read(MODEL, &domain, FIELDS, entries.len(), batch)?;
        if page.is_empty() {
            break;
        }
        entries.extend(page);
        debug!(fetched = entries.len(), total, "fetched page");
    }
    Ok(entries)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LedgerLine {
    pub entry_id: Option<i64>,
    pub move_id: Option<i64>,
    pub move_number: String,
    pub date: String,
    pub account_id: Option<i64>,
    pub account_name: String,
    pub partner_id: Option<i64>,
    pub partner_name: String,
    pub description: String,
    pub reference: String,
    pub journal: String,
    pub debit: f64,
    pub credit: f64,
    pub balance: f64,
}

/// A many2one value arrives as `[id, "display name"]` or `false`.
fn many2one(entry: &Value, field: &str) -> (Option<i64>, String) {
    match entry.get(field).and_then(Value::as_array) {
        Some(pair) => (
            pair.first().and_then(Value::as_i64),
            pair.get(1).and_then(Value::as_str).unwrap_or_default().to_string(),
        ),
        None => (None, String::new()),
    }
}

/// Plain text fields come back as `false` when unset.
fn text(entry: &Value, field: &str) -> String {
    entry.get(field).and_then(Value::as_str).unwrap_or_default().to_string()
}

fn number(entry: &Value, field: &str) -> f64 {
    entry.get(field).and_then(Value::as_f64).unwrap_or(0.0)
}

impl LedgerLine {
    pub fn from_entry(entry: &Value) -> Self {
        let (move_id, move_number) = many2one(entry, "move_id");
        let (account_id, account_name) = many2one(entry, "account_id");
        let (partner_id, partner_name) = many2one(entry, "partner_id");
        let (_, journal) = many2one(entry, "journal_id");
        Self {
            entry_id: entry.get("id").and_then(Value::as_i64),
            move_id,
            move_number,
            date: text(entry, "date"),
            account_id,
            account_name,
            partner_id,
            partner_name,
            description: text(entry, "name"),
            reference: text(entry, "ref"),
            journal,
            debit: number(entry, "debit"),
            credit: number(entry, "credit"),
            balance: number(entry, "balance"),
        }
    }
}

pub fn write_csv(path: &Path, lines: &[LedgerLine]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let mut writer = csv::Writer::from_path(path)?;
    for line in lines {
        writer.serialize(line)?;
    }
    writer.flush()?;
    Ok(())
}

#[derive(Debug, Clone, PartialEq)]
pub struct LedgerStats {
    pub entries: usize,
    pub first_date: Option<String>,
    pub last_date: Option<String>,
    pub unique_accounts: usize,
    pub total_debit: f64,
    pub total_credit: f64,
}

impl LedgerStats {
    pub fn from_lines(lines: &[LedgerLine]) -> Self {
        let dates = lines.iter().map(|l| l.date.as_str()).filter(|d| !d.is_empty());
        let accounts: BTreeSet<i64> = lines.iter().filter_map(|l| l.account_id).collect();
        Self {
            entries: lines.len(),
            first_date: dates.clone().min().map(str::to_string),
            last_date: dates.max().map(str::to_string),
            unique_accounts: accounts.len(),
            total_debit: lines.iter().map(|l| l.debit).sum(),
            total_credit: lines.iter().map(|l| l.credit).sum(),
        }
    }

    pub fn difference(&self) -> f64 {
        (self.total_debit - self.total_credit).abs()
    }
}
