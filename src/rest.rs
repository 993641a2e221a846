use reqwest::blocking::{Client, RequestBuilder, Response};
use serde_json::Value;
use tracing::debug;

use crate::error::{Result, SnapshotError};
use crate::models::PeriodKey;
use crate::settings::StoreSettings;
use crate::store::SnapshotStore;

/// PostgREST-style store: one resource per table, `eq.` filters.
pub struct RestStore {
    client: Client,
    base_url: String,
    api_key: String,
}

impl RestStore {
    pub fn new(settings: &StoreSettings) -> Result<Self> {
        Ok(Self {
            client: Client::builder().build()?,
            base_url: settings.url.trim_end_matches('/').to_string(),
            api_key: settings.service_key.clone(),
        })
    }

    fn endpoint(&self, table: &str) -> String {
        format!("{}/rest/v1/{table}", self.base_url)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .header("Content-Type", "application/json")
            .header("Prefer", "return=minimal")
    }
}

/// Query pair selecting one period, e.g. `("snapshot_date", "eq.2026-02-21")`.
pub fn period_filter(period: &PeriodKey) -> (&'static str, String) {
    (period.column(), format!("eq.{period}"))
}

fn check(op: &'static str, response: Response) -> Result<()> {
    let status = response.status();
    if status.is_success() {
        return Ok(());
    }
    let body = response.text().unwrap_or_default();
    Err(SnapshotError::Store {
        op,
        status: status.as_u16(),
        body,
    })
}

impl SnapshotStore for RestStore {
    fn delete_period(&mut self, table: &str, period: &PeriodKey) -> Result<()> {
        let url = self.endpoint(table);
        debug!(%url, %period, "DELETE");
        let response = self
            .authorized(self.client.delete(&url))
            .query(&[period_filter(period)])
            .send()?;
        check("Delete", response)
    }

    fn insert(&mut self, table: &str, records: &[Value]) -> Result<()> {
        let url = self.endpoint(table);
        debug!(%url, rows = records.len(), "POST");
        let response = self.authorized(self.client.post(&url)).json(records).send()?;
        check("Insert", response)
    }
}
