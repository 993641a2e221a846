use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SnapshotError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Failed to open workbook: {0}")]
    Workbook(String),

    #[error("Sheet not found in workbook: {0}")]
    MissingSheet(String),

    #[error("File not found: {}", .0.display())]
    InputNotFound(PathBuf),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Could not read report period: {0}")]
    PeriodHeader(String),

    #[error("{op} failed ({status}): {body}")]
    Store {
        op: &'static str,
        status: u16,
        body: String,
    },

    #[error("Odoo RPC error: {0}")]
    Rpc(String),

    #[error("Authentication failed")]
    AuthenticationFailed,
}

pub type Result<T> = std::result::Result<T, SnapshotError>;
