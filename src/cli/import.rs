use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::cli::{preview, GlobalOptions};
use crate::db::SqliteStore;
use crate::error::{Result, SnapshotError};
use crate::models::Snapshot;
use crate::reports::{aged_receivable, balance_sheet, profit_loss, vat, ReportKind};
use crate::rest::RestStore;
use crate::settings::Settings;
use crate::store::{publish, SnapshotStore};
use crate::workbook::Sheet;

/// Resolve where snapshots go. Credentials are checked before the workbook
/// is touched.
fn open_store(options: &GlobalOptions) -> Result<Option<Box<dyn SnapshotStore>>> {
    if options.dry_run {
        return Ok(None);
    }
    if let Some(path) = &options.sqlite {
        return Ok(Some(Box::new(SqliteStore::open(path)?)));
    }
    let settings = Settings::load(&options.env_file)?;
    Ok(Some(Box::new(RestStore::new(&settings.store()?)?)))
}

/// Read the mirrored period back so the operator sees what the table holds.
fn report_mirror(path: &Path, snapshot: &Snapshot<impl Serialize>) -> Result<()> {
    let mirror = SqliteStore::open(path)?;
    let table = snapshot.report.table();
    let stored = mirror.fetch_period(table, &snapshot.period)?;
    println!(
        "Mirror {}: {} rows for {} ({} in {table})",
        path.display(),
        stored.len(),
        snapshot.period,
        mirror.count(table)?
    );
    Ok(())
}

fn publish_to<S, R>(store: Option<&mut S>, snapshot: &Snapshot<R>) -> Result<bool>
where
    S: SnapshotStore + ?Sized,
    R: Serialize,
{
    let Some(store) = store else {
        println!("Dry run: nothing published.");
        return Ok(false);
    };
    println!("Replacing {} snapshot for {}...", snapshot.report.name(), snapshot.period);
    let count = publish(store, snapshot)?;
    println!(
        "{} snapshot for {} imported successfully! Rows: {count}",
        snapshot.report.name(),
        snapshot.period
    );
    Ok(true)
}

pub fn run(kind: ReportKind, file: Option<PathBuf>, options: &GlobalOptions) -> Result<()> {
    let mut store = open_store(options)?;

    let path = file.unwrap_or_else(|| kind.default_path());
    if !path.exists() {
        return Err(SnapshotError::InputNotFound(path));
    }
    println!("Reading: {}", path.display());
    let sheet = Sheet::open(&path, kind.sheet_name())?;
    println!("Sheet: {} ({} rows)", sheet.name(), sheet.max_row());

    match kind {
        ReportKind::BalanceSheet => {
            let snapshot = balance_sheet::parse(&sheet, options.date_fallback())?;
            preview::balance_sheet(&snapshot);
            if publish_to(store.as_deref_mut(), &snapshot)? {
                preview::balance_sheet_summary(&snapshot);
                if let Some(path) = &options.sqlite {
                    report_mirror(path, &snapshot)?;
                }
            }
        }
        ReportKind::ProfitLoss => {
            let snapshot = profit_loss::parse(&sheet);
            preview::profit_loss(&snapshot);
            if publish_to(store.as_deref_mut(), &snapshot)? {
                preview::profit_loss_summary(&snapshot);
                if let Some(path) = &options.sqlite {
                    report_mirror(path, &snapshot)?;
                }
            }
        }
        ReportKind::Vat => {
            let snapshot = vat::parse(&sheet);
            preview::vat(&snapshot);
            if publish_to(store.as_deref_mut(), &snapshot)? {
                preview::vat_summary(&snapshot);
                if let Some(path) = &options.sqlite {
                    report_mirror(path, &snapshot)?;
                }
            }
        }
        ReportKind::AgedReceivable => {
            let snapshot = aged_receivable::parse(&sheet, options.date_fallback())?;
            preview::aged_receivable(&snapshot);
            if publish_to(store.as_deref_mut(), &snapshot)? {
                preview::aged_receivable_summary(&snapshot);
                if let Some(path) = &options.sqlite {
                    report_mirror(path, &snapshot)?;
                }
            }
        }
    }
    Ok(())
}
