use std::path::PathBuf;

use colored::Colorize;
use zeroize::Zeroizing;

use crate::cli::GlobalOptions;
use crate::error::{Result, SnapshotError};
use crate::fmt::amount;
use crate::ledger::{fetch_all, write_csv, LedgerLine, LedgerStats, OdooClient, BATCH_SIZE};
use crate::reports::EXPORT_DIR;
use crate::settings::Settings;

pub fn default_output() -> PathBuf {
    PathBuf::from(EXPORT_DIR).join("general_ledger.csv")
}

fn prompt_password(username: &str) -> Result<Zeroizing<String>> {
    rpassword::prompt_password(format!("Odoo password for {username}: "))
        .map(Zeroizing::new)
        .map_err(|e| SnapshotError::Config(format!("Failed to read password: {e}")))
}

pub fn run(output: Option<PathBuf>, options: &GlobalOptions) -> Result<()> {
    let settings = Settings::load(&options.env_file)?.ledger()?;
    let password = match settings.password {
        Some(p) => p,
        None => prompt_password(&settings.username)?,
    };

    println!("Connecting to {} ({})...", settings.url, settings.db);
    let mut client = OdooClient::authenticate(&settings.url, &settings.db, &settings.username, password)?;
    println!("Authenticated as {}", settings.username);

    let entries = fetch_all(&mut client, BATCH_SIZE)?;
    if entries.is_empty() {
        println!("No posted journal items found. Nothing written.");
        return Ok(());
    }
    let lines: Vec<LedgerLine> = entries.iter().map(LedgerLine::from_entry).collect();

    let path = output.unwrap_or_else(default_output);
    write_csv(&path, &lines)?;
    println!("Wrote {} entries to {}", lines.len(), path.display());

    let stats = LedgerStats::from_lines(&lines);
    println!();
    println!("{}", "General Ledger".bold());
    println!("  Entries:         {}", stats.entries);
    println!(
        "  Date range:      {} to {}",
        stats.first_date.as_deref().unwrap_or("-"),
        stats.last_date.as_deref().unwrap_or("-")
    );
    println!("  Accounts:        {}", stats.unique_accounts);
    println!("  Total debit:     {}", amount(stats.total_debit));
    println!("  Total credit:    {}", amount(stats.total_credit));
    let difference = amount(stats.difference());
    if stats.difference() < 0.005 {
        println!("  Difference:      {}", difference.green());
    } else {
        println!("  Difference:      {}", difference.red());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_output() {
        assert_eq!(default_output(), PathBuf::from("OdooCsvFiles/general_ledger.csv"));
    }

    #[test]
    fn test_missing_odoo_keys() {
        let dir = tempfile::tempdir().unwrap();
        let env = dir.path().join(".env.local");
        std::fs::write(&env, "ODOO_URL=http://localhost:8069\n").unwrap();
        let options = GlobalOptions {
            env_file: env,
            dry_run: false,
            sqlite: None,
            allow_date_fallback: false,
            verbose: 0,
        };
        let err = run(None, &options).unwrap_err();
        assert!(matches!(err, SnapshotError::Config(_)));
    }
}
