pub mod import;
pub mod ledger;
pub mod preview;

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};

use crate::period::DateFallback;
use crate::settings::DEFAULT_ENV_FILE;

#[derive(Parser)]
#[command(
    name = "odoo-snapshots",
    version,
    about = "Import Odoo financial-report exports as dated snapshots."
)]
pub struct Cli {
    #[command(flatten)]
    pub options: GlobalOptions,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Args, Debug, Clone)]
pub struct GlobalOptions {
    /// Key-value file holding store and Odoo credentials
    #[arg(long = "env-file", global = true, default_value = DEFAULT_ENV_FILE)]
    pub env_file: PathBuf,

    /// Parse and preview only; publish nothing
    #[arg(long = "dry-run", global = true)]
    pub dry_run: bool,

    /// Publish into a local SQLite mirror instead of the REST store
    #[arg(long, global = true, value_name = "PATH")]
    pub sqlite: Option<PathBuf>,

    /// Use today's date when an "As of" header cannot be read
    #[arg(long = "allow-date-fallback", global = true)]
    pub allow_date_fallback: bool,

    /// More log output on stderr (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,
}

impl GlobalOptions {
    pub fn date_fallback(&self) -> DateFallback {
        if self.allow_date_fallback {
            DateFallback::Today
        } else {
            DateFallback::Reject
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Import a Balance Sheet export (snapshot per "as of" date).
    BalanceSheet {
        /// Path to the XLSX export (default: OdooCsvFiles/balance_sheet.xlsx)
        file: Option<PathBuf>,
    },
    /// Import a Profit and Loss export (snapshot per year).
    ProfitLoss {
        /// Path to the XLSX export (default: OdooCsvFiles/profit_and_loss.xlsx)
        file: Option<PathBuf>,
    },
    /// Import a VAT3 Tax Report export (snapshot per year).
    Vat {
        /// Path to the XLSX export (default: OdooCsvFiles/vat3_tax_report.xlsx)
        file: Option<PathBuf>,
    },
    /// Import an Aged Receivable export (snapshot per "as of" date).
    AgedReceivable {
        /// Path to the XLSX export (default: OdooCsvFiles/aged_receivable.xlsx)
        file: Option<PathBuf>,
    },
    /// Extract posted general-ledger lines from Odoo into a CSV file.
    Ledger {
        /// Output path (default: OdooCsvFiles/general_ledger.csv)
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "odoo-snapshots",
            "vat",
            "report.xlsx",
            "--dry-run",
            "--allow-date-fallback",
            "-vv",
        ])
        .unwrap();
        assert!(cli.options.dry_run);
        assert_eq!(cli.options.verbose, 2);
        assert_eq!(cli.options.date_fallback(), DateFallback::Today);
        assert_eq!(cli.options.env_file, PathBuf::from(".env.local"));
        match cli.command {
            Commands::Vat { file } => assert_eq!(file, Some(PathBuf::from("report.xlsx"))),
            _ => panic!("expected vat"),
        }
    }

    #[test]
    fn test_file_is_optional() {
        let cli = Cli::try_parse_from(["odoo-snapshots", "balance-sheet"]).unwrap();
        assert!(matches!(cli.command, Commands::BalanceSheet { file: None }));
        assert_eq!(cli.options.date_fallback(), DateFallback::Reject);
    }
}
